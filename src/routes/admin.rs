/// Admin routes

use actix_web::{web, HttpResponse};

use crate::configuration::ApplicationSettings;
use crate::error::AppError;
use crate::middleware::HitCounter;
use crate::services::SessionService;

/// GET /admin/metrics
pub async fn metrics(counter: web::Data<HitCounter>) -> HttpResponse {
    let page = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        counter.load()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page)
}

/// POST /admin/reset
///
/// Always resets the hit counter. Deleting every user is only allowed on
/// the `dev` platform.
///
/// # Errors
/// - 403: Platform is not `dev`
pub async fn reset(
    counter: web::Data<HitCounter>,
    application: web::Data<ApplicationSettings>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    counter.reset();

    if !application.is_dev() {
        return Err(AppError::Forbidden(
            "reset is only allowed on the dev platform".to_string(),
        ));
    }

    sessions.reset_users().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0 and all users deleted"))
}
