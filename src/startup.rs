use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::AuthGate;
use crate::configuration::{ApplicationSettings, AuthSettings};
use crate::error::json_error_handler;
use crate::logger::LoggerMiddleware;
use crate::middleware::{HitCounter, HitCounterMiddleware};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, health_check, list_chirps, login, metrics,
    polka_webhook, refresh, reset, revoke, update_user, validate_chirp,
};
use crate::services::{ChirpService, SessionService};
use crate::store::Store;

pub fn run(
    listener: TcpListener,
    store: Arc<dyn Store>,
    application: ApplicationSettings,
    auth: AuthSettings,
) -> Result<Server, std::io::Error> {
    let sessions = web::Data::new(SessionService::new(store.clone(), &auth));
    let chirps = web::Data::new(ChirpService::new(store));
    let gate = web::Data::new(AuthGate::new(&auth));
    let hit_counter = Arc::new(HitCounter::new());
    let hits = web::Data::from(hit_counter.clone());
    let static_dir = application.static_dir.clone();
    let application = web::Data::new(application);

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())      // Standard logging
            .wrap(LoggerMiddleware)       // Custom logging

            // Shared state
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(sessions.clone())
            .app_data(chirps.clone())
            .app_data(gate.clone())
            .app_data(hits.clone())
            .app_data(application.clone())

            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/validate_chirp", web::post().to(validate_chirp))
                    .route("/users", web::post().to(create_user))
                    .route("/users", web::put().to(update_user))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .route("/chirps", web::post().to(create_chirp))
                    .route("/chirps", web::get().to(list_chirps))
                    .route("/chirps/{chirp_id}", web::get().to(get_chirp))
                    .route("/chirps/{chirp_id}", web::delete().to(delete_chirp))
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )

            // Static files, every request counted
            .service(
                web::scope("/app")
                    .wrap(HitCounterMiddleware::new(hit_counter.clone()))
                    .service(fs::Files::new("/", static_dir.clone()).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
