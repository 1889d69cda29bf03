/// Middleware module
///
/// Request guards and per-request bookkeeping shared by the routes.

mod authenticated_user;
mod metrics;

pub use authenticated_user::AuthenticatedUser;
pub use metrics::{HitCounter, HitCounterMiddleware};
