/// Application services
///
/// Business rules sit here, between the HTTP handlers and the store traits.

mod chirps;
mod session;

pub use chirps::ChirpService;
pub use session::{clamp_ttl, LoginOutcome, SessionService};
