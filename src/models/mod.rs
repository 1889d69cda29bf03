/// Domain records shared by the store, the services and the HTTP layer.

mod chirp;
mod refresh_token;
mod user;

pub use chirp::{Chirp, SortDirection};
pub use refresh_token::{RefreshToken, REFRESH_TOKEN_LIFETIME_DAYS};
pub use user::User;
