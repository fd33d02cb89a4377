pub mod auth;

pub use auth::auth;
