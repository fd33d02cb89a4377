pub mod auth;
pub mod properties;
