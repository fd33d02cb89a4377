use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::env;

use crate::utils::cookies::SameSite;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // The connection string and the signing secret are required inputs;
        // starting without either is a configuration error, not a default.
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow!("DATABASE_URL must be set"))?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET must be set"))?;

        let jwt_expiration_hours = env::var("JWT_EXPIRATION_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24);

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());
        let cookie_secure = env::var("COOKIE_SECURE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(app_env != "development");

        let cookie_same_site = match env::var("COOKIE_SAME_SITE")
            .unwrap_or_else(|_| "Lax".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "strict" => SameSite::Strict,
            "none" => SameSite::None,
            _ => SameSite::Lax,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            cookie_secure,
            cookie_same_site,
        })
    }
}
