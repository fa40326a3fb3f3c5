use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("INKWELL_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("INKWELL_JWT_SECRET is unset or still a placeholder");
        }

        let host = lookup("INKWELL_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = lookup("INKWELL_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("INKWELL_PORT must be a port number")?;
        let db_path = lookup("INKWELL_DB_PATH")
            .unwrap_or_else(|| "inkwell.db".into())
            .into();
        let token_ttl_days: i64 = lookup("INKWELL_TOKEN_TTL_DAYS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .context("INKWELL_TOKEN_TTL_DAYS must be a whole number of days")?;
        if token_ttl_days <= 0 {
            bail!("INKWELL_TOKEN_TTL_DAYS must be positive");
        }

        Ok(Self {
            host,
            port,
            db_path,
            jwt_secret,
            token_ttl_days,
        })
    }
}
