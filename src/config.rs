use actix_web::cookie::Key;
use anyhow::{Context, Result, ensure};
use dotenvy::dotenv;
use sha2::{Digest, Sha512};
use std::env;
use std::str::FromStr;

pub const DEFAULT_SECRET_KEY: &str = "leavetrack-secret-key";

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub secret_key: String,
    pub workers: usize,

    // Rate limiting
    pub rate_per_min: u32,

    pub cookie_secure: bool,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any name -> value source; `from_env` passes
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let workers: usize = parse_var(&lookup, "WORKERS", 4)?;
        ensure!(workers > 0, "WORKERS must be greater than 0");

        Ok(Self {
            server_addr: text("SERVER_ADDR", "0.0.0.0:5000"),
            database_url: text("DATABASE_URL", "sqlite://leaves.db"),
            secret_key: text("SECRET_KEY", DEFAULT_SECRET_KEY),
            workers,
            rate_per_min: parse_var(&lookup, "RATE_PER_MIN", 600)?,
            cookie_secure: parse_var(&lookup, "COOKIE_SECURE", false)?,
            log_dir: text("LOG_DIR", "logs"),
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Session signing/encryption key. `Key::from` wants 64 bytes, so the
    /// secret is stretched through SHA-512 whatever its length.
    pub fn session_key(&self) -> Key {
        let digest = Sha512::digest(self.secret_key.as_bytes());
        Key::from(digest.as_slice())
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: "sqlite::memory:".to_string(),
            secret_key: "test-secret".to_string(),
            workers: 1,
            rate_per_min: 10_000,
            cookie_secure: false,
            log_dir: "logs".to_string(),
        }
    }
}
