use axum_extra::extract::cookie::SameSite;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_EXPIRATION_HOURS: i64 = 24;
/// Upper bound for `TOKEN_EXPIRATION_HOURS`, one leap year
pub const MAX_TOKEN_EXPIRATION_HOURS: i64 = 24 * 366;
const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = [
    "https://pet-haven-client.web.app",
    "https://pet-haven-client.firebaseapp.com",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Cookie attributes for the access token.
/// Secure cookies are sent cross-site (`SameSite=None`); insecure ones stay `Lax`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    pub fn same_site(&self) -> SameSite {
        if self.secure {
            SameSite::None
        } else {
            SameSite::Lax
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// `None` runs the server on the in-memory repositories
    pub uri: Option<String>,
    pub database_name: String,
    pub services_collection: String,
    pub bookings_collection: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub database: DatabaseConfig,
    pub token_secret: String,
    pub token_expiration_hours: i64,
    pub cookie_policy: CookiePolicy,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let token_expiration_hours = parse_or(
            get("TOKEN_EXPIRATION_HOURS"),
            "TOKEN_EXPIRATION_HOURS",
            DEFAULT_TOKEN_EXPIRATION_HOURS,
        )?;
        if !(1..=MAX_TOKEN_EXPIRATION_HOURS).contains(&token_expiration_hours) {
            return Err(ConfigError::Invalid {
                name: "TOKEN_EXPIRATION_HOURS",
                value: token_expiration_hours.to_string(),
            });
        }

        let token_secret = get("SECRET_TOKEN").ok_or(ConfigError::Missing("SECRET_TOKEN"))?;
        let secure = parse_or(get("COOKIE_SECURE"), "COOKIE_SECURE", false)?;

        let uri = match get("MONGODB_URI") {
            Some(uri) => Some(uri),
            None => match (get("DB_USER"), get("DB_PASS"), get("DB_HOST")) {
                (Some(user), Some(pass), Some(host)) => Some(format!(
                    "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                    user, pass, host
                )),
                _ => None,
            },
        };

        let allowed_origins = match get("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            port,
            database: DatabaseConfig {
                uri,
                database_name: get("DB_NAME").unwrap_or_else(|| "petHavenDB".to_string()),
                services_collection: get("SERVICES_COLLECTION")
                    .unwrap_or_else(|| "petHavenServices".to_string()),
                bookings_collection: get("BOOKINGS_COLLECTION")
                    .unwrap_or_else(|| "bookings".to_string()),
            },
            token_secret,
            token_expiration_hours,
            cookie_policy: CookiePolicy { secure },
            allowed_origins,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
