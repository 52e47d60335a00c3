//! Environment-derived configuration.
//!
//! All env reads happen here, once, at startup; the resulting structs are
//! injected into the services that need them. Nothing reads the environment
//! mid-operation.

use chrono::Duration;

use wardflow_credentials::CredentialPolicy;
use wardflow_scheduling::FeeSchedule;

/// Process configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub fees: FeeSchedule,
    pub credentials: CredentialPolicy,
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Self {
            port: env_parse("PORT", 8080),
            jwt_secret,
            token_ttl: Duration::hours(24),
            fees: FeeSchedule::new(
                env_parse("FEE", 2000),
                env_parse("CONSULTANT_RATE", 2),
            ),
            credentials: CredentialPolicy::default(),
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }
}

fn env_parse<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(name, value = %raw, "malformed env value; using default");
            default
        }),
        Err(_) => default,
    }
}
