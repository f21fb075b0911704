use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
pub const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "dev-secret-key-change-in-production",
];

/// Accepted token lifetimes, one hour up to a year.
pub const TOKEN_TTL_HOURS: RangeInclusive<i64> = 1..=8760;

/// Settings for the API service, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// `None` means permissive CORS.
    pub cors_origins: Option<Vec<String>>,
    pub agent_url: Option<String>,
    /// `None` means derive it from the provider timeout.
    pub agent_timeout: Option<Duration>,
    pub admin: Option<AdminSeed>,
}

/// Credentials for the admin account seeded (or promoted) at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("PRCONNECT_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("PRCONNECT_JWT_SECRET is unset or still a placeholder");
        }

        let port = match get("PRCONNECT_PORT") {
            Some(raw) => raw.parse().with_context(|| format!("PRCONNECT_PORT: invalid value '{raw}'"))?,
            None => 5001,
        };
        let token_ttl_hours = match get("PRCONNECT_TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PRCONNECT_TOKEN_TTL_HOURS: invalid value '{raw}'"))?,
            None => 24,
        };
        if !TOKEN_TTL_HOURS.contains(&token_ttl_hours) {
            bail!(
                "PRCONNECT_TOKEN_TTL_HOURS must be between {} and {}, got {token_ttl_hours}",
                TOKEN_TTL_HOURS.start(),
                TOKEN_TTL_HOURS.end()
            );
        }

        let agent_timeout = match get("PRCONNECT_AGENT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("PRCONNECT_AGENT_TIMEOUT_SECS: invalid value '{raw}'"))?;
                if secs == 0 {
                    bail!("PRCONNECT_AGENT_TIMEOUT_SECS must be positive");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let cors_origins = get("PRCONNECT_CORS_ORIGINS").map(|raw| {
            raw.split(',')
                .map(|o| o.trim().trim_end_matches('/').to_string())
                .filter(|o| !o.is_empty())
                .collect()
        });

        let admin = match (get("PRCONNECT_ADMIN_EMAIL"), get("PRCONNECT_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            _ => None,
        };

        Ok(Self {
            host: get("PRCONNECT_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: get("PRCONNECT_DB_PATH").unwrap_or_else(|| "prconnect.db".into()).into(),
            jwt_secret,
            token_ttl_hours,
            cors_origins,
            agent_url: get("PRCONNECT_AGENT_URL").map(|u| u.trim_end_matches('/').to_string()),
            agent_timeout,
            admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        ServerConfig::from_lookup(|key| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn placeholder_or_missing_secret_is_fatal() {
        assert!(config(&[]).is_err());
        assert!(config(&[("PRCONNECT_JWT_SECRET", "dev-secret-change-me")]).is_err());
        assert!(config(&[("PRCONNECT_JWT_SECRET", "  ")]).is_err());
    }

    #[test]
    fn defaults() {
        let c = config(&[("PRCONNECT_JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(c.host, "0.0.0.0");
        assert_eq!(c.port, 5001);
        assert_eq!(c.db_path, PathBuf::from("prconnect.db"));
        assert_eq!(c.token_ttl_hours, 24);
        assert!(c.cors_origins.is_none());
        assert!(c.agent_url.is_none());
        assert!(c.agent_timeout.is_none());
        assert!(c.admin.is_none());
    }

    #[test]
    fn token_ttl_must_be_in_range() {
        for bad in ["0", "-5", "8761", "9223372036854775807"] {
            let err = config(&[("PRCONNECT_JWT_SECRET", "s3cret"), ("PRCONNECT_TOKEN_TTL_HOURS", bad)])
                .unwrap_err();
            assert!(err.to_string().contains("PRCONNECT_TOKEN_TTL_HOURS"), "{bad}: {err}");
        }
        let c = config(&[("PRCONNECT_JWT_SECRET", "s3cret"), ("PRCONNECT_TOKEN_TTL_HOURS", "8760")]).unwrap();
        assert_eq!(c.token_ttl_hours, 8760);
    }

    #[test]
    fn agent_timeout_is_parsed_and_must_be_positive() {
        let c = config(&[("PRCONNECT_JWT_SECRET", "s3cret"), ("PRCONNECT_AGENT_TIMEOUT_SECS", "240")]).unwrap();
        assert_eq!(c.agent_timeout, Some(Duration::from_secs(240)));
        assert!(config(&[("PRCONNECT_JWT_SECRET", "s3cret"), ("PRCONNECT_AGENT_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn parses_lists_and_admin_seed() {
        let c = config(&[
            ("PRCONNECT_JWT_SECRET", "s3cret"),
            ("PRCONNECT_CORS_ORIGINS", "http://localhost:3000/, https://app.example.com"),
            ("PRCONNECT_AGENT_URL", "http://127.0.0.1:8001/"),
            ("PRCONNECT_ADMIN_EMAIL", "root@example.com"),
            ("PRCONNECT_ADMIN_PASSWORD", "hunter22"),
        ])
        .unwrap();
        assert_eq!(
            c.cors_origins.unwrap(),
            ["http://localhost:3000", "https://app.example.com"]
        );
        assert_eq!(c.agent_url.as_deref(), Some("http://127.0.0.1:8001"));
        assert_eq!(c.admin.unwrap().email, "root@example.com");
    }

    #[test]
    fn admin_seed_needs_both_halves() {
        let c = config(&[
            ("PRCONNECT_JWT_SECRET", "s3cret"),
            ("PRCONNECT_ADMIN_EMAIL", "root@example.com"),
        ])
        .unwrap();
        assert!(c.admin.is_none());
    }
}
