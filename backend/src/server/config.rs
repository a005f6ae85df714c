//! Runtime settings loaded via OrthoConfig and the server configuration
//! derived from them.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use eventgo::domain::{AuthorizationPolicy, CompanyCreationPolicy};
use eventgo::outbound::security::{DEFAULT_BCRYPT_COST, DEFAULT_TOKEN_TTL_DAYS};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEVELOPMENT_JWT_SECRET: &str = "eventgo-development-secret-change-me";

/// Errors raised while turning settings into a server configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("EVENTGO_JWT_SECRET must be set in release builds")]
    MissingJwtSecret,
    #[error("token_ttl_days must be positive, got {0}")]
    TokenTtl(i64),
}

/// Settings read from `EVENTGO_*` variables, CLI flags and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EVENTGO")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// HMAC secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in days.
    pub token_ttl_days: Option<i64>,
    /// bcrypt work factor.
    pub bcrypt_cost: Option<u32>,
    /// Comma separated list of origins allowed by CORS.
    pub allowed_origins: Option<String>,
    /// Restrict company creation to accounts with the `COMPANY` role.
    #[ortho_config(default = false)]
    pub company_role_required: bool,
    /// Upper bound of the database connection pool.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Listen address, `0.0.0.0:4000` unless configured.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Token signing secret. Debug builds fall back to a fixed development
    /// secret; release builds refuse to start without one.
    pub fn jwt_secret(&self) -> Result<Zeroizing<String>, SettingsError> {
        match self.jwt_secret.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(secret) => Ok(Zeroizing::new(secret.to_owned())),
            None if cfg!(debug_assertions) => {
                warn!("EVENTGO_JWT_SECRET not set; using the development secret");
                Ok(Zeroizing::new(DEVELOPMENT_JWT_SECRET.to_owned()))
            }
            None => Err(SettingsError::MissingJwtSecret),
        }
    }

    /// Bearer token lifetime; must be positive.
    pub fn token_ttl(&self) -> Result<chrono::Duration, SettingsError> {
        let days = self.token_ttl_days.unwrap_or(DEFAULT_TOKEN_TTL_DAYS);
        if days <= 0 {
            return Err(SettingsError::TokenTtl(days));
        }
        Ok(chrono::Duration::days(days))
    }

    /// bcrypt work factor.
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }

    /// Connection pool size, at least one.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    /// Trimmed, non-empty origins; empty means same-origin only.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Authorization policy derived from the settings.
    pub fn policy(&self) -> AuthorizationPolicy {
        let companies = if self.company_role_required {
            CompanyCreationPolicy::CompanyRoleOnly
        } else {
            CompanyCreationPolicy::AnyAuthenticated
        };
        AuthorizationPolicy::new(companies)
    }
}

/// Everything `create_server` needs besides the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Configuration without any allowed origin.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            allowed_origins: Vec::new(),
        }
    }

    /// Allow cross-origin requests from the given origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "EVENTGO_BIND_ADDR",
        "EVENTGO_DATABASE_URL",
        "EVENTGO_JWT_SECRET",
        "EVENTGO_TOKEN_TTL_DAYS",
        "EVENTGO_BCRYPT_COST",
        "EVENTGO_ALLOWED_ORIGINS",
        "EVENTGO_COMPANY_ROLE_REQUIRED",
        "EVENTGO_DB_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("eventgo")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal parses")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.bcrypt_cost(), DEFAULT_BCRYPT_COST);
        assert_eq!(
            settings.token_ttl().expect("default ttl is positive"),
            chrono::Duration::days(DEFAULT_TOKEN_TTL_DAYS)
        );
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
        assert!(settings.allowed_origins().is_empty());
        assert_eq!(settings.policy(), AuthorizationPolicy::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("EVENTGO_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "EVENTGO_DATABASE_URL",
                Some("postgres://localhost/eventgo".to_owned()),
            ),
            ("EVENTGO_JWT_SECRET", Some("s3cret".to_owned())),
            ("EVENTGO_TOKEN_TTL_DAYS", Some("2".to_owned())),
            ("EVENTGO_BCRYPT_COST", Some("6".to_owned())),
            (
                "EVENTGO_ALLOWED_ORIGINS",
                Some(" http://a.test , ,http://b.test".to_owned()),
            ),
            ("EVENTGO_COMPANY_ROLE_REQUIRED", Some("true".to_owned())),
            ("EVENTGO_DB_MAX_CONNECTIONS", Some("0".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/eventgo")
        );
        assert_eq!(settings.jwt_secret().expect("secret set").as_str(), "s3cret");
        assert_eq!(
            settings.token_ttl().expect("positive ttl"),
            chrono::Duration::days(2)
        );
        assert_eq!(settings.bcrypt_cost(), 6);
        assert_eq!(settings.allowed_origins(), ["http://a.test", "http://b.test"]);
        assert_eq!(
            settings.policy(),
            AuthorizationPolicy::new(CompanyCreationPolicy::CompanyRoleOnly)
        );
        assert_eq!(settings.db_max_connections(), 1);
    }

    fn bare_settings() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            jwt_secret: None,
            token_ttl_days: None,
            bcrypt_cost: None,
            allowed_origins: None,
            company_role_required: false,
            db_max_connections: None,
        }
    }

    #[rstest]
    fn garbage_bind_address_is_rejected() {
        let settings = AppSettings {
            bind_addr: Some("not-an-address".to_owned()),
            ..bare_settings()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn non_positive_token_ttl_is_rejected(#[case] days: i64) {
        let settings = AppSettings {
            token_ttl_days: Some(days),
            ..bare_settings()
        };
        assert!(matches!(settings.token_ttl(), Err(SettingsError::TokenTtl(d)) if d == days));
    }

    #[cfg(debug_assertions)]
    #[rstest]
    fn debug_builds_fall_back_to_the_development_secret() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        let secret = load_from_empty_args()
            .jwt_secret()
            .expect("debug builds fall back");
        assert_eq!(secret.as_str(), DEVELOPMENT_JWT_SECRET);
    }
}
