//! API-level configuration
//!
//! Everything here comes from environment variables with development
//! defaults, so a bare `cargo run` serves a fully permissive instance.
//! Database and breed-catalog settings live next to the components that
//! consume them (`db::DbConfig`, `services::BreedCatalogConfig`).

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// CORS settings for browser-based clients.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Origins allowed to call the API. An empty list means every origin
    /// is allowed, which is the development default.
    pub cors_origins: Vec<String>,

    /// Whether browsers may send credentials on cross-origin requests.
    /// Only honored when an explicit origin list is configured.
    pub cors_allow_credentials: bool,

    /// How long browsers may cache a preflight response, in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: crate::constants::DEFAULT_CORS_MAX_AGE_SECS,
        }
    }
}

impl ApiConfig {
    /// Read the CORS settings from the environment.
    ///
    /// `CLOWDER_CORS_ORIGINS` is a comma-separated origin list (empty or
    /// unset allows all), `CLOWDER_CORS_ALLOW_CREDENTIALS` takes
    /// "true"/"false", and `CLOWDER_CORS_MAX_AGE_SECS` overrides the
    /// preflight cache duration.
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CLOWDER_CORS_ORIGINS")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = std::env::var("CLOWDER_CORS_ALLOW_CREDENTIALS")
            .is_ok_and(|value| value.eq_ignore_ascii_case("true"));

        let cors_max_age_secs = std::env::var("CLOWDER_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(crate::constants::DEFAULT_CORS_MAX_AGE_SECS);

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
        }
    }

    /// A restricted origin list marks a production deployment.
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }
}
