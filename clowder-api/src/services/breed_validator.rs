//! Breed Validator
//!
//! Validates cat breeds against an external catalog, caching the set of
//! valid names for the lifetime of the process. The validator is an
//! explicitly constructed component handed to the routes that need it, so
//! tests can substitute a primed instance instead of patching globals.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::constants::{DEFAULT_BREED_CATALOG_URL, DEFAULT_BREED_FETCH_TIMEOUT_SECS};
use crate::error::{ApiError, ApiResult};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the external breed catalog.
#[derive(Debug, Clone)]
pub struct BreedCatalogConfig {
    /// Catalog endpoint returning a JSON array of breed records.
    pub url: String,
    /// Timeout for the catalog fetch.
    pub timeout: Duration,
}

impl Default for BreedCatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BREED_CATALOG_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_BREED_FETCH_TIMEOUT_SECS),
        }
    }
}

impl BreedCatalogConfig {
    /// Create a catalog configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CLOWDER_BREED_CATALOG_URL`: Catalog endpoint (default: TheCatAPI breeds)
    /// - `CLOWDER_BREED_FETCH_TIMEOUT_SECS`: Fetch timeout (default: 10)
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("CLOWDER_BREED_CATALOG_URL")
                .unwrap_or_else(|_| DEFAULT_BREED_CATALOG_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("CLOWDER_BREED_FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BREED_FETCH_TIMEOUT_SECS),
            ),
        }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// A single record in the catalog response. Only the name matters.
#[derive(Debug, Deserialize)]
struct BreedRecord {
    name: String,
}

/// Breed validator holding the process-wide cache of valid breed names.
///
/// The first validation triggers one outbound fetch; the resulting set is
/// kept until `clear_cache`. A failed fetch is NOT cached, so a later call
/// retries. Concurrent first calls may each fetch; both produce the same
/// set and the last write wins.
pub struct BreedValidator {
    http: reqwest::Client,
    catalog_url: String,
    cache: RwLock<Option<Arc<HashSet<String>>>>,
}

impl BreedValidator {
    /// Create a validator with an empty cache.
    pub fn new(config: &BreedCatalogConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ApiError::internal_error(format!("Failed to build catalog HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            catalog_url: config.url.clone(),
            cache: RwLock::new(None),
        })
    }

    /// Get the set of valid breed names, fetching the catalog on first use.
    ///
    /// # Errors
    /// Returns `ServiceUnavailable` if the catalog cannot be fetched.
    pub async fn valid_breeds(&self) -> ApiResult<Arc<HashSet<String>>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(cached));
        }

        let breeds = Arc::new(self.fetch_catalog().await?);
        tracing::info!(count = breeds.len(), "Breed catalog loaded");

        *self.cache.write().await = Some(Arc::clone(&breeds));
        Ok(breeds)
    }

    async fn fetch_catalog(&self) -> ApiResult<HashSet<String>> {
        let response = self
            .http
            .get(&self.catalog_url)
            .send()
            .await?
            .error_for_status()?;

        let records: Vec<BreedRecord> = response.json().await?;
        Ok(records.into_iter().map(|record| record.name).collect())
    }

    /// Check whether a breed name exists in the catalog.
    pub async fn is_valid_breed(&self, breed: &str) -> ApiResult<bool> {
        Ok(self.valid_breeds().await?.contains(breed))
    }

    /// Validate a breed name.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an unknown breed and `ServiceUnavailable`
    /// when the catalog itself cannot be reached.
    pub async fn validate_breed(&self, breed: &str) -> ApiResult<()> {
        if !self.is_valid_breed(breed).await? {
            return Err(ApiError::invalid_input(format!(
                "Invalid breed: '{}'. Must be one of the valid breeds from the catalog.",
                breed
            )));
        }
        Ok(())
    }

    /// Seed the cache without a fetch (warm start, tests).
    pub async fn prime(&self, breeds: HashSet<String>) {
        *self.cache.write().await = Some(Arc::new(breeds));
    }

    /// Reset the cache to unfetched (primarily for test isolation).
    pub async fn clear_cache(&self) {
        *self.cache.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn primed_validator() -> BreedValidator {
        BreedValidator::new(&BreedCatalogConfig::default()).expect("validator")
    }

    fn sample_breeds() -> HashSet<String> {
        ["Maine Coon", "Siamese"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_catalog_config_defaults() {
        let config = BreedCatalogConfig::default();
        assert_eq!(config.url, DEFAULT_BREED_CATALOG_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_validate_breed_against_primed_cache() {
        let validator = primed_validator();
        validator.prime(sample_breeds()).await;

        assert!(validator.validate_breed("Maine Coon").await.is_ok());

        let err = validator.validate_breed("Sphynx").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.message.contains("Sphynx"));
    }

    #[tokio::test]
    async fn test_primed_cache_is_returned_without_fetch() {
        let validator = primed_validator();
        validator.prime(sample_breeds()).await;

        let breeds = validator.valid_breeds().await.expect("cached set");
        assert_eq!(breeds.len(), 2);
        assert!(breeds.contains("Siamese"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_service_unavailable_and_not_cached() {
        // Nothing listens here; the connection is refused immediately.
        let config = BreedCatalogConfig {
            url: "http://127.0.0.1:9/breeds".to_string(),
            timeout: Duration::from_secs(1),
        };
        let validator = BreedValidator::new(&config).expect("validator");

        let err = validator.validate_breed("Maine Coon").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);

        // The failure is not cached: priming afterwards works normally.
        validator.prime(sample_breeds()).await;
        assert!(validator.validate_breed("Maine Coon").await.is_ok());
    }

    #[tokio::test]
    async fn test_clear_cache_resets_to_unfetched() {
        let config = BreedCatalogConfig {
            url: "http://127.0.0.1:9/breeds".to_string(),
            timeout: Duration::from_secs(1),
        };
        let validator = BreedValidator::new(&config).expect("validator");
        validator.prime(sample_breeds()).await;
        assert!(validator.validate_breed("Siamese").await.is_ok());

        validator.clear_cache().await;

        // Back to unfetched state: the next validation hits the (dead) catalog.
        let err = validator.validate_breed("Siamese").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);
    }
}
