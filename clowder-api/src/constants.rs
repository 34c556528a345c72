//! Shared constants
//!
//! Bounds and defaults referenced from more than one module. Anything used
//! in a single place stays local to it.

/// Default page size when a list request omits `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// A mission owns at least this many targets.
pub const MIN_TARGETS_PER_MISSION: usize = 1;

/// A mission owns at most this many targets.
pub const MAX_TARGETS_PER_MISSION: usize = 3;

/// Upper character bound shared by name and country fields.
pub const MAX_NAME_LENGTH: usize = 100;

/// Breed catalog queried when `CLOWDER_BREED_CATALOG_URL` is unset.
pub const DEFAULT_BREED_CATALOG_URL: &str = "https://api.thecatapi.com/v1/breeds";

/// Catalog fetch deadline, in seconds.
pub const DEFAULT_BREED_FETCH_TIMEOUT_SECS: u64 = 10;

/// CORS preflight cache duration (24 hours).
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;
