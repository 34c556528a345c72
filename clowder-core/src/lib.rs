//! Clowder core types
//!
//! The entity structs and identity aliases shared across the workspace.
//! Deliberately behavior-free: every rule about these records lives in
//! `clowder-api`.

use chrono::{DateTime, Utc};

mod entities;

pub use entities::{Cat, Mission, Target};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Cat identifier. BIGSERIAL in the database, so ids are assigned in
/// insertion order.
pub type CatId = i64;

/// Mission identifier.
pub type MissionId = i64;

/// Target identifier.
pub type TargetId = i64;

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;
