//! The three persisted record types

use crate::{CatId, MissionId, TargetId, Timestamp};
use serde::{Deserialize, Serialize};

/// Cat - a field agent of the agency.
///
/// Salary is the only field that may change after creation; the breed is
/// validated against the external catalog before the row ever exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Cat {
    pub cat_id: CatId,
    pub name: String,
    pub years_of_experience: i32,
    pub breed: String,
    pub salary: f64,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

/// Mission - a unit of work owning 1-3 targets.
///
/// `cat_id` is unique across missions: a cat works at most one mission at
/// a time. `is_completed` only ever transitions false -> true, and only as
/// a consequence of every owned target completing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Mission {
    pub mission_id: MissionId,
    pub cat_id: Option<CatId>,
    pub is_completed: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

/// Target - a sub-task of a mission.
///
/// Notes stay mutable until either the target or its owning mission is
/// completed; the rows themselves are deleted together with the mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Target {
    pub target_id: TargetId,
    pub mission_id: MissionId,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub is_completed: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}
