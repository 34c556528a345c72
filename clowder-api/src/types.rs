//! Request and response bodies
//!
//! Everything the HTTP surface accepts or returns. Responses are built
//! from the `clowder-core` entities; list endpoints return bare arrays
//! for compatibility with existing clients.

use clowder_core::{Cat, CatId, Mission, MissionId, Target, TargetId, Timestamp};
use serde::{Deserialize, Serialize};

// ============================================================================
// CAT TYPES
// ============================================================================

/// Request to hire a new cat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCatRequest {
    /// Name of the cat
    pub name: String,
    /// Non-negative years of field experience
    pub years_of_experience: i32,
    /// Breed name, validated against the external catalog
    pub breed: String,
    /// Annual salary
    pub salary: f64,
}

/// Request to update a cat. Salary is the only mutable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCatRequest {
    pub salary: f64,
}

/// Cat response with full details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CatResponse {
    pub cat_id: CatId,
    pub name: String,
    pub years_of_experience: i32,
    pub breed: String,
    pub salary: f64,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

impl From<Cat> for CatResponse {
    fn from(cat: Cat) -> Self {
        Self {
            cat_id: cat.cat_id,
            name: cat.name,
            years_of_experience: cat.years_of_experience,
            breed: cat.breed,
            salary: cat.salary,
            created_at: cat.created_at,
        }
    }
}

// ============================================================================
// TARGET TYPES
// ============================================================================

/// A target supplied when creating a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateTargetRequest {
    pub name: String,
    pub country: String,
}

/// Request to update a target's notes and/or completion flag.
///
/// Omitted fields are left unchanged. A notes change is rejected once the
/// target or its mission is completed; a flag-only update never is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateTargetRequest {
    pub notes: Option<String>,
    pub is_completed: Option<bool>,
}

impl UpdateTargetRequest {
    /// Whether the request changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.notes.is_none() && self.is_completed.is_none()
    }
}

/// Target response with full details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TargetResponse {
    pub target_id: TargetId,
    pub mission_id: MissionId,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub is_completed: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

impl From<Target> for TargetResponse {
    fn from(target: Target) -> Self {
        Self {
            target_id: target.target_id,
            mission_id: target.mission_id,
            name: target.name,
            country: target.country,
            notes: target.notes,
            is_completed: target.is_completed,
            created_at: target.created_at,
        }
    }
}

// ============================================================================
// MISSION TYPES
// ============================================================================

/// Request to create a mission together with its 1-3 targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateMissionRequest {
    pub targets: Vec<CreateTargetRequest>,
}

/// Mission response with nested targets and the assigned cat, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MissionResponse {
    pub mission_id: MissionId,
    pub cat_id: Option<CatId>,
    pub is_completed: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    pub targets: Vec<TargetResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat: Option<CatResponse>,
}

impl MissionResponse {
    /// Assemble a response from the mission row and its loaded relations.
    pub fn assemble(mission: Mission, targets: Vec<Target>, cat: Option<Cat>) -> Self {
        Self {
            mission_id: mission.mission_id,
            cat_id: mission.cat_id,
            is_completed: mission.is_completed,
            created_at: mission.created_at,
            targets: targets.into_iter().map(TargetResponse::from).collect(),
            cat: cat.map(CatResponse::from),
        }
    }
}

// ============================================================================
// QUERY TYPES
// ============================================================================

/// Pagination query parameters shared by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListParams {
    /// Number of records to skip (default 0)
    pub skip: Option<i64>,
    /// Maximum number of records to return (default 100)
    pub limit: Option<i64>,
}

impl ListParams {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(crate::constants::DEFAULT_PAGE_SIZE).max(0)
    }
}

// ============================================================================
// MISC TYPES
// ============================================================================

/// Body of the `GET /` welcome endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WelcomeResponse {
    pub message: String,
    pub docs: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_target_request_is_empty() {
        assert!(UpdateTargetRequest::default().is_empty());

        let notes_only = UpdateTargetRequest {
            notes: Some("sighted at the docks".to_string()),
            is_completed: None,
        };
        assert!(!notes_only.is_empty());

        let flag_only = UpdateTargetRequest {
            notes: None,
            is_completed: Some(true),
        };
        assert!(!flag_only.is_empty());
    }

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams::default();
        assert_eq!(params.skip(), 0);
        assert_eq!(params.limit(), 100);

        let params = ListParams {
            skip: Some(-5),
            limit: Some(10),
        };
        assert_eq!(params.skip(), 0);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_create_mission_request_deserializes() {
        let json = r#"{"targets":[{"name":"T1","country":"FR"}]}"#;
        let req: CreateMissionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.targets.len(), 1);
        assert_eq!(req.targets[0].name, "T1");
        assert_eq!(req.targets[0].country, "FR");
    }

    #[test]
    fn test_mission_response_omits_absent_cat() {
        let mission = Mission {
            mission_id: 1,
            cat_id: None,
            is_completed: false,
            created_at: chrono::Utc::now(),
        };
        let response = MissionResponse::assemble(mission, vec![], None);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("cat").is_none());
        assert!(json.get("cat_id").unwrap().is_null());
    }
}
