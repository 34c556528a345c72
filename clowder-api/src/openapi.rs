//! OpenAPI Specification for the Clowder API
//!
//! This module defines the OpenAPI document for the REST API. It uses
//! utoipa to generate the specification from Rust types and route
//! annotations; the interactive UI is served at /swagger-ui.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{self, cat, health, mission};
use crate::types::{
    CatResponse, CreateCatRequest, CreateMissionRequest, CreateTargetRequest, ListParams,
    MissionResponse, TargetResponse, UpdateCatRequest, UpdateTargetRequest, WelcomeResponse,
};

use crate::routes::health::{DatabaseHealth, HealthReport, HealthStatus};

// Import domain types from clowder-core
use clowder_core::{Cat, Mission, Target};

/// OpenAPI document for the Clowder API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clowder Spy Cat Agency API",
        version = "0.1.0",
        description = "Management system for spy cats, missions, and targets",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local Development")
    ),
    tags(
        (name = "Cats", description = "Spy cat roster management"),
        (name = "Missions", description = "Missions with their nested targets"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Root", description = "Service welcome")
    ),
    paths(
        // === Cat Routes ===
        cat::create_cat,
        cat::list_cats,
        cat::get_cat,
        cat::update_cat,
        cat::delete_cat,

        // === Mission Routes ===
        mission::create_mission,
        mission::list_missions,
        mission::get_mission,
        mission::delete_mission,
        mission::assign_cat,
        mission::update_target,

        // === Health Routes ===
        health::ping,
        health::live,
        health::ready,

        // === Root ===
        routes::welcome,
    ),
    components(schemas(
        // Domain entities
        Cat,
        Mission,
        Target,

        // Request/response types
        CreateCatRequest,
        UpdateCatRequest,
        CatResponse,
        CreateMissionRequest,
        CreateTargetRequest,
        UpdateTargetRequest,
        MissionResponse,
        TargetResponse,
        ListParams,
        WelcomeResponse,

        // Health types
        HealthReport,
        HealthStatus,
        DatabaseHealth,

        // Errors
        ApiError,
        ErrorCode,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        let paths = json.get("paths").unwrap().as_object().unwrap();
        assert!(paths.contains_key("/cats/"));
        assert!(paths.contains_key("/cats/{id}"));
        assert!(paths.contains_key("/missions/"));
        assert!(paths.contains_key("/missions/{id}/assign/{cat_id}"));
        assert!(paths.contains_key("/missions/{id}/targets/{target_id}"));
        assert!(paths.contains_key("/"));
    }
}
