//! Mission REST API Routes
//!
//! This module implements Axum route handlers for missions and their
//! nested targets. State-transition rules live in the mission lifecycle
//! service; handlers validate request shape, delegate, write, and after
//! every target update re-run the completion cascade before responding.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    constants::{MAX_NAME_LENGTH, MAX_TARGETS_PER_MISSION, MIN_TARGETS_PER_MISSION},
    db::DbClient,
    error::{ApiError, ApiResult},
    services,
    types::{
        CreateMissionRequest, ListParams, MissionResponse, TargetResponse, UpdateTargetRequest,
    },
    validation::{ValidateLength, ValidateNonEmpty, ValidateRange},
};
use clowder_core::{CatId, MissionId, TargetId};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for mission routes.
#[derive(Clone)]
pub struct MissionState {
    pub db: DbClient,
}

impl MissionState {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /missions/ - Create a mission with 1-3 targets
#[utoipa::path(
    post,
    path = "/missions/",
    tag = "Missions",
    request_body = CreateMissionRequest,
    responses(
        (status = 201, description = "Mission created successfully", body = MissionResponse),
        (status = 422, description = "Invalid payload", body = ApiError),
    )
)]
pub async fn create_mission(
    State(state): State<Arc<MissionState>>,
    Json(req): Json<CreateMissionRequest>,
) -> ApiResult<impl IntoResponse> {
    (req.targets.len() as i64).validate_range(
        "targets",
        MIN_TARGETS_PER_MISSION as i64,
        MAX_TARGETS_PER_MISSION as i64,
    )?;
    for target in &req.targets {
        target.name.validate_non_empty("name")?;
        target.name.validate_length("name", 1, MAX_NAME_LENGTH)?;
        target.country.validate_non_empty("country")?;
        target.country.validate_length("country", 1, MAX_NAME_LENGTH)?;
    }

    let (mission, targets) = state.db.mission_create(&req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MissionResponse::assemble(mission, targets, None)),
    ))
}

/// GET /missions/ - List missions with their targets
#[utoipa::path(
    get,
    path = "/missions/",
    tag = "Missions",
    params(
        ("skip" = Option<i64>, Query, description = "Number of records to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum number of results"),
    ),
    responses(
        (status = 200, description = "List of missions", body = [MissionResponse]),
    )
)]
pub async fn list_missions(
    State(state): State<Arc<MissionState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<impl IntoResponse> {
    let records = state.db.mission_list(params.skip(), params.limit()).await?;

    let response: Vec<MissionResponse> = records
        .into_iter()
        .map(|record| MissionResponse::assemble(record.mission, record.targets, record.cat))
        .collect();
    Ok(Json(response))
}

/// GET /missions/{id} - Get a mission with targets and assigned cat
#[utoipa::path(
    get,
    path = "/missions/{id}",
    tag = "Missions",
    params(
        ("id" = i64, Path, description = "Mission ID")
    ),
    responses(
        (status = 200, description = "Mission details", body = MissionResponse),
        (status = 404, description = "Mission not found", body = ApiError),
    )
)]
pub async fn get_mission(
    State(state): State<Arc<MissionState>>,
    Path(id): Path<MissionId>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .db
        .mission_get_full(id)
        .await?
        .ok_or_else(|| ApiError::mission_not_found(id))?;

    Ok(Json(MissionResponse::assemble(
        record.mission,
        record.targets,
        record.cat,
    )))
}

/// DELETE /missions/{id} - Delete an unassigned mission
#[utoipa::path(
    delete,
    path = "/missions/{id}",
    tag = "Missions",
    params(
        ("id" = i64, Path, description = "Mission ID")
    ),
    responses(
        (status = 204, description = "Mission deleted successfully"),
        (status = 404, description = "Mission not found", body = ApiError),
        (status = 409, description = "Mission is assigned to a cat", body = ApiError),
    )
)]
pub async fn delete_mission(
    State(state): State<Arc<MissionState>>,
    Path(id): Path<MissionId>,
) -> ApiResult<StatusCode> {
    services::validate_can_delete_mission(&state.db, id).await?;

    let deleted = state.db.mission_delete(id).await?;
    if !deleted {
        return Err(ApiError::mission_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /missions/{id}/assign/{cat_id} - Assign a cat to a mission
#[utoipa::path(
    post,
    path = "/missions/{id}/assign/{cat_id}",
    tag = "Missions",
    params(
        ("id" = i64, Path, description = "Mission ID"),
        ("cat_id" = i64, Path, description = "Cat ID"),
    ),
    responses(
        (status = 200, description = "Cat assigned", body = MissionResponse),
        (status = 404, description = "Mission or cat not found", body = ApiError),
        (status = 409, description = "Assignment conflict", body = ApiError),
    )
)]
pub async fn assign_cat(
    State(state): State<Arc<MissionState>>,
    Path((mission_id, cat_id)): Path<(MissionId, CatId)>,
) -> ApiResult<impl IntoResponse> {
    services::validate_can_assign_cat(&state.db, mission_id, cat_id).await?;

    // The write is guarded; a racing request that slipped past validation
    // loses here and reports the same conflict.
    let assigned = state.db.mission_assign_cat(mission_id, cat_id).await?;
    if !assigned {
        return Err(ApiError::state_conflict(
            "Mission already has a cat assigned",
        ));
    }

    let record = state
        .db
        .mission_get_full(mission_id)
        .await?
        .ok_or_else(|| ApiError::mission_not_found(mission_id))?;

    Ok(Json(MissionResponse::assemble(
        record.mission,
        record.targets,
        record.cat,
    )))
}

/// PATCH /missions/{id}/targets/{target_id} - Update a target
///
/// Notes freeze once the target or its mission is completed; the
/// completion flag itself stays writable. The completion cascade always
/// runs before the response is produced.
#[utoipa::path(
    patch,
    path = "/missions/{id}/targets/{target_id}",
    tag = "Missions",
    params(
        ("id" = i64, Path, description = "Mission ID"),
        ("target_id" = i64, Path, description = "Target ID"),
    ),
    request_body = UpdateTargetRequest,
    responses(
        (status = 200, description = "Target updated", body = TargetResponse),
        (status = 404, description = "Mission or target not found", body = ApiError),
        (status = 409, description = "Notes are frozen", body = ApiError),
    )
)]
pub async fn update_target(
    State(state): State<Arc<MissionState>>,
    Path((mission_id, target_id)): Path<(MissionId, TargetId)>,
    Json(req): Json<UpdateTargetRequest>,
) -> ApiResult<impl IntoResponse> {
    services::validate_can_update_target(&state.db, mission_id, target_id, &req).await?;

    let target = state
        .db
        .target_update(mission_id, target_id, &req)
        .await?
        .ok_or_else(|| ApiError::target_not_found(target_id, mission_id))?;

    // Re-run the cascade regardless of what the update changed.
    services::check_mission_completion(&state.db, mission_id).await?;

    Ok(Json(TargetResponse::from(target)))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the mission routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    let state = Arc::new(MissionState::new(db));

    axum::Router::new()
        .route("/", axum::routing::post(create_mission))
        .route("/", axum::routing::get(list_missions))
        .route("/:id", axum::routing::get(get_mission))
        .route("/:id", axum::routing::delete(delete_mission))
        .route("/:id/assign/:cat_id", axum::routing::post(assign_cat))
        .route("/:id/targets/:target_id", axum::routing::patch(update_target))
        .with_state(state)
}
