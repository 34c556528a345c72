//! Cat REST API Routes
//!
//! This module implements Axum route handlers for spy cat operations.
//! Breed validation happens before any row is written, so an invalid
//! breed (or an unreachable catalog) never creates a cat.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    constants::MAX_NAME_LENGTH,
    db::DbClient,
    error::{ApiError, ApiResult},
    services::BreedValidator,
    types::{CatResponse, CreateCatRequest, ListParams, UpdateCatRequest},
    validation::{ValidateLength, ValidateNonEmpty, ValidateRange},
};
use clowder_core::CatId;

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for cat routes.
#[derive(Clone)]
pub struct CatState {
    pub db: DbClient,
    pub breeds: Arc<BreedValidator>,
}

impl CatState {
    pub fn new(db: DbClient, breeds: Arc<BreedValidator>) -> Self {
        Self { db, breeds }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /cats/ - Hire a new spy cat
#[utoipa::path(
    post,
    path = "/cats/",
    tag = "Cats",
    request_body = CreateCatRequest,
    responses(
        (status = 201, description = "Cat created successfully", body = CatResponse),
        (status = 422, description = "Invalid payload or unknown breed", body = ApiError),
        (status = 503, description = "Breed catalog unavailable", body = ApiError),
    )
)]
pub async fn create_cat(
    State(state): State<Arc<CatState>>,
    Json(req): Json<CreateCatRequest>,
) -> ApiResult<impl IntoResponse> {
    req.name.validate_non_empty("name")?;
    req.name.validate_length("name", 1, MAX_NAME_LENGTH)?;
    req.breed.validate_non_empty("breed")?;
    req.years_of_experience
        .validate_non_negative("years_of_experience")?;
    req.salary.validate_non_negative("salary")?;

    // External catalog check runs before any write.
    state.breeds.validate_breed(&req.breed).await?;

    let cat = state.db.cat_create(&req).await?;

    Ok((StatusCode::CREATED, Json(CatResponse::from(cat))))
}

/// GET /cats/ - List spy cats with pagination
#[utoipa::path(
    get,
    path = "/cats/",
    tag = "Cats",
    params(
        ("skip" = Option<i64>, Query, description = "Number of records to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum number of results"),
    ),
    responses(
        (status = 200, description = "List of cats", body = [CatResponse]),
    )
)]
pub async fn list_cats(
    State(state): State<Arc<CatState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<impl IntoResponse> {
    let cats = state.db.cat_list(params.skip(), params.limit()).await?;

    let response: Vec<CatResponse> = cats.into_iter().map(CatResponse::from).collect();
    Ok(Json(response))
}

/// GET /cats/{id} - Get a single spy cat
#[utoipa::path(
    get,
    path = "/cats/{id}",
    tag = "Cats",
    params(
        ("id" = i64, Path, description = "Cat ID")
    ),
    responses(
        (status = 200, description = "Cat details", body = CatResponse),
        (status = 404, description = "Cat not found", body = ApiError),
    )
)]
pub async fn get_cat(
    State(state): State<Arc<CatState>>,
    Path(id): Path<CatId>,
) -> ApiResult<impl IntoResponse> {
    let cat = state
        .db
        .cat_get(id)
        .await?
        .ok_or_else(|| ApiError::cat_not_found(id))?;

    Ok(Json(CatResponse::from(cat)))
}

/// PATCH /cats/{id} - Update a spy cat's salary
#[utoipa::path(
    patch,
    path = "/cats/{id}",
    tag = "Cats",
    params(
        ("id" = i64, Path, description = "Cat ID")
    ),
    request_body = UpdateCatRequest,
    responses(
        (status = 200, description = "Cat updated successfully", body = CatResponse),
        (status = 404, description = "Cat not found", body = ApiError),
        (status = 422, description = "Invalid salary", body = ApiError),
    )
)]
pub async fn update_cat(
    State(state): State<Arc<CatState>>,
    Path(id): Path<CatId>,
    Json(req): Json<UpdateCatRequest>,
) -> ApiResult<impl IntoResponse> {
    req.salary.validate_non_negative("salary")?;

    let cat = state
        .db
        .cat_update_salary(id, req.salary)
        .await?
        .ok_or_else(|| ApiError::cat_not_found(id))?;

    Ok(Json(CatResponse::from(cat)))
}

/// DELETE /cats/{id} - Remove a spy cat from the agency
#[utoipa::path(
    delete,
    path = "/cats/{id}",
    tag = "Cats",
    params(
        ("id" = i64, Path, description = "Cat ID")
    ),
    responses(
        (status = 204, description = "Cat deleted successfully"),
        (status = 404, description = "Cat not found", body = ApiError),
    )
)]
pub async fn delete_cat(
    State(state): State<Arc<CatState>>,
    Path(id): Path<CatId>,
) -> ApiResult<StatusCode> {
    let deleted = state.db.cat_delete(id).await?;
    if !deleted {
        return Err(ApiError::cat_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the cat routes router.
pub fn create_router(db: DbClient, breeds: Arc<BreedValidator>) -> axum::Router {
    let state = Arc::new(CatState::new(db, breeds));

    axum::Router::new()
        .route("/", axum::routing::post(create_cat))
        .route("/", axum::routing::get(list_cats))
        .route("/:id", axum::routing::get(get_cat))
        .route("/:id", axum::routing::patch(update_cat))
        .route("/:id", axum::routing::delete(delete_cat))
        .with_state(state)
}
