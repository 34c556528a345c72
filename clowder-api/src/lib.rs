//! Clowder API - REST API Layer
//!
//! This crate provides the HTTP surface for the Clowder spy cat agency:
//! CRUD endpoints for cats, missions, and nested targets, backed by
//! PostgreSQL, with breed validation against an external catalog and the
//! mission lifecycle rules enforced in the service layer.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::ApiConfig;
pub use db::{DbClient, DbConfig, MissionRecord};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::{BreedCatalogConfig, BreedValidator};
pub use types::*;
