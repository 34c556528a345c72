//! Service Layer
//!
//! Business logic kept out of the route handlers and the database client.
//! Services validate state transitions and own the breed cache; the
//! boundary layer alone decides how failures map to transport status codes.

mod breed_validator;
mod mission_service;

pub use breed_validator::*;
pub use mission_service::*;
