//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, extractors
//! - `modules`: one handler module per resource, plus health and metrics
//! - `router`: route table, shared state and Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
