//! Shared types for the Amrutha Academy backend
//!
//! Common types used by the server and its clients: error codes,
//! the JSON response envelope, and the course-marketplace domain models.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use response::{ApiResponse, Pagination};
