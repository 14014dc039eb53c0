//! Data models
//!
//! Shared between the server and its clients (via API).
//! Documents are keyed by string IDs; field names are camelCase on the wire
//! and in the document store.

pub mod attendance;
pub mod auth;
pub mod chat;
pub mod course;
pub mod enrollment;
pub mod payment;
pub mod schedule;
pub mod search;
pub mod storage;
pub mod user;

// Re-exports
pub use attendance::*;
pub use auth::*;
pub use chat::*;
pub use course::*;
pub use enrollment::*;
pub use payment::*;
pub use schedule::*;
pub use search::*;
pub use storage::*;
pub use user::*;
