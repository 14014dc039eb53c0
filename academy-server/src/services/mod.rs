//! Business logic over the document store and external adapters
//!
//! Services are free functions taking the adapters they need as trait
//! objects; handlers pass them in from `AppState`.

pub mod attendance;
pub mod auth;
pub mod catalog;
pub mod chat;
pub mod courses;
pub mod enrollments;
pub mod payments;
pub mod schedules;
pub mod search;
pub mod uploads;
pub mod users;
