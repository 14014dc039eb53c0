//! academy-server: course-marketplace backend
//!
//! - Phone and email sign-in against the identity provider
//! - Course catalog, enrollments and their chat rooms
//! - Razorpay checkout with signature-verified enrollment
//! - Live session schedules and attendance
//! - Search history and file uploads

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod payment;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;

pub use config::Config;
pub use state::AppState;
