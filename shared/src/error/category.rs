//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Course, schedule and attendance errors (3xxx)
    Course,
    /// Enrollment and chat errors (4xxx)
    Enrollment,
    /// Payment errors (5xxx)
    Payment,
    /// User errors (6xxx)
    User,
    /// File storage errors (7xxx)
    Storage,
    /// System errors (8xxx and up)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Course,
            4000..5000 => Self::Enrollment,
            5000..6000 => Self::Payment,
            6000..7000 => Self::User,
            7000..8000 => Self::Storage,
            _ => Self::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Course => "course",
            Self::Enrollment => "enrollment",
            Self::Payment => "payment",
            Self::User => "user",
            Self::Storage => "storage",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
