//! Unified error codes for the academy backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Course errors
//! - 4xxx: Enrollment errors
//! - 5xxx: Payment errors
//! - 6xxx: User errors
//! - 7xxx: Storage errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values so mobile and web clients can match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Too many requests from one client
    TooManyRequests = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Phone number is not in E.164 shape
    InvalidPhoneNumber = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Trainer or admin role required
    TrainerRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Course ====================
    /// Course not found
    CourseNotFound = 3001,
    /// Course level outside 1..=3
    InvalidCourseLevel = 3002,
    /// Referenced trainer missing or not a trainer
    InvalidTrainer = 3003,
    /// Schedule not found
    ScheduleNotFound = 3101,
    /// Attendance status not present/absent
    InvalidAttendanceStatus = 3201,

    // ==================== 4xxx: Enrollment ====================
    /// Enrollment not found
    EnrollmentNotFound = 4001,
    /// User already enrolled in the course
    AlreadyEnrolled = 4002,
    /// Enrollment could not be created
    EnrollmentFailed = 4003,
    /// Chat room not found
    ChatRoomNotFound = 4101,
    /// User may not access the chat room
    ChatAccessDenied = 4102,

    // ==================== 5xxx: Payment ====================
    /// Payment failed
    PaymentFailed = 5001,
    /// Signature over order|payment does not match
    InvalidPaymentSignature = 5002,
    /// Payment neither captured nor authorized
    PaymentNotSuccessful = 5003,
    /// Amount missing or not positive
    InvalidAmount = 5004,
    /// Payment gateway rejected or failed the call
    PaymentGatewayError = 5005,

    // ==================== 6xxx: User ====================
    /// User not found
    UserNotFound = 6001,
    /// Phone number already registered
    PhoneNumberExists = 6002,
    /// Email already registered
    EmailExists = 6003,
    /// Role not student/trainer/admin
    InvalidRole = 6004,

    // ==================== 7xxx: Storage ====================
    /// Multipart body had no file field
    NoFileProvided = 7001,
    /// Uploaded file is empty
    EmptyFile = 7002,
    /// Uploaded file exceeds the size limit
    FileTooLarge = 7003,
    /// Object storage write failed
    FileStorageFailed = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Document store error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Identity provider call failed
    IdentityProviderError = 9006,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::TooManyRequests => "Too many requests, please try again later",

            // Auth
            ErrorCode::NotAuthenticated => "Unauthorized",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Invalid or expired token",
            ErrorCode::TokenInvalid => "Invalid or expired token",
            ErrorCode::InvalidPhoneNumber => "Invalid phone number format",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::TrainerRequired => "Only admins and trainers can perform this action",
            ErrorCode::AdminRequired => "Only admins can perform this action",

            // Course
            ErrorCode::CourseNotFound => "Course not found",
            ErrorCode::InvalidCourseLevel => "Level must be 1, 2, or 3",
            ErrorCode::InvalidTrainer => "Invalid trainer",
            ErrorCode::ScheduleNotFound => "Schedule not found",
            ErrorCode::InvalidAttendanceStatus => "Status must be \"present\" or \"absent\"",

            // Enrollment
            ErrorCode::EnrollmentNotFound => "Enrollment not found",
            ErrorCode::AlreadyEnrolled => "User is already enrolled in this course",
            ErrorCode::EnrollmentFailed => "Failed to enroll",
            ErrorCode::ChatRoomNotFound => "Chat room not found",
            ErrorCode::ChatAccessDenied => "Access denied",

            // Payment
            ErrorCode::PaymentFailed => "Payment failed",
            ErrorCode::InvalidPaymentSignature => "Invalid payment signature",
            ErrorCode::PaymentNotSuccessful => "Payment not successful",
            ErrorCode::InvalidAmount => "Valid amount is required",
            ErrorCode::PaymentGatewayError => "Payment gateway error",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::PhoneNumberExists => "User with this phone number already exists",
            ErrorCode::EmailExists => "User with this email already exists",
            ErrorCode::InvalidRole => "Role must be student, trainer, or admin",

            // Storage
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file",
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::FileStorageFailed => "File upload failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::IdentityProviderError => "Identity provider error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::InvalidPhoneNumber),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::TrainerRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Course
            3001 => Ok(ErrorCode::CourseNotFound),
            3002 => Ok(ErrorCode::InvalidCourseLevel),
            3003 => Ok(ErrorCode::InvalidTrainer),
            3101 => Ok(ErrorCode::ScheduleNotFound),
            3201 => Ok(ErrorCode::InvalidAttendanceStatus),

            // Enrollment
            4001 => Ok(ErrorCode::EnrollmentNotFound),
            4002 => Ok(ErrorCode::AlreadyEnrolled),
            4003 => Ok(ErrorCode::EnrollmentFailed),
            4101 => Ok(ErrorCode::ChatRoomNotFound),
            4102 => Ok(ErrorCode::ChatAccessDenied),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::InvalidPaymentSignature),
            5003 => Ok(ErrorCode::PaymentNotSuccessful),
            5004 => Ok(ErrorCode::InvalidAmount),
            5005 => Ok(ErrorCode::PaymentGatewayError),

            // User
            6001 => Ok(ErrorCode::UserNotFound),
            6002 => Ok(ErrorCode::PhoneNumberExists),
            6003 => Ok(ErrorCode::EmailExists),
            6004 => Ok(ErrorCode::InvalidRole),

            // Storage
            7001 => Ok(ErrorCode::NoFileProvided),
            7002 => Ok(ErrorCode::EmptyFile),
            7003 => Ok(ErrorCode::FileTooLarge),
            7004 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::IdentityProviderError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
