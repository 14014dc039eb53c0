//! Enrollment Model

use crate::util::{iso_millis, null_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Enrollment document (`enrollments/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub course_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Missing timestamps read as "now"
    #[serde(default = "Utc::now", with = "iso_millis::or_now")]
    pub enrolled_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub chat_room_id: Option<String>,
}

/// `POST /api/courses/enroll` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrollRequest {
    pub course_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_from_document() {
        let json = r#"{
            "userId": "u1",
            "courseId": "c1",
            "paymentStatus": "completed",
            "paymentId": "pay_1",
            "enrolledAt": "2025-01-31T10:00:00.000Z",
            "status": "active",
            "chatRoomId": "chat_c1_1738317600000"
        }"#;
        let enrollment: Enrollment = serde_json::from_str(json).unwrap();
        assert_eq!(enrollment.payment_status, PaymentStatus::Completed);
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(enrollment.payment_id.as_deref(), Some("pay_1"));
    }

    #[test]
    fn test_enrollment_defaults() {
        let enrollment: Enrollment = serde_json::from_str(r#"{"paymentId":null}"#).unwrap();
        assert_eq!(enrollment.payment_status, PaymentStatus::Pending);
        assert_eq!(enrollment.status, EnrollmentStatus::Pending);
        assert!(enrollment.payment_id.is_none());
        assert!(enrollment.chat_room_id.is_none());
    }
}
