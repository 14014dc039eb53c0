//! Attendance Model

use crate::util::{iso_millis, null_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!("unknown attendance status: {other}")),
        }
    }
}

/// One attendance mark per (schedule, user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub schedule_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: AttendanceStatus,
    #[serde(default, with = "iso_millis::option")]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now", with = "iso_millis::or_now")]
    pub marked_at: DateTime<Utc>,
}

/// `POST /api/attendance/mark` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkAttendance {
    pub schedule_id: Option<String>,
    /// Defaults to the caller
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub joined_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("present".parse(), Ok(AttendanceStatus::Present));
        assert!("late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn test_attendance_without_joined_at() {
        let json = r#"{"scheduleId":"s1","userId":"u1","status":"present","markedAt":"2025-02-01T10:05:00.000Z"}"#;
        let attendance: Attendance = serde_json::from_str(json).unwrap();
        assert!(attendance.joined_at.is_none());
        let value = serde_json::to_value(&attendance).unwrap();
        assert!(value["joinedAt"].is_null());
    }
}
