//! Live session schedule models

use crate::util::{iso_millis, null_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

fn default_true() -> bool {
    true
}

/// Scheduled session (`schedules/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub course_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub trainer_id: String,
    #[serde(default = "Utc::now", with = "iso_millis::or_now")]
    pub start_time: DateTime<Utc>,
    #[serde(default = "Utc::now", with = "iso_millis::or_now")]
    pub end_time: DateTime<Utc>,
    #[serde(default = "Utc::now", with = "iso_millis::or_now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: ScheduleStatus,
    #[serde(default = "default_true")]
    pub attendance_enabled: bool,
    #[serde(
        default,
        with = "iso_millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// `POST /api/schedules/create` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleCreate {
    pub course_id: Option<String>,
    pub trainer_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub date: Option<String>,
    pub meeting_link: Option<String>,
}

/// Optional `?courseId=` filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseFilter {
    pub course_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_defaults() {
        let json = r#"{
            "courseId": "c1",
            "trainerId": "t1",
            "startTime": "2025-02-01T10:00:00.000Z",
            "endTime": "2025-02-01T11:00:00.000Z",
            "date": "2025-02-01"
        }"#;
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.status, ScheduleStatus::Scheduled);
        assert!(schedule.attendance_enabled);
        assert!(schedule.meeting_link.is_none());

        let value = serde_json::to_value(&schedule).unwrap();
        assert_eq!(value["date"], "2025-02-01T00:00:00.000Z");
        assert!(value.get("createdAt").is_none());
    }
}
