//! Chat room models

use crate::util::{iso_millis, null_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatRoomStatus {
    #[default]
    Active,
    ReadOnly,
}

impl ChatRoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::ReadOnly => "read-only",
        }
    }
}

/// Course chat room (`chatRooms/{id}`)
///
/// `room_id` is the realtime-message path the clients subscribe to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub course_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub course_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub enrollment_id: String,
    #[serde(default = "Utc::now", with = "iso_millis::or_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", with = "iso_millis::or_now")]
    pub end_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: ChatRoomStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub participants: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub room_id: String,
}

impl ChatRoom {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    /// Posting is closed once the room is read-only or past its end date
    pub fn can_send_message(&self, now: DateTime<Utc>) -> bool {
        self.status != ChatRoomStatus::ReadOnly && !self.is_expired(now)
    }
}

/// `GET /api/chat/rooms/{roomId}/check-access` result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAccess {
    pub has_access: bool,
    pub can_send_message: bool,
    pub status: ChatRoomStatus,
    pub room: Option<ChatRoom>,
}

/// `POST /api/chat/rooms/sync` result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSyncReport {
    pub checked: usize,
    pub updated: usize,
}
