//! Course chat rooms and their lifecycle
//!
//! A room is `active` until its end date passes, then `read-only`. The flip
//! is persisted lazily by [`check_access`] or in bulk by [`sync_statuses`].

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::models::{ChatRoom, ChatRoomStatus, ChatSyncReport};
use shared::util::{format_iso, parse_iso};

use super::enrollments;
use crate::error::ServiceResult;
use crate::store::{Document, DocumentStore, Query, collections, get_as};

pub async fn get_room(store: &dyn DocumentStore, room_id: &str) -> ServiceResult<Option<ChatRoom>> {
    Ok(get_as(store, collections::CHAT_ROOMS, room_id).await?)
}

/// Rooms of every enrollment the user holds, skipping dangling references
pub async fn list_rooms_for_user(store: &dyn DocumentStore, user_id: &str) -> ServiceResult<Vec<ChatRoom>> {
    let room_ids: Vec<String> = enrollments::list_for_user(store, user_id)
        .await?
        .into_iter()
        .filter_map(|e| e.chat_room_id.filter(|id| !id.is_empty()))
        .collect();

    let mut rooms = Vec::with_capacity(room_ids.len());
    for room_id in room_ids {
        if let Some(room) = get_room(store, &room_id).await? {
            rooms.push(room);
        }
    }
    Ok(rooms)
}

async fn set_status(store: &dyn DocumentStore, room_id: &str, status: ChatRoomStatus) -> ServiceResult<()> {
    let mut patch = Document::new();
    patch.insert("status".into(), Value::String(status.as_str().into()));
    patch.insert("updatedAt".into(), Value::String(format_iso(&Utc::now())));
    store.update(collections::CHAT_ROOMS, room_id, patch).await?;
    Ok(())
}

async fn try_check_access(
    store: &dyn DocumentStore,
    room_id: &str,
    user_id: &str,
    now: DateTime<Utc>,
) -> ServiceResult<bool> {
    let Some(room) = get_room(store, room_id).await? else {
        return Ok(false);
    };
    if !room.has_participant(user_id) {
        return Ok(false);
    }

    if room.is_expired(now) && room.status != ChatRoomStatus::ReadOnly {
        set_status(store, room_id, ChatRoomStatus::ReadOnly).await?;
        tracing::info!(room_id = %room_id, "Chat room expired, now read-only");
    }

    // Read-only rooms stay viewable
    Ok(true)
}

/// Whether `user_id` may open the room
///
/// Expired rooms are switched to read-only as a side effect. Failures are
/// logged and deny access.
pub async fn check_access(
    store: &dyn DocumentStore,
    room_id: &str,
    user_id: &str,
    now: DateTime<Utc>,
) -> bool {
    match try_check_access(store, room_id, user_id, now).await {
        Ok(allowed) => allowed,
        Err(e) => {
            tracing::error!(room_id = %room_id, user_id = %user_id, error = ?e, "Chat access check failed");
            false
        }
    }
}

pub fn can_send_message(room: &ChatRoom, now: DateTime<Utc>) -> bool {
    room.can_send_message(now)
}

pub async fn add_participant(store: &dyn DocumentStore, room_id: &str, user_id: &str) -> ServiceResult<()> {
    store
        .array_union(
            collections::CHAT_ROOMS,
            room_id,
            "participants",
            vec![Value::String(user_id.to_string())],
        )
        .await?;

    let mut patch = Document::new();
    patch.insert("updatedAt".into(), Value::String(format_iso(&Utc::now())));
    store.update(collections::CHAT_ROOMS, room_id, patch).await?;
    Ok(())
}

/// Flip every active room whose end date has passed to read-only
pub async fn sync_statuses(store: &dyn DocumentStore, now: DateTime<Utc>) -> ServiceResult<ChatSyncReport> {
    let active = store
        .query(
            &Query::new(collections::CHAT_ROOMS)
                .where_eq("status", ChatRoomStatus::Active.as_str()),
        )
        .await?;

    let mut report = ChatSyncReport {
        checked: active.len(),
        updated: 0,
    };
    for snapshot in active {
        let end_date = snapshot
            .data
            .get("endDate")
            .and_then(Value::as_str)
            .and_then(parse_iso);
        if end_date.is_some_and(|end| now > end) {
            set_status(store, &snapshot.id, ChatRoomStatus::ReadOnly).await?;
            report.updated += 1;
        }
    }

    tracing::info!(checked = report.checked, updated = report.updated, "Chat room statuses synced");
    Ok(report)
}
