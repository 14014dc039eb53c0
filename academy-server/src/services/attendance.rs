//! Session attendance

use chrono::Utc;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{Attendance, AttendanceStatus, MarkAttendance, User};
use shared::util::parse_iso;

use crate::error::ServiceResult;
use crate::store::{DocumentStore, Query, collections, find_one, query_as, to_document};

async fn find_mark(
    store: &dyn DocumentStore,
    schedule_id: &str,
    user_id: &str,
) -> ServiceResult<Option<Attendance>> {
    Ok(find_one(
        store,
        Query::new(collections::ATTENDANCE)
            .where_eq("scheduleId", schedule_id)
            .where_eq("userId", user_id),
    )
    .await?)
}

/// Record attendance for the caller, or for another user when the caller
/// is a trainer or admin
///
/// There is at most one mark per (schedule, user); marking again
/// overwrites it.
pub async fn mark_attendance(
    store: &dyn DocumentStore,
    caller: &User,
    req: MarkAttendance,
) -> ServiceResult<Attendance> {
    let (Some(schedule_id), Some(status)) = (
        req.schedule_id.filter(|s| !s.is_empty()),
        req.status.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::validation("Schedule ID and status are required").into());
    };

    let user_id = req
        .user_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| caller.id.clone());
    if user_id != caller.id && !caller.role.is_staff() {
        return Err(AppError::with_message(
            ErrorCode::PermissionDenied,
            "Unauthorized to mark attendance for this user",
        )
        .into());
    }

    let status: AttendanceStatus = status
        .parse()
        .map_err(|_| AppError::new(ErrorCode::InvalidAttendanceStatus))?;

    let now = Utc::now();
    let joined_at = match req.joined_at.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => parse_iso(raw).ok_or_else(|| AppError::validation("Invalid joinedAt"))?,
        None => now,
    };

    let mut attendance = Attendance {
        id: String::new(),
        schedule_id,
        user_id,
        status,
        joined_at: Some(joined_at),
        marked_at: now,
    };
    let doc = to_document(&attendance)?;

    match find_mark(store, &attendance.schedule_id, &attendance.user_id).await? {
        Some(existing) => {
            store.set(collections::ATTENDANCE, &existing.id, doc).await?;
            attendance.id = existing.id;
        }
        None => {
            attendance.id = store.add(collections::ATTENDANCE, doc).await?;
        }
    }

    tracing::info!(
        schedule_id = %attendance.schedule_id,
        user_id = %attendance.user_id,
        status = ?attendance.status,
        marked_by = %caller.id,
        "Attendance marked"
    );
    Ok(attendance)
}

pub async fn by_schedule(store: &dyn DocumentStore, schedule_id: &str) -> ServiceResult<Vec<Attendance>> {
    Ok(query_as(
        store,
        &Query::new(collections::ATTENDANCE).where_eq("scheduleId", schedule_id),
    )
    .await?)
}

/// A user's attendance, optionally restricted to one course's sessions
pub async fn for_user(
    store: &dyn DocumentStore,
    user_id: &str,
    course_id: Option<&str>,
) -> ServiceResult<Vec<Attendance>> {
    let mut query = Query::new(collections::ATTENDANCE).where_eq("userId", user_id);

    if let Some(course_id) = course_id {
        let schedule_ids: Vec<Value> = store
            .query(&Query::new(collections::SCHEDULES).where_eq("courseId", course_id))
            .await?
            .into_iter()
            .map(|s| Value::String(s.id))
            .collect();
        if schedule_ids.is_empty() {
            return Ok(Vec::new());
        }
        query = query.where_in("scheduleId", schedule_ids);
    }

    Ok(query_as(store, &query).await?)
}
