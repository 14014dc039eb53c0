//! Enrollments and their course chat rooms

use chrono::Utc;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ChatRoom, ChatRoomStatus, Course, Enrollment, EnrollmentStatus, PaymentStatus,
};
use shared::util::format_iso;

use crate::error::ServiceResult;
use crate::store::{
    Direction, Document, DocumentStore, Query, collections, find_one, get_as, query_as,
    to_document,
};

/// Enroll `user_id` into `course_id` and open the enrollment's chat room
///
/// A payment id marks the enrollment paid. The two writes are independent:
/// a failed chat-room write leaves the enrollment in place.
pub async fn create_enrollment(
    store: &dyn DocumentStore,
    user_id: &str,
    course_id: &str,
    payment_id: Option<&str>,
) -> ServiceResult<Enrollment> {
    if find_by_user_and_course(store, user_id, course_id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(ErrorCode::AlreadyEnrolled).into());
    }

    let course: Course = get_as(store, collections::COURSES, course_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CourseNotFound))?;

    let now = Utc::now();
    let end_date = course.end_date.unwrap_or(now);
    let chat_room_id = format!("chat_{course_id}_{}", now.timestamp_millis());

    let mut enrollment = Enrollment {
        id: String::new(),
        user_id: user_id.to_string(),
        course_id: course_id.to_string(),
        payment_status: if payment_id.is_some() {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Pending
        },
        payment_id: payment_id.map(String::from),
        enrolled_at: now,
        status: EnrollmentStatus::Active,
        chat_room_id: Some(chat_room_id.clone()),
    };
    enrollment.id = store
        .add(collections::ENROLLMENTS, to_document(&enrollment)?)
        .await?;

    let room = ChatRoom {
        id: chat_room_id.clone(),
        course_id: course_id.to_string(),
        course_name: course.title,
        enrollment_id: enrollment.id.clone(),
        created_at: now,
        end_date,
        status: ChatRoomStatus::Active,
        participants: vec![user_id.to_string()],
        room_id: format!("rooms/{chat_room_id}"),
    };
    store
        .set(collections::CHAT_ROOMS, &chat_room_id, to_document(&room)?)
        .await?;

    tracing::info!(
        enrollment_id = %enrollment.id,
        user_id = %user_id,
        course_id = %course_id,
        chat_room_id = %chat_room_id,
        "Enrollment created"
    );

    get_enrollment(store, &enrollment.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EnrollmentNotFound).into())
}

pub async fn get_enrollment(
    store: &dyn DocumentStore,
    enrollment_id: &str,
) -> ServiceResult<Option<Enrollment>> {
    Ok(get_as(store, collections::ENROLLMENTS, enrollment_id).await?)
}

pub async fn find_by_user_and_course(
    store: &dyn DocumentStore,
    user_id: &str,
    course_id: &str,
) -> ServiceResult<Option<Enrollment>> {
    Ok(find_one(
        store,
        Query::new(collections::ENROLLMENTS)
            .where_eq("userId", user_id)
            .where_eq("courseId", course_id),
    )
    .await?)
}

/// A user's enrollments, newest first
pub async fn list_for_user(store: &dyn DocumentStore, user_id: &str) -> ServiceResult<Vec<Enrollment>> {
    Ok(query_as(
        store,
        &Query::new(collections::ENROLLMENTS)
            .where_eq("userId", user_id)
            .order_by("enrolledAt", Direction::Desc),
    )
    .await?)
}

pub async fn update_status(
    store: &dyn DocumentStore,
    enrollment_id: &str,
    status: EnrollmentStatus,
) -> ServiceResult<Enrollment> {
    let mut patch = Document::new();
    patch.insert("status".into(), Value::String(status.as_str().into()));
    patch.insert("updatedAt".into(), Value::String(format_iso(&Utc::now())));
    store
        .update(collections::ENROLLMENTS, enrollment_id, patch)
        .await?;

    get_enrollment(store, enrollment_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EnrollmentNotFound).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    async fn seed_course(store: &MemoryStore, id: &str, end_date: Option<&str>) {
        let mut doc = Document::new();
        doc.insert("title".into(), json!("Pranayama"));
        if let Some(end) = end_date {
            doc.insert("endDate".into(), json!(end));
        }
        store.set("courses", id, doc).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_enrollment_bootstraps_chat_room() {
        let store = MemoryStore::new();
        seed_course(&store, "c1", Some("2030-01-01T00:00:00.000Z")).await;

        let enrollment = create_enrollment(&store, "u1", "c1", None).await.unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(enrollment.payment_status, PaymentStatus::Pending);
        assert_eq!(enrollment.payment_id, None);

        let room_id = enrollment.chat_room_id.clone().unwrap();
        assert!(room_id.starts_with("chat_c1_"));

        let room: ChatRoom = get_as(&store, "chatRooms", &room_id).await.unwrap().unwrap();
        assert_eq!(room.course_name, "Pranayama");
        assert_eq!(room.enrollment_id, enrollment.id);
        assert_eq!(room.participants, vec!["u1".to_string()]);
        assert_eq!(room.room_id, format!("rooms/{room_id}"));
        assert_eq!(format_iso(&room.end_date), "2030-01-01T00:00:00.000Z");
        assert_eq!(room.status, ChatRoomStatus::Active);
    }

    #[tokio::test]
    async fn test_paid_enrollment_and_missing_end_date() {
        let store = MemoryStore::new();
        seed_course(&store, "c1", None).await;

        let before = Utc::now();
        let enrollment = create_enrollment(&store, "u1", "c1", Some("pay_123")).await.unwrap();
        assert_eq!(enrollment.payment_status, PaymentStatus::Completed);
        assert_eq!(enrollment.payment_id.as_deref(), Some("pay_123"));

        let room: ChatRoom = get_as(&store, "chatRooms", enrollment.chat_room_id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(room.end_date >= before - chrono::Duration::milliseconds(1));
    }

    #[tokio::test]
    async fn test_duplicate_and_missing_course() {
        let store = MemoryStore::new();
        seed_course(&store, "c1", None).await;
        create_enrollment(&store, "u1", "c1", None).await.unwrap();

        let err: AppError = create_enrollment(&store, "u1", "c1", None)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::AlreadyEnrolled);
        assert_eq!(err.message, "User is already enrolled in this course");
        assert_eq!(store.count("enrollments").await, 1);

        let err: AppError = create_enrollment(&store, "u1", "ghost", None)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::CourseNotFound);
        assert_eq!(store.count("chatRooms").await, 1);
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first_and_update_status() {
        let store = MemoryStore::new();
        store
            .set("enrollments", "e1", to_document(&json!({"userId": "u1", "courseId": "a", "enrolledAt": "2025-01-01T00:00:00.000Z"})).unwrap())
            .await
            .unwrap();
        store
            .set("enrollments", "e2", to_document(&json!({"userId": "u1", "courseId": "b", "enrolledAt": "2025-02-01T00:00:00.000Z"})).unwrap())
            .await
            .unwrap();
        store
            .set("enrollments", "e3", to_document(&json!({"userId": "u2", "courseId": "a", "enrolledAt": "2025-03-01T00:00:00.000Z"})).unwrap())
            .await
            .unwrap();

        let ids: Vec<_> = list_for_user(&store, "u1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["e2", "e1"]);

        let updated = update_status(&store, "e1", EnrollmentStatus::Completed).await.unwrap();
        assert_eq!(updated.status, EnrollmentStatus::Completed);
        assert!(update_status(&store, "nope", EnrollmentStatus::Cancelled).await.is_err());
    }
}
