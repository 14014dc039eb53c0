//! Course catalog: courses, lessons and reviews

use chrono::Utc;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Course, CourseCreate, Lesson, MAX_LEVEL, MIN_LEVEL, Mentor, Review, Role, User,
};
use shared::util::parse_iso;

use super::users;
use crate::error::ServiceResult;
use crate::store::{
    Direction, DocumentStore, Query, Snapshot, collections, from_snapshot, get_as, query_as,
    to_document,
};

const POPULAR_LIMIT: usize = 10;

/// Fill in the mentor referenced by `mentorId`
///
/// Lookup failures are logged and leave the empty mentor in place.
async fn resolve_mentor(store: &dyn DocumentStore, mut course: Course) -> Course {
    let Some(mentor_id) = course.mentor_id.clone().filter(|id| !id.is_empty()) else {
        return course;
    };
    match get_as::<Mentor>(store, collections::MENTORS, &mentor_id).await {
        Ok(Some(mentor)) => course.mentor = mentor,
        Ok(None) => {}
        Err(e) => tracing::warn!(mentor_id = %mentor_id, error = %e, "Mentor lookup failed"),
    }
    if course.trainer_name.is_none() && !course.mentor.name.is_empty() {
        course.trainer_name = Some(course.mentor.name.clone());
    }
    course
}

async fn to_course(store: &dyn DocumentStore, snapshot: Snapshot) -> ServiceResult<Course> {
    let course: Course = from_snapshot(snapshot)?;
    Ok(resolve_mentor(store, course).await)
}

pub async fn get_course(store: &dyn DocumentStore, course_id: &str) -> ServiceResult<Option<Course>> {
    match store.get(collections::COURSES, course_id).await? {
        Some(snapshot) => Ok(Some(to_course(store, snapshot).await?)),
        None => Ok(None),
    }
}

/// Courses with the most students
pub async fn popular_courses(store: &dyn DocumentStore) -> ServiceResult<Vec<Course>> {
    let snapshots = store
        .query(
            &Query::new(collections::COURSES)
                .order_by("students", Direction::Desc)
                .limit(POPULAR_LIMIT),
        )
        .await?;

    let mut courses = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        courses.push(to_course(store, snapshot).await?);
    }
    Ok(courses)
}

/// Parse a `?level=` value, accepting only 1, 2 or 3
pub fn parse_level(level: Option<&str>) -> Result<u8, AppError> {
    level
        .and_then(|l| l.trim().parse::<u8>().ok())
        .filter(|l| (MIN_LEVEL..=MAX_LEVEL).contains(l))
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidCourseLevel,
                "Valid level (1, 2, or 3) is required",
            )
        })
}

/// Courses of one level, earliest start first
pub async fn courses_by_level(store: &dyn DocumentStore, level: u8) -> ServiceResult<Vec<Course>> {
    Ok(query_as(
        store,
        &Query::new(collections::COURSES)
            .where_eq("level", level)
            .order_by("startDate", Direction::Asc),
    )
    .await?)
}

pub async fn lessons_for_course(store: &dyn DocumentStore, course_id: &str) -> ServiceResult<Vec<Lesson>> {
    Ok(query_as(
        store,
        &Query::new(collections::LESSONS)
            .where_eq("courseId", course_id)
            .order_by("order", Direction::Asc),
    )
    .await?)
}

pub async fn reviews_for_course(store: &dyn DocumentStore, course_id: &str) -> ServiceResult<Vec<Review>> {
    Ok(query_as(
        store,
        &Query::new(collections::REVIEWS)
            .where_eq("courseId", course_id)
            .order_by("createdAt", Direction::Desc),
    )
    .await?)
}

/// Create a course (admins only)
pub async fn create_course(
    store: &dyn DocumentStore,
    admin: &User,
    req: CourseCreate,
) -> ServiceResult<Course> {
    if admin.role != Role::Admin {
        return Err(AppError::with_message(ErrorCode::AdminRequired, "Only admins can create courses").into());
    }

    let missing = || AppError::validation("Missing required fields");
    let title = req.title.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
    let description = req.description.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
    let level = req.level.filter(|l| *l != 0).ok_or_else(missing)?;
    let price = req.price.filter(|p| *p != 0.0).ok_or_else(missing)?;
    let duration = req.duration.filter(|d| *d != 0).ok_or_else(missing)?;
    let start_date = req.start_date.filter(|s| !s.is_empty()).ok_or_else(missing)?;
    let end_date = req.end_date.filter(|s| !s.is_empty()).ok_or_else(missing)?;

    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        return Err(AppError::new(ErrorCode::InvalidCourseLevel).into());
    }
    let start_date = parse_iso(&start_date)
        .ok_or_else(|| AppError::validation("Invalid startDate"))?;
    let end_date = parse_iso(&end_date).ok_or_else(|| AppError::validation("Invalid endDate"))?;

    let trainer_id = req.trainer_id.filter(|s| !s.is_empty());
    let mut trainer_name = None;
    if let Some(trainer_id) = &trainer_id
        && let Some(trainer) = users::get_user(store, trainer_id).await?
        && trainer.role == Role::Trainer
        && !trainer.full_name.is_empty()
    {
        trainer_name = Some(trainer.full_name);
    }

    let mut course = Course {
        title,
        about: description.clone(),
        description,
        level,
        price,
        original_price: price * 1.2,
        start_date: Some(start_date),
        end_date: Some(end_date),
        duration,
        category: req.category.unwrap_or_default(),
        image: req.image.unwrap_or_default(),
        trainer_id,
        trainer_name,
        admin_id: Some(admin.id.clone()),
        created_at: Some(Utc::now()),
        rating: 0.0,
        reviews_count: 0,
        students: 0,
        certificate: true,
        ..Default::default()
    };

    let mut doc = to_document(&course)?;
    doc.remove("mentor");
    course.id = store.add(collections::COURSES, doc).await?;

    tracing::info!(course_id = %course.id, admin_id = %admin.id, "Course created");
    Ok(course)
}
