//! Live session schedules

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, Schedule, ScheduleCreate, ScheduleStatus, User};
use shared::util::{format_iso, parse_iso};

use super::{enrollments, users};
use crate::auth::require_role;
use crate::error::ServiceResult;
use crate::store::{Direction, DocumentStore, FilterOp, Query, collections, query_as, to_document};

const UPCOMING_LIMIT: usize = 50;

fn meeting_link_for(course_id: &str, now: DateTime<Utc>) -> String {
    format!("https://meet.jit.si/{course_id}_{}", now.timestamp_millis())
}

fn required_time(value: &str, field: &str) -> Result<DateTime<Utc>, AppError> {
    parse_iso(value).ok_or_else(|| AppError::validation(format!("Invalid {field}")))
}

/// Create a session (admins and trainers)
pub async fn create_schedule(
    store: &dyn DocumentStore,
    caller: &User,
    req: ScheduleCreate,
) -> ServiceResult<Schedule> {
    require_role(
        caller,
        &[Role::Admin, Role::Trainer],
        "Only admins and trainers can create schedules",
    )?;

    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(course_id), Some(trainer_id), Some(start_time), Some(end_time), Some(date)) = (
        non_empty(req.course_id),
        non_empty(req.trainer_id),
        non_empty(req.start_time),
        non_empty(req.end_time),
        non_empty(req.date),
    ) else {
        return Err(AppError::validation("Missing required fields").into());
    };

    let trainer = users::get_user(store, &trainer_id).await?;
    if trainer.is_none_or(|t| t.role != Role::Trainer) {
        return Err(AppError::new(ErrorCode::InvalidTrainer).into());
    }

    let now = Utc::now();
    let mut schedule = Schedule {
        id: String::new(),
        start_time: required_time(&start_time, "startTime")?,
        end_time: required_time(&end_time, "endTime")?,
        date: required_time(&date, "date")?,
        meeting_link: Some(
            non_empty(req.meeting_link).unwrap_or_else(|| meeting_link_for(&course_id, now)),
        ),
        course_id,
        trainer_id,
        status: ScheduleStatus::Scheduled,
        attendance_enabled: true,
        created_at: Some(now),
    };
    schedule.id = store
        .add(collections::SCHEDULES, to_document(&schedule)?)
        .await?;

    tracing::info!(
        schedule_id = %schedule.id,
        course_id = %schedule.course_id,
        trainer_id = %schedule.trainer_id,
        "Schedule created"
    );
    Ok(schedule)
}

/// Sessions starting at or after `now`, soonest first
///
/// Students see sessions of the courses they are enrolled in, trainers
/// their own sessions and admins every session.
pub async fn upcoming_schedules(
    store: &dyn DocumentStore,
    user: &User,
    course_id: Option<&str>,
    now: DateTime<Utc>,
) -> ServiceResult<Vec<Schedule>> {
    let mut query = Query::new(collections::SCHEDULES)
        .filter("startTime", FilterOp::Gte, format_iso(&now))
        .order_by("startTime", Direction::Asc)
        .limit(UPCOMING_LIMIT);

    match user.role {
        Role::Student => {
            let course_ids: Vec<Value> = enrollments::list_for_user(store, &user.id)
                .await?
                .into_iter()
                .map(|e| e.course_id)
                .filter(|id| course_id.is_none_or(|wanted| wanted == id))
                .map(Value::String)
                .collect();
            if course_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.where_in("courseId", course_ids);
        }
        Role::Trainer => {
            query = query.where_eq("trainerId", user.id.as_str());
        }
        Role::Admin => {}
    }

    if user.role != Role::Student
        && let Some(course_id) = course_id
    {
        query = query.where_eq("courseId", course_id);
    }

    Ok(query_as(store, &query).await?)
}
