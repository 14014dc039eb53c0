//! Course catalog models

use crate::util::{iso_millis, null_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest and highest course level
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 3;

fn default_level() -> u8 {
    MIN_LEVEL
}

/// A stored `null` level reads as the lowest level, not zero
fn level_or_default<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(Option::<u8>::deserialize(deserializer)?.unwrap_or_else(default_level))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Mentor {
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tool {
    pub name: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
}

/// Course document (`courses/{id}`) in its extended API shape
///
/// The stored document references its mentor by `mentorId`; `mentor` is
/// resolved on read and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub category: String,
    #[serde(deserialize_with = "null_default")]
    pub image: String,
    #[serde(deserialize_with = "null_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_default")]
    pub original_price: f64,
    #[serde(deserialize_with = "null_default")]
    pub rating: f64,
    #[serde(deserialize_with = "null_default")]
    pub reviews_count: u32,
    #[serde(deserialize_with = "null_default")]
    pub students: u32,
    #[serde(deserialize_with = "null_default")]
    pub duration: u32,
    #[serde(deserialize_with = "null_default")]
    pub certificate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor_id: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub mentor: Mentor,
    #[serde(deserialize_with = "null_default")]
    pub tools: Vec<Tool>,
    #[serde(deserialize_with = "null_default")]
    pub about: String,
    #[serde(deserialize_with = "null_default")]
    pub is_favourite: bool,

    // Extended fields
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "level_or_default")]
    pub level: u8,
    #[serde(with = "iso_millis::option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(with = "iso_millis::option")]
    pub end_date: Option<DateTime<Utc>>,
    pub trainer_id: Option<String>,
    pub trainer_name: Option<String>,
    pub admin_id: Option<String>,
    #[serde(with = "iso_millis::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for Course {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            category: String::new(),
            image: String::new(),
            price: 0.0,
            original_price: 0.0,
            rating: 0.0,
            reviews_count: 0,
            students: 0,
            duration: 0,
            certificate: false,
            mentor_id: None,
            mentor: Mentor::default(),
            tools: Vec::new(),
            about: String::new(),
            is_favourite: false,
            description: String::new(),
            level: default_level(),
            start_date: None,
            end_date: None,
            trainer_id: None,
            trainer_name: None,
            admin_id: None,
            created_at: None,
        }
    }
}

/// Course creation payload
///
/// Fields are optional so the service can report which ones are missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseCreate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<u8>,
    pub price: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub duration: Option<u32>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub trainer_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelQuery {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub duration: u32,
    #[serde(deserialize_with = "null_default")]
    pub video_url: String,
    #[serde(deserialize_with = "null_default")]
    pub is_free: bool,
    #[serde(deserialize_with = "null_default")]
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub id: String,
    pub course_id: String,
    pub user_id: String,
    #[serde(deserialize_with = "null_default")]
    pub rating: f64,
    #[serde(deserialize_with = "null_default")]
    pub comment: String,
    #[serde(deserialize_with = "null_default")]
    pub created_at: String,
}

/// Promotional banner (`promotes/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Promote {
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub discount: String,
    #[serde(deserialize_with = "null_default")]
    pub is_active: bool,
    #[serde(deserialize_with = "null_default")]
    pub expiry_date: String,
}
