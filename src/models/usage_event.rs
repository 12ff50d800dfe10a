//! Library usage events (classes, meetings, workshops held in the library)

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{enums::Shift, optional_text, required_text};
use crate::{
    error::{AppError, AppResult},
    repository::Document,
};

/// `HH:MM` wall-clock times; seconds are accepted on input and dropped on output
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<NaiveTime> {
        let value = value.trim();
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}'", raw)))
    }
}

/// Usage event record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageEvent {
    pub id: String,
    pub version: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "08:30")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "10:00")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(default)]
    pub shift: Option<Shift>,
    pub recorded_at: DateTime<Utc>,
}

impl Document for UsageEvent {
    const COLLECTION: &'static str = "usage_events";
}

/// Create or update usage event request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UsageEventInput {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    /// `HH:MM`
    #[validate(length(min = 1, message = "start_time is required"))]
    pub start_time: String,
    /// `HH:MM`, not before `start_time`
    #[validate(length(min = 1, message = "end_time is required"))]
    pub end_time: String,
    pub subject: Option<String>,
    pub teacher: Option<String>,
    pub shift: Option<Shift>,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Stored payload of a usage event
#[derive(Debug, Serialize)]
pub struct UsageEventData {
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub subject: Option<String>,
    pub teacher: Option<String>,
    pub shift: Option<Shift>,
    pub recorded_at: DateTime<Utc>,
}

impl UsageEventInput {
    /// Run field and cross-field checks and build the stored payload
    pub fn into_data(self, recorded_at: DateTime<Utc>) -> AppResult<UsageEventData> {
        self.validate()?;
        let name = required_text("name", &self.name)?;
        let start_time = parse_time("start_time", &self.start_time)?;
        let end_time = parse_time("end_time", &self.end_time)?;
        if !EVENT_YEARS.contains(&self.date.year()) {
            return Err(AppError::Validation(format!(
                "date must fall between the years {} and {}",
                EVENT_YEARS.start(),
                EVENT_YEARS.end()
            )));
        }
        if end_time < start_time {
            return Err(AppError::Validation(
                "end_time cannot be earlier than start_time".to_string(),
            ));
        }

        Ok(UsageEventData {
            name,
            description: optional_text(self.description.as_deref()),
            date: self.date,
            start_time,
            end_time,
            subject: optional_text(self.subject.as_deref()),
            teacher: optional_text(self.teacher.as_deref()),
            shift: self.shift,
            recorded_at,
        })
    }
}

const EVENT_YEARS: std::ops::RangeInclusive<i32> = 1900..=2100;

fn parse_time(field: &str, value: &str) -> AppResult<NaiveTime> {
    hhmm::parse(value)
        .ok_or_else(|| AppError::Validation(format!("{} must be a time in HH:MM format", field)))
}
