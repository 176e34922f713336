//! Shift models for the API service

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use common::ResidentSummary;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Daily duty slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Morning,
    Afternoon,
    Night,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Morning => "morning",
            ShiftType::Afternoon => "afternoon",
            ShiftType::Night => "night",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" => Ok(ShiftType::Morning),
            "afternoon" => Ok(ShiftType::Afternoon),
            "night" => Ok(ShiftType::Night),
            other => Err(format!("unknown shift type: {other}")),
        }
    }
}

/// Shift joined with its assignee
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub police_id: Uuid,
    pub police: ResidentSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated insert payload: the date is already reduced to a day
#[derive(Debug, Clone)]
pub struct NewShift {
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub police_id: Uuid,
}

/// Inclusive range of days; either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Request for shift creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    pub police_id: Uuid,
    pub date: String,
    pub shift_type: ShiftType,
}

/// Request for shift reassignment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    pub police_id: Option<Uuid>,
}

/// Query parameters for shift listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Reduce a client-supplied date or timestamp to its calendar day.
///
/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp, or
/// an RFC 3339 timestamp, whose day is taken in its own offset.
pub fn parse_shift_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.date());
    }

    Err(ApiError::BadRequest(format!("Invalid date: {raw}")))
}
