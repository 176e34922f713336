//! Complaint models for the API service

use chrono::{DateTime, Utc};
use common::{ResidentSummary, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status a complaint starts in when the author gives none
pub const DEFAULT_STATUS: &str = "pending";

/// Complaint joined with its author
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    pub resident_id: Uuid,
    pub title: String,
    pub message: String,
    pub status: String,
    pub response_text: Option<String>,
    /// Staff role the author addressed, if any
    pub target_role: Option<Role>,
    pub resident: ResidentSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub resident_id: Uuid,
    pub title: String,
    pub message: String,
    pub status: String,
    pub target_role: Option<Role>,
}

/// Fields staff may change; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintUpdate {
    pub status: Option<String>,
    pub response_text: Option<String>,
}

/// Request for complaint creation
///
/// `residentId` defaults to the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    pub resident_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub status: Option<String>,
    pub target_role: Option<Role>,
}

/// Query parameters for complaint listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintQuery {
    pub resident_id: Option<Uuid>,
}
