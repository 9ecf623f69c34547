//! Data Transfer Objects for the HTTP API.
//!
//! Timetable results serialize directly from [`crate::models`]; the types here
//! cover the remaining request/response bodies.

use serde::{Deserialize, Serialize};

pub use crate::extract::GridLesson;
pub use crate::models::{DaySchedule, ScheduleQueryResult, SessionRecord};
pub use crate::services::SnapshotInfo;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Checksum of the last loaded sheet, or `not loaded`
    pub sheet: String,
}

/// Roster listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupListResponse {
    pub groups: Vec<String>,
    pub total: usize,
}

/// Response for a forced sheet reload.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub snapshot: SnapshotInfo,
}

/// Query parameters for the weekly grid import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridImportQuery {
    /// Original file name; its extension selects the accepted formats
    #[serde(default)]
    pub filename: Option<String>,
}

/// Response for a weekly grid import.
#[derive(Debug, Clone, Serialize)]
pub struct GridImportResponse {
    pub message: String,
    pub lessons_found: usize,
    pub checksum: String,
    pub lessons: Vec<GridLesson>,
}
