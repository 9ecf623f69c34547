//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! [`TimetableService`](crate::services::TimetableService).

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    GridImportQuery, GridImportResponse, GroupListResponse, HealthResponse, RefreshResponse,
    ScheduleQueryResult, SnapshotInfo,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::GroupSelector;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports the service status and the checksum of the last loaded sheet.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let sheet = state
        .timetable
        .current_snapshot()
        .map(|snapshot| snapshot.checksum.clone())
        .unwrap_or_else(|| "not loaded".to_string());

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        sheet,
    }))
}

// =============================================================================
// Timetable
// =============================================================================

/// GET /v1/groups
///
/// List the roster used by the `all` selector.
pub async fn list_groups(State(state): State<AppState>) -> HandlerResult<GroupListResponse> {
    let groups = state.timetable.groups();
    let total = groups.len();
    Ok(Json(GroupListResponse { groups, total }))
}

/// GET /v1/schedule/{group}
///
/// Timetable of one group, or of every roster group when `group` is `all`.
/// An unknown group answers 200 with an `error` field.
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> HandlerResult<ScheduleQueryResult> {
    let selector = GroupSelector::from(group.as_str());
    let result = state.timetable.query(selector).await?;
    Ok(Json(result))
}

/// POST /v1/schedule/refresh
///
/// Reload the sheet now, regardless of the reload policy.
pub async fn refresh_schedule(State(state): State<AppState>) -> HandlerResult<RefreshResponse> {
    let snapshot = state.timetable.refresh().await?;
    Ok(Json(RefreshResponse {
        message: format!("Sheet reloaded from {}", snapshot.source),
        snapshot: SnapshotInfo::from(snapshot.as_ref()),
    }))
}

// =============================================================================
// Weekly Grid Import
// =============================================================================

/// POST /v1/imports/grid?filename=week.xlsx
///
/// Parse an uploaded weekly grid workbook (raw bytes in the body) and return
/// the lessons found.
pub async fn import_grid(
    State(state): State<AppState>,
    Query(query): Query<GridImportQuery>,
    body: Bytes,
) -> HandlerResult<GridImportResponse> {
    let filename = query
        .filename
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'filename' query parameter".to_string()))?;
    if body.is_empty() {
        return Err(AppError::BadRequest("Request body is empty".to_string()));
    }

    let import = state.timetable.import_grid(body.to_vec(), &filename).await?;
    Ok(Json(GridImportResponse {
        message: "Schedule parsed successfully".to_string(),
        lessons_found: import.lessons.len(),
        checksum: import.checksum,
        lessons: import.lessons,
    }))
}
