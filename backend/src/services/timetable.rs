//! Timetable service: owns the sheet snapshot and answers queries.
//!
//! The service holds the only long-lived state in the crate: the most recent
//! [`SheetSnapshot`]. Extraction itself is pure and runs on a blocking thread
//! against an `Arc` of the snapshot's sheet, so concurrent queries never contend
//! for more than the brief snapshot lookup.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::{AppConfig, ReloadPolicy};
use crate::error::{ErrorContext, TimetableError, TimetableResult};
use crate::extract::{self, GridLayout, GridLesson, SheetLayout};
use crate::io::{FileSheetSource, SheetFormat, SheetLoader, SheetSource};
use crate::models::{GroupSelector, RawSheet, ScheduleQueryResult};
use crate::roster::RosterProvider;

/// Workbook extensions accepted by the grid import.
const GRID_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// A loaded sheet and where it came from.
#[derive(Debug, Clone)]
pub struct SheetSnapshot {
    pub sheet: Arc<RawSheet>,
    pub checksum: String,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

/// Summary of a snapshot, as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    pub source: String,
    pub checksum: String,
    pub rows: usize,
    pub columns: usize,
    pub loaded_at: DateTime<Utc>,
}

impl From<&SheetSnapshot> for SnapshotInfo {
    fn from(snapshot: &SheetSnapshot) -> Self {
        Self {
            source: snapshot.source.clone(),
            checksum: snapshot.checksum.clone(),
            rows: snapshot.sheet.row_count(),
            columns: snapshot.sheet.column_count(),
            loaded_at: snapshot.loaded_at,
        }
    }
}

/// Result of a weekly grid import.
#[derive(Debug, Clone, Serialize)]
pub struct GridImport {
    pub source: String,
    pub checksum: String,
    pub lessons: Vec<GridLesson>,
}

/// Timetable queries over a reloadable sheet.
pub struct TimetableService {
    source: Arc<dyn SheetSource>,
    roster: Arc<dyn RosterProvider>,
    layout: SheetLayout,
    grid_layout: GridLayout,
    reload: ReloadPolicy,
    snapshot: RwLock<Option<Arc<SheetSnapshot>>>,
}

impl TimetableService {
    pub fn new(
        source: Arc<dyn SheetSource>,
        roster: Arc<dyn RosterProvider>,
        layout: SheetLayout,
        reload: ReloadPolicy,
    ) -> Self {
        Self {
            source,
            roster,
            layout,
            grid_layout: GridLayout::default(),
            reload,
            snapshot: RwLock::new(None),
        }
    }

    /// Replace the weekly grid layout used by [`Self::import_grid`].
    pub fn with_grid_layout(mut self, grid_layout: GridLayout) -> Self {
        self.grid_layout = grid_layout;
        self
    }

    /// Build a service reading the configured sheet file.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(FileSheetSource::new(config.sheet.path.clone())),
            Arc::new(config.roster()),
            config.layout.clone(),
            config.sheet.reload,
        )
        .with_grid_layout(config.grid.clone())
    }

    pub fn reload_policy(&self) -> ReloadPolicy {
        self.reload
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// Roster groups in order.
    pub fn groups(&self) -> Vec<String> {
        self.roster.groups().to_vec()
    }

    /// Last loaded snapshot, without loading.
    pub fn current_snapshot(&self) -> Option<Arc<SheetSnapshot>> {
        self.snapshot.read().clone()
    }

    /// Load the sheet and replace the current snapshot.
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn refresh(&self) -> TimetableResult<Arc<SheetSnapshot>> {
        let loaded = self.source.load().await?;
        let snapshot = Arc::new(SheetSnapshot {
            sheet: Arc::new(loaded.sheet),
            checksum: loaded.checksum,
            source: loaded.source,
            loaded_at: Utc::now(),
        });

        let previous = self.snapshot.write().replace(Arc::clone(&snapshot));
        let changed = previous.map_or(true, |p| p.checksum != snapshot.checksum);
        info!(
            rows = snapshot.sheet.row_count(),
            columns = snapshot.sheet.column_count(),
            checksum = %snapshot.checksum,
            changed,
            "sheet snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Snapshot to query, honouring the reload policy.
    pub async fn snapshot(&self) -> TimetableResult<Arc<SheetSnapshot>> {
        if self.reload == ReloadPolicy::Cached {
            if let Some(snapshot) = self.current_snapshot() {
                return Ok(snapshot);
            }
        }
        self.refresh().await
    }

    /// Run a timetable query.
    ///
    /// An unknown group is a normal [`ScheduleQueryResult::NotFound`]; only a
    /// sheet that cannot be loaded is an error.
    pub async fn query(&self, selector: GroupSelector) -> TimetableResult<ScheduleQueryResult> {
        let snapshot = self.snapshot().await?;
        let layout = self.layout.clone();
        let roster = Arc::clone(&self.roster);

        tokio::task::spawn_blocking(move || {
            extract::extract_schedule(&snapshot.sheet, &layout, &selector, roster.as_ref())
        })
        .await
        .map_err(|e| {
            TimetableError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("query"),
            )
        })
    }

    /// Parse an uploaded weekly grid workbook.
    ///
    /// # Errors
    /// `UnsupportedFormat` unless `filename` ends in `.xlsx` or `.xls`;
    /// `LoadFailure` for unreadable bytes; `InvalidLayout` for malformed grids.
    pub async fn import_grid(&self, bytes: Vec<u8>, filename: &str) -> TimetableResult<GridImport> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        if !extension.is_some_and(|ext| GRID_EXTENSIONS.contains(&ext.as_str())) {
            return Err(TimetableError::UnsupportedFormat {
                message: "Invalid file format. Please upload an Excel file.".to_string(),
                context: ErrorContext::new("import_grid").with_source(filename),
            });
        }

        let grid_layout = self.grid_layout.clone();
        let filename = filename.to_string();
        let import = tokio::task::spawn_blocking(move || -> TimetableResult<GridImport> {
            let loaded = SheetLoader::load_from_bytes(&bytes, SheetFormat::Workbook, &filename)?;
            let lessons = extract::parse_weekly_grid(&loaded.sheet, &grid_layout)
                .map_err(|e| e.with_source(&filename))?;
            Ok(GridImport {
                source: loaded.source,
                checksum: loaded.checksum,
                lessons,
            })
        })
        .await
        .map_err(|e| TimetableError::internal(format!("Task join error: {}", e)))??;

        info!(
            source = %import.source,
            lessons = import.lessons.len(),
            "weekly grid imported"
        );
        Ok(import)
    }
}

#[cfg(test)]
#[path = "timetable_tests.rs"]
mod timetable_tests;
