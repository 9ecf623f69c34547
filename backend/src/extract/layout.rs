//! Positional layout of the supported timetable templates.
//!
//! The extractor never hard-codes a row or column: every offset, label and slot
//! time it relies on lives here, so a structurally similar template can be
//! targeted from the `[layout]` config table without touching the scan loop.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily time slots of the weekly template, in order.
pub const DEFAULT_SLOT_TIMES: [&str; 6] = [
    "09:00-10:30",
    "10:45-12:15",
    "13:00-14:30",
    "14:40-16:10",
    "16:20-17:50",
    "18:00-19:30",
];

/// Label found in the first column of every session row ("N пара").
pub const DEFAULT_SESSION_MARKER: &str = "пара";

/// Monday of the week the template describes.
pub const DEFAULT_ANCHOR_DATE: (i32, u32, u32) = (2025, 4, 14);

/// Layout of the per-group column sheet read by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Row holding the free-text group headers.
    pub header_row: usize,
    /// Column inspected for the session marker.
    pub marker_column: usize,
    /// Substring identifying a session row.
    pub session_marker: String,
    /// Slot strings; their count is the per-day session cap.
    pub slot_times: Vec<String>,
    /// Date of the first day block.
    pub anchor_date: NaiveDate,
    /// Distance from a group's subject column to its cabinet column.
    pub cabinet_offset: usize,
    /// Separator between subject and teacher inside a subject cell.
    pub teacher_separator: char,
}

impl SheetLayout {
    /// Maximum number of sessions recorded per day block.
    pub fn max_sessions(&self) -> usize {
        self.slot_times.len()
    }

    /// Slot string for the session at `index` within a day block.
    pub fn slot(&self, index: usize) -> Option<&str> {
        self.slot_times.get(index).map(String::as_str)
    }

    /// Whether a first-column cell marks a session row.
    pub fn is_session_marker(&self, cell: Option<&str>) -> bool {
        cell.is_some_and(|text| text.contains(&self.session_marker))
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        let (y, m, d) = DEFAULT_ANCHOR_DATE;
        Self {
            header_row: 0,
            marker_column: 0,
            session_marker: DEFAULT_SESSION_MARKER.to_string(),
            slot_times: DEFAULT_SLOT_TIMES.iter().map(|s| s.to_string()).collect(),
            anchor_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            cabinet_offset: 1,
            teacher_separator: ',',
        }
    }
}

/// Layout of the weekly grid workbook (groups across, days down).
///
/// All indices are zero-based; the template's cell B4 is `(3, 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Row with group names (room name in the next column).
    pub group_row: usize,
    /// Row with day labels.
    pub day_row: usize,
    /// First group/day column.
    pub first_column: usize,
    /// Last group/day column, inclusive.
    pub last_column: usize,
    /// Columns per group.
    pub column_stride: usize,
    /// Column holding time labels.
    pub time_column: usize,
    /// First row of time labels.
    pub first_time_row: usize,
    /// Number of time rows shared by all days.
    pub time_row_count: usize,
    /// Required number of day labels.
    pub day_count: usize,
    /// Separator between course and teacher in a lesson cell.
    pub lesson_separator: String,
}

impl GridLayout {
    /// Rows owned by each day (integer division, trailing rows unused).
    pub fn rows_per_day(&self) -> usize {
        if self.day_count == 0 {
            0
        } else {
            self.time_row_count / self.day_count
        }
    }

    /// Group/day columns, left to right.
    pub fn columns(&self) -> impl Iterator<Item = usize> {
        (self.first_column..=self.last_column).step_by(self.column_stride.max(1))
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            group_row: 3,
            day_row: 4,
            first_column: 1,
            last_column: 51,
            column_stride: 2,
            time_column: 0,
            first_time_row: 5,
            time_row_count: 46,
            day_count: 6,
            lesson_separator: ", ".to_string(),
        }
    }
}
