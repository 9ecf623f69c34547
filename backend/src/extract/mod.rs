//! Spreadsheet-to-timetable extraction.
//!
//! - [`layout`]: positional constants of the supported templates
//! - [`lesson`]: subject/teacher splitting
//! - [`extractor`]: per-group column scan and the roster fan-out
//! - [`grid`]: strict parser for the weekly grid workbook

pub mod extractor;
pub mod grid;
pub mod layout;
pub mod lesson;

pub use extractor::{
    extract_all, extract_group, extract_schedule, find_group_column, scan_group_column,
};
pub use grid::{parse_weekly_grid, GridLesson};
pub use layout::{GridLayout, SheetLayout};
pub use lesson::split_subject_teacher;
