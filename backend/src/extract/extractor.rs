//! Per-group timetable extraction.
//!
//! # Algorithm
//!
//! For a resolved group column `g` every row of the sheet is visited once:
//!
//! ```text
//! SCANNING ──session row──▶ ACCUMULATING (0..max) ──other row──▶ FLUSH ──▶ SCANNING
//!                                                      (rows exhausted) ──▶ FLUSH
//! ```
//!
//! A session row reads the subject from column `g` and the cabinet from
//! `g + cabinet_offset`. Each session row consumes one slot of the current day
//! block; rows past the last slot are ignored. Any other row closes the block:
//! its non-empty sessions are emitted under the current date and the date moves
//! forward one day. A non-session row with no open block changes nothing, so
//! blank separators between days never shift dates.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::layout::SheetLayout;
use super::lesson::split_subject_teacher;
use crate::models::{
    cell_text, AllGroupsSchedule, DaySchedule, GroupSchedule, GroupSelector, RawSheet,
    ScheduleQueryResult, SessionRecord,
};
use crate::roster::RosterProvider;

/// Find the first column whose header cell contains `group` (case-sensitive).
pub fn find_group_column(sheet: &RawSheet, layout: &SheetLayout, group: &str) -> Option<usize> {
    let header = sheet.row(layout.header_row)?;
    header
        .iter()
        .position(|cell| cell.as_deref().is_some_and(|text| text.contains(group)))
}

/// Extract the timetable of a single group.
///
/// An unknown group yields [`ScheduleQueryResult::NotFound`]; it is never an error.
pub fn extract_group(sheet: &RawSheet, layout: &SheetLayout, group: &str) -> ScheduleQueryResult {
    let Some(column) = find_group_column(sheet, layout, group) else {
        debug!(group, "group not present in header row");
        return ScheduleQueryResult::not_found(group);
    };

    let schedule = GroupSchedule {
        group: group.to_string(),
        days: scan_group_column(sheet, layout, column),
    };
    debug!(
        group,
        column,
        days = schedule.days.len(),
        sessions = schedule.session_count(),
        "extracted group timetable"
    );
    ScheduleQueryResult::Group(schedule)
}

/// Extract every roster group, in roster order.
///
/// Groups missing from the sheet map to an empty day list.
pub fn extract_all(sheet: &RawSheet, layout: &SheetLayout, groups: &[String]) -> AllGroupsSchedule {
    let mut all = AllGroupsSchedule::new();
    for group in groups {
        let days = match extract_group(sheet, layout, group) {
            ScheduleQueryResult::Group(schedule) => schedule.days,
            _ => {
                warn!(group = %group, "roster group missing from sheet");
                Vec::new()
            }
        };
        all.insert(group.clone(), days);
    }
    all
}

/// Run a query for `selector` against an already loaded sheet.
pub fn extract_schedule(
    sheet: &RawSheet,
    layout: &SheetLayout,
    selector: &GroupSelector,
    roster: &dyn RosterProvider,
) -> ScheduleQueryResult {
    match selector {
        GroupSelector::All => ScheduleQueryResult::All(extract_all(sheet, layout, roster.groups())),
        GroupSelector::Group(name) => extract_group(sheet, layout, name),
    }
}

/// Scan all rows for the group whose subjects live in `column`.
pub fn scan_group_column(sheet: &RawSheet, layout: &SheetLayout, column: usize) -> Vec<DaySchedule> {
    let mut block = DayBlock::new(layout);

    for row in sheet.rows() {
        if layout.is_session_marker(cell_text(row, layout.marker_column)) {
            block.session_row(
                cell_text(row, column),
                cell_text(row, column.saturating_add(layout.cabinet_offset)),
            );
        } else {
            block.boundary();
        }
    }

    block.finish()
}

/// Accumulator for the day block currently being read.
struct DayBlock<'a> {
    layout: &'a SheetLayout,
    date: NaiveDate,
    /// Session rows seen in this block, capped at the slot count.
    slot_index: usize,
    open: bool,
    sessions: Vec<SessionRecord>,
    days: Vec<DaySchedule>,
}

impl<'a> DayBlock<'a> {
    fn new(layout: &'a SheetLayout) -> Self {
        Self {
            layout,
            date: layout.anchor_date,
            slot_index: 0,
            open: false,
            sessions: Vec::new(),
            days: Vec::new(),
        }
    }

    fn session_row(&mut self, subject_cell: Option<&str>, cabinet_cell: Option<&str>) {
        self.open = true;
        let Some(time) = self.layout.slot(self.slot_index) else {
            return;
        };

        let (subject, teacher) =
            split_subject_teacher(subject_cell.unwrap_or_default(), self.layout.teacher_separator);
        let cabinet = cabinet_cell.unwrap_or_default().trim().to_string();

        if !subject.is_empty() || !cabinet.is_empty() {
            self.sessions.push(SessionRecord {
                time: time.to_string(),
                subject,
                teacher,
                cabinet,
            });
        }
        self.slot_index += 1;
    }

    fn boundary(&mut self) {
        if !self.open {
            return;
        }
        self.flush();
        self.slot_index = 0;
        self.open = false;
        self.date = self.date.succ_opt().unwrap_or(self.date);
    }

    fn flush(&mut self) {
        let sessions = std::mem::take(&mut self.sessions);
        if !sessions.is_empty() {
            self.days.push(DaySchedule {
                date: self.date,
                sessions,
            });
        }
    }

    fn finish(mut self) -> Vec<DaySchedule> {
        if self.open {
            self.flush();
        }
        self.days
    }
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod extractor_tests;
