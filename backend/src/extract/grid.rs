//! Weekly grid workbook parser.
//!
//! The grid template lays groups out across the sheet (group name, then its
//! room, in pairs of columns) and days down the sheet, each day owning a fixed
//! run of time rows. Unlike the column extractor this parser is strict: a
//! lesson cell that is not `Course, Teacher` aborts the import.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::layout::GridLayout;
use crate::error::{ErrorContext, TimetableError, TimetableResult};
use crate::models::RawSheet;

/// One lesson read from the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLesson {
    pub group: String,
    pub room: String,
    /// Day label as written in the sheet, e.g. `14 апреля Понедельник`
    pub day: String,
    pub time: String,
    pub course: String,
    pub teacher: String,
    /// `{group}_{course}_{day}` with spaces in the day replaced by `_`
    pub course_id: String,
    /// First two words of the day label followed by the time
    pub full_time: String,
}

struct GridGroup<'a> {
    name: &'a str,
    room: &'a str,
    column: usize,
}

/// Parse all lessons of a weekly grid sheet.
///
/// # Errors
/// `InvalidLayout` when the day row does not hold exactly `day_count` labels or
/// a lesson cell cannot be split into course and teacher.
pub fn parse_weekly_grid(sheet: &RawSheet, layout: &GridLayout) -> TimetableResult<Vec<GridLesson>> {
    // Columns past the sheet hold nothing
    let width = sheet.column_count();
    let columns = || layout.columns().take_while(move |column| *column < width);

    let groups: Vec<GridGroup<'_>> = columns()
        .filter_map(|column| {
            let name = non_empty(sheet.cell(layout.group_row, column))?;
            let room = non_empty(sheet.cell(layout.group_row, column.saturating_add(1)))?;
            Some(GridGroup { name, room, column })
        })
        .collect();

    let days: Vec<&str> = columns()
        .filter_map(|column| non_empty(sheet.cell(layout.day_row, column)))
        .collect();

    if days.len() != layout.day_count {
        return Err(TimetableError::InvalidLayout {
            message: format!(
                "Expected {} days in row {}, found {}",
                layout.day_count,
                layout.day_row + 1,
                days.len()
            ),
            context: ErrorContext::new("parse_weekly_grid"),
        });
    }

    let rows_per_day = layout.rows_per_day();
    let mut lessons = Vec::new();

    for (day_index, day) in days.iter().enumerate() {
        let row_start = layout
            .first_time_row
            .saturating_add(day_index.saturating_mul(rows_per_day));
        for row in row_start..row_start.saturating_add(rows_per_day) {
            let Some(time) = non_empty(sheet.cell(row, layout.time_column)) else {
                continue;
            };

            for group in &groups {
                let Some(cell) = non_empty(sheet.cell(row, group.column)) else {
                    continue;
                };
                let (course, teacher) = split_lesson(cell, &layout.lesson_separator)
                    .ok_or_else(|| TimetableError::InvalidLayout {
                        message: format!(
                            "Invalid pair format at row {}, column {}: expected 'Course{}Teacher'",
                            row + 1,
                            group.column + 1,
                            layout.lesson_separator
                        ),
                        context: ErrorContext::new("parse_weekly_grid").with_details(cell),
                    })?;

                lessons.push(GridLesson {
                    group: group.name.to_string(),
                    room: group.room.to_string(),
                    day: day.to_string(),
                    time: time.to_string(),
                    course_id: format!("{}_{}_{}", group.name, course, day.replace(' ', "_")),
                    full_time: full_time(day, time),
                    course: course.to_string(),
                    teacher: teacher.to_string(),
                });
            }
        }
    }

    debug!(
        groups = groups.len(),
        lessons = lessons.len(),
        "parsed weekly grid"
    );
    Ok(lessons)
}

fn non_empty(cell: Option<&str>) -> Option<&str> {
    cell.filter(|text| !text.trim().is_empty())
}

/// Exactly two parts, course then teacher.
fn split_lesson<'a>(cell: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    let mut parts = cell.split(separator);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(course), Some(teacher), None) => Some((course, teacher)),
        _ => None,
    }
}

fn full_time(day: &str, time: &str) -> String {
    let date_words: Vec<&str> = day.split(' ').take(2).collect();
    format!("{} {}", date_words.join(" "), time)
}
