#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Write;
use std::sync::Mutex;

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::NamedTempFile;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Access to the process environment is serialized, and the previous values
/// are restored even if `f` panics.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// Write `contents` to a temp file with the given extension.
pub fn temp_file(contents: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{}", extension))
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// A two-day sheet in the per-group column template, as CSV.
///
/// Groups `ИСИП-118` (columns 1-2) and `ТН-101` (columns 3-4).
pub const WEEK_CSV: &str = "\
,ИСИП-118 (ауд.),,ТН-101 (ауд.),
1 пара,\"Математика, Иванов И.И.\",101,Экономика,7
2 пара,,,\"Право, Петрова А.А.\",8
Вторник,,,,
1 пара,\"История, Сидоров\",201,,
";

/// Write raw bytes to a temp file with the given extension.
pub fn temp_bytes(bytes: &[u8], extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{}", extension))
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// The per-group column template as an xlsx workbook, cabinets as numbers.
pub fn column_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 1, "ИСИП-118 (ауд.)").unwrap();
    worksheet.write_string(1, 0, "1 пара").unwrap();
    worksheet.write_string(1, 1, "Математика, Иванов И.И.").unwrap();
    worksheet.write_number(1, 2, 101.0).unwrap();
    worksheet.write_string(2, 0, "Вторник").unwrap();
    worksheet.write_string(3, 0, "1 пара").unwrap();
    worksheet.write_string(3, 1, "История, Сидоров").unwrap();
    worksheet.write_number(3, 2, 201.0).unwrap();
    workbook.save_to_buffer().unwrap()
}

/// Day labels of the weekly grid template.
pub const GRID_DAYS: [&str; 6] = [
    "14 апреля Понедельник",
    "15 апреля Вторник",
    "16 апреля Среда",
    "17 апреля Четверг",
    "18 апреля Пятница",
    "19 апреля Суббота",
];

/// A weekly grid workbook with three lessons.
///
/// Monday 08:00 (a time-formatted cell): `ИСИП-118` Математика and `ТН-101`
/// Право. Tuesday `09:40` (text): `ИСИП-118` История.
pub fn grid_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (i, (group, room)) in [("ИСИП-118", "101"), ("ТН-101", "202")].iter().enumerate() {
        let column = 1 + 2 * i as u16;
        worksheet.write_string(3, column, *group).unwrap();
        worksheet.write_string(3, column + 1, *room).unwrap();
    }
    for (i, day) in GRID_DAYS.iter().enumerate() {
        worksheet.write_string(4, 1 + 2 * i as u16, *day).unwrap();
    }

    let eight = ExcelDateTime::from_hms(8, 0, 0).unwrap();
    worksheet
        .write_datetime_with_format(5, 0, &eight, &Format::new().set_num_format("hh:mm"))
        .unwrap();
    worksheet.write_string(5, 1, "Математика, Иванов").unwrap();
    worksheet.write_string(5, 3, "Право, Петрова").unwrap();

    // Second day starts 7 rows later
    worksheet.write_string(12, 0, "09:40").unwrap();
    worksheet.write_string(12, 1, "История, Сидоров").unwrap();
    workbook.save_to_buffer().unwrap()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
