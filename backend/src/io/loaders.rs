use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::debug;

use super::checksum::calculate_checksum;
use crate::error::{ErrorContext, TimetableError, TimetableResult};
use crate::models::RawSheet;

/// File formats a sheet can be loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Any workbook calamine understands (xlsx, xlsm, xlsb, xls, ods)
    Workbook,
    Csv,
}

impl SheetFormat {
    /// Detect the format from a file name or path extension.
    pub fn from_name(name: &str) -> TimetableResult<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                TimetableError::unsupported_format("File has no extension").with_source(name)
            })?;

        match extension.to_lowercase().as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            other => Err(TimetableError::unsupported_format(format!(
                "Unsupported file format: {}",
                other
            ))
            .with_source(name)),
        }
    }
}

/// A sheet together with the identity of the bytes it came from
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub sheet: RawSheet,
    /// SHA-256 of the source bytes
    pub checksum: String,
    /// Display name of the source (path or upload name)
    pub source: String,
}

/// Loads the first worksheet of a workbook or a CSV file into a [`RawSheet`]
pub struct SheetLoader;

impl SheetLoader {
    /// Load a sheet from a file (format chosen by extension)
    pub fn load_from_file(path: &Path) -> TimetableResult<LoadedSheet> {
        let name = path.display().to_string();
        let format = SheetFormat::from_name(&name)?;
        let bytes = std::fs::read(path).map_err(|e| {
            TimetableError::load_with_context(
                format!("Failed to read sheet file: {}", e),
                ErrorContext::new("load_sheet").with_source(&name),
            )
        })?;
        Self::load_from_bytes(&bytes, format, &name)
    }

    /// Load a sheet from in-memory bytes
    pub fn load_from_bytes(
        bytes: &[u8],
        format: SheetFormat,
        source: &str,
    ) -> TimetableResult<LoadedSheet> {
        let sheet = match format {
            SheetFormat::Workbook => Self::parse_workbook(bytes),
            SheetFormat::Csv => Self::parse_csv(bytes),
        }
        .map_err(|e| e.with_operation("load_sheet").with_source(source))?;

        debug!(
            source,
            rows = sheet.row_count(),
            columns = sheet.column_count(),
            "loaded sheet"
        );

        Ok(LoadedSheet {
            sheet,
            checksum: calculate_checksum(bytes),
            source: source.to_string(),
        })
    }

    /// Parse the first worksheet of a workbook.
    pub fn parse_workbook(bytes: &[u8]) -> TimetableResult<RawSheet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TimetableError::load("Workbook contains no worksheets"))??;
        Ok(range_to_raw_sheet(&range))
    }

    /// Parse a header-less CSV file; ragged rows are allowed.
    pub fn parse_csv(bytes: &[u8]) -> TimetableResult<RawSheet> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        // The reader skips blank lines; they are day separators, so restore
        // one empty row per skipped line.
        let mut rows = Vec::new();
        let mut record = csv::StringRecord::new();
        let mut consumed = 0;
        while reader.read_record(&mut record)? {
            for _ in 0..blank_lines_at(bytes, consumed) {
                rows.push(Vec::new());
            }
            rows.push(record.iter().map(text_cell).collect());
            consumed = usize::try_from(reader.position().byte()).unwrap_or(bytes.len());
        }
        Ok(RawSheet::new(rows))
    }
}

/// Count the blank lines between the end of the previous record and the next.
///
/// `from` is where the reader stopped, which may be before, inside or after
/// the previous record's terminator.
fn blank_lines_at(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    if i > 0 && i < bytes.len() {
        match (bytes[i - 1], bytes[i]) {
            (b'\r', b'\n') => i += 1,
            (b'\r' | b'\n', _) => {}
            (_, b'\r') if bytes.get(i + 1) == Some(&b'\n') => i += 2,
            (_, b'\r' | b'\n') => i += 1,
            _ => {}
        }
    }

    let mut count = 0;
    while let Some(&byte) = bytes.get(i) {
        match byte {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => i += 2,
            b'\r' | b'\n' => i += 1,
            _ => break,
        }
        count += 1;
    }
    count
}

/// Convert a calamine range into a sheet anchored at A1.
///
/// calamine ranges start at the first used cell; leading empty rows and
/// columns are restored so positional layouts keep their meaning.
fn range_to_raw_sheet(range: &Range<Data>) -> RawSheet {
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Option<String>>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells: Vec<Option<String>> = vec![None; start_col];
        cells.extend(row.iter().map(data_cell));
        rows.push(cells);
    }
    RawSheet::new(rows)
}

fn text_cell(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Render a workbook cell as text; whole floats lose their `.0`.
fn data_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => text_cell(s),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some(format!("{}", *f as i64))
        }
        Data::DateTime(dt) => {
            excel_serial_text(dt.as_f64()).or_else(|| text_cell(&dt.as_f64().to_string()))
        }
        other => text_cell(&other.to_string()),
    }
}

/// Render an Excel serial date.
///
/// Time-only values become `HH:MM:SS`, midnight dates `YYYY-MM-DD`, anything
/// else `YYYY-MM-DD HH:MM:SS`.
fn excel_serial_text(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let mut days = serial.trunc() as i64;
    let mut seconds = ((serial - serial.trunc()) * 86_400.0).round() as u32;
    if seconds >= 86_400 {
        days += 1;
        seconds -= 86_400;
    }
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;
    if days == 0 {
        return Some(time.format("%H:%M:%S").to_string());
    }

    // Serials below 60 precede the phantom 1900-02-29
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let date = epoch.checked_add_signed(Duration::days(days))?;
    if seconds == 0 {
        Some(date.format("%Y-%m-%d").to_string())
    } else {
        Some(date.and_time(time).format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

#[cfg(test)]
#[path = "loaders_tests.rs"]
mod loaders_tests;
