//! Async sheet sources consumed by the service layer.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::checksum::calculate_checksum;
use super::loaders::{LoadedSheet, SheetLoader};
use crate::error::{ErrorContext, TimetableError, TimetableResult};
use crate::models::RawSheet;

/// Something that can produce a fresh sheet snapshot on demand.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Load the sheet. Failures are fatal to the caller's request.
    async fn load(&self) -> TimetableResult<LoadedSheet>;

    /// Human-readable name of the source, used in logs and errors.
    fn describe(&self) -> String;
}

/// Sheet read from a workbook or CSV file on disk.
#[derive(Debug, Clone)]
pub struct FileSheetSource {
    path: PathBuf,
}

impl FileSheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SheetSource for FileSheetSource {
    async fn load(&self) -> TimetableResult<LoadedSheet> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || SheetLoader::load_from_file(&path))
            .await
            .map_err(|e| {
                TimetableError::internal_with_context(
                    format!("Task join error: {}", e),
                    ErrorContext::new("load_sheet").with_source(self.path.display()),
                )
            })?
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed in-memory sheet, for embedding and tests.
#[derive(Debug, Clone)]
pub struct MemorySheetSource {
    name: String,
    sheet: RawSheet,
}

impl MemorySheetSource {
    pub fn new(name: impl Into<String>, sheet: RawSheet) -> Self {
        Self {
            name: name.into(),
            sheet,
        }
    }
}

#[async_trait]
impl SheetSource for MemorySheetSource {
    async fn load(&self) -> TimetableResult<LoadedSheet> {
        let encoded = serde_json::to_vec(&self.sheet)
            .map_err(|e| TimetableError::internal(format!("Failed to encode sheet: {}", e)))?;
        Ok(LoadedSheet {
            sheet: self.sheet.clone(),
            checksum: calculate_checksum(&encoded),
            source: self.name.clone(),
        })
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_source_is_stable() {
        let source = MemorySheetSource::new("memory", RawSheet::from_strings([vec!["", "G"]]));
        let first = source.load().await.unwrap();
        let second = source.load().await.unwrap();
        assert_eq!(first.checksum, second.checksum);
        assert_eq!(first.sheet, second.sheet);
        assert_eq!(source.describe(), "memory");
    }

    #[tokio::test]
    async fn test_file_source_propagates_load_failure() {
        let source = FileSheetSource::new("/nonexistent/week.csv");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, TimetableError::LoadFailure { .. }));
        assert_eq!(source.describe(), "/nonexistent/week.csv");
    }
}
