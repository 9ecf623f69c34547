//! Sheet loading.
//!
//! Loaders turn a workbook or CSV file into a [`RawSheet`](crate::models::RawSheet);
//! sources wrap a loader behind an async trait so the service layer can swap a
//! file on disk for an in-memory sheet.
//!
//! # Example
//!
//! ```no_run
//! use timetable::io::SheetLoader;
//! use std::path::Path;
//!
//! let loaded = SheetLoader::load_from_file(Path::new("14.04 - 18.04-1.xlsx"))
//!     .expect("Failed to load");
//! println!("Loaded {} rows", loaded.sheet.row_count());
//! ```

pub mod checksum;
pub mod loaders;
pub mod source;

pub use checksum::calculate_checksum;
pub use loaders::{LoadedSheet, SheetFormat, SheetLoader};
pub use source::{FileSheetSource, MemorySheetSource, SheetSource};
