//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the pure extraction code: they
//! own sheet loading, snapshot lifetime and the blocking-thread hand-off.

pub mod timetable;

pub use timetable::{GridImport, SheetSnapshot, SnapshotInfo, TimetableService};
