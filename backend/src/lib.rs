//! # Timetable Backend
//!
//! University timetable extraction service.
//!
//! This crate reads a spreadsheet of weekly class schedules, locates the column
//! belonging to a student group, and rebuilds a normalized, date-ordered list of
//! daily sessions. The result is exposed as JSON over a REST API via Axum.
//!
//! ## Features
//!
//! - **Sheet Loading**: xlsx/xls/xlsb/ods workbooks via calamine, CSV via csv
//! - **Extraction**: per-group column scan with day-block detection
//! - **Roster Fan-out**: one query for every configured group
//! - **Weekly Grid Import**: strict parser for the groups-across workbook layout
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! - [`models`]: sheet grid and normalized timetable types
//! - [`extract`]: layout constants and the extraction algorithms
//! - [`io`]: sheet loaders and async sheet sources
//! - [`roster`]: group roster provider
//! - [`services`]: snapshot-owning timetable service
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod config;
pub mod error;
pub mod extract;
pub mod io;
pub mod models;
pub mod roster;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ErrorContext, TimetableError, TimetableResult};
