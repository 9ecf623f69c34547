//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::TimetableService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Timetable service owning the sheet snapshot
    pub timetable: Arc<TimetableService>,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Arc<Vec<String>>,
}

impl AppState {
    /// Create a new application state with the given service.
    pub fn new(timetable: Arc<TimetableService>) -> Self {
        Self {
            timetable,
            cors_origins: Arc::new(Vec::new()),
        }
    }

    /// Restrict CORS to the given origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Arc::new(origins);
        self
    }
}
