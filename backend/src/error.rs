//! Error types for timetable loading and extraction.
//!
//! Every error carries an [`ErrorContext`] naming the operation and the sheet
//! source involved, so a load failure surfaced at the HTTP boundary still says
//! which file and which step broke.

use std::fmt;

/// Result type for timetable operations
pub type TimetableResult<T> = Result<T, TimetableError>;

/// Structured context for timetable errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "load_sheet", "parse_weekly_grid")
    pub operation: Option<String>,
    /// The sheet source involved (file path or upload name)
    pub source: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the sheet source.
    pub fn with_source(mut self, source: impl ToString) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none() && self.source.is_none() && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref source) = self.source {
            parts.push(format!("source={}", source));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for timetable operations
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// The sheet source is missing, unreadable or corrupt.
    /// Fatal for the request; never retried locally.
    #[error("Load failure: {message} {context}")]
    LoadFailure {
        message: String,
        context: ErrorContext,
    },

    /// The source has a file format no loader understands.
    #[error("Unsupported format: {message} {context}")]
    UnsupportedFormat {
        message: String,
        context: ErrorContext,
    },

    /// A strict layout parser found cells it cannot interpret.
    #[error("Invalid layout: {message} {context}")]
    InvalidLayout {
        message: String,
        context: ErrorContext,
    },

    /// Configuration file or environment error.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl TimetableError {
    /// Create a load failure.
    pub fn load(message: impl Into<String>) -> Self {
        Self::LoadFailure {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a load failure with context.
    pub fn load_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::LoadFailure {
            message: message.into(),
            context,
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an invalid layout error.
    pub fn invalid_layout(message: impl Into<String>) -> Self {
        Self::InvalidLayout {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error with context.
    pub fn internal_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InternalError {
            message: message.into(),
            context,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::LoadFailure { context, .. }
            | Self::UnsupportedFormat { context, .. }
            | Self::InvalidLayout { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::LoadFailure { context, .. }
            | Self::UnsupportedFormat { context, .. }
            | Self::InvalidLayout { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add or update the source in the error context.
    pub fn with_source(mut self, source: impl ToString) -> Self {
        self.context_mut().source = Some(source.to_string());
        self
    }

    /// Whether the caller sent something unusable (as opposed to a server-side fault).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. } | Self::InvalidLayout { .. }
        )
    }
}

impl From<calamine::Error> for TimetableError {
    fn from(err: calamine::Error) -> Self {
        TimetableError::load_with_context(
            err.to_string(),
            ErrorContext::default().with_details("workbook"),
        )
    }
}

impl From<csv::Error> for TimetableError {
    fn from(err: csv::Error) -> Self {
        TimetableError::load_with_context(
            err.to_string(),
            ErrorContext::default().with_details("csv"),
        )
    }
}

impl From<std::io::Error> for TimetableError {
    fn from(err: std::io::Error) -> Self {
        TimetableError::load(err.to_string())
    }
}
