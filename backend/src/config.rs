//! Service configuration.
//!
//! Settings come from a TOML file, then selected environment variables
//! override individual values. Every table is optional:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! cors_origins = ["http://localhost:5173"]
//!
//! [sheet]
//! path = "14.04 - 18.04-1.xlsx"
//! reload = "per_request"   # or "cached"
//!
//! [roster]
//! groups = ["ИСИП-118", "ТН-101"]
//!
//! [layout]
//! anchor_date = "2025-04-14"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ErrorContext, TimetableError, TimetableResult};
use crate::extract::{GridLayout, SheetLayout};
use crate::roster::{StaticRoster, DEFAULT_GROUPS};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "TIMETABLE_CONFIG";

/// Sheet file of the source deployment.
pub const DEFAULT_SHEET_PATH: &str = "14.04 - 18.04-1.xlsx";

/// When the service reloads its sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadPolicy {
    /// Load the sheet fresh for every query.
    #[default]
    PerRequest,
    /// Keep the snapshot until an explicit refresh.
    Cached,
}

impl FromStr for ReloadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per_request" | "per-request" | "always" => Ok(Self::PerRequest),
            "cached" | "cache" => Ok(Self::Cached),
            _ => Err(format!("Unknown reload policy: {}", s)),
        }
    }
}

/// Full service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub sheet: SheetSettings,
    #[serde(default)]
    pub roster: RosterSettings,
    #[serde(default)]
    pub layout: SheetLayout,
    #[serde(default)]
    pub grid: GridLayout,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Where the timetable sheet lives and how often it is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSettings {
    #[serde(default = "default_sheet_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub reload: ReloadPolicy,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            path: default_sheet_path(),
            reload: ReloadPolicy::default(),
        }
    }
}

/// Groups used for the "all" fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSettings {
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            groups: default_groups(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_sheet_path() -> PathBuf {
    PathBuf::from(DEFAULT_SHEET_PATH)
}

fn default_groups() -> Vec<String> {
    DEFAULT_GROUPS.iter().map(|g| g.to_string()).collect()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// `ConfigurationError` if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TimetableResult<Self> {
        let path = path.as_ref();
        let context = || ErrorContext::new("load_config").with_source(path.display());

        let content = fs::read_to_string(path).map_err(|e| TimetableError::ConfigurationError {
            message: format!("Failed to read config file: {}", e),
            context: context(),
        })?;

        toml::from_str(&content).map_err(|e| TimetableError::ConfigurationError {
            message: format!("Failed to parse config file: {}", e),
            context: context(),
        })
    }

    /// Locate the configuration file.
    ///
    /// Uses `TIMETABLE_CONFIG` when set, otherwise the first existing of
    /// `timetable.toml`, `backend/timetable.toml` and `../timetable.toml`.
    pub fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        [
            "timetable.toml",
            "backend/timetable.toml",
            "../timetable.toml",
        ]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
    }

    /// Load the configuration file if one is found, else built-in defaults,
    /// then apply environment overrides.
    pub fn load() -> TimetableResult<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the environment.
    ///
    /// # Environment Variables
    /// - `HOST`: listener host
    /// - `PORT`: listener port
    /// - `TIMETABLE_SHEET`: path to the timetable sheet
    /// - `TIMETABLE_RELOAD`: `per_request` | `cached`
    pub fn apply_env_overrides(&mut self) -> TimetableResult<()> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| TimetableError::configuration("PORT must be a valid port number"))?;
        }
        if let Ok(path) = env::var("TIMETABLE_SHEET") {
            self.sheet.path = PathBuf::from(path);
        }
        if let Ok(reload) = env::var("TIMETABLE_RELOAD") {
            self.sheet.reload = reload.parse().map_err(TimetableError::configuration)?;
        }
        Ok(())
    }

    /// Reject settings the extractor cannot work with.
    pub fn validate(&self) -> TimetableResult<()> {
        if self.layout.slot_times.is_empty() {
            return Err(TimetableError::configuration(
                "layout.slot_times must list at least one slot",
            ));
        }
        if self.layout.session_marker.is_empty() {
            return Err(TimetableError::configuration(
                "layout.session_marker must not be empty",
            ));
        }
        if self.grid.column_stride == 0 || self.grid.day_count == 0 {
            return Err(TimetableError::configuration(
                "grid.column_stride and grid.day_count must be positive",
            ));
        }
        Ok(())
    }

    /// Roster built from the `[roster]` table.
    pub fn roster(&self) -> StaticRoster {
        StaticRoster::new(self.roster.groups.iter().cloned())
    }

    /// Listener address as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
