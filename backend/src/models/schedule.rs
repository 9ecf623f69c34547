//! Normalized timetable types produced by the extractor.
//!
//! These are the shapes returned to callers and serialized over the HTTP API:
//!
//! ```text
//! single group  {"group": "...", "schedule": [{"date": "2025-04-14", "sessions": [...]}]}
//! not found     {"group": "...", "schedule": [], "error": "Group ... not found"}
//! all groups    {"schedule": {"<group>": [...], ...}}
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Path segment / selector value meaning "every roster group".
pub const ALL_GROUPS_SENTINEL: &str = "all";

/// One class period of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Fixed slot string, e.g. `09:00-10:30`
    pub time: String,
    pub subject: String,
    pub teacher: String,
    pub cabinet: String,
}

/// All recorded sessions of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub sessions: Vec<SessionRecord>,
}

/// Extraction result for a single group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSchedule {
    pub group: String,
    #[serde(rename = "schedule")]
    pub days: Vec<DaySchedule>,
}

impl GroupSchedule {
    /// Total number of sessions across all days.
    pub fn session_count(&self) -> usize {
        self.days.iter().map(|d| d.sessions.len()).sum()
    }
}

/// Extraction result for every roster group, in roster order.
///
/// Serializes as a JSON object keyed by group name; key order follows the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllGroupsSchedule {
    groups: Vec<(String, Vec<DaySchedule>)>,
}

impl AllGroupsSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group. A repeated name replaces the earlier entry in place.
    pub fn insert(&mut self, group: impl Into<String>, days: Vec<DaySchedule>) {
        let group = group.into();
        match self.groups.iter_mut().find(|(name, _)| *name == group) {
            Some(entry) => entry.1 = days,
            None => self.groups.push((group, days)),
        }
    }

    pub fn get(&self, group: &str) -> Option<&[DaySchedule]> {
        self.groups
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, days)| days.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for AllGroupsSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (name, days) in &self.groups {
            map.serialize_entry(name, days)?;
        }
        map.end()
    }
}

/// Outcome of a timetable query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleQueryResult {
    /// The requested group was found (possibly with zero days).
    Group(GroupSchedule),
    /// The requested group is not present in the header row.
    NotFound { group: String, message: String },
    /// Fan-out over the whole roster.
    All(AllGroupsSchedule),
}

impl ScheduleQueryResult {
    pub fn not_found(group: impl Into<String>) -> Self {
        let group = group.into();
        let message = format!("Group {} not found", group);
        Self::NotFound { group, message }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Days of a single-group result; empty for not-found and fan-out results.
    pub fn days(&self) -> &[DaySchedule] {
        match self {
            Self::Group(schedule) => &schedule.days,
            _ => &[],
        }
    }
}

impl Serialize for ScheduleQueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Group(schedule) => schedule.serialize(serializer),
            Self::NotFound { group, message } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("group", group)?;
                map.serialize_entry("schedule", &[] as &[DaySchedule])?;
                map.serialize_entry("error", message)?;
                map.end()
            }
            Self::All(all) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("schedule", all)?;
                map.end()
            }
        }
    }
}

/// Which group(s) a query targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupSelector {
    All,
    Group(String),
}

impl GroupSelector {
    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }
}

impl FromStr for GroupSelector {
    type Err = Infallible;

    /// Only the exact sentinel `all` selects the roster; anything else is a group name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL_GROUPS_SENTINEL {
            Self::All
        } else {
            Self::Group(s.to_string())
        })
    }
}

impl From<&str> for GroupSelector {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(selector) => selector,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for GroupSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", ALL_GROUPS_SENTINEL),
            Self::Group(name) => write!(f, "{}", name),
        }
    }
}
