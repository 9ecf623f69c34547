//! Group roster used by the "all groups" fan-out.

use serde::{Deserialize, Serialize};

/// Groups of the source timetable, in publication order.
pub const DEFAULT_GROUPS: [&str; 23] = [
    "ИСИП-118",
    "ТН-101",
    "Э-114",
    "ОДЛ-120",
    "ЮР-146",
    "ПН-101",
    "ИСИП-213",
    "ИСИП-215",
    "ИСИПу-216",
    "ИСИП-306",
    "ИСИП-309",
    "ИСИП-414(314)",
    "ИСИП-402",
    "ИСИП-403",
    "ЗУ-201",
    "Э-213",
    "ОДЛу-116(216)",
    "ОДЛу-119(219)",
    "ОДЛ-313(213)",
    "ПСОу-145(245)",
    "ПСА-201",
    "ПСО-328(238)",
    "ПСО-339(239)",
];

/// Supplies the ordered list of valid group names.
pub trait RosterProvider: Send + Sync {
    fn groups(&self) -> &[String];
}

/// Fixed roster, typically read from the `[roster]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRoster {
    groups: Vec<String>,
}

impl StaticRoster {
    /// Build a roster, dropping blank names and repeats while keeping order.
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for group in groups {
            let group = group.into().trim().to_string();
            if !group.is_empty() && !unique.contains(&group) {
                unique.push(group);
            }
        }
        Self { groups: unique }
    }
}

impl Default for StaticRoster {
    fn default() -> Self {
        Self::new(DEFAULT_GROUPS)
    }
}

impl RosterProvider for StaticRoster {
    fn groups(&self) -> &[String] {
        &self.groups
    }
}
