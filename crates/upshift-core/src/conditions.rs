//! Condition inspection
//!
//! Conditions arrive on the wire as arrays of `{type, status, reason,
//! message}` records, unique per type within their owning collection. They
//! are held here as an insertion-ordered map keyed by type, so lookups are
//! O(1) while the wire format round-trips unchanged.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Condition type carried by every conditional update.
pub const RECOMMENDED: &str = "Recommended";

/// Tri-state condition status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionStatus::True => f.write_str("True"),
            ConditionStatus::False => f.write_str("False"),
            ConditionStatus::Unknown => f.write_str("Unknown"),
        }
    }
}

/// A single reported condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,

    #[serde(default)]
    pub status: ConditionStatus,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Set by the reporting controller; tolerated, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl Condition {
    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    pub fn is_false(&self) -> bool {
        self.status == ConditionStatus::False
    }

    /// Message with continuation lines indented two spaces for block display.
    pub fn indented_message(&self) -> String {
        self.message.replace('\n', "\n  ")
    }

    /// The two-line reason/message block used across operator-facing output.
    pub fn reason_message_block(&self) -> String {
        format!("  Reason: {}\n  Message: {}", self.reason, self.indented_message())
    }
}

/// Cluster-level condition types this tool interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterConditionType {
    /// The cluster version object itself is invalid.
    Invalid,
    /// An operator error is blocking updates.
    Degraded,
    /// An update is underway.
    Progressing,
    /// Whether future updates are currently advisable.
    Upgradeable,
    /// Whether the recommendation list could be refreshed.
    RetrievedUpdates,
}

impl ClusterConditionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ClusterConditionType::Invalid => "Invalid",
            ClusterConditionType::Degraded => "Degraded",
            ClusterConditionType::Progressing => "Progressing",
            ClusterConditionType::Upgradeable => "Upgradeable",
            ClusterConditionType::RetrievedUpdates => "RetrievedUpdates",
        }
    }
}

/// Insertion-ordered conditions keyed by type.
///
/// Duplicate types on input keep the first entry, which preserves the
/// first-match semantics of scanning the wire array.
#[derive(Debug, Clone, Default)]
pub struct Conditions(IndexMap<String, Condition>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact key lookup.
    pub fn find(&self, condition_type: &str) -> Option<&Condition> {
        self.0.get(condition_type)
    }

    /// Lookup by a known cluster-level type.
    pub fn get(&self, condition_type: ClusterConditionType) -> Option<&Condition> {
        self.find(condition_type.as_str())
    }

    /// Insert a condition; an existing entry of the same type is kept.
    pub fn insert(&mut self, condition: Condition) {
        self.0.entry(condition.condition_type.clone()).or_insert(condition);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.0.values()
    }
}

impl FromIterator<Condition> for Conditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for condition in iter {
            conditions.insert(condition);
        }
        conditions
    }
}

impl From<Vec<Condition>> for Conditions {
    fn from(conditions: Vec<Condition>) -> Self {
        conditions.into_iter().collect()
    }
}

impl PartialEq for Conditions {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Serialize for Conditions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.values())
    }
}

impl<'de> Deserialize<'de> for Conditions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let conditions = Vec::<Condition>::deserialize(deserializer)?;
        Ok(conditions.into())
    }
}
