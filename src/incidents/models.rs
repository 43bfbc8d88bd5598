//! Incident data model
//!
//! Field names follow the XSOAR JSON wire format. Fields the model does not
//! know about are kept in [`Incident::extra`] so nothing returned by the
//! server is lost.

use crate::pagination::{Page, PageRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Severity
// ============================================================================

/// Incident severity, sent as an integer on the wire.
///
/// Integers outside `0..=5` are kept as [`Severity::Other`] and written back
/// unchanged. Equality, hashing and ordering follow the integer value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Severity {
    #[default]
    Unknown,
    Info,
    Low,
    Medium,
    High,
    Critical,
    /// A value this client does not know the name of
    Other(i64),
}

impl Severity {
    /// All named severities from lowest to highest
    pub const ALL: [Severity; 6] = [
        Severity::Unknown,
        Severity::Info,
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Integer value used by the API
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Info => 1,
            Self::Low => 2,
            Self::Medium => 3,
            Self::High => 4,
            Self::Critical => 5,
            Self::Other(value) => value,
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
            Self::Unknown | Self::Other(_) => "Unknown",
        }
    }
}

impl From<i64> for Severity {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Unknown,
            1 => Self::Info,
            2 => Self::Low,
            3 => Self::Medium,
            4 => Self::High,
            5 => Self::Critical,
            other => Self::Other(other),
        }
    }
}

impl From<Severity> for i64 {
    fn from(severity: Severity) -> Self {
        severity.as_i64()
    }
}

impl PartialEq for Severity {
    fn eq(&self, other: &Self) -> bool {
        self.as_i64() == other.as_i64()
    }
}

impl Eq for Severity {}

impl std::hash::Hash for Severity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_i64().hash(state);
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_i64().cmp(&other.as_i64())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    /// Accepts a display name (any case) or the integer value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i64>() {
            return Ok(Self::from(value));
        }
        Self::ALL
            .into_iter()
            .find(|sev| sev.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown severity: {s}"))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Incident lifecycle status.
///
/// Any status string the server sends decodes; names outside the known set
/// (including an empty string) are kept verbatim in [`IncidentStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentStatus {
    Active,
    Pending,
    Done,
    Archive,
    /// A status this client does not model
    Other(String),
}

impl IncidentStatus {
    /// Wire name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Done => "Done",
            Self::Archive => "Archive",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for IncidentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Active" => Self::Active,
            "Pending" => Self::Pending,
            "Done" => Self::Done,
            "Archive" => Self::Archive,
            _ => Self::Other(raw),
        }
    }
}

impl From<IncidentStatus> for String {
    fn from(status: IncidentStatus) -> Self {
        match status {
            IncidentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = String;

    /// Strict parse for user input; only the known statuses are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "done" | "closed" => Ok(Self::Done),
            "archive" | "archived" => Ok(Self::Archive),
            other => Err(format!("unknown incident status: {other}")),
        }
    }
}

// ============================================================================
// Incident
// ============================================================================

/// A typed key/value tag attached to an incident
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "type", default)]
    pub label_type: String,
    #[serde(default)]
    pub value: String,
}

impl Label {
    /// Create a label
    pub fn new(label_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label_type: label_type.into(),
            value: value.into(),
        }
    }
}

/// An XSOAR incident
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub incident_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    #[serde(rename = "playbookId", default, skip_serializing_if = "Option::is_none")]
    pub playbook_id: Option<String>,

    #[serde(rename = "investigationId", default, skip_serializing_if = "Option::is_none")]
    pub investigation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub labels: Vec<Label>,

    /// Customer-defined incident fields
    #[serde(
        rename = "CustomFields",
        default,
        skip_serializing_if = "Map::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub custom_fields: Map<String, Value>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Incident {
    /// Check if the incident has been closed
    pub fn is_closed(&self) -> bool {
        matches!(self.status, Some(IncidentStatus::Done | IncidentStatus::Archive))
    }

    /// Look up a custom field
    pub fn custom_field(&self, name: &str) -> Option<&Value> {
        self.custom_fields.get(name)
    }
}

/// XSOAR sends `null` for empty lists and maps
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of incident search results
pub type IncidentPage = Page<Incident>;

// ============================================================================
// Search
// ============================================================================

/// Search criteria for incidents. Empty fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentFilter {
    /// Lucene-style query string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<IncidentStatus>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub severity: Vec<Severity>,

    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub incident_type: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner: Vec<String>,

    /// Only incidents created after this time
    #[serde(rename = "fromDate", default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<DateTime<Utc>>,

    /// Only incidents created before this time
    #[serde(rename = "toDate", default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<DateTime<Utc>>,
}

impl IncidentFilter {
    /// Create an empty filter (matches every incident)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query string
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Add a status
    #[must_use]
    pub fn status(mut self, status: IncidentStatus) -> Self {
        self.status.push(status);
        self
    }

    /// Add a severity
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity.push(severity);
        self
    }

    /// Add an incident type
    #[must_use]
    pub fn incident_type(mut self, incident_type: impl Into<String>) -> Self {
        self.incident_type.push(incident_type.into());
        self
    }

    /// Add an owner
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner.push(owner.into());
        self
    }

    /// Restrict creation time to a range
    #[must_use]
    pub fn created_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.from_date = from;
        self.to_date = to;
        self
    }
}

/// Body of `POST /incidents/search`
#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub filter: &'a IncidentFilter,
    #[serde(flatten)]
    pub page: PageRequest,
}

// ============================================================================
// Mutations
// ============================================================================

/// Data for a new incident. `name` and `incident_type` are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateIncidentRequest {
    pub name: String,

    #[serde(rename = "type")]
    pub incident_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,

    #[serde(rename = "CustomFields", default, skip_serializing_if = "Map::is_empty")]
    pub custom_fields: Map<String, Value>,

    #[serde(rename = "createDate", default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<DateTime<Utc>>,
}

impl CreateIncidentRequest {
    /// Create a request with the required fields
    pub fn new(name: impl Into<String>, incident_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            incident_type: incident_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    #[must_use]
    pub fn custom_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_fields.insert(name.into(), value.into());
        self
    }
}

/// Fields to change on an incident. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateIncidentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "CustomFields", default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
}

impl UpdateIncidentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: IncidentStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn custom_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_fields
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    /// Check if no field is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Body of `POST /incident/update`
#[derive(Debug, Serialize)]
pub(crate) struct UpdateBody<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub fields: &'a UpdateIncidentRequest,
}

/// How an incident was resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseIncidentRequest {
    #[serde(rename = "closeReason", default)]
    pub reason: String,

    #[serde(rename = "closeNotes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CloseIncidentRequest {
    /// Close with a reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            notes: None,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Body of `POST /incident/close`
#[derive(Debug, Serialize)]
pub(crate) struct CloseBody<'a> {
    pub id: &'a str,
    pub status: IncidentStatus,
    #[serde(rename = "closeReason")]
    pub reason: &'a str,
    #[serde(rename = "closeNotes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}

impl<'a> CloseBody<'a> {
    pub fn new(id: &'a str, request: &'a CloseIncidentRequest) -> Self {
        Self {
            id,
            status: IncidentStatus::Done,
            reason: &request.reason,
            notes: request.notes.as_deref().filter(|n| !n.is_empty()),
        }
    }
}

/// Body of `POST /incident/batchDelete`
#[derive(Debug, Serialize)]
pub(crate) struct DeleteBody<'a> {
    pub ids: [&'a str; 1],
}
