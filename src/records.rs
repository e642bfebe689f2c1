// src/records.rs
// Canonical record shapes shared by the whole pipeline. All of these are plain
// value records once produced; only the reconciler builds new Datasets.
// Serialized field names stay camelCase so stored data matches the original
// on-disk shape.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    /// Display name of the associated lead; defaults to `name` when absent.
    pub lead: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub name: String,
    pub value: Option<f64>,
    pub confidence: String,
    pub status: String,
    /// ISO date or the page's display string; None when the cell was blank.
    pub close_date: Option<String>,
    pub user: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    pub assignee: String,
    pub due_date: Option<String>,
    pub done: bool,
}

/// Which record page is being observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Contacts,
    Opportunities,
    Tasks,
    Unknown,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Contacts => "contacts",
            View::Opportunities => "opportunities",
            View::Tasks => "tasks",
            View::Unknown => "unknown",
        }
    }
}

/// The three persisted record types; used to key deletes and exports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Contacts,
    Opportunities,
    Tasks,
}

impl RecordKind {
    pub fn parse(s: &str) -> Option<RecordKind> {
        match s.to_ascii_lowercase().as_str() {
            "contacts" | "contact" => Some(RecordKind::Contacts),
            "opportunities" | "opportunity" => Some(RecordKind::Opportunities),
            "tasks" | "task" => Some(RecordKind::Tasks),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Contacts => "contacts",
            RecordKind::Opportunities => "opportunities",
            RecordKind::Tasks => "tasks",
        }
    }
}

/// One extraction run's output. Per-type lists are optional containers:
/// `None` means "no observation this run", which is different from an
/// observed-empty `Some(vec![])`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractionSnapshot {
    pub view: View,
    /// Capture instant, Unix milliseconds.
    pub timestamp: i64,
    pub contacts: Option<Vec<Contact>>,
    pub opportunities: Option<Vec<Opportunity>>,
    pub tasks: Option<Vec<Task>>,
}

impl ExtractionSnapshot {
    pub fn empty(view: View, timestamp: i64) -> Self {
        Self { view, timestamp, contacts: None, opportunities: None, tasks: None }
    }
}

/// The single persisted aggregate. Records are unique by id within each list.
/// Missing fields in stored JSON deserialize to empty defaults, so an absent
/// or partial store reads as an empty dataset with `lastSync = 0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub contacts: Vec<Contact>,
    pub opportunities: Vec<Opportunity>,
    pub tasks: Vec<Task>,
    /// Instant of last accepted merge or delete, Unix milliseconds.
    pub last_sync: i64,
}

impl Dataset {
    pub fn record_count(&self) -> usize {
        self.contacts.len() + self.opportunities.len() + self.tasks.len()
    }

    pub fn count_of(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Contacts => self.contacts.len(),
            RecordKind::Opportunities => self.opportunities.len(),
            RecordKind::Tasks => self.tasks.len(),
        }
    }
}
