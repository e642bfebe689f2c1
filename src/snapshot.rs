// src/snapshot.rs
// One extraction run: classify the view, run the matching spec(s), stamp the
// capture instant. Underlying specs never fail, so neither does this.

use chrono::Utc;

use crate::page::Page;
use crate::records::{ExtractionSnapshot, View};
use crate::specs::{contacts, opportunities, tasks, view::detect_view};

/// Build a snapshot of whatever the page shows, stamped with the current
/// instant.
pub fn build_snapshot(page: &Page) -> ExtractionSnapshot {
    build_snapshot_at(page, Utc::now().timestamp_millis())
}

/// Timestamp-injecting variant; the pipeline itself stays deterministic.
///
/// A recognized view populates only its own list. An unknown view scrapes
/// everything observable: all three lists come back `Some`, possibly empty,
/// so downstream code can tell "observed nothing" from "not observed".
pub fn build_snapshot_at(page: &Page, timestamp: i64) -> ExtractionSnapshot {
    let view = detect_view(page);
    let mut snapshot = ExtractionSnapshot::empty(view, timestamp);

    match view {
        View::Contacts => snapshot.contacts = Some(contacts::extract(page)),
        View::Opportunities => snapshot.opportunities = Some(opportunities::extract(page)),
        View::Tasks => snapshot.tasks = Some(tasks::extract(page)),
        View::Unknown => {
            snapshot.contacts = Some(contacts::extract(page));
            snapshot.opportunities = Some(opportunities::extract(page));
            snapshot.tasks = Some(tasks::extract(page));
        }
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_view_populates_only_its_list() {
        let page = Page::new("/contacts", "<html></html>");
        let snap = build_snapshot_at(&page, 7);
        assert_eq!(snap.view, View::Contacts);
        assert_eq!(snap.timestamp, 7);
        assert_eq!(snap.contacts, Some(vec![]));
        assert!(snap.opportunities.is_none());
        assert!(snap.tasks.is_none());
    }

    #[test]
    fn unknown_view_populates_all_three() {
        let page = Page::new("/app/home", "<html><body></body></html>");
        let snap = build_snapshot_at(&page, 7);
        assert_eq!(snap.view, View::Unknown);
        assert!(snap.contacts.is_some());
        assert!(snap.opportunities.is_some());
        assert!(snap.tasks.is_some());
    }
}
