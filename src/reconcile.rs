// src/reconcile.rs
// Merge/staleness arbitration: fold one extraction snapshot into the
// persisted dataset. This module is the only producer of new Datasets;
// everything else treats them as read-only.

use std::collections::HashMap;

use crate::records::{Dataset, ExtractionSnapshot, RecordKind};

pub struct MergeOutcome {
    pub data: Dataset,
    /// True when no record was added or changed — a signal channel for
    /// callers that want to tell a no-op from an update, not a rejection.
    pub skipped: bool,
}

/// Overlay `incoming` onto `current` by record id, per type:
/// - existing order is kept; id collisions are replaced in place (incoming
///   always wins), new ids append in incoming order;
/// - types absent from the snapshot are left untouched — absence means
///   "no observation", never "observed empty";
/// - `lastSync` only moves forward, even for out-of-order snapshots, and the
///   merge itself is never rejected on timestamp grounds.
pub fn merge(current: &Dataset, incoming: &ExtractionSnapshot) -> MergeOutcome {
    let mut data = current.clone();
    let mut changed = false;

    if let Some(list) = &incoming.contacts {
        changed |= overlay(&mut data.contacts, list, |c| c.id.as_str());
    }
    if let Some(list) = &incoming.opportunities {
        changed |= overlay(&mut data.opportunities, list, |o| o.id.as_str());
    }
    if let Some(list) = &incoming.tasks {
        changed |= overlay(&mut data.tasks, list, |t| t.id.as_str());
    }

    data.last_sync = current.last_sync.max(incoming.timestamp);

    MergeOutcome { data, skipped: !changed }
}

fn overlay<T, F>(existing: &mut Vec<T>, incoming: &[T], id_of: F) -> bool
where
    T: Clone + PartialEq,
    F: Fn(&T) -> &str,
{
    let mut index: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, rec)| (id_of(rec).to_string(), i))
        .collect();

    let mut changed = false;
    for rec in incoming {
        match index.get(id_of(rec)) {
            Some(&i) => {
                if existing[i] != *rec {
                    existing[i] = rec.clone();
                    changed = true;
                }
            }
            None => {
                index.insert(id_of(rec).to_string(), existing.len());
                existing.push(rec.clone());
                changed = true;
            }
        }
    }
    changed
}

/// Remove one record by (type, id). Unconditional and idempotent: a missing
/// id is a no-op that still advances `lastSync`, and a later snapshot that
/// observes the record again simply re-inserts it — deletes are not sticky.
pub fn delete_record(current: &Dataset, kind: RecordKind, id: &str, now_ms: i64) -> Dataset {
    let mut data = current.clone();
    match kind {
        RecordKind::Contacts => data.contacts.retain(|c| c.id != id),
        RecordKind::Opportunities => data.opportunities.retain(|o| o.id != id),
        RecordKind::Tasks => data.tasks.retain(|t| t.id != id),
    }
    data.last_sync = data.last_sync.max(now_ms);
    data
}
