// src/runner.rs
// Top-level trigger entry points: run one extraction end to end, or delete a
// single stored record. Each call reads the latest persisted dataset
// immediately before mutating it; merges are last-writer-wins and there is no
// cross-process lock (accepted weak consistency under racing triggers).

use std::io;
use std::path::Path;

use chrono::Utc;
use thiserror::Error;

use crate::indicator::Indicator;
use crate::page::Page;
use crate::reconcile;
use crate::records::{Dataset, RecordKind, View};
use crate::snapshot::build_snapshot;
use crate::store;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The capture could not be read. Carries the last persisted dataset so a
    /// caller can still render something.
    #[error("cannot read page capture: {message}")]
    PageAccess {
        message: String,
        fallback: Option<Dataset>,
    },

    /// The store failed to load or save; the persisted dataset is unchanged.
    #[error("store failure: {0}")]
    Store(#[from] io::Error),
}

#[derive(Debug)]
pub struct ExtractOutcome {
    pub data: Dataset,
    pub view: View,
    /// True when the snapshot changed nothing (every record already matched).
    pub skipped: bool,
}

/// Scrape one page capture and fold it into the store.
pub fn run_extraction(
    page_file: &Path,
    url_path: Option<&str>,
    mut indicator: Option<&mut dyn Indicator>,
) -> Result<ExtractOutcome, ExtractError> {
    if let Some(i) = indicator.as_deref_mut() {
        i.running("Extracting…");
    }

    match extract_inner(page_file, url_path) {
        Ok(out) => {
            if let Some(i) = indicator.as_deref_mut() {
                i.success(if out.skipped { "Skipped (no changes)" } else { "Saved" });
            }
            logf!(
                "extracted {} as {} view, skipped={}",
                page_file.display(),
                out.view.as_str(),
                out.skipped
            );
            Ok(out)
        }
        Err(e) => {
            if let Some(i) = indicator.as_deref_mut() {
                i.error(&e.to_string());
            }
            loge!("extraction failed: {e}");
            Err(e)
        }
    }
}

fn extract_inner(page_file: &Path, url_path: Option<&str>) -> Result<ExtractOutcome, ExtractError> {
    let page = match Page::from_file(page_file, url_path) {
        Ok(p) => p,
        Err(e) => {
            // The page went away; hand back whatever the store last saw.
            return Err(ExtractError::PageAccess {
                message: e.to_string(),
                fallback: store::load().ok(),
            });
        }
    };

    let snapshot = build_snapshot(&page);
    let current = store::load()?;
    let merged = reconcile::merge(&current, &snapshot);
    store::save(&merged.data)?;

    Ok(ExtractOutcome {
        data: merged.data,
        view: snapshot.view,
        skipped: merged.skipped,
    })
}

/// Remove one record by (type, id) and persist. Idempotent; always advances
/// the last-sync stamp.
pub fn run_delete(kind: RecordKind, id: &str) -> Result<Dataset, ExtractError> {
    let current = store::load()?;
    let next = reconcile::delete_record(&current, kind, id, Utc::now().timestamp_millis());
    store::save(&next)?;
    logf!("deleted {} {id}", kind.as_str());
    Ok(next)
}
