// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific extraction specs for the Close app. Each spec focuses on one
//! record view and encodes *where the ground truth lives in the rendered
//! markup* and *how to read it tolerantly*.
//!
//! ## What lives here
//! - **Pure HTML scanning** over captured documents, via `core::html` helpers
//!   (case-insensitive tag blocks, class-substring lookup, attribute/href
//!   harvesting) and minimal hand-rolled scanning where it improves resilience.
//! - **Marker choice & precedence** — primary markers first, secondary
//!   fallbacks accepted when the primary yields nothing.
//! - **Identity seeding** per row: embedded link target, then a composite of
//!   visible fields, then a positional seed.
//!
//! ## What does **not** live here
//! - Persistence and merging — that's `store` and `reconcile`.
//! - Export formatting — `export` reads the canonical dataset.
//!
//! ## Conventions & invariants
//! - Specs never fail: unrecognized markup yields fewer (or zero) records.
//! - Output order is document-encounter order; duplicates by id are dropped
//!   within a run, first occurrence wins.
//! - Specs are testable offline against captured fixtures (saved HTML).

pub mod contacts;
pub mod opportunities;
pub mod tasks;
pub mod view;
