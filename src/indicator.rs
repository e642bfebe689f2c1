// src/indicator.rs
/// Lightweight status reporting for extraction runs. Frontends implement this
/// to surface progress to users; it is a pure observer — nothing here feeds
/// back into extraction logic.
pub trait Indicator {
    /// An extraction run started; `status` is a human-readable line.
    fn running(&mut self, _status: &str) {}

    /// The run finished and the store reflects it.
    fn success(&mut self, _status: &str) {}

    /// The run failed; `status` carries the reason.
    fn error(&mut self, _status: &str) {}
}

/// A no-op indicator sink.
pub struct NullIndicator;
impl Indicator for NullIndicator {}
