// src/config/options.rs
use std::path::{Path, PathBuf};

use super::consts::{DEFAULT_EXPORT_STEM, DEFAULT_OUT_DIR};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Json => "json" }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    out: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out: None,
        }
    }
}

impl ExportOptions {
    /// Resolve the destination file. A user path ending in a separator (or an
    /// existing directory) gets the default stem; the extension follows the
    /// format unless the user supplied one.
    pub fn out_path(&self) -> PathBuf {
        let ext = self.format.ext();
        match &self.out {
            None => PathBuf::from(DEFAULT_OUT_DIR).join(join!(DEFAULT_EXPORT_STEM, ".", ext)),
            Some(p) => {
                let hinted_dir = p.to_string_lossy().ends_with(['/', '\\']) || p.is_dir();
                if hinted_dir {
                    p.join(join!(DEFAULT_EXPORT_STEM, ".", ext))
                } else if p.extension().is_some() {
                    p.clone()
                } else {
                    p.with_extension(ext)
                }
            }
        }
    }

    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        if s.is_empty() {
            self.out = None;
        } else {
            self.out = Some(Path::new(s).to_path_buf());
        }
    }
}
