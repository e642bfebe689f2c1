// src/page.rs
// A captured page: the URL path the app was showing plus its rendered HTML.
// This is the pipeline's only window onto the CRM; everything downstream
// reads it synchronously and never goes to the network.

use std::fs;
use std::io;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct Page {
    path: String,
    html: String,
}

impl Page {
    pub fn new(url_path: impl Into<String>, html: impl Into<String>) -> Self {
        Self { path: url_path.into(), html: html.into() }
    }

    /// Load a capture from disk. `url_path` is the app path the capture was
    /// taken on; when the caller doesn't know it, the file stem stands in so
    /// captures named e.g. `tasks.html` still classify by path.
    pub fn from_file(file: &Path, url_path: Option<&str>) -> io::Result<Self> {
        let html = fs::read_to_string(file)?;
        let path = match url_path {
            Some(p) => p.to_string(),
            None => file
                .file_stem()
                .map(|s| format!("/{}", s.to_string_lossy()))
                .unwrap_or_default(),
        };
        Ok(Self { path, html })
    }

    pub fn url_path(&self) -> &str {
        &self.path
    }

    pub fn document(&self) -> &str {
        &self.html
    }
}
