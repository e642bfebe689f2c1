// src/specs/view.rs
// Classify which record view a captured page is showing. The URL path is the
// cheapest, most reliable signal; DOM markers are the fallback for
// single-page navigation where the path lags the rendered view. The check
// order is load-bearing: it resolves ambiguous pages such as a contact-like
// URL with opportunity widgets embedded.

use crate::core::html::{any_attr_contains, to_lower};
use crate::page::Page;
use crate::records::View;

pub fn detect_view(page: &Page) -> View {
    let path = to_lower(page.url_path());
    if path.contains("opportunit") {
        return View::Opportunities;
    }
    if path.contains("task") {
        return View::Tasks;
    }
    if path.contains("contact") || path.contains("lead") {
        return View::Contacts;
    }

    let doc = page.document();
    if any_attr_contains(doc, "data-testid", "opportunity")
        || any_attr_contains(doc, "data-test", "opportunity")
    {
        return View::Opportunities;
    }
    if any_attr_contains(doc, "data-testid", "task") || any_attr_contains(doc, "data-test", "task") {
        return View::Tasks;
    }
    if any_attr_contains(doc, "data-testid", "contact") || any_attr_contains(doc, "data-test", "lead")
    {
        return View::Contacts;
    }
    View::Unknown
}
