// src/specs/tasks.rs

use std::collections::HashSet;

use crate::core::html::{
    attr_value, block_text, has_attr, next_block_with_class_ci, next_div_with_class_ci,
    next_open_tag_ci, next_tag_block_ci,
};
use crate::core::ident::assign_identity;
use crate::core::sanitize::to_date_string;
use crate::page::Page;
use crate::records::Task;

/// A task renders either as an expanded inbox item or a collapsed one.
const ROW_MARKERS: [&str; 2] = ["InboxItemWrapper_container", "CollapsedItemLayout_compact_wrapper"];

/// Title/assignee text carries the UI-text typography class.
const UI_TEXT_SPAN: &str = "typography_uiText_0ad";
/// Collapsed rows keep the title in an ellipsis div instead.
const COMPACT_TITLE_DIV: &str = "CollapsedItemLayout_compact_ellipsis_a1b";
/// Expanded rows show the assignee inside the lead info box.
const ASSIGNEE_BOX: &str = "ExpandedItemLayout_leadInfoBox_e6b";

/// Scrape every task card on the page, in document order, unique by id.
/// Cards without a derivable title are dropped silently.
pub fn extract(page: &Page) -> Vec<Task> {
    let doc = page.document();
    let mut out = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    let mut pos = 0usize;
    let mut index = 0usize;
    while let Some((row_s, row_e)) = next_task_row(doc, pos) {
        let row = &doc[row_s..row_e];
        pos = row_e;

        let title = row_title(row);
        if title.is_empty() {
            index += 1;
            continue;
        }

        let assignee = row_assignee(row);
        let due_raw = row_due(row);
        let done = row_done(row);

        let seed = format!("task-{title}-{index}");
        index += 1;

        let id = assign_identity(Some(&seed)).into_string();
        if !seen.insert(id.clone()) {
            continue;
        }

        out.push(Task {
            id,
            description: title,
            assignee,
            due_date: to_date_string(&due_raw),
            done,
        });
    }

    out
}

/// Next card matching either row marker, whichever comes first in the
/// document. Scanning resumes after the returned block.
fn next_task_row(doc: &str, from: usize) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for marker in ROW_MARKERS {
        if let Some(span) = next_div_with_class_ci(doc, marker, from) {
            best = match best {
                Some(b) if b.0 <= span.0 => Some(b),
                _ => Some(span),
            };
        }
    }
    best
}

/// Primary: the first UI-text span. Secondary: the collapsed ellipsis div.
fn row_title(row: &str) -> String {
    if let Some((s, e)) = next_block_with_class_ci(row, "span", UI_TEXT_SPAN, 0) {
        let t = block_text(&row[s..e]);
        if !t.is_empty() {
            return t;
        }
    }
    if let Some((s, e)) = next_div_with_class_ci(row, COMPACT_TITLE_DIV, 0) {
        return block_text(&row[s..e]);
    }
    String::new()
}

/// Primary: the UI-text span inside the lead info box. Secondary: the first
/// UI-text span anywhere in the card (usually the title). Last resort:
/// "Unknown".
fn row_assignee(row: &str) -> String {
    if let Some((b_s, b_e)) = next_div_with_class_ci(row, ASSIGNEE_BOX, 0) {
        let info = &row[b_s..b_e];
        if let Some((s, e)) = next_block_with_class_ci(info, "span", UI_TEXT_SPAN, 0) {
            let t = block_text(&info[s..e]);
            if !t.is_empty() {
                return t;
            }
        }
    }
    // The first UI-text span is usually the title; the page reuses it.
    if let Some((s, e)) = next_block_with_class_ci(row, "span", UI_TEXT_SPAN, 0) {
        let t = block_text(&row[s..e]);
        if !t.is_empty() {
            return t;
        }
    }
    s!("Unknown")
}

/// Prefer the machine-readable `datetime` attribute; fall back to the
/// element's display text.
fn row_due(row: &str) -> String {
    let Some((s, e)) = next_tag_block_ci(row, "<time", "</time>", 0) else {
        return s!();
    };
    let block = &row[s..e];
    let open_end = block.find('>').map(|i| i + 1).unwrap_or(block.len());
    if let Some(dt) = attr_value(&block[..open_end], "datetime") {
        return dt;
    }
    block_text(block)
}

/// Completion state comes off the first checkbox in the card.
fn row_done(row: &str) -> bool {
    let mut pos = 0usize;
    while let Some((s, e)) = next_open_tag_ci(row, "<input", pos) {
        let tag = &row[s..e];
        if attr_value(tag, "type").is_some_and(|t| t.eq_ignore_ascii_case("checkbox")) {
            return has_attr(tag, "checked");
        }
        pos = e;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expanded_card(title: &str, assignee: &str, datetime: &str, checked: bool) -> String {
        let checked = if checked { " checked" } else { "" };
        format!(
            r#"<div class="InboxItemWrapper_container_c31">
                 <input type="checkbox"{checked}>
                 <span class="typography_uiText_0ad">{title}</span>
                 <div class="ExpandedItemLayout_leadInfoBox_e6b">
                   <span class="typography_uiText_0ad">{assignee}</span>
                 </div>
                 <time datetime="{datetime}">tomorrow</time>
               </div>"#
        )
    }

    #[test]
    fn scrapes_expanded_card() {
        let html = expanded_card("Call Jane", "Ann Agent", "2024-03-01", true);
        let page = Page::new("/tasks", html);
        let tasks = extract(&page);
        assert_eq!(tasks.len(), 1);
        let t = &tasks[0];
        assert_eq!(t.description, "Call Jane");
        assert_eq!(t.assignee, "Ann Agent");
        assert_eq!(t.due_date.as_deref(), Some("2024-03-01T00:00:00.000Z"));
        assert!(t.done);
    }

    #[test]
    fn collapsed_card_uses_ellipsis_title() {
        let html = r#"<div class="CollapsedItemLayout_compact_wrapper_b2c">
              <div class="CollapsedItemLayout_compact_ellipsis_a1b">Send quote</div>
            </div>"#;
        let page = Page::new("/tasks", html);
        let tasks = extract(&page);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "Send quote");
        assert_eq!(tasks[0].assignee, "Unknown");
        assert_eq!(tasks[0].due_date, None);
        assert!(!tasks[0].done);
    }

    #[test]
    fn untitled_card_is_dropped_but_consumes_an_index() {
        let untitled = r#"<div class="InboxItemWrapper_container_c31"><span class="typography_uiText_0ad"> </span></div>"#;
        let titled = expanded_card("Follow up", "Ann", "2024-03-02", false);
        let page_a = Page::new("/tasks", join!(untitled, &titled));
        let page_b = Page::new("/tasks", titled.as_str());
        let a = extract(&page_a);
        let b = extract(&page_b);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        // Positional seeds differ: index 1 vs index 0.
        assert_ne!(a[0].id, b[0].id);
    }

    #[test]
    fn assignee_falls_back_to_title_span() {
        let html = r#"<div class="InboxItemWrapper_container_c31">
              <span class="typography_uiText_0ad">Review deal</span>
            </div>"#;
        let page = Page::new("/tasks", html);
        let tasks = extract(&page);
        assert_eq!(tasks[0].assignee, "Review deal");
    }

    #[test]
    fn display_due_text_goes_through_date_parse() {
        let html = r#"<div class="InboxItemWrapper_container_c31">
              <span class="typography_uiText_0ad">Ping</span>
              <time>Mar 1, 2024</time>
            </div>"#;
        let page = Page::new("/tasks", html);
        let tasks = extract(&page);
        assert_eq!(tasks[0].due_date.as_deref(), Some("2024-03-01T00:00:00.000Z"));
        let html = r#"<div class="InboxItemWrapper_container_c31">
              <span class="typography_uiText_0ad">Ping</span>
              <time>whenever</time>
            </div>"#;
        let page = Page::new("/tasks", html);
        let tasks = extract(&page);
        assert_eq!(tasks[0].due_date, None);
    }

    #[test]
    fn same_page_twice_is_identical() {
        let html = join!(
            &expanded_card("A", "x", "2024-03-01", false),
            &expanded_card("B", "y", "2024-03-02", true),
        );
        let page = Page::new("/tasks", html);
        assert_eq!(extract(&page), extract(&page));
        assert_eq!(extract(&page).len(), 2);
    }
}
