// src/core/html.rs
// Low-level HTML string scanning helpers.
// These are deliberately naive but tailored to the Close app's rendered markup.
// They operate case-insensitively on ASCII tag/attribute names.

use crate::core::sanitize::{normalize_entities, normalize_ws};

/// Fast ASCII-only lowercasing for tag/attribute matching.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Find the section between an opening tag (with attributes) and its matching
/// closing tag, case-insensitive on the tag name and attributes.
/// Returns the HTML *inside* the opening/closing tags.
///
/// Example:
/// ```text
/// let body = slice_between_ci(html, r#"<tbody class="DataTable_body"#, "</tbody>");
/// ```
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_pat);
    let close_lc = to_lower(close_pat);

    let open_idx = lc.find(&open_lc)?;
    // Jump past the '>' of the opening tag
    let after_open = s[open_idx..].find('>')? + open_idx + 1;
    let close_idx_rel = lc[after_open..].find(&close_lc)?;
    Some(&s[after_open..after_open + close_idx_rel])
}

/// Find the next complete tag block from `from` onwards, case-insensitive.
/// A block is from the start of the opening tag to the end of the closing tag.
/// The closing-tag match is naive; fine for `<tr>`/`<td>`/`<table>` which do
/// not nest in this markup. Use [`next_div_with_class_ci`] for divs.
pub fn next_tag_block_ci(s: &str, open_tag: &str, close_tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_tag);
    let close_lc = to_lower(close_tag);

    let start = lc.get(from..)?.find(&open_lc)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&close_lc)?;
    let end = open_end + end_rel + close_tag.len();
    Some((start, end))
}

/// Find the next standalone open tag (e.g. `<input …>`), returning the span of
/// the tag itself. Requires a delimiter after the tag name so `<a` does not
/// match `<article>`.
pub fn next_open_tag_ci(s: &str, open_tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_tag);

    let mut pos = from;
    loop {
        let start = lc.get(pos..)?.find(&open_lc)? + pos;
        let after = lc.as_bytes().get(start + open_lc.len());
        let boundary = matches!(after, Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/'));
        if boundary {
            let end = s[start..].find('>')? + start + 1;
            return Some((start, end));
        }
        pos = start + open_lc.len();
    }
}

/// Find the next block of `tag` whose class attribute contains `class_sub`.
/// Closing-tag match is naive (first close wins), like [`next_tag_block_ci`].
pub fn next_block_with_class_ci(s: &str, tag: &str, class_sub: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let open_lc = join!("<", &to_lower(tag));
    let close_lc = join!("</", &to_lower(tag), ">");
    let sub_lc = to_lower(class_sub);

    let mut pos = from;
    loop {
        let start = lc.get(pos..)?.find(&open_lc)? + pos;
        let open_end = s[start..].find('>')? + start + 1;
        let open = &s[start..open_end];
        let class_ok = attr_value(open, "class")
            .map(|v| to_lower(&v).contains(&sub_lc))
            .unwrap_or(false);
        if class_ok {
            let end_rel = lc[open_end..].find(&close_lc)?;
            return Some((start, open_end + end_rel + close_lc.len()));
        }
        pos = start + open_lc.len();
    }
}

/// Depth-aware variant for `<div>` blocks, which nest heavily in this markup:
/// finds the next div whose class contains `class_sub` and walks open/close
/// pairs to its matching `</div>`.
pub fn next_div_with_class_ci(s: &str, class_sub: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let sub_lc = to_lower(class_sub);

    let mut pos = from;
    loop {
        let start = lc.get(pos..)?.find("<div")? + pos;
        let after = lc.as_bytes().get(start + 4);
        if !matches!(after, Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/')) {
            pos = start + 4;
            continue;
        }
        let open_end = s[start..].find('>')? + start + 1;
        let open = &s[start..open_end];
        let class_ok = attr_value(open, "class")
            .map(|v| to_lower(&v).contains(&sub_lc))
            .unwrap_or(false);
        if !class_ok {
            pos = start + 4;
            continue;
        }

        // Walk nested opens/closes until this div's own close.
        let mut depth = 1usize;
        let mut scan = open_end;
        while depth > 0 {
            let next_open = lc[scan..].find("<div");
            let next_close = lc[scan..].find("</div>");
            match (next_open, next_close) {
                (Some(o), Some(c)) if o < c => { depth += 1; scan += o + 4; }
                (_, Some(c)) => { depth -= 1; scan += c + 6; }
                _ => return None, // unbalanced markup; treat as not found
            }
        }
        return Some((start, scan));
    }
}

/// Given a complete tag block like `<td ...>INNER</td>`,
/// return the INNER text without the wrapping tags (still may contain nested tags).
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return block[open_end + 1..close_start].to_string();
            }
        }
    }
    String::new()
}

/// Remove all HTML tags `<...>` from the string, then collapse whitespace.
pub fn strip_tags(s: String) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Cleaned visible text of a tag block: inner HTML, entities decoded, tags
/// stripped, whitespace collapsed.
pub fn block_text(block: &str) -> String {
    strip_tags(normalize_entities(&inner_after_open_tag(block)))
}

/// Value of `attr` in an open tag. Handles double-quoted, single-quoted, and
/// bare values; attribute name match is case-insensitive.
pub fn attr_value(tag: &str, attr: &str) -> Option<String> {
    let lc = to_lower(tag);
    let needle = join!(&to_lower(attr), "=");

    let mut pos = 0;
    loop {
        let at = lc.get(pos..)?.find(&needle)? + pos;
        // A preceding delimiter keeps e.g. attr "test" from matching inside
        // "data-test".
        let before_ok = at == 0 || lc.as_bytes()[at - 1].is_ascii_whitespace();
        if !before_ok {
            pos = at + needle.len();
            continue;
        }
        let vstart = at + needle.len();
        let rest = &tag[vstart..];
        return match rest.as_bytes().first() {
            Some(b'"') => rest[1..].find('"').map(|e| rest[1..1 + e].to_string()),
            Some(b'\'') => rest[1..].find('\'').map(|e| rest[1..1 + e].to_string()),
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                    .unwrap_or(rest.len());
                Some(rest[..end].to_string())
            }
        };
    }
}

/// Presence check for a bare attribute token (e.g. `checked`, `disabled`).
pub fn has_attr(tag: &str, attr: &str) -> bool {
    let lc = to_lower(tag);
    let name = to_lower(attr);

    let mut pos = 0;
    while let Some(rel) = lc.get(pos..).and_then(|r| r.find(&name)) {
        let at = pos + rel;
        let before_ok = at > 0 && lc.as_bytes()[at - 1].is_ascii_whitespace();
        let after = lc.as_bytes().get(at + name.len());
        let after_ok = matches!(after, None | Some(b'=' | b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/'));
        if before_ok && after_ok {
            return true;
        }
        pos = at + name.len();
    }
    false
}

/// First non-empty `href` among the `<a>` tags inside `scope`.
pub fn first_href(scope: &str) -> Option<String> {
    let mut pos = 0;
    while let Some((start, end)) = next_open_tag_ci(scope, "<a", pos) {
        if let Some(h) = attr_value(&scope[start..end], "href") {
            let h = h.trim();
            if !h.is_empty() {
                return Some(h.to_string());
            }
        }
        pos = end;
    }
    None
}

/// All `href` values starting with `prefix` among the `<a>` tags inside
/// `scope`, prefix stripped and trimmed, empties dropped, document order.
pub fn hrefs_with_prefix(scope: &str, prefix: &str) -> Vec<String> {
    let prefix_lc = to_lower(prefix);
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some((start, end)) = next_open_tag_ci(scope, "<a", pos) {
        if let Some(h) = attr_value(&scope[start..end], "href") {
            if to_lower(&h).starts_with(&prefix_lc) {
                let v = h[prefix.len()..].trim();
                if !v.is_empty() {
                    out.push(v.to_string());
                }
            }
        }
        pos = end;
    }
    out
}

/// True if any quoted `attr="…"` value anywhere in `doc` contains `needle`
/// (both case-insensitive). Used for view-marker probing.
pub fn any_attr_contains(doc: &str, attr: &str, needle: &str) -> bool {
    let lc = to_lower(doc);
    let pat = join!(&to_lower(attr), "=");
    let needle_lc = to_lower(needle);

    let mut pos = 0;
    while let Some(rel) = lc.get(pos..).and_then(|r| r.find(&pat)) {
        let at = pos + rel;
        let before_ok = at == 0 || lc.as_bytes()[at - 1].is_ascii_whitespace();
        let vstart = at + pat.len();
        if before_ok {
            if let Some(&q) = lc.as_bytes().get(vstart) {
                if q == b'"' || q == b'\'' {
                    if let Some(end_rel) = lc[vstart + 1..].find(q as char) {
                        if lc[vstart + 1..vstart + 1 + end_rel].contains(&needle_lc) {
                            return true;
                        }
                    }
                }
            }
        }
        pos = vstart;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_value_quote_styles() {
        assert_eq!(attr_value(r#"<a href="mailto:a@b.com">"#, "href").as_deref(), Some("mailto:a@b.com"));
        assert_eq!(attr_value("<a href='tel:555'>", "href").as_deref(), Some("tel:555"));
        assert_eq!(attr_value("<td colspan=2>", "colspan").as_deref(), Some("2"));
        assert_eq!(attr_value(r#"<time datetime="2024-03-01">"#, "time"), None);
    }

    #[test]
    fn attr_value_ignores_embedded_name() {
        // "test=" must not match inside data-testid="…"
        let tag = r#"<div data-testid="row-3">"#;
        assert_eq!(attr_value(tag, "test"), None);
        assert_eq!(attr_value(tag, "data-testid").as_deref(), Some("row-3"));
    }

    #[test]
    fn open_tag_respects_boundary() {
        let html = "<article><a href=\"/x\">link</a></article>";
        let (s, e) = next_open_tag_ci(html, "<a", 0).unwrap();
        assert_eq!(&html[s..e], "<a href=\"/x\">");
    }

    #[test]
    fn div_block_handles_nesting() {
        let html = r#"<div class="outer"><div class="card x"><div>inner</div>tail</div>after</div>"#;
        let (s, e) = next_div_with_class_ci(html, "card", 0).unwrap();
        assert_eq!(&html[s..e], r#"<div class="card x"><div>inner</div>tail</div>"#);
    }

    #[test]
    fn hrefs_with_prefix_filters_and_strips() {
        let row = r#"<td><a href="mailto:a@b.com">a</a><a href="/lead/7">x</a><a href="mailto: ">y</a></td>"#;
        assert_eq!(hrefs_with_prefix(row, "mailto:"), vec!["a@b.com"]);
        assert!(hrefs_with_prefix(row, "tel:").is_empty());
    }

    #[test]
    fn marker_probe_matches_substring() {
        let doc = r#"<div data-testid="opportunity-board-4"></div>"#;
        assert!(any_attr_contains(doc, "data-testid", "opportunity"));
        assert!(!any_attr_contains(doc, "data-testid", "task"));
        assert!(!any_attr_contains(doc, "data-test", "opportunity"));
    }

    #[test]
    fn block_text_cleans() {
        let td = "<td>  Jane \n <b>Doe</b>&nbsp;</td>";
        assert_eq!(block_text(td), "Jane Doe");
    }
}
