// src/specs/contacts.rs

use std::collections::HashSet;

use crate::core::html::{block_text, first_href, hrefs_with_prefix, next_tag_block_ci, slice_between_ci};
use crate::core::ident::assign_identity;
use crate::page::Page;
use crate::records::Contact;

/// Contact rows live in the data table body; the class is hashed per build,
/// but the prefix is stable.
const TABLE_BODY_OPEN: &str = r#"<tbody class="DataTable_body"#;

/// Minimum cells for a viable row: name + 3 detail columns + lead.
const MIN_CELLS: usize = 5;
const NAME_CELL: usize = 0;
const LEAD_CELL: usize = 4;

/// Scrape every contact row on the page, in document order, unique by id.
/// Unrecognized markup yields fewer rows, never an error.
pub fn extract(page: &Page) -> Vec<Contact> {
    let mut out = Vec::new();
    let Some(body) = slice_between_ci(page.document(), TABLE_BODY_OPEN, "</tbody>") else {
        return out;
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut pos = 0usize;
    let mut index = 0usize;

    while let Some((tr_s, tr_e)) = next_tag_block_ci(body, "<tr", "</tr>", pos) {
        let tr = &body[tr_s..tr_e];
        pos = tr_e;
        index += 1;

        // <td> cells, raw blocks kept for link harvesting
        let mut cells: Vec<&str> = Vec::new();
        let mut td_pos = 0usize;
        while let Some((td_s, td_e)) = next_tag_block_ci(tr, "<td", "</td>", td_pos) {
            cells.push(&tr[td_s..td_e]);
            td_pos = td_e;
        }
        if cells.len() < MIN_CELLS {
            continue;
        }

        let mut name = block_text(cells[NAME_CELL]);
        if name.is_empty() {
            name = format!("Contact {index}");
        }
        let mut lead = block_text(cells[LEAD_CELL]);
        if lead.is_empty() {
            lead = name.clone();
        }

        // Whole-row link harvest, document order.
        let emails = hrefs_with_prefix(tr, "mailto:");
        let phones = hrefs_with_prefix(tr, "tel:");

        // Identity: prefer the stable link target in the name cell, fall back
        // to a composite of the visible fields.
        let seed = first_href(cells[NAME_CELL]).unwrap_or_else(|| join!(&name, "-", &lead));
        let id = assign_identity(Some(&seed)).into_string();
        if !seen.insert(id.clone()) {
            continue;
        }

        out.push(Contact { id, name, emails, phones, lead });
    }

    out
}
