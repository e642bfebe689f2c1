// src/specs/opportunities.rs

use std::collections::HashSet;

use crate::core::html::{block_text, first_href, next_div_with_class_ci, next_tag_block_ci, slice_between_ci};
use crate::core::ident::assign_identity;
use crate::core::sanitize::to_number;
use crate::page::Page;
use crate::records::Opportunity;

/// Opportunities render as one table per pipeline group, each wrapped in a
/// marker div.
const GROUP_WRAPPER: &str = "OpportunityGroup_tableWrapper";

const MIN_CELLS: usize = 5;

/// Column order inside a group table.
const NAME_CELL: usize = 0;
const VALUE_CELL: usize = 1;
const CONFIDENCE_CELL: usize = 2;
const CLOSE_DATE_CELL: usize = 3;
const STATUS_CELL: usize = 4;
const USER_CELL: usize = 5; // not always rendered

/// Scrape every opportunity row across all group tables, in document order,
/// unique by id.
pub fn extract(page: &Page) -> Vec<Opportunity> {
    let doc = page.document();
    let mut out = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    let mut pos = 0usize;
    while let Some((div_s, div_e)) = next_div_with_class_ci(doc, GROUP_WRAPPER, pos) {
        let wrapper = &doc[div_s..div_e];
        pos = div_e;

        let mut t_pos = 0usize;
        while let Some((t_s, t_e)) = next_tag_block_ci(wrapper, "<table", "</table>", t_pos) {
            let table = &wrapper[t_s..t_e];
            t_pos = t_e;
            scrape_table(table, &mut seen, &mut out);
        }
    }

    out
}

fn scrape_table(table: &str, seen: &mut HashSet<String>, out: &mut Vec<Opportunity>) {
    let Some(body) = slice_between_ci(table, "<tbody", "</tbody>") else {
        return;
    };

    let mut pos = 0usize;
    while let Some((tr_s, tr_e)) = next_tag_block_ci(body, "<tr", "</tr>", pos) {
        let tr = &body[tr_s..tr_e];
        pos = tr_e;

        let mut cells: Vec<&str> = Vec::new();
        let mut td_pos = 0usize;
        while let Some((td_s, td_e)) = next_tag_block_ci(tr, "<td", "</td>", td_pos) {
            cells.push(&tr[td_s..td_e]);
            td_pos = td_e;
        }
        if cells.len() < MIN_CELLS {
            continue;
        }

        let name = block_text(cells[NAME_CELL]);
        let raw_value = block_text(cells[VALUE_CELL]);
        let confidence = block_text(cells[CONFIDENCE_CELL]);
        let close_raw = block_text(cells[CLOSE_DATE_CELL]);
        let status = block_text(cells[STATUS_CELL]);
        let user = cells.get(USER_CELL).map(|c| block_text(c)).unwrap_or_default();

        let seed = first_href(cells[NAME_CELL])
            .unwrap_or_else(|| format!("{name}-{status}-{close_raw}"));
        let id = assign_identity(Some(&seed)).into_string();
        if !seen.insert(id.clone()) {
            continue;
        }

        out.push(Opportunity {
            id,
            name,
            value: to_number(&raw_value),
            confidence,
            status,
            close_date: (!close_raw.is_empty()).then_some(close_raw),
            user,
        });
    }
}
