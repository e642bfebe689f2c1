// src/export.rs
// Export-time flattening of the dataset. Two formats, both produced verbatim
// from the persisted form: a structural JSON dump and a tabular CSV with one
// row per record across all three types.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::options::{ExportFormat, ExportOptions};
use crate::core::sanitize::normalize_ws;
use crate::records::Dataset;

/// Flattened column layout shared by every record type.
pub const CSV_HEADER: [&str; 9] = [
    "type", "id", "name_or_title", "extra", "value", "status", "closeDate", "done", "dueDate",
];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer; fields containing a comma or quote
/// are quoted with doubled internal quotes.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, ",")?; } else { first = false; }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// One flattened row per record: contacts, then opportunities, then tasks.
/// Free-text fields are whitespace-normalized on the way out; empty columns
/// stay empty rather than borrowing meaning from another type.
pub fn dataset_rows(data: &Dataset) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(data.record_count());

    for c in &data.contacts {
        let extra = format!(
            "emails: {} phones: {} lead: {}",
            c.emails.join(" / "),
            c.phones.join(" / "),
            c.lead
        );
        rows.push(vec![
            s!("contact"),
            c.id.clone(),
            normalize_ws(&c.name),
            normalize_ws(&extra),
            s!(),
            s!(),
            s!(),
            s!(),
            s!(),
        ]);
    }

    for o in &data.opportunities {
        rows.push(vec![
            s!("opportunity"),
            o.id.clone(),
            normalize_ws(&o.name),
            s!(),
            o.value.map(|v| v.to_string()).unwrap_or_default(),
            normalize_ws(&o.status),
            o.close_date.clone().unwrap_or_default(),
            s!(),
            s!(),
        ]);
    }

    for t in &data.tasks {
        rows.push(vec![
            s!("task"),
            t.id.clone(),
            normalize_ws(&t.description),
            normalize_ws(&join!("assignee: ", &t.assignee)),
            s!(),
            s!(),
            s!(),
            t.done.to_string(),
            t.due_date.clone().unwrap_or_default(),
        ]);
    }

    rows
}

/// Full CSV text, header line included.
pub fn to_csv(data: &Dataset) -> String {
    let mut buf: Vec<u8> = Vec::new();

    let header: Vec<String> = CSV_HEADER.iter().map(|h| s!(*h)).collect();
    let _ = write_row(&mut buf, &header);
    for row in dataset_rows(data) {
        let _ = write_row(&mut buf, &row);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

/// Pretty-printed structural dump, matching the stored shape.
pub fn to_json(data: &Dataset) -> Result<String, Box<dyn Error>> {
    let mut text = serde_json::to_string_pretty(data)?;
    text.push('\n');
    Ok(text)
}

/// Render per `ExportOptions` and write to the resolved destination.
/// Returns the path written to.
pub fn export_dataset(export: &ExportOptions, data: &Dataset) -> Result<PathBuf, Box<dyn Error>> {
    let path = export.out_path();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let contents = match export.format {
        ExportFormat::Csv => to_csv(data),
        ExportFormat::Json => to_json(data)?,
    };
    fs::write(&path, contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Contact, Opportunity, Task};

    fn sample() -> Dataset {
        Dataset {
            contacts: vec![Contact {
                id: s!("id_1"),
                name: s!("Doe, Jane"),
                emails: vec![s!("a@b.com"), s!("c@d.com")],
                phones: vec![s!("555-1234")],
                lead: s!("Acme"),
            }],
            opportunities: vec![Opportunity {
                id: s!("id_2"),
                name: s!("Acme \"big\" renewal"),
                value: Some(12500.0),
                confidence: s!("75%"),
                status: s!("Active"),
                close_date: Some(s!("Mar 1, 2024")),
                user: s!("Sam"),
            }],
            tasks: vec![Task {
                id: s!("id_3"),
                description: s!("Call back"),
                assignee: s!("Ann"),
                due_date: Some(s!("2024-03-01T00:00:00.000Z")),
                done: true,
            }],
            last_sync: 99,
        }
    }

    #[test]
    fn header_and_one_row_per_record() {
        let csv = to_csv(&sample());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "type,id,name_or_title,extra,value,status,closeDate,done,dueDate");
        assert!(lines[1].starts_with("contact,id_1,"));
        assert!(lines[2].starts_with("opportunity,id_2,"));
        assert!(lines[3].starts_with("task,id_3,"));
    }

    #[test]
    fn commas_and_quotes_are_escaped() {
        let csv = to_csv(&sample());
        assert!(csv.contains(r#""Doe, Jane""#));
        assert!(csv.contains(r#""Acme ""big"" renewal""#));
        // Close date with a comma gets quoted too.
        assert!(csv.contains(r#""Mar 1, 2024""#));
    }

    #[test]
    fn contact_extra_composites_all_handles() {
        let csv = to_csv(&sample());
        assert!(csv.contains("emails: a@b.com / c@d.com phones: 555-1234 lead: Acme"));
    }

    #[test]
    fn numeric_value_prints_bare() {
        let csv = to_csv(&sample());
        assert!(csv.contains(",12500,"));
    }

    #[test]
    fn task_row_carries_done_and_due() {
        let csv = to_csv(&sample());
        let task_line = csv.lines().last().unwrap();
        assert!(task_line.ends_with(",true,2024-03-01T00:00:00.000Z"));
    }

    #[test]
    fn json_dump_round_trips() {
        let data = sample();
        let text = to_json(&data).unwrap();
        let back: Dataset = serde_json::from_str(&text).unwrap();
        assert_eq!(back, data);
        assert!(text.contains("\"lastSync\": 99"));
    }
}
