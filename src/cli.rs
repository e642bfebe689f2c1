// src/cli.rs
use std::{env, error::Error, path::PathBuf};

use chrono::DateTime;

use crate::config::options::{ExportFormat, ExportOptions};
use crate::indicator::Indicator;
use crate::records::{Dataset, RecordKind};
use crate::{export, runner, store};

enum Command {
    Extract { page: PathBuf, url: Option<String> },
    List,
    Export(ExportOptions),
    Delete { kind: RecordKind, id: String },
}

/// Prints extraction status lines to stderr so stdout stays scriptable.
struct StderrIndicator;

impl Indicator for StderrIndicator {
    fn running(&mut self, status: &str) { eprintln!("… {status}"); }
    fn success(&mut self, status: &str) { eprintln!("✓ {status}"); }
    fn error(&mut self, status: &str) { eprintln!("✗ {status}"); }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    match parse_cli()? {
        Command::Extract { page, url } => {
            let mut indicator = StderrIndicator;
            match runner::run_extraction(&page, url.as_deref(), Some(&mut indicator)) {
                Ok(out) => {
                    print_counts(&out.data);
                    Ok(())
                }
                Err(e) => {
                    // A fallback payload still lets the user see the store.
                    if let runner::ExtractError::PageAccess { fallback: Some(data), .. } = &e {
                        print_counts(data);
                    }
                    Err(e.to_string().into())
                }
            }
        }
        Command::List => {
            let data = store::load()?;
            print_counts(&data);
            Ok(())
        }
        Command::Export(opts) => {
            let data = store::load()?;
            let path = export::export_dataset(&opts, &data)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        Command::Delete { kind, id } => {
            let data = runner::run_delete(kind, &id)?;
            print_counts(&data);
            Ok(())
        }
    }
}

fn print_counts(data: &Dataset) {
    println!(
        "contacts: {}  opportunities: {}  tasks: {}",
        data.contacts.len(),
        data.opportunities.len(),
        data.tasks.len()
    );
    println!("last sync: {}", fmt_last_sync(data.last_sync));
}

fn fmt_last_sync(ms: i64) -> String {
    if ms == 0 {
        return s!("not yet synced");
    }
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{ms} ms"),
    }
}

fn parse_cli() -> Result<Command, Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let cmd = args.next().ok_or("Missing command; try --help")?;

    match cmd.as_str() {
        "extract" => {
            let mut page: Option<PathBuf> = None;
            let mut url: Option<String> = None;
            while let Some(a) = args.next() {
                match a.as_str() {
                    "--url" => url = Some(args.next().ok_or("Missing value for --url")?),
                    "-h" | "--help" => return help(),
                    other if page.is_none() && !other.starts_with('-') => {
                        page = Some(PathBuf::from(other));
                    }
                    other => return Err(format!("Unknown arg: {}", other).into()),
                }
            }
            let page = page.ok_or("Missing page capture file")?;
            Ok(Command::Extract { page, url })
        }
        "list" => Ok(Command::List),
        "export" => {
            let mut opts = ExportOptions::default();
            while let Some(a) = args.next() {
                match a.as_str() {
                    "--format" => {
                        let v = args.next().ok_or("Missing value for --format")?;
                        opts.format = match v.to_ascii_lowercase().as_str() {
                            "csv" => ExportFormat::Csv,
                            "json" => ExportFormat::Json,
                            other => return Err(format!("Unknown format: {}", other).into()),
                        };
                    }
                    "-o" | "--out" => {
                        opts.set_path(&args.next().ok_or("Missing output path")?);
                    }
                    "-h" | "--help" => return help(),
                    other => return Err(format!("Unknown arg: {}", other).into()),
                }
            }
            Ok(Command::Export(opts))
        }
        "delete" => {
            let mut kind: Option<RecordKind> = None;
            let mut id: Option<String> = None;
            while let Some(a) = args.next() {
                match a.as_str() {
                    "--kind" => {
                        let v = args.next().ok_or("Missing value for --kind")?;
                        kind = Some(
                            RecordKind::parse(&v)
                                .ok_or_else(|| format!("Unknown record kind: {}", v))?,
                        );
                    }
                    "--id" => id = Some(args.next().ok_or("Missing value for --id")?),
                    "-h" | "--help" => return help(),
                    other => return Err(format!("Unknown arg: {}", other).into()),
                }
            }
            let kind = kind.ok_or("Missing --kind")?;
            let id = id.ok_or("Missing --id")?;
            Ok(Command::Delete { kind, id })
        }
        "-h" | "--help" => help(),
        other => Err(format!("Unknown command: {}", other).into()),
    }
}

fn help() -> Result<Command, Box<dyn Error>> {
    eprintln!("{}", include_str!("cli_help.txt"));
    std::process::exit(0);
}
