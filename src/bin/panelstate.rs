//! panelstate - inspect persisted panel state
//!
//! Reads a `panels.yaml` store and prints every panel's decoded geometry
//! and dock placement plus every list view's column layout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use dockpanel::columns::{Column, ColumnLayout};
use dockpanel::config::YamlStore;
use dockpanel::state;

#[derive(Parser, Debug)]
#[command(name = "panelstate", version, about = "Inspect persisted dockable panel state")]
struct Args {
    /// Store file (defaults to panels.yaml in the config directory)
    #[arg(value_name = "STORE")]
    store: Option<PathBuf>,

    /// Only show this config section
    #[arg(short, long)]
    section: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log store decoding at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct PanelReport {
    section: String,
    id: String,
    rect: [i32; 4],
    dock_slot: i32,
    flags: i32,
    open: bool,
    docked: bool,
    view_len: usize,
}

#[derive(Debug, Serialize)]
struct ColumnReport {
    width: i32,
    /// `None` when hidden
    position: Option<usize>,
}

#[derive(Debug, Serialize)]
struct LayoutReport {
    section: String,
    key: String,
    sort: i32,
    columns: Vec<ColumnReport>,
}

#[derive(Debug, Default, Serialize)]
struct Report {
    panels: Vec<PanelReport>,
    layouts: Vec<LayoutReport>,
    /// Entries that could not be decoded, with the reason
    errors: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    dockpanel::tracing::init_cli(args.verbose);

    let store = match &args.store {
        Some(path) => YamlStore::open(path)?,
        None => YamlStore::open_default()?,
    };
    let report = build_report(&store, args.section.as_deref());

    if args.json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", out);
    } else {
        print_text(&report);
    }
    Ok(())
}

fn build_report(store: &YamlStore, only: Option<&str>) -> Report {
    let mut report = Report::default();
    for (section, entries) in store.sections() {
        if only.is_some_and(|s| s != section) {
            continue;
        }

        for (id, encoded) in &entries.blobs {
            let bytes = match hex::decode(encoded) {
                Ok(bytes) => bytes,
                Err(e) => {
                    report.errors.push(format!("{section}/{id}: {e}"));
                    continue;
                }
            };
            match state::decode(&bytes) {
                Ok((st, view)) => report.panels.push(PanelReport {
                    section: section.clone(),
                    id: id.clone(),
                    rect: [st.rect.left, st.rect.top, st.rect.right, st.rect.bottom],
                    dock_slot: st.dock_slot,
                    flags: st.flags,
                    open: st.is_open(),
                    docked: st.is_docked(),
                    view_len: view.len(),
                }),
                Err(e) => report.errors.push(format!("{section}/{id}: {e}")),
            }
        }

        for (key, line) in &entries.strings {
            // The declared columns are not known here; one placeholder per
            // stored (width, pos) pair
            let count = line.split_whitespace().count().saturating_sub(1) / 2;
            let defaults = (0..count).map(|i| Column::new(format!("#{i}"), 0)).collect();
            match ColumnLayout::decode(defaults, line) {
                Ok(layout) => report.layouts.push(LayoutReport {
                    section: section.clone(),
                    key: key.clone(),
                    sort: layout.sort().code(),
                    columns: layout
                        .columns()
                        .iter()
                        .map(|c| ColumnReport {
                            width: c.width,
                            position: c.position,
                        })
                        .collect(),
                }),
                Err(e) => report.errors.push(format!("{section}/{key}: {e}")),
            }
        }
    }
    report
}

fn print_text(report: &Report) {
    for p in &report.panels {
        let [l, t, r, b] = p.rect;
        println!(
            "{}/{}: rect=({},{})-({},{}) slot={} flags={:#x} open={} docked={} view={}B",
            p.section, p.id, l, t, r, b, p.dock_slot, p.flags, p.open, p.docked, p.view_len
        );
    }
    for layout in &report.layouts {
        let cols: Vec<String> = layout
            .columns
            .iter()
            .map(|c| match c.position {
                Some(pos) => format!("{}@{}", c.width, pos),
                None => format!("{}@hidden", c.width),
            })
            .collect();
        println!(
            "{}/{}: sort={} [{}]",
            layout.section,
            layout.key,
            layout.sort,
            cols.join(", ")
        );
    }
    for e in &report.errors {
        eprintln!("error: {}", e);
    }
}
