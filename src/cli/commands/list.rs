//! `dyschema list` command - List stored templates

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{open_store, print_json, print_rows};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::TemplateRecord;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only show sealed templates
    #[arg(long, conflicts_with = "active")]
    pub sealed: bool,

    /// Only show unsealed (active) templates
    #[arg(long)]
    pub active: bool,
}

#[derive(Serialize)]
struct TemplateRow<'a> {
    id: i64,
    name: &'a str,
    version: &'a str,
    sealed: bool,
    modified_at: String,
}

impl<'a> From<&'a TemplateRecord> for TemplateRow<'a> {
    fn from(record: &'a TemplateRecord) -> Self {
        Self {
            id: record.id,
            name: &record.name,
            version: &record.version,
            sealed: record.is_sealed,
            modified_at: record.modified_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let records: Vec<TemplateRecord> = store
        .list()
        .into_diagnostic()?
        .into_iter()
        .filter(|r| !(args.sealed && !r.is_sealed) && !(args.active && r.is_sealed))
        .collect();
    let rows: Vec<TemplateRow> = records.iter().map(TemplateRow::from).collect();

    if global.format == OutputFormat::Json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        if !global.quiet && global.format != OutputFormat::Tsv {
            println!("No templates found.");
        }
        return Ok(());
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                row.name.to_string(),
                row.version.to_string(),
                if row.sealed { "sealed" } else { "active" }.to_string(),
                row.modified_at.clone(),
            ]
        })
        .collect();
    print_rows(
        global.format,
        &["ID", "NAME", "VERSION", "STATE", "MODIFIED"],
        &table,
    )
}
