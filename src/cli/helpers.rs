//! Shared helper functions for CLI commands
//!
//! Store/cache setup and schema loading used by several commands, plus
//! table rendering in the selected output format.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{
    Config, LoadContext, ServedTemplate, SqliteTemplateStore, StoreSource, TemplateCache,
};
use crate::schema::{QuestionDesc, QuestionsSchema};

/// Resolve the database path from the flag or the layered config
pub fn database_path(global: &GlobalOpts, config: &Config) -> PathBuf {
    global.db.clone().unwrap_or_else(|| config.database())
}

/// Open the template store, failing if it has not been initialized
pub fn open_store(global: &GlobalOpts) -> Result<SqliteTemplateStore> {
    let config = Config::load();
    let path = database_path(global, &config);
    if !path.exists() {
        return Err(miette::miette!(
            help = "run `dyschema init` first",
            "template database {} does not exist",
            path.display()
        ));
    }
    SqliteTemplateStore::open(&path).into_diagnostic()
}

/// Build a template cache over the configured store
pub fn open_cache(global: &GlobalOpts) -> Result<TemplateCache> {
    let config = Config::load();
    let store = open_store(global)?;
    Ok(TemplateCache::new(
        Arc::new(StoreSource::new(store)),
        config.cache_config(),
    ))
}

/// Fetch a template through the cache (active template when `id` is None)
pub fn fetch_template(global: &GlobalOpts, id: Option<i64>) -> Result<Arc<ServedTemplate>> {
    let cache = open_cache(global)?;
    let ctx = LoadContext::new();
    let template = match id {
        Some(id) => cache.get_by_template_id(&ctx, id)?,
        None => cache.active(&ctx)?,
    };
    Ok(template)
}

/// Read and decode a schema JSON file
pub fn read_schema_file(path: &Path) -> Result<QuestionsSchema<QuestionDesc>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| miette::miette!("{} is not a valid schema: {}", path.display(), e))
}

/// Where a command takes its schema from
#[derive(clap::Args, Debug)]
pub struct SchemaSource {
    /// Schema JSON file
    #[arg(required_unless_present_any = ["id", "active"])]
    pub file: Option<PathBuf>,

    /// Use a stored template by id instead of a file
    #[arg(long, conflicts_with_all = ["file", "active"])]
    pub id: Option<i64>,

    /// Use the active template instead of a file
    #[arg(long, conflicts_with = "file")]
    pub active: bool,
}

impl SchemaSource {
    pub fn load(&self, global: &GlobalOpts) -> Result<QuestionsSchema<QuestionDesc>> {
        match &self.file {
            Some(path) => read_schema_file(path),
            None => Ok(fetch_template(global, self.id)?.schema.clone()),
        }
    }
}

/// Print rows in the requested format
///
/// `Auto` renders a rounded table, `Md` a markdown table, `Tsv` plain
/// tab-separated lines without a header and `Json` an array of objects
/// keyed by the lowercased header.
pub fn print_rows(format: OutputFormat, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&rows_as_json(header, rows)),
        OutputFormat::Tsv => {
            for row in rows {
                println!("{}", row.join("\t"));
            }
            Ok(())
        }
        OutputFormat::Auto | OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(header.iter().copied());
            for row in rows {
                builder.push_record(row.iter().map(String::as_str));
            }
            let mut table = builder.build();
            if format == OutputFormat::Md {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            println!("{}", table);
            Ok(())
        }
    }
}

fn rows_as_json(header: &[&str], rows: &[Vec<String>]) -> serde_json::Value {
    rows.iter()
        .map(|row| {
            header
                .iter()
                .zip(row)
                .map(|(key, value)| (key.to_lowercase(), serde_json::Value::from(value.as_str())))
                .collect::<serde_json::Map<_, _>>()
        })
        .map(serde_json::Value::Object)
        .collect()
}

/// Serialize a value as pretty JSON to stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}
