//! `dyschema import` command - Store a schema file as a new template

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{open_store, read_schema_file};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{TemplateRecord, TemplateStore, TplKeywords};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Schema JSON file
    pub file: PathBuf,

    /// Template name (default: file stem)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Version label stored with the template
    #[arg(long = "template-version", value_name = "LABEL", default_value = "")]
    pub template_version: String,

    /// Keyword bundle JSON file
    #[arg(long, short = 'k')]
    pub keywords: Option<PathBuf>,

    /// Page layout identifier
    #[arg(long)]
    pub layout: Option<String>,

    /// Store the template already sealed
    #[arg(long)]
    pub sealed: bool,

    /// Seal the current active template(s) before importing
    #[arg(long, conflicts_with = "sealed")]
    pub replace_active: bool,

    /// Import even if the schema has structural problems
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let schema = read_schema_file(&args.file)?;
    let problems = schema.problems();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("{} {}", style("✗").red(), problem);
        }
        if !args.force {
            return Err(miette::miette!(
                help = "fix the schema or pass --force",
                "{} has {} structural problem(s)",
                args.file.display(),
                problems.len()
            ));
        }
    }

    let text = std::fs::read_to_string(&args.file).into_diagnostic()?;
    let keywords = match &args.keywords {
        Some(path) => {
            let raw = std::fs::read_to_string(path).into_diagnostic()?;
            serde_json::from_str::<TplKeywords>(&raw).map_err(|e| {
                miette::miette!("{} is not a valid keyword bundle: {}", path.display(), e)
            })?;
            Some(raw)
        }
        None => None,
    };

    let name = match args.name {
        Some(name) => name,
        None => args
            .file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "template".to_string()),
    };

    let store = open_store(global)?;

    if args.replace_active {
        for state in store.template_states().into_diagnostic()? {
            if !state.is_sealed {
                store.seal(state.id).into_diagnostic()?;
                tracing::info!(id = state.id, "sealed previous active template");
            }
        }
    }

    let mut record = TemplateRecord::new(name, text);
    record.version = args.template_version;
    record.keywords = keywords;
    record.page_layout = args.layout;
    if args.sealed {
        record = record.sealed();
    }
    let id = store.insert(&record).into_diagnostic()?;

    match global.format {
        OutputFormat::Tsv | OutputFormat::Json => println!("{}", id),
        _ if global.quiet => {}
        _ => {
            println!(
                "{} Imported {} as template {}{}",
                style("✓").green(),
                style(args.file.display()).cyan(),
                style(id).cyan(),
                if record.is_sealed { " (sealed)" } else { "" }
            );
            let leafs = schema.leafs().len();
            let questions = schema.flat_questions().len();
            println!("   {} leaf categories, {} questions", leafs, questions);
        }
    }
    Ok(())
}
