//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, get::GetArgs, import::ImportArgs, init::InitArgs,
    leafs::LeafsArgs, list::ListArgs, questions::QuestionsArgs, seal::SealArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "dyschema")]
#[command(author, version, about = "Question schema templates")]
#[command(long_about = "Manage versioned question schema templates and inspect them through the template cache.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Template database (default: config, then ./dyschema.db)
    #[arg(long, global = true, env = "DYSCHEMA_DB")]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty template database
    Init(InitArgs),

    /// Import a schema file as a new template
    Import(ImportArgs),

    /// Seal a template, freezing it as a historical version
    Seal(SealArgs),

    /// List stored templates
    List(ListArgs),

    /// Show a template as served by the cache
    Get(GetArgs),

    /// List the leaf categories of a schema
    Leafs(LeafsArgs),

    /// List every question of a schema with its category path
    Questions(QuestionsArgs),

    /// Check a schema for structural problems
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// Markdown tables
    Md,
}
