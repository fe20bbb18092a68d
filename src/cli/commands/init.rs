//! `dyschema init` command - Create the template database

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::database_path;
use crate::cli::GlobalOpts;
use crate::core::{Config, SqliteTemplateStore};

#[derive(clap::Args, Debug)]
pub struct InitArgs {}

pub fn run(_args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let path = database_path(global, &config);
    let existed = path.exists();

    // Opening creates the table when it is missing and leaves rows untouched
    SqliteTemplateStore::open(&path).into_diagnostic()?;

    if global.quiet {
        return Ok(());
    }
    if existed {
        println!(
            "{} Template database already exists at {}",
            style("!").yellow(),
            style(path.display()).cyan()
        );
    } else {
        println!(
            "{} Created template database at {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
        println!();
        println!("Next steps:");
        println!(
            "  {} Import a schema as the active template",
            style("dyschema import schema.json --name <NAME>").yellow()
        );
    }
    Ok(())
}
