//! `dyschema seal` command - Freeze a template as a historical version

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct SealArgs {
    /// Template id
    pub id: i64,
}

pub fn run(args: SealArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    store.seal(args.id).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Sealed template {}",
            style("✓").green(),
            style(args.id).cyan()
        );
    }
    Ok(())
}
