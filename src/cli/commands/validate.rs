//! `dyschema validate` command - Check a schema for structural problems

use console::style;
use miette::Result;

use crate::cli::helpers::{print_json, SchemaSource};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SchemaSource,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let schema = args.source.load(global)?;
    let problems = schema.problems();

    match global.format {
        OutputFormat::Json => {
            let messages: Vec<String> = problems.iter().map(ToString::to_string).collect();
            print_json(&messages)?;
        }
        OutputFormat::Tsv => {
            for problem in &problems {
                println!("{}", problem);
            }
        }
        OutputFormat::Auto | OutputFormat::Md => {
            for problem in &problems {
                println!("{} {}", style("✗").red(), problem);
            }
        }
    }

    if problems.is_empty() {
        if !global.quiet && matches!(global.format, OutputFormat::Auto | OutputFormat::Md) {
            println!(
                "{} Schema is valid ({} leaf categories)",
                style("✓").green(),
                schema.leafs().len()
            );
        }
        Ok(())
    } else {
        Err(miette::miette!(
            "schema has {} structural problem(s)",
            problems.len()
        ))
    }
}
