//! `dyschema leafs` command - List leaf categories

use miette::Result;

use crate::cli::helpers::{print_json, print_rows, SchemaSource};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct LeafsArgs {
    #[command(flatten)]
    pub source: SchemaSource,
}

pub fn run(args: LeafsArgs, global: &GlobalOpts) -> Result<()> {
    let schema = args.source.load(global)?;
    let leafs = schema.leafs();

    if global.format == OutputFormat::Json {
        return print_json(&leafs);
    }

    let rows: Vec<Vec<String>> = leafs
        .iter()
        .map(|leaf| {
            vec![
                leaf.path.clone(),
                leaf.basic.code.clone(),
                leaf.basic.name.clone(),
                if leaf.replace { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_rows(global.format, &["PATH", "CODE", "NAME", "REPLACE"], &rows)
}
