//! `dyschema get` command - Show a template as the cache serves it

use console::style;
use miette::Result;

use crate::cli::helpers::{fetch_template, print_json};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Template id (default: the active template)
    pub id: Option<i64>,

    /// Print the decoded schema instead of a summary
    #[arg(long)]
    pub schema: bool,
}

pub fn run(args: GetArgs, global: &GlobalOpts) -> Result<()> {
    let template = fetch_template(global, args.id)?;

    if args.schema {
        return print_json(&template.schema);
    }

    match global.format {
        OutputFormat::Json => print_json(template.as_ref()),
        OutputFormat::Tsv => {
            println!(
                "{}\t{}\t{}\t{}",
                template.id,
                template.name,
                template.schema_fingerprint,
                template.simple_leafs.len()
            );
            Ok(())
        }
        OutputFormat::Auto | OutputFormat::Md => {
            println!("{}: {}", style("ID").bold(), template.id);
            println!("{}: {}", style("Name").bold(), template.name);
            println!(
                "{}: {}",
                style("Fingerprint").bold(),
                style(&template.schema_fingerprint).dim()
            );
            if !template.layout.is_empty() {
                println!("{}: {}", style("Layout").bold(), template.layout);
            }
            println!("{}: {}", style("Leaf depth").bold(), template.schema.leaf);
            println!(
                "{}: {}",
                style("Leaf categories").bold(),
                template.simple_leafs.len()
            );
            println!(
                "{}: {}",
                style("Questions").bold(),
                template.schema.flat_questions().len()
            );
            if let Some(keywords) = &template.keywords {
                println!(
                    "{}: {}",
                    style("Match keywords").bold(),
                    keywords.match_keywords.join(", ")
                );
            }
            Ok(())
        }
    }
}
