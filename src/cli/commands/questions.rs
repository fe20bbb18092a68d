//! `dyschema questions` command - List questions with their category paths

use miette::Result;

use crate::cli::helpers::{print_json, print_rows, SchemaSource};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct QuestionsArgs {
    #[command(flatten)]
    pub source: SchemaSource,

    /// Only questions under this category code path prefix (e.g. `A.B`)
    #[arg(long)]
    pub under: Option<String>,
}

pub fn run(args: QuestionsArgs, global: &GlobalOpts) -> Result<()> {
    let schema = args.source.load(global)?;
    let questions: Vec<_> = schema
        .flat_questions()
        .into_iter()
        .filter(|q| match &args.under {
            Some(prefix) => {
                let path = q.path.join(".");
                path == *prefix || path.starts_with(&format!("{}.", prefix))
            }
            None => true,
        })
        .collect();

    if global.format == OutputFormat::Json {
        return print_json(&questions);
    }

    let rows: Vec<Vec<String>> = questions
        .iter()
        .map(|q| {
            vec![
                q.full_path_string.clone(),
                q.question.id.to_string(),
                q.question.desc.clone(),
                if q.appendable { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_rows(global.format, &["PATH", "ID", "QUESTION", "APPENDABLE"], &rows)
}
