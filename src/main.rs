use clap::Parser;
use dyschema::cli::{commands, Cli, Commands};
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) so piping to
    // `head` or `grep -q` does not panic on a broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let default_level = if global.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init(args) => commands::init::run(args, &global),
        Commands::Import(args) => commands::import::run(args, &global),
        Commands::Seal(args) => commands::seal::run(args, &global),
        Commands::List(args) => commands::list::run(args, &global),
        Commands::Get(args) => commands::get::run(args, &global),
        Commands::Leafs(args) => commands::leafs::run(args, &global),
        Commands::Questions(args) => commands::questions::run(args, &global),
        Commands::Validate(args) => commands::validate::run(args, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
