use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod dto;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("chado_genotype=debug,chado_db=debug,info")
    } else {
        EnvFilter::new("chado_genotype=warn,chado_db=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = cli.load_config()?;
    match cli.command {
        cli::Commands::Init => {
            cli::init::run(&cli.db, cli.format)?;
        }
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, &cli.db, &config, cli.format)?;
        }
        cli::Commands::Report(args) => {
            cli::report::run(args, &cli.db, &config, cli.format)?;
        }
    }

    Ok(())
}
