mod cli;
mod config;
mod render;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    //  Logging (stderr, so stdout stays clean for records)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,png_info_viewer=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();

    match args.command {
        Some(cli::Commands::Show(show_args)) => cli::show::execute(args.global, show_args).await,
        Some(cli::Commands::Config(c)) => cli::config_cmd::execute(c).await,
        // Default: inspect the positional paths
        None => cli::show::execute(args.global, cli::ShowArgs { paths: args.paths }).await,
    }
}
