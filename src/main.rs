mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use transformbox::{api, config::Config, observability};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let config = match args.config {
                Some(path) => Config::load_from_path(path)?,
                None => Config::load()?,
            };
            observability::init_tracing(&config.telemetry.log_filter);

            let address = args.address.unwrap_or(config.server.bind_addr);
            api::run(config, address).await?
        }
    }

    Ok(())
}
