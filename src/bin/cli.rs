use anyhow::Result;
use dotenvy::dotenv;
use tracing::error;

use dune_echo::{ChainRegistry, Config, DuneClient, Error};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    if let Err(e) = dune_echo::setup_logging() {
        eprintln!("Failed to set up logging: {}", e);
    }

    // Configuration must be valid before any argument is looked at
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Environment validation failed");
            eprintln!("Environment validation failed: {}", e);
            std::process::exit(1);
        }
    };

    let registry = ChainRegistry::load()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    if dune_echo::wants_help(&args) {
        println!("{}", dune_echo::usage(&registry));
        return Ok(());
    }

    let query = match dune_echo::parse_args(args) {
        Ok(query) => query,
        Err(e) => {
            for issue in &e.issues {
                error!(field = issue.field, message = %issue.message, "Invalid command option");
            }
            eprintln!("{}", e);
            eprintln!("{}", dune_echo::usage(&registry));
            std::process::exit(1);
        }
    };

    let client = DuneClient::new(&config);

    match dune_echo::run(&client, &registry, &query).await {
        Ok(records) => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Err(e @ Error::ChainMismatch { .. }) => {
            error!(error = %e, "Invalid chain for data type");
            eprintln!("{}", dune_echo::usage(&registry));
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "Error fetching data");
            std::process::exit(1);
        }
    }

    Ok(())
}
