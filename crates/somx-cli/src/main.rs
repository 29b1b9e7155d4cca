// SOMX CLI — serve the presale feed, fetch it once, or check conversions.

use clap::{Parser, Subcommand};
use log::info;
use somx_core::{compute_tier, to_approx_float, to_fixed_display, Scale, TierSchedule, MAX_DECIMALS};
use somx_feed::{FailureResponse, FeedConfig, FeedService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "somx", version, about = "SOMX presale purchase feed")]
struct Cli {
    /// Path to feed.toml (defaults to the platform config dir)
    #[arg(long, global = true, env = "SOMX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP endpoint
    Serve {
        /// Address to bind, e.g. 0.0.0.0
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch new purchases once and print the response JSON
    Fetch {
        /// Only purchases in blocks above this one
        #[arg(long, default_value_t = 0)]
        since_block: u64,
    },
    /// Convert a base-unit amount to display units
    Convert {
        value: String,
        /// Decimals of the asset, 0 through 77
        #[arg(long, default_value_t = 18, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_DECIMALS)))]
        decimals: u32,
    },
    /// Show the presale tier for a total raised (display units)
    Tier {
        total: f64,
        /// Override the presale target
        #[arg(long)]
        target: Option<f64>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> somx_feed::EngineResult<()> {
    match cli.command {
        Commands::Serve { bind, port } => {
            let mut config = FeedConfig::load(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let service = Arc::new(FeedService::new(config)?);
            tokio::select! {
                res = somx_feed::run_server(service) => res?,
                _ = tokio::signal::ctrl_c() => info!("[server] Shutting down"),
            }
        }
        Commands::Fetch { since_block } => {
            let config = FeedConfig::load(cli.config.as_deref())?;
            let service = FeedService::new(config)?;
            match service.new_purchases(since_block).await {
                Ok(resp) => println!("{}", serde_json::to_string_pretty(&resp)?),
                Err(e) => {
                    println!("{}", serde_json::to_string_pretty(&FailureResponse::from(&e))?);
                    return Err(e);
                }
            }
        }
        Commands::Convert { value, decimals } => {
            let scale = Scale::new(decimals);
            let fixed = to_fixed_display(&value, scale);
            let out = serde_json::json!({
                "fixed": fixed.as_str(),
                "approx": to_approx_float(&value, scale),
                "degraded": fixed.is_degraded(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Tier { total, target } => {
            let info = match target {
                Some(t) => TierSchedule::with_target(t).classify(total),
                None => compute_tier(total),
            };
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }
    Ok(())
}
