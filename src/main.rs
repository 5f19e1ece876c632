use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use mapcache::server::{self, Api};
use mapcache::utils::setup_logging;
use mapcache::{open_settings, Config, GeocodeResolver, GoogleGeocoder, MapArgs, MapRenderer};

#[derive(Parser)]
#[command(name = "mapcache", version, about = "Cached address geocoding and map markup")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the coordinates of an address as JSON
    Resolve {
        address: String,
        /// Overrides geocode.api_key from the configuration
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Print the map placeholder markup
    Map {
        #[command(flatten)]
        args: MapArgs,
    },
    /// Serve the HTTP API
    Serve {
        /// host:port, defaults to the configured server address
        #[arg(long)]
        listen: Option<String>,
    },
    /// Delete the stored coordinate cache
    Forget,
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if Path::new(path).exists() {
        Config::read(path)
    } else {
        Ok(Config::empty())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    setup_logging(cli.debug || config.debug);
    if !Path::new(&cli.config).exists() {
        info!("Config file {} not found, using defaults", cli.config);
    }

    let settings = open_settings(&config.settings).await?;
    let client = GoogleGeocoder::new().with_endpoint(&config.geocode.endpoint);
    let resolver = Arc::new(
        GeocodeResolver::new(settings, Arc::new(client))
            .with_option_key(&config.geocode.option_key),
    );

    match cli.command {
        Command::Resolve { address, api_key } => {
            let api_key = api_key.unwrap_or_else(|| config.geocode.api_key.clone());
            match resolver.resolve(&address, &api_key).await {
                Ok(coordinates) => {
                    println!("{}", serde_json::to_string(&coordinates)?);
                }
                Err(e) => {
                    error!("Could not resolve address={}: {}", address, e);
                    anyhow::bail!(e);
                }
            }
        }
        Command::Map { args } => {
            let renderer = MapRenderer::new(resolver, &config.geocode.api_key)?;
            match renderer.render(&args).await? {
                Some(html) => println!("{}", html),
                None => anyhow::bail!("Nothing to render, give an address or coordinates"),
            }
        }
        Command::Serve { listen } => {
            let listen = listen.unwrap_or_else(|| config.server.listen());
            let api = Api::new(resolver, &config.geocode.api_key)?;
            server::start(&listen, api).await?;
        }
        Command::Forget => {
            let existed = resolver.forget_all().await?;
            if existed {
                println!("Coordinate cache cleared");
            } else {
                println!("Coordinate cache was already empty");
            }
        }
    }

    Ok(())
}
