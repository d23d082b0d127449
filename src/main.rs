use anyhow::Result;
use clap::{Parser, Subcommand};
use shutterspot::config::AppConfig;
use shutterspot::{SearchConfig, SearchHit, ZipSearch};
use std::path::PathBuf;
use tracing::info;

/// Zip-code search and validation against the quick/full datasets
#[derive(Parser, Debug)]
#[command(name = "shutterspot")]
#[command(about = "Search and validate US zip codes")]
struct Args {
    /// Directory holding quick.json and full.json
    #[arg(long, env = "SHUTTERSPOT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Fetch datasets from <URL>/data/*.json instead of the data directory
    #[arg(long, env = "SHUTTERSPOT_DATA_URL")]
    data_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Autocomplete a city name or zip prefix
    Search {
        query: String,
    },
    /// Look up an exact 5-digit zip code
    Validate {
        zip: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    let config = AppConfig {
        data_dir: args.data_dir,
        data_url: args.data_url,
        ..AppConfig::default()
    };

    let search = ZipSearch::init(config.dataset_source(), SearchConfig::default()).await;
    if let Some(err) = search.dataset().last_error().await {
        info!("Quick dataset unavailable: {}", err);
    }

    match args.command {
        Command::Search { query } => {
            let hits = search.search(&query).await;
            if hits.is_empty() {
                println!("No matches for '{}'", query);
            }
            for hit in &hits {
                match hit {
                    SearchHit::Zip(record) => println!(
                        "{}  {}, {}  (pop. {})",
                        record.zip, record.city, record.state, record.population
                    ),
                    SearchHit::City(city) => println!(
                        "{}  (pop. {}, {} zip codes: {})",
                        city.display_name,
                        city.representative_population,
                        city.all_zips.len(),
                        city.all_zips.join(", ")
                    ),
                }
            }
        }
        Command::Validate { zip } => match search.validate(&zip).await {
            Some(record) => println!(
                "{} is valid: {}, {} ({:.4}, {:.4})",
                record.zip, record.city, record.state, record.latitude, record.longitude
            ),
            None => {
                println!("{} is not a known zip code", zip);
                std::process::exit(1);
            }
        },
    }

    if let Some(err) = search.dataset().last_error().await {
        eprintln!("Warning: {}", err);
    }

    Ok(())
}
