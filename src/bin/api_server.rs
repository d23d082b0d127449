//! REST API server for the photography marketplace
//!
//! Usage:
//!   ./target/release/api_server [options]
//!
//! Options:
//!   --port PORT          Port to listen on (default: 8080)
//!   --data-dir PATH      Directory with quick.json / full.json (default: data)
//!   --data-url URL       Fetch datasets from URL/data/*.json instead
//!   --profiles PATH      JSON array of photographer profiles
//!   --mock-profiles N    Generated profiles when --profiles is absent (default: 48)
//!   --prefetch           Start loading the full dataset at startup
//!
//! REST endpoints:
//!   GET /api/v1/health               - Health and dataset readiness
//!   GET /api/v1/zips/search?q=X      - Zip/city autocomplete
//!   GET /api/v1/zips/:zip            - Validate a 5-digit zip
//!   GET /api/v1/photographers        - Filtered listing
//!   GET /api/v1/photographers/:id    - Single profile
//!   GET /data/{quick,full}.json      - Dataset files (local data dir only)

use anyhow::Result;
use clap::Parser;
use shutterspot::api::{create_router, service::load_profiles, MarketplaceService};
use shutterspot::config::AppConfig;
use shutterspot::mock_profiles::mock_profiles;
use shutterspot::ZipSearch;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "REST API for zip search and photographer listings")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "SHUTTERSPOT_PORT", default_value = "8080")]
    port: u16,

    /// Directory holding quick.json and full.json
    #[arg(long, env = "SHUTTERSPOT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Remote base URL for the dataset files
    #[arg(long, env = "SHUTTERSPOT_DATA_URL")]
    data_url: Option<String>,

    /// Photographer profiles JSON
    #[arg(long, env = "SHUTTERSPOT_PROFILES")]
    profiles: Option<PathBuf>,

    /// Number of mock profiles to generate without --profiles
    #[arg(long, default_value = "48")]
    mock_profiles: usize,

    /// Seed for mock profile generation
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Load the full dataset in the background at startup
    #[arg(long)]
    prefetch: bool,
}

impl From<&Args> for AppConfig {
    fn from(args: &Args) -> Self {
        AppConfig {
            port: args.port,
            data_dir: args.data_dir.clone(),
            data_url: args.data_url.clone(),
            profiles_path: args.profiles.clone(),
            mock_profiles: args.mock_profiles,
            seed: args.seed,
            ..AppConfig::default()
        }
    }
}

fn print_banner(config: &AppConfig, profiles: usize) {
    println!("============================================================");
    println!("            SHUTTERSPOT MARKETPLACE API SERVER");
    println!("============================================================");
    println!();
    println!("  Port:      {}", config.port);
    println!("  REST:      http://localhost:{}/api/v1/", config.port);
    match &config.data_url {
        Some(url) => println!("  Datasets:  {}/data/", url),
        None => println!("  Datasets:  {}", config.data_dir.display()),
    }
    println!("  Profiles:  {}", profiles);
    println!();
    println!("REST Endpoints:");
    println!("  GET /api/v1/health               Health check");
    println!("  GET /api/v1/zips/search?q=X      Zip autocomplete");
    println!("  GET /api/v1/zips/:zip            Validate zip");
    println!("  GET /api/v1/photographers        Filtered listing");
    println!("  GET /api/v1/photographers/:id    Profile");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();
    let config = AppConfig::from(&args);

    let profiles = match &config.profiles_path {
        Some(path) => load_profiles(path)?,
        None => {
            info!("No profiles file given, generating {} mock profiles", config.mock_profiles);
            mock_profiles(config.mock_profiles, config.seed)
        }
    };

    let zips = ZipSearch::init(config.dataset_source(), config.search.clone()).await;
    if let Some(err) = zips.dataset().last_error().await {
        warn!("Starting without quick dataset: {}", err);
    }

    print_banner(&config, profiles.len());

    let service = Arc::new(MarketplaceService::new(zips, profiles));
    if args.prefetch {
        Arc::clone(&service).prefetch_full();
    }

    // Serve the dataset files only when they come from the local directory
    let data_dir = config.data_url.is_none().then_some(config.data_dir.as_path());
    let app = create_router(service, data_dir);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
