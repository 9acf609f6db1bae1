use easyloop::config::Config;
use easyloop::models::LoopRequest;
use easyloop::{AppError, AppState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        "\
Usage: generate --address=ADDRESS [OPTIONS]

Options:
  --address=ADDRESS     Start address (required)
  --distance=KM         Target loop distance in km, 1-50 (default: 5)
  --count=N             Number of loops to generate (default: LOOP_BATCH_SIZE)
  --seed=N              Seed the waypoint generator for reproducible loops
  --geojson             Print only the drawn map layers as GeoJSON
  --help                Show this help message"
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (less verbose for one-shot runs)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easyloop=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI args
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        return Ok(());
    }

    let Some(address) = args.iter().find_map(|a| a.strip_prefix("--address=")) else {
        print_help();
        return Err("--address is required".into());
    };
    let distance_km: f64 = match args.iter().find_map(|a| a.strip_prefix("--distance=")) {
        Some(value) => value
            .parse()
            .map_err(|_| format!("Invalid --distance: {}", value))?,
        None => 5.0,
    };
    let count: Option<usize> = match args.iter().find_map(|a| a.strip_prefix("--count=")) {
        Some(value) => Some(
            value
                .parse()
                .map_err(|_| format!("Invalid --count: {}", value))?,
        ),
        None => None,
    };
    let seed: Option<u64> = match args.iter().find_map(|a| a.strip_prefix("--seed=")) {
        Some(value) => Some(
            value
                .parse()
                .map_err(|_| format!("Invalid --seed: {}", value))?,
        ),
        None => None,
    };
    let geojson_only = args.iter().any(|a| a == "--geojson");

    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;
    let state = AppState::from_config(&config)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let request = LoopRequest::new(address, distance_km);
    let count = count.unwrap_or(config.loop_generator.batch_size);

    let report = match state
        .orchestrator
        .generate_loops(&request, count, &mut rng)
        .await
    {
        Ok(report) => report,
        Err(AppError::AddressNotFound(address)) => {
            eprintln!("Address not found: {}", address);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    eprintln!("{}", report.message);

    let layers = state.surface.snapshot().map(|snapshot| snapshot.layers);
    let output = if geojson_only {
        serde_json::to_string_pretty(&layers)?
    } else {
        serde_json::to_string_pretty(&json!({
            "report": report,
            "layers": layers,
        }))?
    };
    println!("{}", output);

    Ok(())
}
