use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::Parser;
use tracing::{error, info, warn};

use weatherai::api::{AppState, ForecastPayload};
use weatherai::cli::{Cli, Commands};
use weatherai::{WeatherAiConfig, WeatherAiError, build_service, report, telemetry, web};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = WeatherAiConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;

    // The OTLP exporter builds a blocking HTTP client, which must happen
    // outside the async runtime.
    let _telemetry = telemetry::init(&config.logging, cli.verbose)?;

    if config.weather.require_api_key().is_err() {
        warn!("OPENWEATHER_API_KEY is not set; forecast requests will fail until it is configured");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }), config))
}

async fn run(command: Commands, mut config: WeatherAiConfig) -> Result<()> {
    let service = build_service(&config).context("Failed to initialise forecast service")?;

    match command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting WeatherAI {}", weatherai::VERSION);
            web::run(AppState::new(service), &config.server).await
        }
        Commands::Forecast { coordinates, json } => {
            let coordinates = coordinates.coordinates().map_err(report_error)?;
            let forecast = service.forecast(coordinates).await.map_err(report_error)?;
            if json {
                let payload = ForecastPayload::from(forecast);
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{}", report::render_forecast(&forecast));
            }
            Ok(())
        }
        Commands::Now { coordinates } => {
            let coordinates = coordinates.coordinates().map_err(report_error)?;
            let current = service.current(coordinates).await.map_err(report_error)?;
            print!("{}", report::render_current(&current, Utc::now()));
            Ok(())
        }
        Commands::Location => {
            let location = service.locate().await.map_err(report_error)?;
            println!(
                "{} ({:.2}°, {:.2}°)",
                location.label(),
                location.latitude,
                location.longitude
            );
            Ok(())
        }
    }
}

/// Log the full error and surface the user-facing message
fn report_error(err: WeatherAiError) -> anyhow::Error {
    error!(kind = err.code(), "{}", err);
    anyhow!(err.user_message())
}
