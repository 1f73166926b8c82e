use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::Coordinates;
use crate::{Result, WeatherAiError};

#[derive(Parser, Debug)]
#[command(
    name = "weatherai",
    version,
    about = "Rain probability and feels-like estimates for the next four days"
)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server and dashboard (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the 4-day rain forecast
    Forecast {
        #[command(flatten)]
        coordinates: CoordinateArgs,
        /// Print the API payload instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print current conditions with the feels-like estimate
    Now {
        #[command(flatten)]
        coordinates: CoordinateArgs,
    },
    /// Print the location detected from this machine's IP
    Location,
}

/// Optional explicit position. Without it the IP location is used.
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct CoordinateArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,
}

impl CoordinateArgs {
    /// Both or neither must be given
    pub fn coordinates(&self) -> Result<Option<Coordinates>> {
        match (self.lat, self.lng) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng).map(Some),
            _ => Err(WeatherAiError::invalid_coordinates(
                "both --lat and --lng must be supplied together",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["weatherai"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_forecast_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "weatherai", "forecast", "--lat", "-33.87", "--lng", "151.21", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Forecast { coordinates, json }) => {
                assert!(json);
                assert_eq!(
                    coordinates.coordinates().unwrap(),
                    Some(Coordinates::new(-33.87, 151.21).unwrap())
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_single_coordinate_is_rejected() {
        let args = CoordinateArgs {
            lat: Some(12.97),
            lng: None,
        };
        assert!(matches!(
            args.coordinates(),
            Err(WeatherAiError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["weatherai", "now", "--verbose", "--config", "x.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
