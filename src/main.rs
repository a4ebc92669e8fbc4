use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tourguide::{Coordinates, TourGuide, TourGuideConfig, TourGuideError, web};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// TourGuide: points of interest, favorites and a voice-style assistant
#[derive(Parser, Debug)]
#[command(name = "tourguide")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the assistant, e.g. `tourguide ask what is nearby`
    Ask {
        /// Free-text command
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
    /// Show the catalog or a single point of interest
    Pois {
        /// POI identifier
        #[arg(long)]
        id: Option<String>,
    },
    /// List points of interest around a coordinate
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Search radius in kilometers
        #[arg(short, long)]
        radius: Option<f64>,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    /// List favorite points of interest
    List,
    /// Add or remove a favorite
    Toggle { id: String },
    /// Check whether a POI is a favorite
    Check { id: String },
    /// Remove all favorites
    Clear,
}

fn init_logging(config: &TourGuideConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Args::parse()).await {
        match e.downcast_ref::<TourGuideError>() {
            Some(err) => eprintln!("Error: {}", err.user_message()),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = TourGuideConfig::load_from_path(args.config.clone())
        .context("Failed to load configuration")?;
    init_logging(&config, args.verbose);

    let Some(command) = args.command else {
        print_overview(&config, args.config.as_ref(), args.verbose);
        return Ok(());
    };

    let guide = TourGuide::from_config(&config)?;

    match command {
        Command::Ask { words } => {
            let response = guide.assistant.process(&words.join(" ")).await;
            println!("{}", response.response_text);
            if let Some(poi) = response.referenced_poi {
                println!();
                print!("{poi}");
            }
        }
        Command::Pois { id: Some(id) } => {
            let poi = guide.catalog.get_by_id(&id)?;
            print!("{poi}");
            println!();
            println!("{}", poi.description);
        }
        Command::Pois { id: None } => {
            for poi in guide.catalog.get_all() {
                print!("{poi}");
            }
        }
        Command::Nearby { lat, lon, radius } => {
            let center = Coordinates::validated(lat, lon)?;
            let radius_km = radius.unwrap_or(config.proximity.default_radius_km);
            let nearby = guide.proximity.nearby(&center, radius_km)?;

            println!(
                "Found {} points of interest around {} (radius {}km):",
                nearby.len(),
                center.format_coordinates(),
                radius_km
            );
            for result in &nearby {
                println!("  - {} ({:.1}km away)", result.poi.name, result.distance_km);
            }
        }
        Command::Favorites { action } => match action {
            FavoritesAction::List => {
                let favorites = guide.favorites.list_favorites().await;
                if favorites.is_empty() {
                    println!("No favorites yet.");
                }
                for poi in favorites {
                    print!("{poi}");
                }
            }
            FavoritesAction::Toggle { id } => {
                let poi = guide.catalog.get_by_id(&id)?;
                if guide.favorites.toggle_favorite(&id).await? {
                    println!("Added {} to favorites", poi.name);
                } else {
                    println!("Removed {} from favorites", poi.name);
                }
            }
            FavoritesAction::Check { id } => {
                let favorite = guide.favorites.is_favorite(&id).await;
                println!("{id}: {}", if favorite { "favorite" } else { "not a favorite" });
            }
            FavoritesAction::Clear => {
                guide.favorites.clear().await?;
                println!("Cleared all favorites");
            }
        },
        Command::Serve { port } => {
            web::run(port.unwrap_or(config.server.port), guide).await?;
        }
    }

    Ok(())
}

fn print_overview(config: &TourGuideConfig, config_path: Option<&PathBuf>, verbose: bool) {
    println!("TourGuide v{}", tourguide::VERSION);
    println!("Try `tourguide ask what is nearby` or `tourguide --help`.");

    if verbose {
        let path = config_path
            .cloned()
            .or_else(TourGuideConfig::get_config_path)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string());
        println!("Using config from: {path}");
        println!("Store location: {}", config.storage.path);
        println!("Log level: {}", config.logging.level);
    }
}
