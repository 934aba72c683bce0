use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mapcanvas::config::{CanvasConfig, ConfigError};
use mapcanvas::consts::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};
use mapcanvas::overlay::graticule;
use mapcanvas::smooth::smooth_stroke;
use mapcanvas::{
    GeoCoord, MapExtent, Point, Stroke, adjust_for_sphere_distortion, classify::classify_with, flat_to_geo,
    geo_to_flat, simplify,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stroke has no points")]
    EmptyStroke,
    #[error("map extent {width}x{height} is not usable; both sides must be positive")]
    InvalidExtent { width: f64, height: f64 },
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Parser, Debug)]
#[command(name = "mapcanvas", about = "Map canvas geometry: stroke classification, simplification and projection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// JSON file to read; stdin when omitted.
    #[arg(long, short)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExtentArgs {
    #[arg(long, env = "MAPCANVAS_MAP_WIDTH", default_value_t = DEFAULT_MAP_WIDTH)]
    width: f64,
    #[arg(long, env = "MAPCANVAS_MAP_HEIGHT", default_value_t = DEFAULT_MAP_HEIGHT)]
    height: f64,
}

impl ExtentArgs {
    fn extent(&self) -> Result<MapExtent, CliError> {
        let extent = MapExtent::new(self.width, self.height);
        if extent.is_valid() {
            Ok(extent)
        } else {
            Err(CliError::InvalidExtent { width: self.width, height: self.height })
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a stroke (`[{"x":..,"y":..}, ...]`) as a circle, rectangle or polygon.
    Classify {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Simplify a polyline with Ramer-Douglas-Peucker.
    Simplify {
        #[arg(long, short)]
        tolerance: f64,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Smooth a stroke into quadratic path segments.
    Smooth {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Map pixels to latitude/longitude.
    ToGeo {
        #[command(flatten)]
        extent: ExtentArgs,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Latitude/longitude (`[{"lat":..,"lon":..}, ...]`) to map pixels.
    ToFlat {
        #[command(flatten)]
        extent: ExtentArgs,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Compensate a stroke drawn in sphere mode for high-latitude stretching.
    Adjust {
        #[command(flatten)]
        extent: ExtentArgs,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Emit graticule lines for a map.
    Graticule {
        #[command(flatten)]
        extent: ExtentArgs,
        /// Degrees between lines; defaults to the configured spacing.
        #[arg(long)]
        spacing: Option<u32>,
    },
}

fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays clean JSON.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = CanvasConfig::from_env()?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Classify { input } => {
            let stroke = Stroke::new(read_input::<Vec<Point>>(&input)?).ok_or(CliError::EmptyStroke)?;
            let shape = classify_with(&stroke, &config.classifier);
            info!(samples = stroke.points().len(), kind = %shape.kind(), "stroke classified");
            print_json(&shape)
        }
        Command::Simplify { tolerance, input } => {
            let points: Vec<Point> = read_input(&input)?;
            let simplified = simplify(&points, tolerance);
            info!(before = points.len(), after = simplified.len(), tolerance, "polyline simplified");
            print_json(&simplified)
        }
        Command::Smooth { input } => print_json(&smooth_stroke(&read_input::<Vec<Point>>(&input)?)),
        Command::ToGeo { extent, input } => {
            let extent = extent.extent()?;
            let points: Vec<Point> = read_input(&input)?;
            let coords: Vec<GeoCoord> = points.iter().filter_map(|&p| flat_to_geo(p, extent)).collect();
            print_json(&coords)
        }
        Command::ToFlat { extent, input } => {
            let extent = extent.extent()?;
            let coords: Vec<GeoCoord> = read_input(&input)?;
            let points: Vec<Point> = coords.iter().filter_map(|&g| geo_to_flat(g, extent)).collect();
            print_json(&points)
        }
        Command::Adjust { extent, input } => {
            let extent = extent.extent()?;
            let points: Vec<Point> = read_input(&input)?;
            print_json(&adjust_for_sphere_distortion(&points, extent))
        }
        Command::Graticule { extent, spacing } => {
            let extent = extent.extent()?;
            let spacing = spacing.unwrap_or(config.graticule_spacing);
            print_json(&graticule(extent, spacing, spacing))
        }
    }
}

fn read_input<T: DeserializeOwned>(args: &InputArgs) -> Result<T, CliError> {
    let mut raw = String::new();
    match &args.input {
        Some(path) => BufReader::new(File::open(path)?).read_to_string(&mut raw)?,
        None => io::stdin().lock().read_to_string(&mut raw)?,
    };
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
