//! Terrain preparation driver.
//!
//! Wires the raster, renderer and feature crates into the batch flows used
//! to prepare terrain assets: coloring a heightfield from a reference
//! raster, shade reduction, heightfield generation, height to color
//! classification and airport placement.
//!
//! Every subcommand accepts typed overrides after `--`:
//!
//! ```text
//! terrain-prep gray2color --src dem.tif --ref ndvi.tif -- --bFlip no --iBlurSize 4
//! ```
//!
//! An override that does not follow the `--<s|b|i|f><Key> <value>` template
//! ends parsing; the options gathered so far are printed as JSON and the
//! program exits successfully without running the pipeline.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use raster_ops::ShadeConfig;
use renderer::MapperConfig;
use terrain_common::{parse_option_args, OptionMap, ParseOutcome, TerrainError};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::HeightfieldConfig;

#[derive(Parser, Debug)]
#[command(name = "terrain-prep")]
#[command(about = "Terrain raster preparation pipelines")]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Color a geo-referenced raster from a reference raster
    Gray2color {
        /// Source GeoTIFF
        #[arg(long)]
        src: PathBuf,

        /// Reference GeoTIFF providing the colors
        #[arg(long = "ref")]
        reference: PathBuf,

        /// Seed for the noise stage
        #[arg(long)]
        seed: Option<u64>,

        /// Typed overrides (`-- --bBlur no ...`)
        #[arg(last = true)]
        overrides: Vec<String>,
    },

    /// Reduce the number of shades in an image
    Reduceshades {
        #[arg(long)]
        src: PathBuf,

        /// Number of shade levels (default from SHADES_LEVELS or 32)
        #[arg(long)]
        levels: Option<usize>,

        /// Smoothing blur radius (default from SHADES_SMOOTHING_RADIUS or 4)
        #[arg(long)]
        radius: Option<usize>,

        #[arg(last = true)]
        overrides: Vec<String>,
    },

    /// Turn elevation data into a square terrain heightfield
    Heightfield {
        #[arg(long)]
        src: PathBuf,

        /// Boost multiplier numerator
        #[arg(long)]
        numerator: Option<f64>,

        /// Samples added to the power-of-two side
        #[arg(long)]
        margin: Option<usize>,

        /// Skip the histogram boost
        #[arg(long)]
        no_boost: bool,

        #[arg(last = true)]
        overrides: Vec<String>,
    },

    /// Classify a heightfield image into a colormap
    Colormap {
        #[arg(long)]
        src: PathBuf,

        #[arg(last = true)]
        overrides: Vec<String>,
    },

    /// Parse an apt.dat airport catalog into a feature store
    Airports {
        #[arg(long)]
        catalog: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(last = true)]
        overrides: Vec<String>,
    },

    /// Print the pixel position of stored features on a raster
    Features {
        #[arg(long)]
        raster: PathBuf,

        #[arg(long)]
        store: PathBuf,

        /// Convert feature coordinates instead of walking the pixels
        #[arg(long)]
        direct: bool,

        #[arg(last = true)]
        overrides: Vec<String>,
    },

    /// Describe a geo-referenced raster
    Info {
        #[arg(long)]
        src: PathBuf,

        #[arg(last = true)]
        overrides: Vec<String>,
    },
}

impl Command {
    fn overrides(&self) -> &[String] {
        match self {
            Command::Gray2color { overrides, .. }
            | Command::Reduceshades { overrides, .. }
            | Command::Heightfield { overrides, .. }
            | Command::Colormap { overrides, .. }
            | Command::Airports { overrides, .. }
            | Command::Features { overrides, .. }
            | Command::Info { overrides, .. } => overrides,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let options = match parse_option_args(args.command.overrides())? {
        ParseOutcome::Complete(options) => options,
        ParseOutcome::Stopped { options, at } => {
            warn!(argument = %args.command.overrides()[at], "Unrecognized override, stopping");
            println!("{}", options.to_json()?);
            return Ok(());
        }
    };

    run(args.command, &options)
}

fn run(command: Command, options: &OptionMap) -> Result<()> {
    match command {
        Command::Gray2color {
            src,
            reference,
            seed,
            ..
        } => {
            let mut config = MapperConfig::from_env();
            config.apply_options(options)?;
            let seed = match options.get_int("iSeed")? {
                Some(s) => Some(u64::try_from(s).map_err(|_| TerrainError::config("iSeed must be >= 0"))?),
                None => seed,
            };
            info!(config = ?config, "Starting gray2color");
            let out = commands::gray2color(&src, &reference, &config, seed)?;
            info!(output = %out.display(), "gray2color complete");
        }
        Command::Reduceshades {
            src, levels, radius, ..
        } => {
            let mut config = ShadeConfig::from_env();
            if let Some(levels) = levels {
                config.levels = levels;
            }
            if let Some(radius) = radius {
                config.smoothing_radius = radius;
            }
            if let Some(levels) = options.get_int("iLevels")? {
                config.levels = usize::try_from(levels).map_err(|_| TerrainError::config("iLevels must be >= 0"))?;
            }
            if let Some(radius) = options.get_int("iRadius")? {
                config.smoothing_radius =
                    usize::try_from(radius).map_err(|_| TerrainError::config("iRadius must be >= 0"))?;
            }
            info!(levels = config.levels, radius = config.smoothing_radius, "Starting reduceshades");
            let out = commands::reduce_shades(&src, &config)?;
            info!(output = %out.display(), "reduceshades complete");
        }
        Command::Heightfield {
            src,
            numerator,
            margin,
            no_boost,
            ..
        } => {
            let mut config = HeightfieldConfig::from_env();
            if let Some(numerator) = numerator {
                config.numerator = numerator;
            }
            if let Some(margin) = margin {
                config.margin = margin;
            }
            if no_boost {
                config.boost = false;
            }
            config.apply_options(options)?;
            info!(config = ?config, "Starting heightfield");
            let out = commands::heightfield(&src, &config)?;
            info!(output = %out.display(), "heightfield complete");
        }
        Command::Colormap { src, .. } => {
            let out = commands::colormap(&src)?;
            info!(output = %out.display(), "colormap complete");
        }
        Command::Airports { catalog, out, .. } => {
            let summary = commands::airports(&catalog, &out)?;
            info!(
                features = summary.features,
                skipped = summary.skipped,
                output = %out.display(),
                "airports complete"
            );
        }
        Command::Features {
            raster,
            store,
            direct,
            ..
        } => {
            for hit in commands::feature_hits(&raster, &store, direct)? {
                println!("{} {} {}", hit.x, hit.y, hit.id);
            }
        }
        Command::Info { src, .. } => {
            let description = commands::info(&src)?;
            info!(raster = %description, "info");
        }
    }

    Ok(())
}
