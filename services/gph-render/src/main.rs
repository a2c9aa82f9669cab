//! Reanalysis height map renderer.
//!
//! Loads a NOAA-CIRES 20th Century Reanalysis V2 500 mb geopotential height
//! file, converts it to physical units and dates, and draws one day as a
//! filled contour map on an orthographic globe.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{CliOverrides, FileConfig};
use reanalysis_common::TimeUnits;
use renderer::RenderOutcome;

#[derive(Parser, Debug)]
#[command(name = "gph-render")]
#[command(about = "Render 500 mb geopotential height maps from reanalysis NetCDF files")]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw one day as a PNG map
    Render(RenderArgs),
    /// Print a summary of a data file
    Inspect {
        /// NetCDF file to read
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// NetCDF file to read
    file: PathBuf,

    /// Zero-based day index (default 46)
    #[arg(short, long)]
    day: Option<usize>,

    /// Output PNG path (default gph.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Open the map in the system image viewer instead of saving it
    #[arg(long, conflicts_with = "output")]
    show: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TrueType font replacing the embedded one
    #[arg(long)]
    font: Option<PathBuf>,

    /// GeoJSON coastlines replacing the embedded outline
    #[arg(long)]
    coastlines: Option<PathBuf>,

    /// Output resolution in dots per inch
    #[arg(long)]
    dpi: Option<u32>,
}

impl RenderArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            day: self.day,
            output: self.output.clone(),
            show: self.show,
            font: self.font.clone(),
            coastlines: self.coastlines.clone(),
            dpi: self.dpi,
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_tracing(level: Level, format: LogFormat) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(parse_level(&cli.log_level), cli.log_format)?;

    match cli.command {
        Command::Render(args) => run_render(&args),
        Command::Inspect { file, json } => run_inspect(&file, json),
    }
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let request = file_config.to_request(&args.overrides());

    info!(
        file = %args.file.display(),
        day_index = request.day_index,
        target = ?request.target,
        "Rendering height map"
    );

    let raw = netcdf_parser::load(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let data = grid_processor::prepare(&raw)
        .with_context(|| format!("Failed to prepare {}", args.file.display()))?;
    let outcome = renderer::render(&data, &request).context("Failed to render map")?;

    match outcome {
        RenderOutcome::File(path) => println!("{}", path.display()),
        RenderOutcome::Displayed(path) => info!(path = %path.display(), "Map handed to viewer"),
    }
    Ok(())
}

fn run_inspect(file: &Path, json: bool) -> Result<()> {
    let summary = netcdf_parser::inspect(file)
        .with_context(|| format!("Failed to inspect {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("source:      {}", summary.source.display());
    println!("level:       {} mb", summary.level);
    println!("time steps:  {}", summary.time_steps);
    if let Some(units) = &summary.time_units {
        println!("time units:  {}", units);
    }
    if let Some((first, last)) = summary.time_range {
        println!("time range:  {} .. {}", first, last);
        if let Some(units) = &summary.time_units {
            if let Some(dates) = date_range(units, first, last) {
                println!("dates:       {}", dates);
            }
        }
    }
    if let Some((first, last)) = summary.lat_range {
        println!("lat:         {} points, {} .. {}", summary.lat_count, first, last);
    }
    if let Some((first, last)) = summary.lon_range {
        println!("lon:         {} points, {} .. {}", summary.lon_count, first, last);
    }
    println!(
        "hgt:         units {}, scale_factor {}, add_offset {}",
        summary.hgt_units.as_deref().unwrap_or("?"),
        fmt_opt(summary.scale_factor),
        fmt_opt(summary.add_offset),
    );
    Ok(())
}

/// First and last date of the time axis, if the units can be interpreted.
fn date_range(units: &str, first: f64, last: f64) -> Option<String> {
    let units = TimeUnits::parse(units).ok()?;
    let first = units.instant(first).ok()?;
    let last = units.instant(last).ok()?;
    Some(format!(
        "{} .. {}",
        first.format(grid_processor::DATE_FORMAT),
        last.format(grid_processor::DATE_FORMAT)
    ))
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "missing".to_string(), |v| v.to_string())
}
