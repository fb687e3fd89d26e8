use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stgeometry::config::Settings;
use stgeometry::{CoordinateSystem, Geometry, GeometryKind, StGeometry};

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("Geometry error: {0}")]
    Geometry(#[from] stgeometry::Error),
    #[error("Invalid hex payload: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("Cannot serialize the summary: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// The kind of geometry a payload holds. Payloads do not record it.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Point,
    Linestring,
}

impl From<KindArg> for GeometryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Point => GeometryKind::Point,
            // Polylines decode the same way with or without Z.
            KindArg::Linestring => GeometryKind::LineString,
        }
    }
}

/// Command line arguments for the ST_Geometry codec.
#[derive(Debug, Parser)]
#[clap(name = "stgeom")]
struct CliArgs {
    /// Optional path to the configuration file. If not provided, it is expected
    /// that all parameters are provided via environment variables.
    #[clap(short = 'c', long, required = false)]
    config: Option<PathBuf>,

    #[clap(short = 'o', long = "output-format", default_value = "pretty")]
    output_format: Option<LogOutputFormat>,

    #[clap(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Encode a coordinate-text and print the payload as hex
    Encode(EncodeArgs),
    /// Decode a hex payload and print its coordinate-text
    Decode(PayloadArgs),
    /// Decode a hex payload and print the record stored beside it as JSON
    Summary(PayloadArgs),
}

#[derive(Debug, Args)]
struct EncodeArgs {
    /// For example "POINT Z (1 2 3)" or "LINESTRING (0 0, 1 1)".
    text: String,
}

#[derive(Debug, Args)]
struct PayloadArgs {
    /// The kind of geometry the payload holds.
    #[clap(long, value_enum)]
    kind: KindArg,
    /// The payload, hex encoded.
    payload: String,
}

fn decode(args: &PayloadArgs, system: &CoordinateSystem) -> Result<Geometry, Error> {
    let payload = hex::decode(args.payload.trim())?;
    let geometry = Geometry::from_payload(args.kind.into(), &payload, system)?;
    Ok(geometry)
}

fn run(command: &CliCommand, system: &CoordinateSystem) -> Result<String, Error> {
    match command {
        CliCommand::Encode(args) => {
            let geometry = Geometry::from_text(&args.text, system)?;
            Ok(hex::encode(geometry.as_bytes()))
        }
        CliCommand::Decode(args) => Ok(decode(args, system)?.to_string()),
        CliCommand::Summary(args) => {
            let summary = decode(args, system)?.summary(system);
            Ok(serde_json::to_string_pretty(&summary)?)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let pretty = matches!(args.output_format, Some(LogOutputFormat::Pretty));
    stgeometry::logging::setup_logging("warn,stgeometry=info", pretty);

    // Load the configuration file and/or environment variables.
    let settings = Settings::new(args.config)?;
    let system = settings.coordinate_system()?;

    tracing::debug!(srid = system.srid(), command = ?args.command, "running command");
    let output = run(&args.command, &system)?;
    println!("{output}");

    Ok(())
}
