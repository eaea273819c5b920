use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use evacroute_cli::output::OutputFormat;
use evacroute_lib::{load_building, Building, HazardKind};

mod commands;

use commands::route::RouteCommandArgs;

/// Environment variable naming a building definition file.
const BUILDING_ENV: &str = "EVACROUTE_BUILDING";

#[derive(Parser, Debug)]
#[command(author, version, about = "Hazard-aware evacuation routing")]
struct Cli {
    /// Building definition (JSON). Defaults to $EVACROUTE_BUILDING, then the
    /// built-in sample building.
    #[arg(long, global = true)]
    building: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List floors with their exits and stairs.
    Floors,
    /// Compute the evacuation route from a position.
    Route {
        /// Floor to route on. Defaults to the first floor of the building.
        #[arg(long)]
        floor: Option<String>,
        /// Current position (room or stair id; exits are rejected).
        #[arg(long = "from")]
        from: String,
        /// Hazard on the routed floor as NODE=KIND. May be repeated.
        #[arg(long = "hazard", value_name = "NODE=KIND", value_parser = parse_hazard_assignment)]
        hazards: Vec<(String, HazardKind)>,
    },
    /// Run commands from a script or stdin, re-routing after every change.
    Session {
        /// Read commands from this file instead of stdin.
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let building_path = cli
        .building
        .or_else(|| env::var_os(BUILDING_ENV).map(PathBuf::from));
    let building = resolve_building(building_path.as_deref())?;

    match cli.command {
        Command::Floors => commands::floors::handle_floors(&building, cli.format),
        Command::Route {
            floor,
            from,
            hazards,
        } => commands::route::handle_route(
            building,
            cli.format,
            &RouteCommandArgs {
                floor,
                from,
                hazards,
            },
        ),
        Command::Session { script } => {
            commands::session::handle_session(building, cli.format, script.as_deref())
        }
    }
}

fn resolve_building(path: Option<&Path>) -> Result<Building> {
    match path {
        Some(path) => load_building(path)
            .with_context(|| format!("failed to load building from {}", path.display())),
        None => {
            debug!("no building given; using the built-in sample");
            Ok(Building::sample())
        }
    }
}

fn parse_hazard_assignment(value: &str) -> std::result::Result<(String, HazardKind), String> {
    let (node, kind) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NODE=KIND, got '{value}'"))?;
    let node = node.trim();
    if node.is_empty() {
        return Err(format!("missing node in '{value}'"));
    }
    let kind = kind.parse::<HazardKind>().map_err(|err| err.to_string())?;
    Ok((node.to_string(), kind))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
