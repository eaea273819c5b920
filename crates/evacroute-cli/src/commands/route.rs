//! `route` command handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use evacroute_cli::output::{render_summary, OutputFormat};
use evacroute_lib::{Building, EvacuationState, HazardKind};

/// Arguments for a one-shot route computation.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Floor to route on; `None` means the building's first floor.
    pub floor: Option<String>,
    /// Selected position.
    pub from: String,
    /// Hazards applied to the routed floor before computing.
    pub hazards: Vec<(String, HazardKind)>,
}

/// Compute and print the route. A missing route is an outcome, not an error.
pub fn handle_route(
    building: Building,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let mut state = EvacuationState::new(Arc::new(building))?;
    if let Some(floor) = &args.floor {
        state.select_floor(floor)?;
    }
    let floor = state.floor_id().to_string();

    for (node, kind) in &args.hazards {
        state
            .set_hazard(&floor, node, *kind)
            .with_context(|| format!("cannot mark {node} as {kind}"))?;
    }
    state
        .select_position(Some(&args.from))
        .context("cannot start routing")?;

    let view = state.route()?;
    info!(
        floor = %floor,
        from = %args.from,
        found = view.outcome.is_found(),
        "route computed"
    );
    print!("{}", render_summary(&view.summary, format)?);
    Ok(())
}
