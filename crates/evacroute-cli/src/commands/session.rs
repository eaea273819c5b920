//! `session` command handler.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use evacroute_cli::output::OutputFormat;
use evacroute_cli::session::Session;
use evacroute_cli::terminal::ColorPalette;
use evacroute_lib::{Building, EvacuationState};

/// Run a session against stdout, reading from `script` or stdin.
pub fn handle_session(
    building: Building,
    format: OutputFormat,
    script: Option<&Path>,
) -> Result<()> {
    let mut state = EvacuationState::new(Arc::new(building))?;
    let stdout = io::stdout();
    let mut session = Session::new(&mut state, format, ColorPalette::detect(), stdout.lock());

    let report = match script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open session script {}", path.display()))?;
            session.run(BufReader::new(file))?
        }
        None => session.run(io::stdin().lock())?,
    };

    info!(
        commands = report.commands,
        errors = report.errors,
        "session finished"
    );
    Ok(())
}
