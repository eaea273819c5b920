//! `floors` command handler.

use anyhow::Result;

use evacroute_cli::output::{render_floors, OutputFormat};
use evacroute_lib::{Building, HazardStore};

/// Print every floor with its exits and stair rooms.
pub fn handle_floors(building: &Building, format: OutputFormat) -> Result<()> {
    let rendered = render_floors(building, &HazardStore::new(), format)?;
    print!("{rendered}");
    Ok(())
}
