//! Line-oriented what-if session.
//!
//! Each input line is one command. After every command that changes the
//! floor, the position or a hazard, the route is recomputed from a fresh
//! snapshot and rendered again.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, warn};

use evacroute_lib::{EvacuationState, HazardKind};

use crate::output::{render_node_statuses, render_summary, OutputFormat};
use crate::terminal::ColorPalette;

const HELP: &str = "\
commands:
  floor <floor>           view another floor (clears the position)
  select <room>           set the current position (exits are rejected)
  deselect                clear the current position
  hazard <node> <kind>    mark a node: fire, smoke, blocked, closed, exit-blocked, clear
  clear <node>            remove the hazard on a node
  reset                   remove every hazard on this floor
  stairs <floor>          take the stairs from a stair node to another floor
  route                   show the current route
  status                  show every node with its hazard and route marker
  help                    show this list
  quit                    end the session
";

/// One parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Floor(String),
    Select(String),
    Deselect,
    Hazard(String, HazardKind),
    Clear(String),
    Reset,
    Stairs(String),
    Route,
    Status,
    Help,
    Quit,
}

impl SessionCommand {
    /// Whether the command changes state and therefore re-renders the route.
    pub fn changes_state(&self) -> bool {
        matches!(
            self,
            SessionCommand::Floor(_)
                | SessionCommand::Select(_)
                | SessionCommand::Deselect
                | SessionCommand::Hazard(..)
                | SessionCommand::Clear(_)
                | SessionCommand::Reset
                | SessionCommand::Stairs(_)
        )
    }
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| anyhow!("empty command"))?
            .to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match (verb.as_str(), args.as_slice()) {
            ("floor", [floor]) => SessionCommand::Floor(floor.to_string()),
            ("select", [node]) => SessionCommand::Select(node.to_string()),
            ("deselect", []) => SessionCommand::Deselect,
            ("hazard", [node, kind]) => {
                SessionCommand::Hazard(node.to_string(), kind.parse::<HazardKind>()?)
            }
            ("clear", [node]) => SessionCommand::Clear(node.to_string()),
            ("reset", []) => SessionCommand::Reset,
            ("stairs", [floor]) => SessionCommand::Stairs(floor.to_string()),
            ("route", []) => SessionCommand::Route,
            ("status", []) => SessionCommand::Status,
            ("help" | "?", []) => SessionCommand::Help,
            ("quit" | "exit", []) => SessionCommand::Quit,
            (
                "floor" | "select" | "deselect" | "hazard" | "clear" | "reset" | "stairs"
                | "route" | "status" | "help" | "quit",
                _,
            ) => bail!("wrong number of arguments for '{verb}' (try 'help')"),
            _ => bail!("unknown command '{verb}' (try 'help')"),
        };
        Ok(command)
    }
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub commands: usize,
    pub errors: usize,
}

/// Drives an [`EvacuationState`] from text commands.
pub struct Session<'a, W: Write> {
    state: &'a mut EvacuationState,
    format: OutputFormat,
    palette: ColorPalette,
    out: W,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(
        state: &'a mut EvacuationState,
        format: OutputFormat,
        palette: ColorPalette,
        out: W,
    ) -> Self {
        Self {
            state,
            format,
            palette,
            out,
        }
    }

    /// Read commands until end of input or `quit`.
    ///
    /// Command errors are reported inline and the session continues; only
    /// I/O failures end it early.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<SessionReport> {
        let mut report = SessionReport::default();
        self.render_route()?;

        for (number, line) in input.lines().enumerate() {
            let line = line.context("failed to read session input")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            report.commands += 1;
            match self.execute_line(line) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    report.errors += 1;
                    warn!(line = number + 1, error = %err, "session command failed");
                    writeln!(self.out, "error: {err:#}")?;
                }
            }
        }

        self.out.flush()?;
        Ok(report)
    }

    /// Execute one line. Returns `Ok(false)` when the session should end.
    pub fn execute_line(&mut self, line: &str) -> Result<bool> {
        let command: SessionCommand = line.parse()?;
        debug!(?command, "session command");
        if command == SessionCommand::Quit {
            return Ok(false);
        }
        self.apply(&command)?;
        if command.changes_state() {
            self.render_route()?;
        }
        Ok(true)
    }

    fn apply(&mut self, command: &SessionCommand) -> Result<()> {
        let floor = self.state.floor_id().to_string();
        match command {
            SessionCommand::Floor(target) => self.state.select_floor(target)?,
            SessionCommand::Select(node) => self.state.select_position(Some(node))?,
            SessionCommand::Deselect => self.state.select_position(None)?,
            SessionCommand::Hazard(node, kind) => self.state.set_hazard(&floor, node, *kind)?,
            SessionCommand::Clear(node) => {
                let previous = self.state.clear_hazard(&floor, node)?;
                writeln!(self.out, "cleared {previous} on {node}")?;
            }
            SessionCommand::Reset => {
                let removed = self.state.clear_floor_hazards(&floor)?;
                writeln!(self.out, "removed {removed} hazards on {floor}")?;
            }
            SessionCommand::Stairs(target) => {
                let arrival = self.state.take_stairs(target)?.to_string();
                writeln!(self.out, "took stairs to {target}, now at {arrival}")?;
            }
            SessionCommand::Route => self.render_route()?,
            SessionCommand::Status => self.render_status()?,
            SessionCommand::Help => self.out.write_all(HELP.as_bytes())?,
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    fn render_route(&mut self) -> Result<()> {
        let view = self.state.route()?;
        let rendered = render_summary(&view.summary, self.format)?;
        self.out.write_all(rendered.as_bytes())?;
        Ok(())
    }

    fn render_status(&mut self) -> Result<()> {
        let view = self.state.route()?;
        let floor = self.state.current_floor()?;
        let rendered = render_node_statuses(floor, &view.nodes, self.format, self.palette)?;
        self.out.write_all(rendered.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use evacroute_lib::Building;

    fn run(script: &str) -> (String, SessionReport) {
        let mut state = EvacuationState::new(Arc::new(Building::sample())).unwrap();
        let mut out = Vec::new();
        let report = Session::new(
            &mut state,
            OutputFormat::Text,
            ColorPalette::plain(),
            &mut out,
        )
        .run(script.as_bytes())
        .unwrap();
        (String::from_utf8(out).unwrap(), report)
    }

    #[test]
    fn parses_commands_and_hazard_kinds() {
        assert_eq!(
            "hazard washroom exit-blocked".parse::<SessionCommand>().unwrap(),
            SessionCommand::Hazard("washroom".to_string(), HazardKind::ExitBlocked)
        );
        assert_eq!(
            "  SELECT main_hall ".parse::<SessionCommand>().unwrap(),
            SessionCommand::Select("main_hall".to_string())
        );
        assert!("hazard washroom lava".parse::<SessionCommand>().is_err());
        assert!("select".parse::<SessionCommand>().is_err());
        assert!("teleport A".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn route_rerenders_after_each_change() {
        let (out, report) = run("select main_hall\nhazard washroom blocked\nclear washroom\n");
        assert_eq!(report, SessionReport { commands: 3, errors: 0 });
        assert!(out.starts_with("No route on Ground Floor from <none selected>"));
        let routes: Vec<&str> = out
            .lines()
            .filter(|line| line.starts_with("Route on"))
            .collect();
        assert_eq!(
            routes,
            vec![
                "Route on Ground Floor: Main Hall -> Exit A (distance 2, 2 hops)",
                "Route on Ground Floor: Main Hall -> Exit B (distance 2, 2 hops)",
                "Route on Ground Floor: Main Hall -> Exit A (distance 2, 2 hops)",
            ]
        );
        assert!(out.contains("cleared blocked on washroom"));
    }

    #[test]
    fn errors_are_reported_and_session_continues() {
        let (out, report) = run("select kitchn\nselect kitchen\n");
        assert_eq!(report.errors, 1);
        assert!(out.contains("error: unknown node kitchn on floor ground. Did you mean 'kitchen'?"));
        assert!(out.contains("Route on Ground Floor: Kitchen -> Exit B"));
    }

    #[test]
    fn selecting_an_exit_keeps_the_previous_position() {
        let (out, report) = run("select kitchen\nselect B\n");
        assert_eq!(report.errors, 1);
        assert!(out.contains("error: B on floor ground is an exit"));
        assert!(!out.contains("Route on Ground Floor: Exit B"));
    }

    #[test]
    fn quit_stops_reading() {
        let (out, report) = run("# comment\n\nquit\nselect kitchen\n");
        assert_eq!(report.commands, 1);
        assert!(!out.contains("Kitchen"));
    }

    #[test]
    fn stairs_switch_floor_and_route_from_arrival() {
        let (out, report) = run("select stair_g\nstairs first\n");
        assert_eq!(report.errors, 0);
        assert!(out.contains("took stairs to first, now at stair_1"));
        assert!(out.contains("Route on First Floor: First Floor Stairs -> Fire Escape"));
    }
}
