// Subcommand handlers. main.rs parses arguments and dispatches here.

pub mod floors;
pub mod route;
pub mod session;
