//! Evacuation routing CLI library.
//!
//! Rendering, terminal detection and the interactive session loop live here
//! so they can be tested without spawning the binary.

pub mod output;
pub mod session;
pub mod terminal;
