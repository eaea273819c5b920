//! Terminal colour detection and the palette used for floor status listings.

/// ANSI escape codes used by the status view.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for node names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for ids and decorations.
    pub const GRAY: &str = "\x1b[90m";
    /// Red for impassable nodes.
    pub const RED: &str = "\x1b[31m";
    /// Yellow for exits that may not be used.
    pub const YELLOW: &str = "\x1b[33m";
    /// Green for nodes on the current route.
    pub const GREEN: &str = "\x1b[32m";
    /// Cyan for the selected position.
    pub const CYAN: &str = "\x1b[36m";
}

/// Resolved colour codes, either ANSI sequences or empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub name: &'static str,
    pub muted: &'static str,
    pub impassable: &'static str,
    pub exit_blocked: &'static str,
    pub on_route: &'static str,
    pub selected: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            name: colors::WHITE_BOLD,
            muted: colors::GRAY,
            impassable: colors::RED,
            exit_blocked: colors::YELLOW,
            on_route: colors::GREEN,
            selected: colors::CYAN,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            name: "",
            muted: "",
            impassable: "",
            exit_blocked: "",
            on_route: "",
            selected: "",
        }
    }

    /// Palette matching what the environment allows.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Whether ANSI colour output should be used.
///
/// Honours `NO_COLOR` (<https://no-color.org/>) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}
