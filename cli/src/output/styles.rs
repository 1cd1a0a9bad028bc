//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Centralized stylesheet for diagnostic output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Echoed command lines (cyan)
    pub command: Style,
    /// Transfer script lines (dimmed)
    pub script: Style,
    /// Error messages (red)
    pub error: Style,
    /// Leading marker of echoed lines
    pub marker: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.command = Style::new().cyan();
        self.script = Style::new().dimmed();
        self.error = Style::new().red();
        self.marker = Style::new().bold();
    }
}
