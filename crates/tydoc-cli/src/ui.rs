//! Status messages on stderr, so stdout stays clean for JSON.

use console::style;

/// Enable or disable colors for all messages.
pub fn init_colors(enabled: bool) {
    console::set_colors_enabled_stderr(enabled);
}

pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").for_stderr().green().bold(), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", style("ℹ").for_stderr().blue().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        style("⚠").for_stderr().yellow().bold(),
        style(message).for_stderr().yellow()
    );
}
