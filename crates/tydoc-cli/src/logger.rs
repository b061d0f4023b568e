//! Logging setup for the tydoc CLI.
//!
//! The level is chosen in this order:
//! 1. `--verbose`: DEBUG for tydoc crates
//! 2. `--quiet`: ERROR only
//! 3. `RUST_LOG` environment variable
//! 4. the `settings.log_level` config value, applied with [`init_logger_with_level`]
//! 5. INFO for tydoc crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: [&str; 4] = ["tydoc", "tydoc_binder", "tydoc_config", "tydoc_cli"];

/// Initialize the tracing subscriber with the specified options.
///
/// Call once, before any logging occurs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_level(verbose, quiet, no_color, None);
}

/// Like [`init_logger`], with a fallback level used when neither a flag nor
/// `RUST_LOG` decides.
pub fn init_logger_with_level(verbose: bool, quiet: bool, no_color: bool, level: Option<&str>) {
    init_logger_with_filter(build_filter(verbose, quiet, level), no_color);
}

/// Initialize logger with custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // A second initialization (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn build_filter(verbose: bool, quiet: bool, level: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new(directives("debug"));
    }
    if quiet {
        return EnvFilter::new(directives("error"));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.unwrap_or("info");
        EnvFilter::try_new(directives(level)).unwrap_or_else(|_| EnvFilter::new(directives("info")))
    })
}

fn directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Whether colored output should be used, honoring `NO_COLOR` and
/// `FORCE_COLOR` before terminal detection.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        assert_eq!(
            directives("debug"),
            "tydoc=debug,tydoc_binder=debug,tydoc_config=debug,tydoc_cli=debug"
        );
    }

    #[test]
    fn colored_logger_initializes() {
        init_logger(true, false, false);
        tracing::debug!("colored logger ready");
    }

    #[test]
    fn flags_build_filters() {
        let verbose = build_filter(true, false, None).to_string();
        assert!(verbose.contains("tydoc=debug"));
        let quiet = build_filter(false, true, Some("trace")).to_string();
        assert!(quiet.contains("tydoc=error"));
    }
}
