//! # Output Configuration
//!
//! This module sets up diagnostic output. Rendered configuration goes to
//! stdout and nothing else does; every log line goes to stderr through
//! `env_logger`, styled according to the user's color preference.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//! - `RUST_LOG` - Overrides the log level chosen on the command line

use std::env;

use env_logger::{Env, Target, WriteStyle};
use log::LevelFilter;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether log lines should be colored.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stderr is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stderr().features().colors_supported()
    }

    /// The `env_logger` write style matching this configuration.
    pub fn write_style(&self) -> WriteStyle {
        if self.use_color {
            WriteStyle::Always
        } else {
            WriteStyle::Never
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Pick the most verbose of the requested log level and the shortcut flags.
pub fn effective_level(level: LevelFilter, verbose: bool, debug: bool) -> LevelFilter {
    let mut effective = level;
    if verbose {
        effective = effective.max(LevelFilter::Info);
    }
    if debug {
        effective = effective.max(LevelFilter::Debug);
    }
    effective
}

/// Install the global logger, writing to stderr.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn init_logging(level: LevelFilter, config: &OutputConfig) {
    let level = level.to_string().to_lowercase();
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .target(Target::Stderr)
        .write_style(config.write_style())
        .format_timestamp(None)
        .init();
}
