//! Diagnostic logging to stderr
//!
//! Command results go to stdout with `println!`; everything here is diagnostics.
//! The filter comes from `SHIPLINE_LOG` when set, else from the `-v` count.

use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "SHIPLINE_LOG";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
  /// Compact single-line format
  #[default]
  Compact,
  /// Structured JSON, one object per line
  Json,
}

/// Map `-v` occurrences to a level (default: warn)
pub fn level_for(verbosity: u8) -> Level {
  match verbosity {
    0 => Level::WARN,
    1 => Level::INFO,
    2 => Level::DEBUG,
    _ => Level::TRACE,
  }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbosity: u8, format: LogFormat) {
  let filter = EnvFilter::try_from_env(LOG_ENV)
    .unwrap_or_else(|_| EnvFilter::new(format!("shipline={}", level_for(verbosity).as_str().to_lowercase())));

  let registry = tracing_subscriber::registry().with(filter);

  let result = match format {
    LogFormat::Compact => registry
      .with(
        tracing_subscriber::fmt::layer()
          .compact()
          .with_writer(std::io::stderr)
          .with_target(false),
      )
      .try_init(),
    LogFormat::Json => registry
      .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
      .try_init(),
  };

  if result.is_ok() {
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), ?format, "logging initialized");
  }
}
