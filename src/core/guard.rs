//! Required-value guards
//!
//! Values read at the boundary (environment variables, config tables, resolved
//! channel names) are classified once into a [`Presence`] and then checked with
//! [`require`]. Anything other than `Present` is a fatal validation error.

use crate::core::error::{ShipResult, ValidationError};

/// How a boundary value was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
  Absent,
  EmptyString,
  EmptyMap,
  Present,
}

impl Presence {
  /// Classify an optional string
  pub fn of_str(value: Option<&str>) -> Self {
    match value {
      None => Presence::Absent,
      Some(s) if s.trim().is_empty() => Presence::EmptyString,
      Some(_) => Presence::Present,
    }
  }

  /// Classify a map-like value by its length
  pub fn of_len(len: Option<usize>) -> Self {
    match len {
      None => Presence::Absent,
      Some(0) => Presence::EmptyMap,
      Some(_) => Presence::Present,
    }
  }

  fn describe(self) -> &'static str {
    match self {
      Presence::Absent => "not set",
      Presence::EmptyString => "an empty string",
      Presence::EmptyMap => "an empty table",
      Presence::Present => "present",
    }
  }
}

/// Fail unless `presence` is `Present`
pub fn require(name: &str, presence: Presence) -> ShipResult<()> {
  match presence {
    Presence::Present => Ok(()),
    other => {
      tracing::error!(name, state = other.describe(), "required value missing");
      Err(
        ValidationError::MissingValue {
          name: name.to_string(),
          state: other.describe(),
        }
        .into(),
      )
    }
  }
}

/// Require a string value and hand it back
pub fn require_str<'a>(name: &str, value: Option<&'a str>) -> ShipResult<&'a str> {
  require(name, Presence::of_str(value))?;
  Ok(value.unwrap_or_default())
}

/// Require that an environment variable is set to a non-empty value
pub fn require_env(name: &str) -> ShipResult<String> {
  let value = std::env::var(name).ok();
  require_str(name, value.as_deref()).map(str::to_string)
}
