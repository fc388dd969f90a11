//! Error types for shipline with contextual messages and exit codes
//!
//! Every failure in the pipeline is fatal: commands bubble a `ShipError` up to
//! `main`, which prints it and exits with the code from [`ShipError::exit_code`].
//! Subprocess failures carry their own exit code so it can be propagated outward.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes produced by shipline itself
///
/// Subprocess failures propagate the child's code instead (see [`SubprocessError`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Validation, configuration, guard and I/O failures
  Failure = 1,
  /// A subprocess exited 0 although 0 was not an allowed exit code
  DisallowedSuccess = 99,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for shipline
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// Segment and guard validation errors
  Validation(ValidationError),

  /// External command exited outside its allow-list
  Subprocess(SubprocessError),

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// Only `Message` errors accumulate context; typed errors keep their own
  /// wording so their exit code and help survive unchanged.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ShipError::Io(e) => ShipError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the process exit code for this error
  pub fn exit_code(&self) -> i32 {
    match self {
      ShipError::Subprocess(e) => e.exit_code(),
      ShipError::Config(_)
      | ShipError::Validation(_)
      | ShipError::Git(_)
      | ShipError::Io(_)
      | ShipError::Message { .. } => ExitCode::Failure.as_i32(),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Validation(e) => e.help_message(),
      ShipError::Subprocess(e) => e.help_message(),
      ShipError::Git(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      ShipError::Io(_) => None,
    }
  }

  /// Output captured from a failed subprocess, if any
  pub fn captured_output(&self) -> Option<&[String]> {
    match self {
      ShipError::Subprocess(e) => e.output(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Validation(e) => write!(f, "{}", e),
      ShipError::Subprocess(e) => write!(f, "{}", e),
      ShipError::Git(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<ValidationError> for ShipError {
  fn from(err: ValidationError) -> Self {
    ShipError::Validation(err)
  }
}

impl From<ConfigError> for ShipError {
  fn from(err: ConfigError) -> Self {
    ShipError::Config(err)
  }
}

impl From<SubprocessError> for ShipError {
  fn from(err: SubprocessError) -> Self {
    ShipError::Subprocess(err)
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for ShipError {
  fn from(err: toml_edit::ser::Error) -> Self {
    ShipError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for ShipError {
  fn from(err: semver::Error) -> Self {
    ShipError::message(format!("Version error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// shipline.toml not found
  NotFound { workspace_root: PathBuf },

  /// Config already exists and would be overwritten
  AlreadyExists { path: PathBuf },

  /// A value failed validation
  Invalid { field: String, reason: String },

  /// Stage not declared in configuration
  StageNotFound { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `shipline init` to create a configuration file.".to_string()),
      ConfigError::AlreadyExists { .. } => Some("Pass --force to overwrite it.".to_string()),
      ConfigError::StageNotFound { name } => Some(format!(
        "Declare it under [[stages]] with name = \"{}\", or run `shipline run --dry-run` to list stages.",
        name
      )),
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { workspace_root } => {
        write!(
          f,
          "No shipline configuration found.\nExpected file: {}/shipline.toml",
          workspace_root.display()
        )
      }
      ConfigError::AlreadyExists { path } => {
        write!(f, "Configuration already exists: {}", path.display())
      }
      ConfigError::Invalid { field, reason } => {
        write!(f, "Invalid configuration value `{}`: {}", field, reason)
      }
      ConfigError::StageNotFound { name } => {
        write!(f, "Stage '{}' not found in configuration", name)
      }
    }
  }
}

/// Validation errors raised while turning input into segments or required values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  /// Input split into more segments than allowed
  TooManySegments { input: String, count: usize, max: usize },

  /// A segment matched the forbidden list
  ForbiddenSegment { input: String, segment: String },

  /// A required value was absent or empty
  MissingValue { name: String, state: &'static str },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::TooManySegments { max, .. } => Some(format!(
        "Branch names may have at most {} segment(s). Raise [segments].max in shipline.toml if this is intended.",
        max
      )),
      ValidationError::ForbiddenSegment { segment, .. } => Some(format!(
        "'{}' is reserved. Rename the branch or adjust [segments].forbidden.",
        segment
      )),
      ValidationError::MissingValue { name, .. } => Some(format!("Provide a non-empty value for `{}`.", name)),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::TooManySegments { input, count, max } => {
        write!(f, "Too many segments in '{}': {} (maximum {})", input, count, max)
      }
      ValidationError::ForbiddenSegment { input, segment } => {
        write!(f, "Forbidden segment '{}' in '{}'", segment, input)
      }
      ValidationError::MissingValue { name, state } => {
        write!(f, "Required value `{}` is {}", name, state)
      }
    }
  }
}

/// External command failures
#[derive(Debug)]
pub enum SubprocessError {
  /// Command exited 0 while 0 was not allowed
  DisallowedSuccess {
    command: String,
    allowed: Vec<i32>,
    output: Option<Vec<String>>,
  },

  /// Command exited with a code outside the allow-list
  ExitCode {
    command: String,
    code: i32,
    allowed: Vec<i32>,
    output: Option<Vec<String>>,
  },
}

impl SubprocessError {
  /// Exit code to terminate shipline with
  pub fn exit_code(&self) -> i32 {
    match self {
      SubprocessError::DisallowedSuccess { .. } => ExitCode::DisallowedSuccess.as_i32(),
      SubprocessError::ExitCode { code, .. } => *code,
    }
  }

  /// Lines captured from the failed command
  pub fn output(&self) -> Option<&[String]> {
    match self {
      SubprocessError::DisallowedSuccess { output, .. } | SubprocessError::ExitCode { output, .. } => {
        output.as_deref()
      }
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      SubprocessError::DisallowedSuccess { .. } => Some(
        "The tool reported success where a non-zero status was required. Check its configuration.".to_string(),
      ),
      SubprocessError::ExitCode { .. } => None,
    }
  }
}

impl fmt::Display for SubprocessError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SubprocessError::DisallowedSuccess { command, allowed, .. } => {
        write!(
          f,
          "Disallowed exit code 0 from `{}` (allowed: {})",
          command,
          format_codes(allowed)
        )
      }
      SubprocessError::ExitCode {
        command, code, allowed, ..
      } => {
        write!(
          f,
          "Command `{}` failed with exit code {} (allowed: {})",
          command,
          code,
          format_codes(allowed)
        )
      }
    }
  }
}

fn format_codes(codes: &[i32]) -> String {
  codes.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { .. } => {
        Some("Pass --branch or set SHIPLINE_BRANCH when running outside a git checkout.".to_string())
      }
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Result type alias for shipline
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with captured output and help text
pub fn print_error(error: &ShipError) {
  if let Some(lines) = error.captured_output()
    && !lines.is_empty()
  {
    eprintln!("\n── captured output ──");
    for line in lines {
      eprintln!("{}", line);
    }
  }

  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
