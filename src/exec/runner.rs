//! Run an external command and judge its exit code against an allow-list
//!
//! Every invocation returns an explicit [`ExecutionResult`]; there is no ambient
//! "last exit code". A code outside the allow-list becomes a
//! [`SubprocessError`] whose exit code the caller propagates:
//!
//! - `0` when `0` is not allowed → sentinel `99`
//! - anything else → the child's own code

use crate::core::error::{ResultExt, ShipResult, SubprocessError};
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

/// Outcome of a finished command whose exit code was allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
  /// stdout lines followed by stderr lines, when captured
  pub output: Option<Vec<String>>,
  /// Wall-clock duration, when measured
  pub elapsed: Option<Duration>,
  /// Reported exit code (`-1` if the process was killed by a signal)
  pub exit_code: i32,
}

/// How an exit code relates to the allowed set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
  Allowed,
  /// Exited 0 while 0 was not allowed
  DisallowedSuccess,
  Disallowed(i32),
}

/// Classify `code` against `allowed`
pub fn classify_exit(code: i32, allowed: &[i32]) -> ExitClass {
  if allowed.contains(&code) {
    ExitClass::Allowed
  } else if code == 0 {
    ExitClass::DisallowedSuccess
  } else {
    ExitClass::Disallowed(code)
  }
}

/// A single external command invocation
#[derive(Debug, Clone)]
pub struct ExecRequest {
  program: String,
  args: Vec<String>,
  common_args: Vec<String>,
  measure_time: bool,
  capture_output: bool,
  allowed_exit_codes: Vec<i32>,
  current_dir: Option<PathBuf>,
}

impl ExecRequest {
  /// New request with timing and capture on, allowing only exit code 0
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      common_args: Vec::new(),
      measure_time: true,
      capture_output: true,
      allowed_exit_codes: vec![0],
      current_dir: None,
    }
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Arguments appended after the per-call arguments
  pub fn common_args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.common_args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn measure_time(mut self, measure: bool) -> Self {
    self.measure_time = measure;
    self
  }

  pub fn capture_output(mut self, capture: bool) -> Self {
    self.capture_output = capture;
    self
  }

  pub fn allowed_exit_codes(mut self, codes: impl Into<Vec<i32>>) -> Self {
    self.allowed_exit_codes = codes.into();
    self
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.current_dir = Some(dir.into());
    self
  }

  /// Final argument list: per-call arguments, then common arguments
  pub fn argv(&self) -> Vec<&str> {
    self
      .args
      .iter()
      .chain(self.common_args.iter())
      .map(String::as_str)
      .collect()
  }

  /// Shell-like rendering for messages and dry runs
  pub fn display(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.argv())
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// Run the command, blocking until it exits
  pub fn run(&self) -> ShipResult<ExecutionResult> {
    let command = self.display();
    tracing::debug!(command = %command, capture = self.capture_output, "executing");

    let mut cmd = Command::new(&self.program);
    cmd.args(self.argv());
    if let Some(dir) = &self.current_dir {
      cmd.current_dir(dir);
    }

    let started = self.measure_time.then(Instant::now);

    let (exit_code, output) = if self.capture_output {
      let out = cmd
        .output()
        .with_context(|| format!("Failed to execute `{}`", command))?;
      let mut lines: Vec<String> = String::from_utf8_lossy(&out.stdout).lines().map(str::to_string).collect();
      lines.extend(String::from_utf8_lossy(&out.stderr).lines().map(str::to_string));
      (out.status.code().unwrap_or(-1), Some(lines))
    } else {
      let status = cmd
        .status()
        .with_context(|| format!("Failed to execute `{}`", command))?;
      (status.code().unwrap_or(-1), None)
    };

    let elapsed = started.map(|s| s.elapsed());
    if let Some(elapsed) = elapsed {
      tracing::info!(command = %command, exit_code, elapsed_ms = elapsed.as_millis() as u64, "command finished");
    }

    match classify_exit(exit_code, &self.allowed_exit_codes) {
      ExitClass::Allowed => Ok(ExecutionResult {
        output,
        elapsed,
        exit_code,
      }),
      ExitClass::DisallowedSuccess => {
        tracing::error!(command = %command, allowed = ?self.allowed_exit_codes, "disallowed exit code 0");
        Err(
          SubprocessError::DisallowedSuccess {
            command,
            allowed: self.allowed_exit_codes.clone(),
            output,
          }
          .into(),
        )
      }
      ExitClass::Disallowed(code) => {
        tracing::error!(command = %command, code, allowed = ?self.allowed_exit_codes, "disallowed exit code");
        Err(
          SubprocessError::ExitCode {
            command,
            code,
            allowed: self.allowed_exit_codes.clone(),
            output,
          }
          .into(),
        )
      }
    }
  }
}
