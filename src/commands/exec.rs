//! `shipline exec` - Run a single command under an exit-code allow-list
//!
//! The process exit code of shipline mirrors the policy decision:
//! allowed → 0, disallowed non-zero → the child's code, disallowed zero → 99.
//! The child runs in the invoking directory.

use crate::core::error::{ShipError, ShipResult};
use crate::exec::ExecRequest;

/// Run the exec command
pub fn run_exec(
  command: Vec<String>,
  allowed: Vec<i32>,
  no_capture: bool,
  no_time: bool,
) -> ShipResult<()> {
  let mut parts = command.into_iter();
  let Some(program) = parts.next() else {
    return Err(ShipError::with_help(
      "No command given",
      "Usage: shipline exec [OPTIONS] -- <PROGRAM> [ARGS]...",
    ));
  };

  let allowed = if allowed.is_empty() { vec![0] } else { allowed };

  let result = ExecRequest::new(program)
    .args(parts)
    .allowed_exit_codes(allowed)
    .capture_output(!no_capture)
    .measure_time(!no_time)
    .run()?;

  if let Some(lines) = &result.output {
    for line in lines {
      println!("{}", line);
    }
  }

  if let Some(elapsed) = result.elapsed {
    eprintln!("⏱  exit code {} after {:.2}s", result.exit_code, elapsed.as_secs_f64());
  }
  Ok(())
}
