//! Tests for the `exec` command

use crate::helpers::*;
use anyhow::Result;

#[cfg(unix)]
#[test]
fn test_exec_success_prints_captured_output() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_shipline(dir.path(), &["exec", "--", "sh", "-c", "echo hello; echo warn >&2"])?;
  assert_eq!(stdout(&output), "hello\nwarn\n");
  assert!(stderr(&output).contains("exit code 0"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_exec_disallowed_success_exits_99() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = shipline(dir.path(), &["exec", "--allow-exit-code", "1", "--", "true"])?;
  assert_eq!(output.status.code(), Some(99));
  assert!(stderr(&output).contains("Disallowed exit code 0"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_exec_propagates_child_exit_code() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = shipline(dir.path(), &["exec", "--", "sh", "-c", "echo failing; exit 2"])?;
  assert_eq!(output.status.code(), Some(2));

  let err = stderr(&output);
  assert!(err.contains("captured output"));
  assert!(err.contains("failing"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_exec_allowed_nonzero_succeeds() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = shipline(
    dir.path(),
    &["exec", "--allow-exit-code", "0", "--allow-exit-code", "3", "--", "sh", "-c", "exit 3"],
  )?;
  assert_eq!(output.status.code(), Some(0));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_exec_no_time_no_capture() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_shipline(dir.path(), &["exec", "--no-capture", "--no-time", "--", "echo", "streamed"])?;
  assert_eq!(stdout(&output), "streamed\n");
  assert!(!stderr(&output).contains("exit code"));

  Ok(())
}

#[test]
fn test_exec_missing_program_exits_one() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = shipline(dir.path(), &["exec", "--", "shipline-no-such-program"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Failed to execute"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_exec_runs_in_invoking_directory() -> Result<()> {
  let repo = TestRepo::new("main")?;
  let sub = repo.path.join("sub");
  std::fs::create_dir_all(&sub)?;

  let output = run_shipline(&sub, &["exec", "--", "sh", "-c", "pwd -P"])?;
  assert_eq!(stdout(&output).trim(), sub.canonicalize()?.to_string_lossy());

  Ok(())
}
