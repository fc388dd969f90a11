//! Tests for the `segments` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_segments_normalizes_input() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_shipline(dir.path(), &["segments", "Feature/My Thing", "--json"])?;
  let segments: Vec<String> = serde_json::from_slice(&output.stdout)?;
  assert_eq!(segments, vec!["feature", "MY_THING"]);

  Ok(())
}

#[test]
fn test_segments_text_output() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_shipline(dir.path(), &["segments", "release/v1:rc"])?;
  let text = stdout(&output);
  let lines: Vec<&str> = text.lines().collect();
  assert_eq!(lines[0], "release");
  assert_eq!(lines[1], "V1-RC");
  assert!(lines[2].starts_with('→'));

  Ok(())
}

#[test]
fn test_segments_overrides() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_shipline(dir.path(), &["segments", "a/b/c", "--max", "3", "--json"])?;
  let segments: Vec<String> = serde_json::from_slice(&output.stdout)?;
  assert_eq!(segments, vec!["a", "B", "C"]);

  let output = shipline(dir.path(), &["segments", "team/wip", "--forbid", "WIP"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Forbidden segment"));

  let output = run_shipline(dir.path(), &["segments", "latest/x", "--forbid", "other"])?;
  assert!(stdout(&output).contains("latest"));

  Ok(())
}

#[test]
fn test_segments_uses_config_rules() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  std::fs::write(dir.path().join("shipline.toml"), "[segments]\nmax = 1\n")?;

  let output = shipline(dir.path(), &["segments", "feature/x"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Too many segments"));

  Ok(())
}
