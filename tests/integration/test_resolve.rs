//! Tests for the `resolve` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_resolve_checked_out_branch() -> Result<()> {
  let repo = TestRepo::new("feature/foo-bar")?;

  let output = run_shipline(&repo.path, &["resolve", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["branch"], "feature/foo-bar");
  assert_eq!(report["segments"], serde_json::json!(["feature", "FOO-BAR"]));
  assert_eq!(report["channel"], "development");
  assert_eq!(report["version_suffix"], "-development");
  assert_eq!(report["deployable"], true);
  assert_eq!(report["commit"].as_str().map(str::len), Some(40));

  Ok(())
}

#[test]
fn test_resolve_explicit_branch_and_version() -> Result<()> {
  let repo = TestRepo::new("main")?;
  repo.write_config("[package]\nversion = \"1.2.3\"\n")?;

  let output = run_shipline(&repo.path, &["resolve", "--branch", "release/v2", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["channel"], "staging");
  assert_eq!(report["version"], "1.2.3-staging");

  let output = run_shipline(&repo.path, &["resolve"])?;
  let text = stdout(&output);
  assert!(text.contains("production"));
  assert!(text.contains("1.2.3"));

  Ok(())
}

#[test]
fn test_resolve_branch_from_environment() -> Result<()> {
  let repo = TestRepo::new("main")?;

  let output = std::process::Command::new(env!("CARGO_BIN_EXE_shipline"))
    .current_dir(&repo.path)
    .args(["resolve", "--json"])
    .env("SHIPLINE_BRANCH", "hotfix/urgent")
    .output()?;
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["branch"], "hotfix/urgent");
  assert_eq!(report["channel"], "production");

  Ok(())
}

#[test]
fn test_resolve_unknown_branch_is_not_deployable() -> Result<()> {
  let repo = TestRepo::new("wip")?;

  let output = run_shipline(&repo.path, &["resolve", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["channel"], "{nodeploy}");
  assert_eq!(report["deployable"], false);

  Ok(())
}

#[test]
fn test_resolve_forbidden_segment_exits_one() -> Result<()> {
  let repo = TestRepo::new("main")?;

  let output = shipline(&repo.path, &["resolve", "--branch", "latest/x"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("latest"));

  Ok(())
}

#[test]
fn test_resolve_too_many_segments_exits_one() -> Result<()> {
  let repo = TestRepo::new("main")?;

  let output = shipline(&repo.path, &["resolve", "--branch", "feature/a/b"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_resolve_outside_git_needs_branch() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = shipline(dir.path(), &["resolve"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("--branch"));

  let output = run_shipline(dir.path(), &["resolve", "--branch", "develop"])?;
  assert!(stdout(&output).contains("quality"));

  Ok(())
}

#[test]
fn test_resolve_before_first_commit() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  git(dir.path(), &["init", "--initial-branch=feature/fresh"])?;

  let output = run_shipline(dir.path(), &["resolve", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["branch"], "feature/fresh");
  assert_eq!(report["channel"], "development");
  assert!(report.get("commit").is_none());

  Ok(())
}
