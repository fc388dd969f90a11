//! Tests for the `run` command

use crate::helpers::*;
use anyhow::Result;

const SH_PIPELINE: &str = r#"
[package]
version = "2.0.0"

[tool]
program = "sh"

[[stages]]
name = "build"
args = ["-c", "mkdir -p out && echo {channel} > out/channel"]

[[stages]]
name = "stamp"
args = ["-c", "echo {version} > out/version"]

[[stages]]
name = "publish"
args = ["-c", "mkdir -p {channel_folder} && touch {channel_folder}/published"]
deploy_only = true
"#;

#[test]
fn test_run_requires_config() -> Result<()> {
  let repo = TestRepo::new("main")?;

  let output = shipline(&repo.path, &["run"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("shipline init"));

  Ok(())
}

#[test]
fn test_run_dry_run_shows_plan() -> Result<()> {
  let repo = TestRepo::new("feature/login")?;
  run_shipline(&repo.path, &["init"])?;

  let output = run_shipline(&repo.path, &["run", "--dry-run"])?;
  let text = stdout(&output);
  assert!(text.contains("Pipeline plan for 'feature/login'"));
  assert!(text.contains("cargo build --release"));
  assert!(text.contains("DRY RUN"));

  Ok(())
}

#[test]
fn test_run_dry_run_json() -> Result<()> {
  let repo = TestRepo::new("wip")?;
  run_shipline(&repo.path, &["init"])?;

  let output = run_shipline(&repo.path, &["run", "--dry-run", "--json", "test", "pack"])?;
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(plan["resolved"]["deployable"], false);
  assert_eq!(plan["version"], "0.1.0");
  assert_eq!(plan["steps"][0]["name"], "test");
  assert_eq!(plan["steps"][0]["status"], "pending");
  assert_eq!(plan["steps"][1]["status"], "skipped");
  assert!(plan["created_at"].is_string());

  Ok(())
}

#[test]
fn test_run_unknown_stage() -> Result<()> {
  let repo = TestRepo::new("main")?;
  run_shipline(&repo.path, &["init"])?;

  let output = shipline(&repo.path, &["run", "deploy", "--dry-run"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Stage 'deploy' not found"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_run_executes_stages_with_placeholders() -> Result<()> {
  let repo = TestRepo::new("release/v2")?;
  repo.write_config(SH_PIPELINE)?;

  let output = run_shipline(&repo.path, &["run"])?;
  assert!(stdout(&output).contains("Pipeline completed successfully"));

  assert_eq!(repo.read_file("out/channel")?.trim(), "staging");
  assert_eq!(repo.read_file("out/version")?.trim(), "2.0.0-staging");
  assert!(repo.file_exists("artifacts/staging/V2/published"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_run_skips_deploy_only_stages() -> Result<()> {
  let repo = TestRepo::new("main")?;
  repo.write_config(SH_PIPELINE)?;

  run_shipline(&repo.path, &["run", "--branch", "experiment"])?;

  assert_eq!(repo.read_file("out/channel")?.trim(), "{nodeploy}");
  assert_eq!(repo.read_file("out/version")?.trim(), "2.0.0");
  assert!(!repo.file_exists("artifacts"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_run_stops_and_propagates_exit_code() -> Result<()> {
  let repo = TestRepo::new("main")?;
  repo.write_config(
    r#"
[tool]
program = "sh"

[[stages]]
name = "lint"
args = ["-c", "exit 7"]

[[stages]]
name = "after"
args = ["-c", "touch after"]
"#,
  )?;

  let output = shipline(&repo.path, &["run"])?;
  assert_eq!(output.status.code(), Some(7));
  assert!(!repo.file_exists("after"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_run_disallowed_success_exits_99() -> Result<()> {
  let repo = TestRepo::new("main")?;
  repo.write_config(
    r#"
[[stages]]
name = "must-fail"
program = "true"
allowed_exit_codes = [1]
"#,
  )?;

  let output = shipline(&repo.path, &["run"])?;
  assert_eq!(output.status.code(), Some(99));

  Ok(())
}

#[test]
fn test_run_missing_required_env() -> Result<()> {
  let repo = TestRepo::new("main")?;
  repo.write_config(
    r#"
[tool]
required_env = ["SHIPLINE_TEST_TOKEN_NOT_SET"]

[[stages]]
name = "build"
args = ["build"]
"#,
  )?;

  let output = shipline(&repo.path, &["run"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("SHIPLINE_TEST_TOKEN_NOT_SET"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_run_json_keeps_stdout_parseable() -> Result<()> {
  let repo = TestRepo::new("main")?;
  repo.write_config(
    r#"
[tool]
program = "sh"

[[stages]]
name = "greet"
args = ["-c", "echo hello from stage"]
"#,
  )?;

  let output = run_shipline(&repo.path, &["run", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["steps"][0]["name"], "greet");
  assert_eq!(report["steps"][0]["status"], "succeeded");
  assert_eq!(report["steps"][0]["exit_code"], 0);
  assert!(stderr(&output).contains("hello from stage"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_run_json_failure_still_reports() -> Result<()> {
  let repo = TestRepo::new("main")?;
  repo.write_config(
    r#"
[tool]
program = "sh"

[[stages]]
name = "broken"
args = ["-c", "echo oops; exit 3"]
"#,
  )?;

  let output = shipline(&repo.path, &["run", "--json"])?;
  assert_eq!(output.status.code(), Some(3));

  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["steps"][0]["status"], "failed");
  assert_eq!(report["steps"][0]["exit_code"], 3);

  Ok(())
}
