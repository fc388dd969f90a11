//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_creates_config() -> Result<()> {
  let repo = TestRepo::new("main")?;

  run_shipline(&repo.path, &["init"])?;

  assert!(repo.file_exists("shipline.toml"));
  let config = repo.read_file("shipline.toml")?;
  assert!(config.contains("[segments]"));
  assert!(config.contains("[channels.channel]"));
  assert!(config.contains("[[stages]]"));
  assert!(config.contains("{branch_folder}"));

  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let repo = TestRepo::new("main")?;
  repo.write_config("[segments]\nmax = 5\n")?;

  let output = shipline(&repo.path, &["init"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("already exists"));
  assert_eq!(repo.read_file("shipline.toml")?, "[segments]\nmax = 5\n");

  Ok(())
}

#[test]
fn test_init_force_replaces_broken_config() -> Result<()> {
  let repo = TestRepo::new("main")?;
  repo.write_config("[segments\n")?;

  run_shipline(&repo.path, &["init", "--force"])?;

  let output = run_shipline(&repo.path, &["run", "--dry-run"])?;
  assert!(stdout(&output).contains("build"));

  Ok(())
}
