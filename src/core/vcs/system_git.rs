//! Branch and commit lookup through the `git` binary
//!
//! Every call runs with a scrubbed environment so user-level git settings and
//! `GIT_*` variables cannot change what shipline resolves.

use crate::core::error::{GitError, ResultExt, ShipError, ShipResult};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Branch name reported for a detached HEAD
pub const DETACHED_HEAD: &str = "HEAD";

/// A git checkout located from some directory inside it
pub struct SystemGit {
  work_tree: PathBuf,
}

impl SystemGit {
  /// Find the checkout containing `start`
  pub fn discover(start: &Path) -> ShipResult<Self> {
    let output = git(start, &["rev-parse", "--show-toplevel"])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ShipError::Git(GitError::RepoNotFound {
          path: start.to_path_buf(),
        }));
      }
      return Err(failed("git rev-parse --show-toplevel", &output));
    }

    Ok(Self {
      work_tree: PathBuf::from(stdout_line(&output)),
    })
  }

  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Checked-out branch, or [`DETACHED_HEAD`] when HEAD points at a commit.
  ///
  /// Works before the first commit (the unborn branch is reported).
  pub fn current_branch(&self) -> ShipResult<String> {
    let output = git(&self.work_tree, &["symbolic-ref", "--quiet", "--short", "HEAD"])?;

    match output.status.code() {
      Some(0) => Ok(stdout_line(&output)),
      // --quiet: exit 1 with no output means HEAD is not a symbolic ref
      Some(1) if output.stderr.is_empty() => {
        tracing::warn!(work_tree = %self.work_tree.display(), "HEAD is detached");
        Ok(DETACHED_HEAD.to_string())
      }
      _ => Err(failed("git symbolic-ref --quiet --short HEAD", &output)),
    }
  }

  /// Full SHA of HEAD; fails before the first commit
  pub fn head_commit(&self) -> ShipResult<String> {
    let output = git(&self.work_tree, &["rev-parse", "--verify", "HEAD"])?;
    if !output.status.success() {
      return Err(failed("git rev-parse --verify HEAD", &output));
    }
    Ok(stdout_line(&output))
  }
}

fn git(dir: &Path, args: &[&str]) -> ShipResult<Output> {
  let mut cmd = Command::new("git");
  cmd.arg("-C").arg(dir).args(args).env_clear();
  for var in ["PATH", "HOME"] {
    if let Ok(value) = std::env::var(var) {
      cmd.env(var, value);
    }
  }

  cmd
    .output()
    .with_context(|| format!("Failed to execute git {}", args.join(" ")))
}

fn stdout_line(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn failed(command: &str, output: &Output) -> ShipError {
  ShipError::Git(GitError::CommandFailed {
    command: command.to_string(),
    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
  })
}
