//! Pipeline context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   PipelineContext::build() -> &PipelineContext
//!   |
//!   v
//! commands/resolve.rs, run.rs, etc:
//!   fn run_*(ctx: &PipelineContext, ...)
//! ```

use crate::channel::{ChannelResolver, ResolvedChannel};
use crate::core::config::PipelineConfig;
use crate::core::error::{ConfigError, ShipError, ShipResult};
use crate::core::guard;
use crate::core::vcs::SystemGit;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the detected branch
pub const BRANCH_ENV: &str = "SHIPLINE_BRANCH";

/// Shared state for one shipline invocation
pub struct PipelineContext {
  /// Project root (git work tree when available, else the working directory)
  pub root: PathBuf,

  /// Effective configuration (built-in defaults when no file was found)
  pub config: PipelineConfig,

  /// Where `config` came from
  pub config_path: Option<PathBuf>,

  /// Git repository, if the root is inside one
  pub git: Option<SystemGit>,
}

impl PipelineContext {
  /// Build context from a working directory.
  ///
  /// `config_file` forces a specific config file; otherwise the usual
  /// locations under the project root are searched.
  pub fn build(cwd: &Path, config_file: Option<&Path>) -> ShipResult<Self> {
    let mut ctx = Self::minimal(cwd);

    let (config, config_path) = match config_file {
      Some(path) => (PipelineConfig::load_file(path)?, Some(path.to_path_buf())),
      None if PipelineConfig::exists(&ctx.root) => (
        PipelineConfig::load(&ctx.root)?,
        PipelineConfig::find_config_path(&ctx.root),
      ),
      None => (PipelineConfig::default(), None),
    };

    ctx.config = config;
    ctx.config_path = config_path;
    Ok(ctx)
  }

  /// Context with built-in defaults, without reading any config file.
  ///
  /// `init` uses this so a broken shipline.toml can be overwritten.
  pub fn minimal(cwd: &Path) -> Self {
    let git = match SystemGit::discover(cwd) {
      Ok(git) => Some(git),
      Err(e) => {
        tracing::debug!(error = %e, "not a git checkout");
        None
      }
    };

    let root = git
      .as_ref()
      .map(|g| g.work_tree().to_path_buf())
      .unwrap_or_else(|| cwd.to_path_buf());

    Self {
      root,
      config: PipelineConfig::default(),
      config_path: None,
      git,
    }
  }

  /// Get config path or error if the built-in defaults are in use.
  ///
  /// Use this in commands that need stages declared in shipline.toml.
  pub fn require_config(&self) -> ShipResult<&Path> {
    self.config_path.as_deref().ok_or_else(|| {
      ShipError::Config(ConfigError::NotFound {
        workspace_root: self.root.clone(),
      })
    })
  }

  /// Branch to resolve: explicit value, then `SHIPLINE_BRANCH`, then git
  pub fn branch(&self, explicit: Option<&str>) -> ShipResult<String> {
    if let Some(branch) = explicit {
      return guard::require_str("--branch", Some(branch)).map(str::to_string);
    }

    if let Ok(branch) = std::env::var(BRANCH_ENV)
      && !branch.trim().is_empty()
    {
      tracing::debug!(%branch, "branch from environment");
      return Ok(branch);
    }

    match &self.git {
      Some(git) => git.current_branch(),
      None => Err(ShipError::with_help(
        "Cannot determine the current branch outside a git checkout",
        format!("Pass --branch or set {}.", BRANCH_ENV),
      )),
    }
  }

  /// HEAD commit, when inside a git checkout
  pub fn head_commit(&self) -> Option<String> {
    self.git.as_ref().and_then(|g| g.head_commit().ok())
  }

  /// Resolve the channel for the selected branch
  pub fn resolve(&self, explicit_branch: Option<&str>) -> ShipResult<ResolvedChannel> {
    let branch = self.branch(explicit_branch)?;
    ChannelResolver::from_config(&self.config).resolve(&branch)
  }
}
