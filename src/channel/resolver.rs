//! Branch name → deployment channel, version suffix and artifact folders
//!
//! # Flow
//!
//! ```text
//! "feature/foo-bar"
//!   split      → ["feature", "FOO-BAR"]
//!   translate  → suffix  ["-development", "FOO-BAR"]
//!   translate  → channel ["development", "FOO-BAR"]
//!   join       → artifacts/feature/FOO-BAR, artifacts/development/FOO-BAR
//! ```

use crate::core::config::{ChannelConfig, PipelineConfig, SegmentsConfig};
use crate::core::error::ShipResult;
use crate::core::guard::{self, Presence};
use crate::segments::{join, split, translate};
use serde::Serialize;
use std::path::PathBuf;

/// Everything later pipeline steps need to know about the current branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedChannel {
  /// Branch name as given
  pub branch: String,
  /// Normalized segments
  pub segments: Vec<String>,
  /// Deployment channel, or the fallback keyword
  pub channel: String,
  /// Package version suffix, or the fallback keyword
  pub version_suffix: String,
  /// Artifact folder named after the branch
  pub branch_folder: PathBuf,
  /// Artifact folder named after the channel
  pub channel_folder: PathBuf,
  /// False when the branch maps to no channel
  pub deployable: bool,
}

impl ResolvedChannel {
  /// Apply the version suffix to `base` as a pre-release.
  ///
  /// `None` for non-deployable branches. An empty suffix yields `base` itself;
  /// a leading `-` is optional (`-beta` and `beta` both give `1.0.0-beta`).
  pub fn package_version(&self, base: &semver::Version) -> ShipResult<Option<semver::Version>> {
    if !self.deployable {
      return Ok(None);
    }

    let mut version = base.clone();
    let pre = self.version_suffix.strip_prefix('-').unwrap_or(&self.version_suffix);
    if !pre.is_empty() {
      version.pre = semver::Prerelease::new(pre)?;
    }
    Ok(Some(version))
  }
}

/// Resolves branch names with one set of segment rules and tables
pub struct ChannelResolver<'a> {
  segments: &'a SegmentsConfig,
  channels: &'a ChannelConfig,
}

impl<'a> ChannelResolver<'a> {
  pub fn new(segments: &'a SegmentsConfig, channels: &'a ChannelConfig) -> Self {
    Self { segments, channels }
  }

  pub fn from_config(config: &'a PipelineConfig) -> Self {
    Self::new(&config.segments, &config.channels)
  }

  /// Resolve `branch`; fails on invalid segments or when no channel results
  pub fn resolve(&self, branch: &str) -> ShipResult<ResolvedChannel> {
    let segments = split(branch, self.segments.max, self.segments.forbidden.as_slice())?;

    let fallback = self.channels.fallback.as_str();
    let suffix_segments = translate(&segments, &self.channels.suffix, fallback);
    let channel_segments = translate(&segments, &self.channels.channel, fallback);

    let channel = channel_segments.first().cloned();
    guard::require("channel", Presence::of_str(channel.as_deref()))?;
    let channel = channel.unwrap_or_default();
    let version_suffix = suffix_segments.first().cloned().unwrap_or_default();

    let no_overrides: &[Option<&str>] = &[];
    let no_append: &[&str] = &[];
    let artifacts = &self.channels.artifacts_dir;
    let branch_folder = artifacts.join(join(&segments, no_overrides, no_append));
    let channel_folder = artifacts.join(join(&channel_segments, no_overrides, no_append));

    let deployable = channel != fallback;
    tracing::debug!(branch, %channel, %version_suffix, deployable, "resolved channel");

    Ok(ResolvedChannel {
      branch: branch.to_string(),
      segments,
      channel,
      version_suffix,
      branch_folder,
      channel_folder,
      deployable,
    })
  }
}
