use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use crate::core::guard::{self, Presence};
use crate::segments::{DEFAULT_FORBIDDEN, DEFAULT_MAX_SEGMENTS, TranslationTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Fallback channel and suffix for branches no table knows about
pub const NO_DEPLOY: &str = "{nodeploy}";

/// Configuration for shipline
/// Searched in order: shipline.toml, .shipline.toml, .config/shipline.toml
///
/// Every section has defaults, so an absent file behaves like `shipline init` output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
  #[serde(default)]
  pub segments: SegmentsConfig,
  #[serde(default)]
  pub channels: ChannelConfig,
  #[serde(default)]
  pub package: PackageConfig,
  #[serde(default)]
  pub tool: ToolConfig,
  #[serde(default)]
  pub stages: Vec<StageConfig>,
}

/// Branch-name splitting rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentsConfig {
  /// Maximum number of segments (default: 2)
  #[serde(default = "default_max_segments")]
  pub max: usize,

  /// Segments rejected anywhere in a branch name (default: ["latest", "foo"])
  #[serde(default = "default_forbidden")]
  pub forbidden: Vec<String>,
}

fn default_max_segments() -> usize {
  DEFAULT_MAX_SEGMENTS
}

fn default_forbidden() -> Vec<String> {
  DEFAULT_FORBIDDEN.iter().map(|s| s.to_string()).collect()
}

impl Default for SegmentsConfig {
  fn default() -> Self {
    Self {
      max: default_max_segments(),
      forbidden: default_forbidden(),
    }
  }
}

/// Branch → channel / version-suffix mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
  /// Value used when the first segment has no entry (default: "{nodeploy}")
  #[serde(default = "default_fallback")]
  pub fallback: String,

  /// Root for branch and channel folders (default: "artifacts")
  #[serde(default = "default_artifacts_dir")]
  pub artifacts_dir: PathBuf,

  /// First segment → deployment channel
  #[serde(default = "default_channel_table")]
  pub channel: TranslationTable,

  /// First segment → package version suffix
  #[serde(default = "default_suffix_table")]
  pub suffix: TranslationTable,
}

fn default_fallback() -> String {
  NO_DEPLOY.to_string()
}

fn default_artifacts_dir() -> PathBuf {
  PathBuf::from("artifacts")
}

pub fn default_channel_table() -> TranslationTable {
  TranslationTable::new()
    .with("feature", "development")
    .with("develop", "quality")
    .with("bugfix", "quality")
    .with("release", "staging")
    .with("main", "production")
    .with("master", "production")
    .with("hotfix", "production")
}

pub fn default_suffix_table() -> TranslationTable {
  TranslationTable::new()
    .with("feature", "-development")
    .with("develop", "-quality")
    .with("bugfix", "-quality")
    .with("release", "-staging")
    .with("main", "")
    .with("master", "")
    .with("hotfix", "")
}

impl Default for ChannelConfig {
  fn default() -> Self {
    Self {
      fallback: default_fallback(),
      artifacts_dir: default_artifacts_dir(),
      channel: default_channel_table(),
      suffix: default_suffix_table(),
    }
  }
}

/// Package metadata used for `{version}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageConfig {
  /// Base version; the channel suffix is applied as a pre-release
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

impl PackageConfig {
  pub fn base_version(&self) -> ShipResult<Option<semver::Version>> {
    self
      .version
      .as_deref()
      .map(semver::Version::parse)
      .transpose()
      .context("Invalid [package].version")
  }
}

/// Build tool every stage invokes unless it names its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
  /// Executable (default: "cargo")
  #[serde(default = "default_program")]
  pub program: String,

  /// Arguments appended to every stage's arguments
  #[serde(default)]
  pub common_args: Vec<String>,

  /// Environment variables that must be set before any stage runs
  #[serde(default)]
  pub required_env: Vec<String>,
}

fn default_program() -> String {
  "cargo".to_string()
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      program: default_program(),
      common_args: Vec::new(),
      required_env: Vec::new(),
    }
  }
}

/// One pipeline step
///
/// # Example
///
/// ```toml
/// [[stages]]
/// name = "pack"
/// args = ["package", "--target-dir", "{branch_folder}"]
/// deploy_only = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
  pub name: String,

  /// Overrides [tool].program for this stage
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub program: Option<String>,

  /// Arguments; placeholders like `{channel}` are substituted
  #[serde(default)]
  pub args: Vec<String>,

  #[serde(default = "default_allowed_exit_codes")]
  pub allowed_exit_codes: Vec<i32>,

  /// Buffer output and show it only on failure (default: stream)
  #[serde(default)]
  pub capture_output: bool,

  #[serde(default = "default_true")]
  pub measure_time: bool,

  /// Skip this stage for branches without a deployment channel
  #[serde(default)]
  pub deploy_only: bool,

  /// Environment variables this stage needs
  #[serde(default)]
  pub required_env: Vec<String>,
}

fn default_allowed_exit_codes() -> Vec<i32> {
  vec![0]
}

fn default_true() -> bool {
  true
}

impl StageConfig {
  pub fn new(name: impl Into<String>, args: &[&str]) -> Self {
    Self {
      name: name.into(),
      program: None,
      args: args.iter().map(|a| a.to_string()).collect(),
      allowed_exit_codes: default_allowed_exit_codes(),
      capture_output: false,
      measure_time: true,
      deploy_only: false,
      required_env: Vec::new(),
    }
  }

  /// Program to run, falling back to the tool
  pub fn program<'a>(&'a self, tool: &'a ToolConfig) -> &'a str {
    self.program.as_deref().unwrap_or(&tool.program)
  }
}

impl PipelineConfig {
  /// Find config file in search order: shipline.toml, .shipline.toml, .config/shipline.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("shipline.toml"),
      path.join(".shipline.toml"),
      path.join(".config").join("shipline.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from shipline.toml (searches multiple locations)
  pub fn load(path: &Path) -> ShipResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      ShipError::Config(ConfigError::NotFound {
        workspace_root: path.to_path_buf(),
      })
    })?;

    Self::load_file(&config_path)
  }

  /// Load and validate a specific config file
  pub fn load_file(config_path: &Path) -> ShipResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: PipelineConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.validate()?;
    tracing::debug!(path = %config_path.display(), stages = config.stages.len(), "loaded config");
    Ok(config)
  }

  /// Save config to shipline.toml (default location)
  pub fn save(&self, path: &Path) -> ShipResult<PathBuf> {
    let config_path = path.join("shipline.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    Self::find_config_path(path).is_some()
  }

  /// Starter config written by `shipline init`
  pub fn starter() -> Self {
    Self {
      package: PackageConfig {
        version: Some("0.1.0".to_string()),
      },
      stages: vec![
        StageConfig::new("clean", &["clean"]),
        StageConfig::new("build", &["build", "--release"]),
        StageConfig::new("test", &["test"]),
        StageConfig {
          deploy_only: true,
          ..StageConfig::new("pack", &["package", "--target-dir", "{branch_folder}"])
        },
      ],
      ..Self::default()
    }
  }

  /// Find a stage by name
  pub fn stage(&self, name: &str) -> ShipResult<&StageConfig> {
    self.stages.iter().find(|s| s.name == name).ok_or_else(|| {
      ShipError::Config(ConfigError::StageNotFound {
        name: name.to_string(),
      })
    })
  }

  /// Validate configuration values
  pub fn validate(&self) -> ShipResult<()> {
    if self.segments.max == 0 {
      return Err(invalid("segments.max", "must be at least 1"));
    }

    guard::require("channels.fallback", Presence::of_str(Some(self.channels.fallback.as_str())))?;
    guard::require("channels.channel", Presence::of_len(Some(self.channels.channel.len())))?;
    guard::require("channels.suffix", Presence::of_len(Some(self.channels.suffix.len())))?;
    guard::require("tool.program", Presence::of_str(Some(self.tool.program.as_str())))?;

    self.package.base_version()?;

    let mut seen = HashSet::new();
    for stage in &self.stages {
      guard::require("stages.name", Presence::of_str(Some(stage.name.as_str())))?;
      if !seen.insert(stage.name.as_str()) {
        return Err(invalid("stages.name", &format!("duplicate stage '{}'", stage.name)));
      }
      if stage.allowed_exit_codes.is_empty() {
        return Err(invalid(
          &format!("stages.{}.allowed_exit_codes", stage.name),
          "must list at least one exit code",
        ));
      }
    }

    Ok(())
  }
}

fn invalid(field: &str, reason: &str) -> ShipError {
  ShipError::Config(ConfigError::Invalid {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}
