//! Pipeline plans: resolve first, show or execute second
//!
//! ```text
//! ResolvedChannel + [[stages]]
//!   ↓
//! PipelinePlan (commands with placeholders substituted)
//!   ↓
//! dry-run: print   |   execute: run each step, stop at the first failure
//! ```
//!
//! Plans serialize to JSON so CI can inspect what ran.

use crate::channel::ResolvedChannel;
use crate::core::config::{PipelineConfig, StageConfig};
use crate::core::error::ShipResult;
use crate::core::guard;
use crate::exec::ExecRequest;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Values available to stage arguments as `{name}`
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
  entries: Vec<(&'static str, String)>,
}

impl Placeholders {
  pub fn from_resolved(resolved: &ResolvedChannel, version: Option<&str>) -> Self {
    Self {
      entries: vec![
        ("branch", resolved.branch.clone()),
        ("channel", resolved.channel.clone()),
        ("suffix", resolved.version_suffix.clone()),
        ("branch_folder", resolved.branch_folder.to_string_lossy().into_owned()),
        ("channel_folder", resolved.channel_folder.to_string_lossy().into_owned()),
        ("version", version.unwrap_or_default().to_string()),
      ],
    }
  }

  fn get(&self, name: &str) -> Option<&str> {
    self.entries.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
  }

  /// Replace every known `{name}` in one pass; unknown braces stay literal
  pub fn substitute(&self, arg: &str) -> String {
    let mut out = String::with_capacity(arg.len());
    let mut rest = arg;

    while let Some(open) = rest.find('{') {
      out.push_str(&rest[..open]);
      let tail = &rest[open..];
      match tail.find('}').and_then(|close| self.get(&tail[1..close]).map(|v| (close, v))) {
        Some((close, value)) => {
          out.push_str(value);
          rest = &tail[close + 1..];
        }
        None => {
          out.push('{');
          rest = &tail[1..];
        }
      }
    }

    out.push_str(rest);
    out
  }
}

/// What happened (or will happen) to a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
  Pending,
  Skipped { reason: String },
  Succeeded { exit_code: i32, elapsed_ms: Option<u64> },
  Failed { exit_code: i32 },
}

/// One stage turned into a concrete command
#[derive(Debug, Clone, Serialize)]
pub struct PlanStep {
  pub name: String,
  pub command: String,
  pub required_env: Vec<String>,
  #[serde(flatten)]
  pub status: StepStatus,
  #[serde(skip)]
  request: ExecRequest,
}

/// Ordered steps for one branch
#[derive(Debug, Clone, Serialize)]
pub struct PipelinePlan {
  pub created_at: DateTime<Utc>,
  pub commit: Option<String>,
  pub resolved: ResolvedChannel,
  pub version: Option<String>,
  pub steps: Vec<PlanStep>,
}

impl PipelinePlan {
  /// Build a plan for `stages` (all configured stages when empty), in declaration order
  pub fn build(
    config: &PipelineConfig,
    resolved: ResolvedChannel,
    stages: &[String],
    root: &Path,
    commit: Option<String>,
  ) -> ShipResult<Self> {
    for name in stages {
      config.stage(name)?;
    }

    let selected: Vec<&StageConfig> = config
      .stages
      .iter()
      .filter(|stage| stages.is_empty() || stages.contains(&stage.name))
      .collect();

    let version = match config.package.base_version()? {
      Some(base) => Some(resolved.package_version(&base)?.unwrap_or(base).to_string()),
      None => None,
    };

    let placeholders = Placeholders::from_resolved(&resolved, version.as_deref());

    let steps = selected
      .into_iter()
      .map(|stage| {
        let request = ExecRequest::new(stage.program(&config.tool))
          .args(stage.args.iter().map(|a| placeholders.substitute(a)))
          .common_args(config.tool.common_args.iter().map(|a| placeholders.substitute(a)))
          .allowed_exit_codes(stage.allowed_exit_codes.clone())
          .capture_output(stage.capture_output)
          .measure_time(stage.measure_time)
          .current_dir(root);

        let status = if stage.deploy_only && !resolved.deployable {
          StepStatus::Skipped {
            reason: format!("branch '{}' has no deployment channel", resolved.branch),
          }
        } else {
          StepStatus::Pending
        };

        let required_env = config
          .tool
          .required_env
          .iter()
          .chain(stage.required_env.iter())
          .cloned()
          .collect();

        PlanStep {
          name: stage.name.clone(),
          command: request.display(),
          required_env,
          status,
          request,
        }
      })
      .collect();

    Ok(Self {
      created_at: Utc::now(),
      commit,
      resolved,
      version,
      steps,
    })
  }

  /// Steps that will actually run
  pub fn pending(&self) -> impl Iterator<Item = &PlanStep> {
    self.steps.iter().filter(|s| s.status == StepStatus::Pending)
  }

  /// Run pending steps in order, stopping at the first failure.
  ///
  /// Required environment variables of every pending step are checked before
  /// anything runs. With `json`, progress and stage output go to stderr and
  /// every stage is captured, leaving stdout to the caller's report.
  pub fn execute(&mut self, json: bool) -> ShipResult<()> {
    for step in self.pending() {
      for name in &step.required_env {
        guard::require_env(name)?;
      }
    }

    let report = |line: String| {
      if json {
        eprintln!("{}", line);
      } else {
        println!("{}", line);
      }
    };

    for step in self.steps.iter_mut().filter(|s| s.status == StepStatus::Pending) {
      report(format!("▶ {} ({})", step.name, step.command));

      let run = if json {
        step.request.clone().capture_output(true).run()
      } else {
        step.request.run()
      };

      let result = match run {
        Ok(result) => result,
        Err(e) => {
          step.status = StepStatus::Failed {
            exit_code: e.exit_code(),
          };
          return Err(e);
        }
      };

      for line in result.output.iter().flatten() {
        report(format!("  {}", line));
      }

      let elapsed_ms = result.elapsed.map(|d| d.as_millis() as u64);
      match elapsed_ms {
        Some(ms) => report(format!("✅ {} finished in {:.2}s", step.name, ms as f64 / 1000.0)),
        None => report(format!("✅ {} finished", step.name)),
      }

      step.status = StepStatus::Succeeded {
        exit_code: result.exit_code,
        elapsed_ms,
      };
    }

    Ok(())
  }

  /// Human-readable plan for dry runs
  pub fn to_human_readable(&self) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🚀 Pipeline plan for '{}'", self.resolved.branch);
    let _ = writeln!(out, "════════════════════════════════════════");
    let _ = writeln!(out, "Channel:  {}", self.resolved.channel);
    if let Some(version) = &self.version {
      let _ = writeln!(out, "Version:  {}", version);
    }
    if let Some(commit) = &self.commit {
      let _ = writeln!(out, "Commit:   {}", commit);
    }
    let _ = writeln!(out);

    if self.steps.is_empty() {
      let _ = writeln!(out, "No stages configured.");
      return out;
    }

    for (i, step) in self.steps.iter().enumerate() {
      match &step.status {
        StepStatus::Skipped { reason } => {
          let _ = writeln!(out, "{:>2}. {} (skipped: {})", i + 1, step.name, reason);
        }
        _ => {
          let _ = writeln!(out, "{:>2}. {}", i + 1, step.name);
          let _ = writeln!(out, "    {}", step.command);
        }
      }
    }

    out
  }
}
