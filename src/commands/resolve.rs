//! `shipline resolve` - Show what the current branch maps to

use crate::channel::ResolvedChannel;
use crate::core::context::PipelineContext;
use crate::core::error::ShipResult;
use serde::Serialize;

/// Resolution plus the values derived from package metadata
#[derive(Debug, Serialize)]
struct ResolveReport {
  #[serde(flatten)]
  resolved: ResolvedChannel,
  #[serde(skip_serializing_if = "Option::is_none")]
  version: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  commit: Option<String>,
}

/// Run the resolve command
pub fn run_resolve(ctx: &PipelineContext, branch: Option<String>, json: bool) -> ShipResult<()> {
  let resolved = ctx.resolve(branch.as_deref())?;

  let version = match ctx.config.package.base_version()? {
    Some(base) => Some(resolved.package_version(&base)?.unwrap_or(base).to_string()),
    None => None,
  };

  let report = ResolveReport {
    resolved,
    version,
    commit: ctx.head_commit(),
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  let r = &report.resolved;
  println!("Branch:          {}", r.branch);
  println!("Segments:        {}", r.segments.join(", "));
  println!("Channel:         {}", r.channel);
  println!("Version suffix:  {}", r.version_suffix);
  println!("Branch folder:   {}", r.branch_folder.display());
  println!("Channel folder:  {}", r.channel_folder.display());
  if let Some(version) = &report.version {
    println!("Version:         {}", version);
  }
  if let Some(commit) = &report.commit {
    println!("Commit:          {}", commit);
  }
  if r.deployable {
    println!("✅ Deployable to '{}'", r.channel);
  } else {
    println!("⚠️  No deployment channel for '{}'", r.branch);
  }
  Ok(())
}
