//! `shipline run` - Run configured stages for the current branch
//!
//! Supports:
//! - named stages or all stages, always in declaration order
//! - `--dry-run` to show the plan without executing
//! - `--json` to emit the plan (or the executed plan) for CI; stdout then
//!   carries only the JSON report

use crate::core::context::PipelineContext;
use crate::core::error::ShipResult;
use crate::core::plan::PipelinePlan;

/// Run the pipeline
pub fn run_pipeline(
  ctx: &PipelineContext,
  stages: Vec<String>,
  branch: Option<String>,
  dry_run: bool,
  json: bool,
) -> ShipResult<()> {
  let config_path = ctx.require_config()?;
  tracing::debug!(config = %config_path.display(), "running pipeline");

  let resolved = ctx.resolve(branch.as_deref())?;
  let mut plan = PipelinePlan::build(&ctx.config, resolved, &stages, &ctx.root, ctx.head_commit())?;

  if dry_run {
    if json {
      println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
      print!("{}", plan.to_human_readable());
      println!();
      println!("DRY RUN: nothing executed. Drop --dry-run to run the pending stages.");
    }
    return Ok(());
  }

  if plan.pending().next().is_none() {
    if json {
      println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
      println!("✅ Nothing to run for '{}'", plan.resolved.branch);
    }
    return Ok(());
  }

  let banner = format!(
    "🚀 Running {} stage(s) for '{}' → {}",
    plan.pending().count(),
    plan.resolved.branch,
    plan.resolved.channel
  );

  if json {
    eprintln!("{}", banner);
    let outcome = plan.execute(true);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    return outcome;
  }

  println!("{}", banner);
  plan.execute(false)?;
  println!("✅ Pipeline completed successfully");
  Ok(())
}
