use crate::core::context::PipelineContext;
use crate::core::error::ShipResult;
use crate::segments::{join, split};

/// Split `input` with the configured rules, overridable from the command line
pub fn run_segments(
  ctx: &PipelineContext,
  input: String,
  max: Option<usize>,
  forbid: Vec<String>,
  json: bool,
) -> ShipResult<()> {
  let rules = &ctx.config.segments;
  let max = max.unwrap_or(rules.max);
  let forbidden = if forbid.is_empty() { rules.forbidden.clone() } else { forbid };

  let segments = split(&input, max, forbidden.as_slice())?;

  if json {
    println!("{}", serde_json::to_string_pretty(&segments)?);
    return Ok(());
  }

  for segment in &segments {
    println!("{}", segment);
  }

  let no_overrides: &[Option<&str>] = &[];
  let no_append: &[&str] = &[];
  println!("→ {}", join(&segments, no_overrides, no_append).display());
  Ok(())
}
