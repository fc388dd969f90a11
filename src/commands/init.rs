use crate::core::config::PipelineConfig;
use crate::core::context::PipelineContext;
use crate::core::error::{ConfigError, ShipError, ShipResult};

/// Write a starter shipline.toml at the project root
pub fn run_init(ctx: &PipelineContext, force: bool) -> ShipResult<()> {
  if !force && let Some(existing) = PipelineConfig::find_config_path(&ctx.root) {
    return Err(ShipError::Config(ConfigError::AlreadyExists { path: existing }));
  }

  let path = PipelineConfig::starter().save(&ctx.root)?;
  tracing::info!(path = %path.display(), "wrote starter config");

  println!("✅ Created {}", path.display());
  println!();
  println!("Next steps:");
  println!("  1. Adjust [channels] to match your branching model");
  println!("  2. Edit [[stages]] for your build tool");
  println!("  3. Preview with: shipline run --dry-run");
  Ok(())
}
