mod channel;
mod commands;
mod core;
mod exec;
mod logging;
mod segments;

use clap::{Parser, Subcommand};
use core::context::PipelineContext;
use core::error::{ShipError, print_error};
use logging::LogFormat;
use std::path::PathBuf;

/// Resolve release channels from branch names and run build stages
#[derive(Parser)]
#[command(name = "shipline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  /// Log output format
  #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
  log_format: LogFormat,

  /// Use this config file instead of searching for shipline.toml
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Setup
  // ============================================================================
  /// Write a starter shipline.toml
  Init {
    /// Overwrite an existing config
    #[arg(long)]
    force: bool,
  },

  // ============================================================================
  // Inspection
  // ============================================================================
  /// Show channel, version suffix and artifact folders for a branch
  Resolve {
    /// Branch to resolve (default: $SHIPLINE_BRANCH, then the checked-out branch)
    #[arg(long)]
    branch: Option<String>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Split a string into normalized segments
  Segments {
    /// String to split, e.g. a branch name
    input: String,
    /// Maximum number of segments (default: [segments].max)
    #[arg(long)]
    max: Option<usize>,
    /// Forbidden segment, repeatable (default: [segments].forbidden)
    #[arg(long = "forbid", value_name = "SEGMENT")]
    forbid: Vec<String>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Execution
  // ============================================================================
  /// Run a command and judge its exit code
  Exec {
    /// Allowed exit code, repeatable (default: 0)
    #[arg(long = "allow-exit-code", value_name = "CODE", allow_negative_numbers = true)]
    allow_exit_code: Vec<i32>,
    /// Stream output instead of capturing it
    #[arg(long)]
    no_capture: bool,
    /// Do not measure elapsed time
    #[arg(long)]
    no_time: bool,
    /// Program and arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
  },

  /// Run configured stages for the current branch
  Run {
    /// Stages to run (default: all); declaration order is kept
    stages: Vec<String>,
    /// Branch to resolve (default: $SHIPLINE_BRANCH, then the checked-out branch)
    #[arg(long)]
    branch: Option<String>,
    /// Show the plan without executing
    #[arg(long)]
    dry_run: bool,
    /// Output the plan in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  let yellow_header = anstyle::Style::new()
    .bold()
    .underline()
    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)));
  let red = anstyle::Style::new()
    .bold()
    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));

  clap::builder::Styles::styled()
    .usage(yellow_header)
    .header(yellow_header)
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(red)
    .error(red)
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  logging::init(cli.verbose, cli.log_format);

  let cwd = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(ShipError::from(e).context("Failed to get current directory")),
  };

  // init may run over a missing or broken config
  let ctx = match cli.command {
    Commands::Init { .. } => PipelineContext::minimal(&cwd),
    _ => match PipelineContext::build(&cwd, cli.config.as_deref()) {
      Ok(ctx) => ctx,
      Err(e) => handle_error(e),
    },
  };

  let result = match cli.command {
    Commands::Init { force } => commands::run_init(&ctx, force),
    Commands::Resolve { branch, json } => commands::run_resolve(&ctx, branch, json),
    Commands::Segments {
      input,
      max,
      forbid,
      json,
    } => commands::run_segments(&ctx, input, max, forbid, json),
    Commands::Exec {
      allow_exit_code,
      no_capture,
      no_time,
      command,
    } => commands::run_exec(command, allow_exit_code, no_capture, no_time),
    Commands::Run {
      stages,
      branch,
      dry_run,
      json,
    } => commands::run_pipeline(&ctx, stages, branch, dry_run, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code());
}
