//! CLI commands for shipline
//!
//! ## Inspection
//! - **resolve**: Show channel, version suffix and artifact folders for a branch
//! - **segments**: Split an arbitrary string with the segment rules
//!
//! ## Execution
//! - **exec**: Run one command under an exit-code allow-list
//! - **run**: Run the configured stages for the current branch
//!
//! ## Setup
//! - **init**: Write a starter shipline.toml
//!
//! All commands accept `&PipelineContext` to avoid redundant config loads.

pub mod exec;
pub mod init;
pub mod resolve;
pub mod run;
pub mod segments;

pub use exec::run_exec;
pub use init::run_init;
pub use resolve::run_resolve;
pub use run::run_pipeline;
pub use segments::run_segments;
