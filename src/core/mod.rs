//! Core building blocks shared by every command
//!
//! - **config**: shipline.toml parsing, defaults and validation
//! - **context**: per-invocation state (root, config, git)
//! - **error**: error types with contextual help and exit codes
//! - **guard**: required-value checks over a presence tag
//! - **plan**: stage plans for dry runs and execution
//! - **vcs**: branch and commit lookup through system git

pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod plan;
pub mod vcs;
