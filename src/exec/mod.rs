//! External command execution with exit-code policy

pub mod runner;

pub use runner::ExecRequest;
