//! Release channel resolution

pub mod resolver;

pub use resolver::{ChannelResolver, ResolvedChannel};
