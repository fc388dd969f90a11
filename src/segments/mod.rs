//! Branch-name segment handling
//!
//! - **split**: branch name → bounded, validated, case-normalized segments
//! - **translate**: remap the first segment through a keyword table
//! - **join**: segments + positional overrides + appended parts → path

pub mod join;
pub mod split;
pub mod translate;

pub use join::join;
pub use split::{DEFAULT_FORBIDDEN, DEFAULT_MAX_SEGMENTS, split};
pub use translate::{TranslationTable, translate};

/// Case-insensitive keyword comparison (Unicode lowercase), shared by the
/// forbidden-segment check and table lookups
pub(crate) fn keyword_eq(a: &str, b: &str) -> bool {
  a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}
