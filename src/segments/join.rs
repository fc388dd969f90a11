//! Compose segments, positional overrides and trailing components into a path

use std::path::PathBuf;

/// Join `segments` into a hierarchical path.
///
/// `overrides` is positional and sparse: `None` or `""` at an index keeps the
/// original segment there. Overrides beyond the end of `segments` only extend
/// the result when at least one of them is non-empty; gaps they leave become
/// empty components. `append` components follow the result verbatim.
///
/// Empty components are skipped when combining, and an empty `segments` list
/// produces an empty path.
pub fn join<S: AsRef<str>>(segments: &[String], overrides: &[Option<S>], append: &[S]) -> PathBuf {
  if segments.is_empty() {
    return PathBuf::new();
  }

  let extends = overrides.len() > segments.len()
    && (segments.len()..overrides.len()).any(|i| override_at(overrides, i).is_some());
  let effective = if extends { overrides.len() } else { segments.len() };

  let components = (0..effective)
    .map(|i| {
      override_at(overrides, i)
        .or_else(|| segments.get(i).map(String::as_str))
        .unwrap_or("")
    })
    .chain(append.iter().map(|s| s.as_ref()));

  let mut path = PathBuf::new();
  for component in components.filter(|c| !c.is_empty()) {
    path.push(component);
  }

  tracing::debug!(path = %path.display(), "joined segments");
  path
}

/// Non-empty override at `index`, if any
fn override_at<S: AsRef<str>>(overrides: &[Option<S>], index: usize) -> Option<&str> {
  overrides
    .get(index)
    .and_then(Option::as_ref)
    .map(|s| s.as_ref())
    .filter(|s| !s.is_empty())
}
