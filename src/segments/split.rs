//! Split a branch name into normalized path segments

use crate::core::error::{ShipResult, ValidationError};
use crate::segments::keyword_eq;

/// Default maximum number of segments a branch name may produce
pub const DEFAULT_MAX_SEGMENTS: usize = 2;

/// Segments that may never appear in a branch name
pub const DEFAULT_FORBIDDEN: [&str; 2] = ["latest", "foo"];

/// Characters that cannot appear in a file name on any supported platform
const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Split `input` on runs of `/` or `\` and normalize every segment.
///
/// - Empty input yields no segments.
/// - Runs of separators collapse; a leading or trailing separator leaves an
///   empty segment at that end, and empty segments count like any other.
/// - More than `max_segments` segments, or a segment matching `forbidden`
///   (ignoring case), is a validation error.
/// - Reserved file-name characters become `-`. The first segment is lowercased,
///   the rest uppercased, spaces become `_` everywhere.
pub fn split<S: AsRef<str>>(input: &str, max_segments: usize, forbidden: &[S]) -> ShipResult<Vec<String>> {
  if input.is_empty() {
    return Ok(Vec::new());
  }

  let raw = tokenize(input);

  if raw.len() > max_segments {
    tracing::error!(input, count = raw.len(), max = max_segments, "too many segments");
    return Err(
      ValidationError::TooManySegments {
        input: input.to_string(),
        count: raw.len(),
        max: max_segments,
      }
      .into(),
    );
  }

  if let Some(segment) = raw
    .iter()
    .find(|seg| forbidden.iter().any(|f| keyword_eq(f.as_ref(), seg)))
  {
    tracing::error!(input, segment = *segment, "forbidden segment");
    return Err(
      ValidationError::ForbiddenSegment {
        input: input.to_string(),
        segment: segment.to_string(),
      }
      .into(),
    );
  }

  let segments: Vec<String> = raw
    .iter()
    .enumerate()
    .map(|(index, seg)| normalize(seg, index))
    .collect();

  tracing::debug!(input, ?segments, "split segments");
  Ok(segments)
}

/// Split on separator runs, keeping empty tokens only at the edges
fn tokenize(input: &str) -> Vec<&str> {
  let mut tokens = Vec::new();
  let mut start = 0;
  let mut in_separator = false;

  for (pos, c) in input.char_indices() {
    if is_separator(c) {
      if !in_separator {
        tokens.push(&input[start..pos]);
        in_separator = true;
      }
    } else if in_separator {
      start = pos;
      in_separator = false;
    }
  }

  if in_separator {
    tokens.push("");
  } else {
    tokens.push(&input[start..]);
  }

  tokens
}

fn is_separator(c: char) -> bool {
  c == '/' || c == '\\'
}

fn is_reserved(c: char) -> bool {
  (c as u32) < 0x20 || RESERVED_CHARS.contains(&c)
}

fn normalize(segment: &str, index: usize) -> String {
  let cleaned: String = segment
    .chars()
    .map(|c| match c {
      c if is_reserved(c) => '-',
      ' ' => '_',
      c => c,
    })
    .collect();

  if index == 0 {
    cleaned.to_lowercase()
  } else {
    cleaned.to_uppercase()
  }
}
