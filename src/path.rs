//! Helpers for slash-delimited state paths like `/home/room1/hue/brightness`.
//!
//! A path is either empty (the enclosing node itself), the own-data marker `/`,
//! or one or more non-empty segments each introduced by a single `/`.
//! Segments are case-sensitive and there is no escaping, so a segment name can never contain `/`.

use thiserror::Error;

/// A path argument that can't be mapped onto the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPathError {
	#[error("path {path:?} does not start with '/'")]
	MissingLeadingSlash { path: String },

	#[error("path {path:?} contains an empty segment")]
	EmptySegment { path: String },

	#[error("path {path:?} is not below the tree root {root:?}")]
	NotUnderRoot { path: String, root: String },
}

/// Returns the substring between the first and second `/` of `path`, or up to its end.
///
/// `"/"` yields `""`, which marks data belonging to the enclosing node.
///
/// # Errors
///
/// Iff `path` does not start with `/`.
pub fn first_segment(path: &str) -> Result<&str, InvalidPathError> {
	let rest = strip_leading_slash(path)?;
	Ok(rest.split('/').next().unwrap_or(rest))
}

/// Returns `/` followed by all segments of `path` after the first.
///
/// If there are none left, that's just `/`.
///
/// # Errors
///
/// Iff `path` does not start with `/`.
pub fn remainder(path: &str) -> Result<&str, InvalidPathError> {
	let rest = strip_leading_slash(path)?;
	Ok(match rest.find('/') {
		Some(i) => &rest[i..],
		None => "/",
	})
}

/// Checks that `path` is `""`, `"/"` or a sequence of non-empty `/`-prefixed segments.
///
/// # Errors
///
/// [`InvalidPathError::MissingLeadingSlash`] or [`InvalidPathError::EmptySegment`].
pub fn validate(path: &str) -> Result<(), InvalidPathError> {
	if path.is_empty() || path == "/" {
		return Ok(());
	}
	let rest = strip_leading_slash(path)?;
	if rest.split('/').any(str::is_empty) {
		return Err(InvalidPathError::EmptySegment { path: path.to_owned() });
	}
	Ok(())
}

/// Iterates over the segments of a valid `path`. `""` and `"/"` have none.
///
/// # Errors
///
/// Iff `path` doesn't [`validate`].
pub fn segments(path: &str) -> Result<impl Iterator<Item = &str>, InvalidPathError> {
	validate(path)?;
	Ok(path.split('/').filter(|segment| !segment.is_empty()))
}

/// Appends `segment` to `base`.
#[must_use]
pub fn join(base: &str, segment: &str) -> String {
	let mut path = String::with_capacity(base.len() + 1 + segment.len());
	path.push_str(base);
	path.push('/');
	path.push_str(segment);
	path
}

/// Of a `/`-prefixed `path`, returns the part before its first empty segment.
///
/// `None` if that would be the enclosing node itself.
pub(crate) fn valid_prefix(path: &str) -> Option<&str> {
	let rest = path.strip_prefix('/')?;
	let mut end = 0;
	for segment in rest.split('/') {
		if segment.is_empty() {
			break;
		}
		end += 1 + segment.len();
	}
	if end == 0 {
		None
	} else {
		Some(&path[..end])
	}
}

/// Whether `path` is `prefix` itself or lies below it.
pub(crate) fn is_within(path: &str, prefix: &str) -> bool {
	match path.strip_prefix(prefix) {
		Some(rest) => rest.is_empty() || rest.starts_with('/'),
		None => false,
	}
}

fn strip_leading_slash(path: &str) -> Result<&str, InvalidPathError> {
	path.strip_prefix('/').ok_or_else(|| InvalidPathError::MissingLeadingSlash { path: path.to_owned() })
}
