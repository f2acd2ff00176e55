//! In-place application of [`ChangeNotification`]s.

use crate::{
	path::{self, InvalidPathError},
	record::ChangeNotification,
	tree::TreeNode,
};
use tracing::{instrument, trace};

/// What [`apply_change`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct Changed<'a> {
	/// The node addressed by the notification.
	pub node: &'a TreeNode,
	/// Names of attributes that were inserted or now hold a different value, in name order.
	pub attrs: Vec<String>,
}

impl Changed<'_> {
	/// Whether the notification made any visible difference.
	#[must_use]
	pub fn is_delta(&self) -> bool {
		!self.attrs.is_empty()
	}
}

/// Merges `notification` into `tree`, creating any missing nodes along its path.
///
/// Attributes named in the notification overwrite their previous values. Other attributes are left alone.
///
/// # Errors
///
/// Iff the notification's path is invalid or doesn't lie below `tree.path`.
/// The tree is not modified in that case.
#[instrument(skip(tree, notification), fields(path = notification.path.as_str()))]
pub fn apply_change<'a>(tree: &'a mut TreeNode, notification: &ChangeNotification) -> Result<Changed<'a>, InvalidPathError> {
	let relative = relative_path(&tree.path, &notification.path)?;
	let segments = path::segments(relative)?;

	let mut node = tree;
	for segment in segments {
		let child_path = path::join(&node.path, segment);
		node = node.children.entry(segment.to_owned()).or_insert_with(|| {
			trace!(path = child_path.as_str(), "Created node.");
			TreeNode::new(child_path)
		});
	}

	let mut changed = Vec::new();
	let data = node.data.get_or_insert_with(Default::default);
	for (name, value) in &notification.attrs {
		match data.attrs.insert(name.clone(), value.clone()) {
			Some(previous) if previous == *value => (),
			previous => {
				if cfg!(feature = "dangerous-logging") {
					trace!(attr = name.as_str(), ?previous, %value, "Attribute changed.");
				} else {
					trace!(attr = name.as_str(), "Attribute changed.");
				}
				changed.push(name.clone())
			}
		}
	}

	Ok(Changed { node, attrs: changed })
}

/// Strips the tree root's path off an absolute notification path.
fn relative_path<'a>(root: &str, path: &'a str) -> Result<&'a str, InvalidPathError> {
	path::validate(path)?;
	if root.is_empty() {
		return Ok(path);
	}
	match path.strip_prefix(root) {
		Some(rest) if rest.is_empty() || rest.starts_with('/') => Ok(rest),
		_ => Err(InvalidPathError::NotUnderRoot {
			path: path.to_owned(),
			root: root.to_owned(),
		}),
	}
}
