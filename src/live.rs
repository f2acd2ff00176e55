//! The update loop owning a state tree for the duration of a session.

use crate::{
	path::InvalidPathError,
	record::{Attributes, ChangeNotification, Record, Snapshot},
	render::RenderAdapter,
	tree::{treeify_partial, TreeNode},
	update::apply_change,
};
use hashbrown::HashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	InvalidPath(#[from] InvalidPathError),

	#[error("could not decode state message: {0}")]
	Decode(#[from] serde_json::Error),
}

/// The body of a pushed change message. The path arrives alongside it.
#[derive(Deserialize)]
struct Broadcast {
	#[serde(default)]
	attrs: Attributes,
}

/// Owns a state tree and forwards its build and update events to a [`RenderAdapter`].
///
/// Updates take `&mut self`, so they are applied strictly one after another, in the order they are passed in.
#[derive(Debug)]
pub struct LiveTree<A: RenderAdapter> {
	tree: TreeNode,
	adapter: A,
	rejected: Vec<InvalidPathError>,
	undecodable: Vec<String>,
}

impl<A: RenderAdapter> LiveTree<A> {
	/// Builds the tree for `snapshot` below `base_path` and hands it to `adapter`.
	///
	/// Invalid snapshot entries abort only their own subtree. They are available through [`LiveTree::rejected`].
	///
	/// # Errors
	///
	/// Iff `base_path` is invalid. `adapter` is not called in that case.
	#[instrument(skip(snapshot, adapter))]
	pub fn new(base_path: &str, snapshot: Snapshot, mut adapter: A) -> Result<Self, InvalidPathError> {
		let partial = treeify_partial(base_path, snapshot)?;
		adapter.on_tree_built(&partial.tree);
		Ok(Self {
			tree: partial.tree,
			adapter,
			rejected: partial.rejected,
			undecodable: Vec::new(),
		})
	}

	/// Like [`LiveTree::new`], but decodes the snapshot from its JSON form first.
	///
	/// Each entry is decoded on its own. Entries that aren't records are left out
	/// and listed by [`LiveTree::undecodable`].
	///
	/// # Errors
	///
	/// Iff `json` isn't an object or `base_path` is invalid.
	pub fn from_json(base_path: &str, json: &str, adapter: A) -> Result<Self, Error> {
		let entries: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;

		let mut snapshot = Snapshot::with_capacity(entries.len());
		let mut undecodable = Vec::new();
		for (path, entry) in entries {
			match serde_json::from_value::<Record>(entry) {
				Ok(record) => {
					snapshot.insert(path, record);
				}
				Err(error) => {
					warn!("Could not decode snapshot entry {:?}: {}", path, error);
					undecodable.push(path);
				}
			}
		}
		undecodable.sort_unstable();

		let mut live = Self::new(base_path, snapshot, adapter)?;
		live.undecodable = undecodable;
		Ok(live)
	}

	/// Applies one change and reports the attributes that changed, if any, to the adapter.
	///
	/// # Errors
	///
	/// Iff the notification's path is invalid. Neither the tree nor the adapter are touched then.
	pub fn apply(&mut self, notification: &ChangeNotification) -> Result<Vec<String>, InvalidPathError> {
		let changed = apply_change(&mut self.tree, notification)?;
		if changed.is_delta() {
			self.adapter.on_node_changed(changed.node, &changed.attrs);
		} else {
			debug!(path = notification.path.as_str(), "Change without visible delta.");
		}
		Ok(changed.attrs)
	}

	/// Applies a pushed message as delivered by the connection, i.e. `{"attrs": {…}}` for `path`.
	///
	/// # Errors
	///
	/// Iff the message can't be decoded or `path` is invalid.
	pub fn apply_broadcast(&mut self, path: &str, message: &str) -> Result<Vec<String>, Error> {
		let Broadcast { attrs } = serde_json::from_str(message)?;
		Ok(self.apply(&ChangeNotification { path: path.to_owned(), attrs })?)
	}

	#[must_use]
	pub fn tree(&self) -> &TreeNode {
		&self.tree
	}

	#[must_use]
	pub fn adapter(&self) -> &A {
		&self.adapter
	}

	pub fn adapter_mut(&mut self) -> &mut A {
		&mut self.adapter
	}

	/// Snapshot entries that were left out of the tree.
	#[must_use]
	pub fn rejected(&self) -> &[InvalidPathError] {
		&self.rejected
	}

	/// Paths of snapshot entries that could not be decoded as records, sorted.
	#[must_use]
	pub fn undecodable(&self) -> &[String] {
		&self.undecodable
	}

	#[must_use]
	pub fn into_parts(self) -> (TreeNode, A) {
		(self.tree, self.adapter)
	}
}
