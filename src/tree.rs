//! Reconstruction of the implied tree from a flat path → [`Record`] mapping.

use crate::{
	path::{self, InvalidPathError},
	record::{Record, Snapshot},
};
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace, trace_span, warn};

/// One node of the state tree.
///
/// `path` is always the concatenation of the ancestors' segments plus this node's own segment.
/// `data` is absent on pure grouping nodes that only exist because some descendant does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
	pub path: String,
	pub data: Option<Record>,
	pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
	/// Creates a grouping node without data or children.
	#[must_use]
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			data: None,
			children: BTreeMap::new(),
		}
	}

	/// The last segment of this node's path, or `""` for a root built at `""`.
	#[must_use]
	pub fn segment(&self) -> &str {
		self.path.rsplit('/').next().unwrap_or("")
	}

	/// Looks up the node at `path`, relative to this node.
	#[must_use]
	pub fn get(&self, path: &str) -> Option<&Self> {
		let mut node = self;
		for segment in path::segments(path).ok()? {
			node = node.children.get(segment)?;
		}
		Some(node)
	}

	/// The number of nodes in this subtree, including this one.
	#[must_use]
	pub fn node_count(&self) -> usize {
		1 + self.children.values().map(Self::node_count).sum::<usize>()
	}

	/// Flattens the subtree back into `(path, record)` pairs, in pre-order.
	///
	/// Paths are canonical: data read from a `"/"` key of the base node comes back under the base path itself,
	/// which is `""` for a root built at `""`.
	#[must_use]
	pub fn records(&self) -> Vec<(&str, &Record)> {
		fn collect<'a>(node: &'a TreeNode, records: &mut Vec<(&'a str, &'a Record)>) {
			if let Some(data) = &node.data {
				records.push((node.path.as_str(), data));
			}
			for child in node.children.values() {
				collect(child, records)
			}
		}

		let mut records = Vec::new();
		collect(self, &mut records);
		records
	}
}

/// The result of [`treeify_partial`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartialTree {
	pub tree: TreeNode,
	/// Snapshot entries that were not built, with why.
	pub rejected: Vec<InvalidPathError>,
	/// Subtrees that were left out entirely because an entry below them was invalid.
	pub aborted: Vec<String>,
}

/// Builds the tree implied by `snapshot` below `base_path`.
///
/// Keys are full paths relative to `base_path`. A key of `""` or `"/"` denotes the base node itself.
/// Entries are visited in sorted key order, so the result doesn't depend on the snapshot's iteration order.
///
/// # Errors
///
/// Iff `base_path` or any key isn't a valid path. See [`treeify_partial`] for a lenient variant.
#[instrument(skip(snapshot), fields(entries = snapshot.len()))]
pub fn treeify(base_path: &str, snapshot: Snapshot) -> Result<TreeNode, InvalidPathError> {
	validate_base(base_path)?;
	let entries = sorted(snapshot);
	for (key, _) in &entries {
		path::validate(key)?;
	}
	let tree = build(base_path.to_owned(), entries)?;
	debug!(nodes = tree.node_count(), "Built tree.");
	Ok(tree)
}

/// Like [`treeify`], but an invalid key only aborts the subtree it would have landed in.
///
/// That subtree is the one rooted at the longest valid prefix of the key,
/// so `/home/room1//x` leaves out `/home/room1` but still builds the rest of `/home`.
/// Keys without any usable prefix are dropped on their own.
///
/// # Errors
///
/// Iff `base_path` is invalid.
#[instrument(skip(snapshot), fields(entries = snapshot.len()))]
pub fn treeify_partial(base_path: &str, snapshot: Snapshot) -> Result<PartialTree, InvalidPathError> {
	validate_base(base_path)?;
	let entries = sorted(snapshot);

	let mut rejected = Vec::new();
	let mut aborted: Vec<String> = Vec::new();
	for (key, _) in &entries {
		if let Err(error) = path::validate(key) {
			warn!("Rejected snapshot entry: {}", error);
			if let Some(prefix) = path::valid_prefix(key) {
				if !aborted.iter().any(|subtree| path::is_within(prefix, subtree)) {
					aborted.retain(|subtree| !path::is_within(subtree, prefix));
					aborted.push(prefix.to_owned());
				}
			}
			rejected.push(error);
		}
	}
	for subtree in &aborted {
		warn!("Aborted subtree {:?} below {:?}.", subtree, base_path);
	}

	let entries = entries
		.into_iter()
		.filter(|(key, _)| path::validate(key).is_ok() && !aborted.iter().any(|subtree| path::is_within(key, subtree)))
		.collect();
	let tree = build(base_path.to_owned(), entries)?;
	debug!(nodes = tree.node_count(), rejected = rejected.len(), "Built partial tree.");
	Ok(PartialTree { tree, rejected, aborted })
}

fn validate_base(base_path: &str) -> Result<(), InvalidPathError> {
	if base_path == "/" {
		return Err(InvalidPathError::EmptySegment { path: base_path.to_owned() });
	}
	path::validate(base_path)
}

fn sorted(snapshot: Snapshot) -> Vec<(String, Record)> {
	let mut entries: Vec<_> = snapshot.into_iter().collect();
	entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
	entries
}

/// `entries` must be sorted by key. Grouping preserves that order for each child.
fn build(path: String, entries: Vec<(String, Record)>) -> Result<TreeNode, InvalidPathError> {
	let span = trace_span!("Building node", path = path.as_str(), entries = entries.len());
	let _enter = span.enter();

	if entries.is_empty() {
		return Ok(TreeNode::new(path));
	}

	let mut data = None;
	let mut groups = BTreeMap::<String, Vec<(String, Record)>>::new();
	for (key, record) in entries {
		if key.is_empty() {
			data = Some(record);
			continue;
		}

		let first = path::first_segment(&key)?;
		if first.is_empty() {
			data = Some(record);
		} else {
			let remainder = path::remainder(&key)?.to_owned();
			groups.entry(first.to_owned()).or_default().push((remainder, record));
		}
	}

	let mut children = BTreeMap::new();
	for (segment, entries) in groups {
		let child = build(path::join(&path, &segment), entries)?;
		children.insert(segment, child);
	}

	trace!(has_data = data.is_some(), children = children.len(), "Built node.");
	Ok(TreeNode { path, data, children })
}
