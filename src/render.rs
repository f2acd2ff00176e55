//! The two events a presentation layer receives.

use crate::tree::TreeNode;

/// Materializes a state tree and patches it as it changes.
///
/// Implementations only ever see shared references. Write access to the tree stays with the update loop.
pub trait RenderAdapter {
	/// Called exactly once, after the initial snapshot has been built into `tree`.
	fn on_tree_built(&mut self, tree: &TreeNode);

	/// Called synchronously after each update that changed at least one attribute of `node`.
	///
	/// `node` may have been created by that same update, along with any of its ancestors.
	/// `changed` lists the affected attribute names in name order.
	fn on_node_changed(&mut self, node: &TreeNode, changed: &[String]);
}

impl<A: RenderAdapter + ?Sized> RenderAdapter for &mut A {
	fn on_tree_built(&mut self, tree: &TreeNode) {
		(**self).on_tree_built(tree)
	}

	fn on_node_changed(&mut self, node: &TreeNode, changed: &[String]) {
		(**self).on_node_changed(node, changed)
	}
}

impl<A: RenderAdapter + ?Sized> RenderAdapter for Box<A> {
	fn on_tree_built(&mut self, tree: &TreeNode) {
		(**self).on_tree_built(tree)
	}

	fn on_node_changed(&mut self, node: &TreeNode, changed: &[String]) {
		(**self).on_node_changed(node, changed)
	}
}

/// Renders nothing.
impl RenderAdapter for () {
	fn on_tree_built(&mut self, _: &TreeNode) {}
	fn on_node_changed(&mut self, _: &TreeNode, _: &[String]) {}
}
