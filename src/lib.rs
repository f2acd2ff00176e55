#![doc(html_root_url = "https://docs.rs/statetree-dom/0.1.0")]
#![warn(clippy::pedantic)]

//! Rebuilds the tree implied by a flat path → record state feed and keeps a view of it up to date.
//!
//! [`treeify`] turns a [`Snapshot`] like `{"/home/room1": …, "/home/room1/light": …}` into nested [`TreeNode`]s.
//! [`apply_change`] then merges each later [`ChangeNotification`] into that tree in place.
//! [`LiveTree`] ties both together and reports to a [`RenderAdapter`], for example a [`DomTreeView`].

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod dom;
pub mod live;
pub mod path;
pub mod record;
pub mod render;
pub mod tree;
pub mod update;

pub use dom::DomTreeView;
pub use live::LiveTree;
pub use path::InvalidPathError;
pub use record::{Attributes, ChangeNotification, Kind, Record, Snapshot, Value};
pub use render::RenderAdapter;
pub use tree::{treeify, treeify_partial, PartialTree, TreeNode};
pub use update::{apply_change, Changed};
