//! Browser presentation of a state tree through `web_sys`.

use crate::{
	path,
	record::{self, Record, Value},
	render::RenderAdapter,
	tree::TreeNode,
};
use hashbrown::HashMap;
use tracing::{debug, error, instrument, trace, trace_span, warn};
use wasm_bindgen::JsValue;

/// Class added to list items, before the kind-specific one.
pub const ITEM_CLASS: &str = "tree-item-style";
/// Class flagging values that changed since the last [`DomTreeView::clear_highlights`].
pub const CHANGED_CLASS: &str = "changed";

/// A [`RenderAdapter`] that renders a state tree as nested lists into the child nodes of a [`web_sys::Element`].
///
/// Every node other than the root becomes
///
/// ```html
/// <li class="tree-item-style room-style" data-path="/home/room1">
///   <span>room1</span>
///   <div><!-- one row per attribute, then the text --></div>
///   <div><ul><!-- children --></ul></div>
/// </li>
/// ```
///
/// and each attribute other than `name` and `kind` becomes
/// `<div name="brightness">{ <span type="key">brightness</span>: <span type="value">50</span> }</div>`.
///
/// The view keeps direct handles to the elements it created, by path,
/// so updates touch only the affected value elements.
/// It will misbehave if other code changes those elements' structure.
#[derive(Debug)]
pub struct DomTreeView {
	element: web_sys::Element,
	views: HashMap<String, NodeView>,
	highlighted: Vec<web_sys::Element>,
}

#[derive(Debug)]
struct NodeView {
	/// `None` for the root.
	item: Option<web_sys::Element>,
	data: web_sys::Element,
	list: web_sys::Element,
	values: HashMap<String, web_sys::Element>,
	text: Option<web_sys::Element>,
}

impl DomTreeView {
	/// Creates a view that will replace the child nodes of `element` once the tree is built.
	#[must_use]
	#[instrument]
	pub fn new_for_element(element: web_sys::Element) -> Self {
		Self {
			element,
			views: HashMap::new(),
			highlighted: Vec::new(),
		}
	}

	/// The element the tree is rendered into.
	#[must_use]
	pub fn element(&self) -> &web_sys::Element {
		&self.element
	}

	/// The list item rendered for the node at `path`, if any.
	#[must_use]
	pub fn item(&self, path: &str) -> Option<&web_sys::Element> {
		self.views.get(path)?.item.as_ref()
	}

	/// The element displaying attribute `name` of the node at `path`, if any.
	#[must_use]
	pub fn value(&self, path: &str, name: &str) -> Option<&web_sys::Element> {
		self.views.get(path)?.values.get(name)
	}

	/// The number of values currently flagged with [`CHANGED_CLASS`].
	#[must_use]
	pub fn highlighted_count(&self) -> usize {
		self.highlighted.len()
	}

	/// Removes the [`CHANGED_CLASS`] from all values flagged so far.
	pub fn clear_highlights(&mut self) {
		for element in self.highlighted.drain(..) {
			or_warn(element.class_list().remove_1(CHANGED_CLASS), "clear highlight");
		}
	}

	fn document(&self) -> Option<web_sys::Document> {
		let document = self.element.owner_document();
		if document.is_none() {
			error!("statetree-dom: No owner document found for root element.");
		}
		document
	}

	fn render_root(&mut self, document: &web_sys::Document, tree: &TreeNode) -> Option<()> {
		let label = document.create_text_node("/");
		append(&self.element, label.as_ref())?;
		let data = create_element(document, &self.element, "div")?;
		let list = create_element(document, &self.element, "ul")?;

		let mut view = NodeView {
			item: None,
			data,
			list,
			values: HashMap::new(),
			text: None,
		};
		if let Some(record) = &tree.data {
			view.render_data(document, record);
		}
		self.views.insert(tree.path.clone(), view);

		for child in tree.children.values() {
			self.render_subtree(document, &tree.path, child);
		}
		Some(())
	}

	fn render_subtree(&mut self, document: &web_sys::Document, parent_path: &str, node: &TreeNode) {
		let span = trace_span!("Rendering subtree", path = node.path.as_str());
		let _enter = span.enter();

		if self.render_item(document, parent_path, node).is_none() {
			return warn!("Skipped rendering subtree {:?}.", node.path);
		}
		for child in node.children.values() {
			self.render_subtree(document, &node.path, child);
		}
	}

	/// Renders `node` itself (without children) below the view at `parent_path`.
	fn render_item(&mut self, document: &web_sys::Document, parent_path: &str, node: &TreeNode) -> Option<()> {
		let parent = match self.views.get(parent_path) {
			Some(parent) => parent,
			None => {
				error!("No view for parent {:?} of {:?}.", parent_path, node.path);
				return None;
			}
		};

		let item = create_element(document, &parent.list, "li")?;
		set_item_class(&item, node.data.as_ref());
		or_warn(item.set_attribute("data-path", &node.path), "set data-path on list item");

		let label = create_element(document, &item, "span")?;
		label.set_text_content(Some(node.segment()));
		let data = create_element(document, &item, "div")?;
		let children = create_element(document, &item, "div")?;
		let list = create_element(document, &children, "ul")?;

		let mut view = NodeView {
			item: Some(item),
			data,
			list,
			values: HashMap::new(),
			text: None,
		};
		if let Some(record) = &node.data {
			view.render_data(document, record);
		}
		trace!("Rendered list item.");
		self.views.insert(node.path.clone(), view);
		Some(())
	}

	/// Makes sure a view exists for the node at `path` and all its ancestors.
	///
	/// Missing ancestors are rendered as grouping nodes without data.
	/// `node` is rendered in full if its view is missing.
	fn ensure_view(&mut self, document: &web_sys::Document, node: &TreeNode) -> Option<()> {
		if self.views.contains_key(&node.path) {
			return Some(());
		}

		let root = self.views.keys().min_by_key(|path| path.len())?.clone();
		let mut parent_path = root.clone();
		for segment in path::segments(node.path.strip_prefix(root.as_str())?).ok()? {
			let path = path::join(&parent_path, segment);
			if !self.views.contains_key(&path) {
				if path == node.path {
					self.render_item(document, &parent_path, node)?;
				} else {
					debug!(path = path.as_str(), "Rendering missing ancestor.");
					self.render_item(document, &parent_path, &TreeNode::new(path.clone()))?;
				}
			}
			parent_path = path;
		}
		Some(())
	}
}

impl NodeView {
	fn render_data(&mut self, document: &web_sys::Document, record: &Record) {
		for (name, value) in record.extra_attributes() {
			self.render_attribute(document, name, value);
		}
		self.render_text(document, record);
	}

	fn render_attribute(&mut self, document: &web_sys::Document, name: &str, value: &Value) -> Option<()> {
		let row = document.create_element("div").map_err(|error| error!("Failed to create attribute row: {:?}", error)).ok()?;
		or_warn(row.set_attribute("name", name), "set name of attribute row");

		append(&row, document.create_text_node("{ ").as_ref())?;
		let key = create_element(document, &row, "span")?;
		or_warn(key.set_attribute("type", "key"), "tag attribute key");
		key.set_text_content(Some(name));
		append(&row, document.create_text_node(": ").as_ref())?;
		let value_element = create_element(document, &row, "span")?;
		or_warn(value_element.set_attribute("type", "value"), "tag attribute value");
		value_element.set_text_content(Some(&value.to_string()));
		append(&row, document.create_text_node(" }").as_ref())?;

		// Rows go before the text, which is always last.
		let inserted = match &self.text {
			Some(text) => self.data.insert_before(row.as_ref(), Some(AsRef::<web_sys::Node>::as_ref(text))),
			None => self.data.append_child(row.as_ref()),
		};
		if let Err(error) = inserted {
			error!("Failed to insert attribute row {:?}: {:?}", name, error);
			return None;
		}

		self.values.insert(name.to_owned(), value_element);
		Some(())
	}

	fn render_text(&mut self, document: &web_sys::Document, record: &Record) {
		match (record.text_content(), &self.text) {
			(Some(content), Some(text)) => text.set_text_content(Some(&format!("<text>: {}", content))),
			(Some(content), None) => {
				if let Some(text) = create_element(document, &self.data, "div") {
					text.set_text_content(Some(&format!("<text>: {}", content)));
					self.text = Some(text);
				}
			}
			(None, _) => (),
		}
	}
}

impl RenderAdapter for DomTreeView {
	#[instrument(skip(self, tree), fields(path = tree.path.as_str()))]
	fn on_tree_built(&mut self, tree: &TreeNode) {
		let document = match self.document() {
			Some(document) => document,
			None => return,
		};

		self.element.set_inner_html("");
		self.views.clear();
		self.highlighted.clear();

		if self.render_root(&document, tree).is_none() {
			return error!("Failed to render tree root {:?}.", tree.path);
		}
		debug!(views = self.views.len(), "Rendered tree.");
	}

	#[instrument(skip(self, node), fields(path = node.path.as_str()))]
	fn on_node_changed(&mut self, node: &TreeNode, changed: &[String]) {
		let document = match self.document() {
			Some(document) => document,
			None => return,
		};

		if self.ensure_view(&document, node).is_none() {
			return error!("No view for changed node {:?}.", node.path);
		}
		let record = match &node.data {
			Some(record) => record,
			None => return warn!("Changed node {:?} has no data.", node.path),
		};
		let view = match self.views.get_mut(&node.path) {
			Some(view) => view,
			None => return,
		};

		for name in changed {
			let span = trace_span!("Patching attribute", name = name.as_str());
			let _enter = span.enter();

			if name == record::KIND {
				if let Some(item) = &view.item {
					set_item_class(item, Some(record));
				}
				continue;
			}
			if record::is_reserved(name) {
				continue;
			}

			let value = match record.get(name) {
				Some(value) => value,
				None => continue,
			};
			if cfg!(feature = "dangerous-logging") {
				trace!(%value, "New value.");
			}

			match view.values.get(name) {
				Some(element) => element.set_text_content(Some(&value.to_string())),
				None => {
					if view.render_attribute(&document, name, value).is_none() {
						continue;
					}
				}
			}
			let element = match view.values.get(name) {
				Some(element) => element,
				None => continue,
			};
			let class_list = element.class_list();
			if class_list.contains(CHANGED_CLASS) {
				continue;
			}
			match class_list.add_1(CHANGED_CLASS) {
				Ok(()) => self.highlighted.push(element.clone()),
				Err(error) => warn!("Failed to highlight changed value: {:?}", error),
			}
		}
	}
}

fn set_item_class(item: &web_sys::Element, data: Option<&Record>) {
	let kind = data.map_or(record::Kind::Undefined, Record::kind);
	item.set_class_name(&format!("{} {}", ITEM_CLASS, kind.style_class()));
}

fn or_warn(result: Result<(), JsValue>, action: &str) {
	if let Err(error) = result {
		warn!("Failed to {}: {:?}", action, error);
	}
}

fn create_element(document: &web_sys::Document, parent: &web_sys::Element, name: &str) -> Option<web_sys::Element> {
	let element = match document.create_element(name) {
		Ok(element) => element,
		Err(error) => {
			error!("Failed to create <{}>: {:?}", name, error);
			return None;
		}
	};
	append(parent, element.as_ref())?;
	Some(element)
}

fn append(parent: &web_sys::Element, child: &web_sys::Node) -> Option<()> {
	match parent.append_child(child) {
		Ok(_) => Some(()),
		Err(error) => {
			error!("Failed to append {:?}: {:?}", child, error);
			None
		}
	}
}
