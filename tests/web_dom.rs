#![cfg(target_arch = "wasm32")]

use statetree_dom::{dom::CHANGED_CLASS, ChangeNotification, DomTreeView, LiveTree, Record, Snapshot};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Element};

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn container() -> Element {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}

	let document = window().unwrap().document().unwrap();
	let container = document.create_element("div").unwrap();
	document.body().unwrap().append_child(&container).unwrap();
	container
}

fn home() -> Snapshot {
	let mut snapshot = Snapshot::new();
	snapshot.insert("/home".to_owned(), Record::new().with("kind", "home").with("name", "Home"));
	snapshot.insert("/home/room1".to_owned(), Record::new().with("kind", "room").with("name", "Room 1"));
	snapshot.insert(
		"/home/room1/light".to_owned(),
		Record::new().with("kind", "hue").with("name", "Light").with("brightness", 50).with_text(" ceiling "),
	);
	snapshot
}

fn text_at(container: &Element, selector: &str) -> Option<String> {
	container.query_selector(selector).unwrap()?.text_content()
}

#[wasm_bindgen_test]
fn build() {
	let container = container();
	let live = LiveTree::new("", home(), DomTreeView::new_for_element(container.clone())).unwrap();

	let light = live.adapter().item("/home/room1/light").unwrap();
	assert_eq!(light.class_name(), "tree-item-style hue-style");
	assert_eq!(light.get_attribute("data-path").as_deref(), Some("/home/room1/light"));

	assert_eq!(text_at(&container, r#"[data-path="/home/room1/light"] > span"#).as_deref(), Some("light"));
	assert_eq!(
		text_at(&container, r#"[data-path="/home/room1/light"] [name="brightness"]"#).as_deref(),
		Some("{ brightness: 50 }")
	);
	assert_eq!(text_at(&container, r#"[data-path="/home/room1/light"] > div"#).as_deref(), Some("{ brightness: 50 }<text>: ceiling"));

	// Reserved attributes aren't rendered as data.
	assert!(container.query_selector(r#"[name="kind"]"#).unwrap().is_none());
	assert!(container.query_selector(r#"[name="name"]"#).unwrap().is_none());

	assert_eq!(container.query_selector_all("li").unwrap().length(), 3);
}

#[wasm_bindgen_test]
fn update_in_place() {
	let container = container();
	let mut live = LiveTree::new("", home(), DomTreeView::new_for_element(container.clone())).unwrap();
	let before = live.adapter().value("/home/room1/light", "brightness").unwrap().clone();

	live.apply(&ChangeNotification::new("/home/room1/light").with("brightness", 75)).unwrap();

	let after = live.adapter().value("/home/room1/light", "brightness").unwrap();
	assert!(before.is_same_node(Some(AsRef::<web_sys::Node>::as_ref(after))));
	assert_eq!(after.text_content().as_deref(), Some("75"));
	assert!(after.class_list().contains(CHANGED_CLASS));

	live.adapter_mut().clear_highlights();
	assert!(!live.adapter().value("/home/room1/light", "brightness").unwrap().class_list().contains(CHANGED_CLASS));
}

#[wasm_bindgen_test]
fn new_attribute_and_kind() {
	let container = container();
	let mut live = LiveTree::new("", home(), DomTreeView::new_for_element(container.clone())).unwrap();

	live.apply(&ChangeNotification::new("/home/room1").with("kind", "scene").with("temperature", 21)).unwrap();

	let room1 = live.adapter().item("/home/room1").unwrap();
	assert_eq!(room1.class_name(), "tree-item-style scene-style");
	assert_eq!(live.adapter().value("/home/room1", "temperature").unwrap().text_content().as_deref(), Some("21"));
}

#[wasm_bindgen_test]
fn lazy_nodes() {
	let container = container();
	let mut live = LiveTree::new("", home(), DomTreeView::new_for_element(container.clone())).unwrap();

	live.apply(&ChangeNotification::new("/garage/door").with("kind", "wemoswitch").with("state", "open")).unwrap();

	let garage = live.adapter().item("/garage").unwrap();
	assert_eq!(garage.class_name(), "tree-item-style undefined-style");
	let door = live.adapter().item("/garage/door").unwrap();
	assert_eq!(door.class_name(), "tree-item-style wemoswitch-style");
	assert_eq!(text_at(&container, r#"[data-path="/garage/door"] [type="value"]"#).as_deref(), Some("open"));
	assert_eq!(container.query_selector_all("li").unwrap().length(), 5);
}

#[wasm_bindgen_test]
fn repeated_changes_are_flagged_once() {
	let container = container();
	let mut live = LiveTree::new("", home(), DomTreeView::new_for_element(container.clone())).unwrap();

	live.apply(&ChangeNotification::new("/home/room1/light").with("brightness", 75)).unwrap();
	live.apply(&ChangeNotification::new("/home/room1/light").with("brightness", 76)).unwrap();
	assert_eq!(live.adapter().highlighted_count(), 1);
	assert_eq!(live.adapter().value("/home/room1/light", "brightness").unwrap().text_content().as_deref(), Some("76"));

	live.adapter_mut().clear_highlights();
	assert_eq!(live.adapter().highlighted_count(), 0);
	live.apply(&ChangeNotification::new("/home/room1/light").with("brightness", 77)).unwrap();
	assert_eq!(live.adapter().highlighted_count(), 1);
}
