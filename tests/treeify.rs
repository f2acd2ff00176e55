use statetree_dom::{path::InvalidPathError, treeify, treeify_partial, Record, Snapshot, TreeNode};

fn snapshot(entries: &[(&str, Record)]) -> Snapshot {
	entries.iter().map(|(path, record)| ((*path).to_owned(), record.clone())).collect()
}

fn home() -> Snapshot {
	snapshot(&[
		("/home", Record::new().with("kind", "home").with("name", "Home")),
		("/home/room1", Record::new().with("kind", "room").with("name", "Room 1")),
		("/home/room1/light", Record::new().with("kind", "hue").with("name", "Light").with("brightness", 50)),
		("/home/room2/motion", Record::new().with("kind", "wemomotion").with("state", "idle")),
		("/home/room1/scene", Record::new().with("kind", "scene").with_text("  Evening  ")),
	])
}

#[test]
fn empty() {
	let tree = treeify("", Snapshot::new()).unwrap();
	assert_eq!(tree, TreeNode::new(""));
}

#[test]
fn nested() {
	let tree = treeify("", home()).unwrap();

	assert_eq!(tree.path, "");
	assert!(tree.data.is_none());
	assert_eq!(tree.children.keys().collect::<Vec<_>>(), ["home"]);

	let home = &tree.children["home"];
	assert_eq!(home.path, "/home");
	assert_eq!(home.children.keys().collect::<Vec<_>>(), ["room1", "room2"]);

	let room1 = &home.children["room1"];
	assert_eq!(room1.data.as_ref().unwrap().get("name"), Some(&"Room 1".into()));
	assert_eq!(room1.children.keys().collect::<Vec<_>>(), ["light", "scene"]);

	let light = &room1.children["light"];
	assert_eq!(light.path, "/home/room1/light");
	assert_eq!(light.segment(), "light");
	assert_eq!(light.data.as_ref().unwrap().get("brightness"), Some(&50.into()));
	assert!(light.children.is_empty());

	// Only implied by its child.
	let room2 = &home.children["room2"];
	assert!(room2.data.is_none());
	assert_eq!(room2.children["motion"].path, "/home/room2/motion");

	assert_eq!(tree.node_count(), 7);
}

#[test]
fn prefix_coexistence() {
	let tree = treeify("", snapshot(&[("/a", Record::new().with("v", 1)), ("/a/b", Record::new().with("v", 2))])).unwrap();
	let a = tree.get("/a").unwrap();
	assert_eq!(a.data.as_ref().unwrap().get("v"), Some(&1.into()));
	assert_eq!(a.children["b"].data.as_ref().unwrap().get("v"), Some(&2.into()));
}

#[test]
fn round_trip() {
	let input = home();
	let tree = treeify("", input.clone()).unwrap();

	let records = tree.records();
	assert_eq!(records.len(), input.len());
	let recovered: Snapshot = records.into_iter().map(|(path, record)| (path.to_owned(), record.clone())).collect();
	assert_eq!(recovered, input);
}

#[test]
fn deterministic() {
	let entries = [
		("/z", Record::new().with("v", 1)),
		("/a/c", Record::new().with("v", 2)),
		("/a/b", Record::new().with("v", 3)),
		("/a", Record::new().with("v", 4)),
	];
	let mut reversed = entries.clone();
	reversed.reverse();

	let a = treeify("", snapshot(&entries)).unwrap();
	let b = treeify("", snapshot(&reversed)).unwrap();
	assert_eq!(a, b);
	assert_eq!(a.records().iter().map(|(path, _)| *path).collect::<Vec<_>>(), ["/a", "/a/b", "/a/c", "/z"]);
}

#[test]
fn case_sensitive_segments() {
	let tree = treeify("", snapshot(&[("/Room", Record::new()), ("/room", Record::new())])).unwrap();
	assert_eq!(tree.children.len(), 2);
}

#[test]
fn own_data_marker() {
	let tree = treeify("/home", snapshot(&[("/", Record::new().with("name", "Home")), ("/room1", Record::new())])).unwrap();
	assert_eq!(tree.path, "/home");
	assert_eq!(tree.data.as_ref().unwrap().get("name"), Some(&"Home".into()));
	assert_eq!(tree.children["room1"].path, "/home/room1");
}

#[test]
fn strict_rejects_invalid_keys() {
	let mut input = home();
	input.insert("home/room3".to_owned(), Record::new());
	assert_eq!(treeify("", input), Err(InvalidPathError::MissingLeadingSlash { path: "home/room3".to_owned() }));

	let mut input = home();
	input.insert("/home//room3".to_owned(), Record::new());
	assert_eq!(treeify("", input), Err(InvalidPathError::EmptySegment { path: "/home//room3".to_owned() }));

	assert!(treeify("home", Snapshot::new()).is_err());
	assert!(treeify("/", Snapshot::new()).is_err());
}

#[test]
fn partial_aborts_only_the_affected_subtree() {
	let mut input = home();
	input.insert("/home/room1//broken".to_owned(), Record::new());
	input.insert("no-slash".to_owned(), Record::new());

	let partial = treeify_partial("", input).unwrap();
	assert_eq!(partial.rejected.len(), 2);
	assert_eq!(partial.aborted, ["/home/room1"]);

	let tree = &partial.tree;
	assert!(tree.get("/home/room1").is_none());
	assert!(tree.get("/home").unwrap().data.is_some());
	assert!(tree.get("/home/room2/motion").is_some());
}

#[test]
fn partial_merges_nested_aborts() {
	let input = snapshot(&[
		("/a/b//x", Record::new()),
		("/a//y", Record::new()),
		("/a/b/c", Record::new()),
		("/d", Record::new()),
	]);

	let partial = treeify_partial("", input).unwrap();
	assert_eq!(partial.aborted, ["/a"]);
	assert_eq!(partial.tree.children.keys().collect::<Vec<_>>(), ["d"]);
}

#[test]
fn partial_equals_strict_on_valid_input() {
	let partial = treeify_partial("", home()).unwrap();
	assert!(partial.rejected.is_empty());
	assert!(partial.aborted.is_empty());
	assert_eq!(partial.tree, treeify("", home()).unwrap());
}

#[test]
fn own_data_marker_flattens_to_the_base_path() {
	let input = snapshot(&[("/", Record::new().with("v", 1)), ("/a", Record::new())]);
	let tree = treeify("", input).unwrap();
	assert_eq!(tree.records().iter().map(|(path, _)| *path).collect::<Vec<_>>(), ["", "/a"]);
}
