//! The records published for each path, and the snapshot and change messages carrying them.

use core::fmt::{self, Display, Formatter};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::BTreeMap};

/// Reserved attribute holding a node's display label.
pub const NAME: &str = "name";
/// Reserved attribute holding a node's style category. See [`Kind`].
pub const KIND: &str = "kind";

/// Attributes by name, iterated in name order.
pub type Attributes = BTreeMap<String, Value>;

/// The full flat path → [`Record`] state as delivered once at startup. Unordered.
pub type Snapshot = HashMap<String, Record>;

/// A single attribute value as published by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	String(String),
	Number(serde_json::Number),
	Bool(bool),
	/// Anything else the feed sends, like `null` or nested JSON. Displayed as its JSON text.
	Other(serde_json::Value),
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::String(string) => f.write_str(string),
			Value::Number(number) => Display::fmt(number, f),
			Value::Bool(value) => Display::fmt(value, f),
			Value::Other(value) => Display::fmt(value, f),
		}
	}
}

impl From<&str> for Value {
	fn from(string: &str) -> Self {
		Self::String(string.to_owned())
	}
}

impl From<String> for Value {
	fn from(string: String) -> Self {
		Self::String(string)
	}
}

impl From<i32> for Value {
	fn from(number: i32) -> Self {
		Self::Number(number.into())
	}
}

impl From<i64> for Value {
	fn from(number: i64) -> Self {
		Self::Number(number.into())
	}
}

impl From<u64> for Value {
	fn from(number: u64) -> Self {
		Self::Number(number.into())
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

/// The attribute record attached to one path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
	#[serde(default)]
	pub attrs: Attributes,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
}

impl Record {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style attribute insertion.
	#[must_use]
	pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
		self.attrs.insert(name.to_owned(), value.into());
		self
	}

	#[must_use]
	pub fn with_text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.attrs.get(name)
	}

	/// The display label, if there is one.
	#[must_use]
	pub fn name(&self) -> Option<&Value> {
		self.attrs.get(NAME)
	}

	#[must_use]
	pub fn kind(&self) -> Kind {
		Kind::of(self.attrs.get(KIND))
	}

	/// All attributes except `name` and `kind`, in name order.
	pub fn extra_attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.attrs.iter().map(|(name, value)| (name.as_str(), value)).filter(|(name, _)| !is_reserved(name))
	}

	/// The trimmed free text, unless that's empty.
	#[must_use]
	pub fn text_content(&self) -> Option<&str> {
		self.text.as_deref().map(str::trim).filter(|text| !text.is_empty())
	}
}

/// Whether `name` is one of the attributes that aren't displayed as plain data.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
	name == NAME || name == KIND
}

/// A node's style category, from its `kind` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
	Home,
	Room,
	Hue,
	HueBridge,
	WemoMotion,
	WemoSwitch,
	Scene,
	Other(String),
	Undefined,
}

impl Kind {
	#[must_use]
	pub fn of(value: Option<&Value>) -> Self {
		match value {
			None => Self::Undefined,
			Some(Value::String(kind)) => match kind.as_str() {
				"home" => Self::Home,
				"room" => Self::Room,
				"hue" => Self::Hue,
				"huebridge" => Self::HueBridge,
				"wemomotion" => Self::WemoMotion,
				"wemoswitch" => Self::WemoSwitch,
				"scene" => Self::Scene,
				other => Self::Other(other.to_owned()),
			},
			Some(other) => Self::Other(other.to_string()),
		}
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			Self::Home => "home",
			Self::Room => "room",
			Self::Hue => "hue",
			Self::HueBridge => "huebridge",
			Self::WemoMotion => "wemomotion",
			Self::WemoSwitch => "wemoswitch",
			Self::Scene => "scene",
			Self::Other(kind) => kind.as_str(),
			Self::Undefined => "undefined",
		}
	}

	/// The list item class selecting this kind's style, e.g. `room-style`.
	#[must_use]
	pub fn style_class(&self) -> Cow<'static, str> {
		match self {
			Self::Home => "home-style".into(),
			Self::Room => "room-style".into(),
			Self::Hue => "hue-style".into(),
			Self::HueBridge => "huebridge-style".into(),
			Self::WemoMotion => "wemomotion-style".into(),
			Self::WemoSwitch => "wemoswitch-style".into(),
			Self::Scene => "scene-style".into(),
			Self::Other(kind) => format!("{}-style", kind).into(),
			Self::Undefined => "undefined-style".into(),
		}
	}
}

impl Display for Kind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A later partial update to one path's attributes.
///
/// Attributes that aren't mentioned keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeNotification {
	pub path: String,
	#[serde(default)]
	pub attrs: Attributes,
}

impl ChangeNotification {
	#[must_use]
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into(), attrs: Attributes::new() }
	}

	#[must_use]
	pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
		self.attrs.insert(name.to_owned(), value.into());
		self
	}
}
