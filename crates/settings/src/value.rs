//! Runtime value representation shared with the rendering layer.
//!
//! Properties are statically typed, but the preferences UI and the
//! persistence codec walk heterogeneous property lists. [`SettingValue`] is
//! the tagged union they see instead of an unchecked cast, and
//! [`PropertyValue`] is the bound every property value type satisfies.

use std::fmt;

/// A property value as seen through the erased rendering interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// String value.
	String(String),
	/// Any other value type, carried as its debug rendering.
	Other(String),
}

/// Kind tag for [`SettingValue`], used to pick an editor widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// Boolean values.
	Bool,
	/// Integer values.
	Int,
	/// String values.
	String,
	/// Values with no dedicated editor.
	Other,
}

impl SettingValue {
	/// Returns the boolean value if this is a `Bool`.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int`.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the string value if this is a `String`.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the kind tag of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Bool(_) => ValueKind::Bool,
			Self::Int(_) => ValueKind::Int,
			Self::String(_) => ValueKind::String,
			Self::Other(_) => ValueKind::Other,
		}
	}
}

impl ValueKind {
	/// Human-readable name of this kind.
	pub fn name(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::String => "string",
			Self::Other => "other",
		}
	}
}

impl fmt::Display for SettingValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(b) => write!(f, "{b}"),
			Self::Int(n) => write!(f, "{n}"),
			Self::String(s) | Self::Other(s) => f.write_str(s),
		}
	}
}

impl From<bool> for SettingValue {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<i64> for SettingValue {
	fn from(n: i64) -> Self {
		Self::Int(n)
	}
}

impl From<String> for SettingValue {
	fn from(s: String) -> Self {
		Self::String(s)
	}
}

impl From<&str> for SettingValue {
	fn from(s: &str) -> Self {
		Self::String(s.to_string())
	}
}

/// Bound for values held by properties.
///
/// `bool`, `i64` and `String` map onto their [`SettingValue`] variants. Other
/// types opt in with an empty impl and surface as [`SettingValue::Other`];
/// the rendering layer edits those through choice properties instead.
pub trait PropertyValue: Clone + PartialEq + fmt::Debug + 'static {
	/// Kind tag reported to the rendering layer.
	fn kind() -> ValueKind {
		ValueKind::Other
	}

	/// Converts to the erased representation.
	fn to_setting_value(&self) -> SettingValue {
		SettingValue::Other(format!("{self:?}"))
	}

	/// Converts from the erased representation, if the variant matches.
	fn from_setting_value(_value: &SettingValue) -> Option<Self> {
		None
	}
}

impl PropertyValue for bool {
	fn kind() -> ValueKind {
		ValueKind::Bool
	}

	fn to_setting_value(&self) -> SettingValue {
		SettingValue::Bool(*self)
	}

	fn from_setting_value(value: &SettingValue) -> Option<Self> {
		value.as_bool()
	}
}

impl PropertyValue for i64 {
	fn kind() -> ValueKind {
		ValueKind::Int
	}

	fn to_setting_value(&self) -> SettingValue {
		SettingValue::Int(*self)
	}

	fn from_setting_value(value: &SettingValue) -> Option<Self> {
		value.as_int()
	}
}

impl PropertyValue for String {
	fn kind() -> ValueKind {
		ValueKind::String
	}

	fn to_setting_value(&self) -> SettingValue {
		SettingValue::String(self.clone())
	}

	fn from_setting_value(value: &SettingValue) -> Option<Self> {
		value.as_str().map(str::to_string)
	}
}
