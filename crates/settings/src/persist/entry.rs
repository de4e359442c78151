use serde::{Deserialize, Serialize};

use crate::property::PropertyId;

/// Group path of the reserved version entry.
pub const ROOT_GROUP: &str = "__root__group__";

/// Name of the reserved version entry.
pub const VERSION_KEY: &str = "__settings__version__";

/// Version written by this build.
pub const SETTINGS_VERSION: u32 = 1;

/// One persisted setting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistentEntry {
	/// Path of the property's group.
	pub group_path: String,
	/// Property name.
	pub name: String,
	/// Value in persisted string form.
	pub value: String,
}

impl PersistentEntry {
	/// Creates an entry.
	pub fn new(group_path: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			group_path: group_path.into(),
			name: name.into(),
			value: value.into(),
		}
	}

	/// The reserved entry carrying the settings version.
	pub fn version(version: u32) -> Self {
		Self::new(ROOT_GROUP, VERSION_KEY, version.to_string())
	}

	/// Whether this is the reserved version entry.
	pub fn is_version(&self) -> bool {
		self.group_path == ROOT_GROUP && self.name == VERSION_KEY
	}

	/// Identity of the property this entry belongs to.
	pub fn id(&self) -> PropertyId {
		PropertyId::new(self.group_path.clone(), self.name.clone())
	}
}

/// The flat list of entries handed to and received from the host store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsState {
	/// Entries in export order.
	pub entries: Vec<PersistentEntry>,
}

impl SettingsState {
	/// Creates a state from entries.
	pub fn new(entries: impl IntoIterator<Item = PersistentEntry>) -> Self {
		Self {
			entries: entries.into_iter().collect(),
		}
	}

	/// The reserved version entry, if present.
	pub fn version_entry(&self) -> Option<&PersistentEntry> {
		self.entries.iter().find(|e| e.is_version())
	}

	/// Value of the entry `group_path`/`name`, if present.
	pub fn get(&self, group_path: &str, name: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|e| e.group_path == group_path && e.name == name)
			.map(|e| e.value.as_str())
	}
}

/// Parses a stored version marker.
///
/// Markers are compared against whole version numbers, so fractions are
/// truncated and values past `u32::MAX` saturate. Either way a marker at or
/// above the current version keeps reading as such.
pub(crate) fn parse_version(raw: &str) -> Option<u32> {
	let raw = raw.trim();
	raw.parse::<u32>().ok().or_else(|| {
		raw.parse::<f64>()
			.ok()
			.filter(|v| !v.is_nan() && *v >= 0.0)
			.map(|v| v as u32)
	})
}
