//! Persistence codec.
//!
//! [`SettingsRegistry`] indexes the persistent properties of every
//! registered container by `(group path, name)` and converts them to and
//! from a flat [`SettingsState`]. The host decides where the state is stored.
//!
//! # Versioning
//!
//! Exports end with a reserved `(__root__group__, __settings__version__)`
//! entry. On import, entries no declared property claims are retained as
//! [`StubProperty`] placeholders when the stored version is at least the
//! current one, so a newer build's settings survive a round trip through an
//! older build. When the stored version is older, unknown entries are
//! dropped.

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::container::{SettingsContainer, SettingsProvider};
use crate::error::{Result, SettingsError};
use crate::group::suggest_name;
use crate::property::{AnyProperty, PropertyId, StubProperty};

mod entry;


pub use entry::{PersistentEntry, ROOT_GROUP, SETTINGS_VERSION, SettingsState, VERSION_KEY};
use entry::parse_version;

type PropertyMap = IndexMap<PropertyId, Rc<dyn AnyProperty>, FxBuildHasher>;

/// Registered containers and their persistent properties.
pub struct SettingsRegistry {
	containers: Vec<Rc<SettingsContainer>>,
	properties: PropertyMap,
	version: u32,
	stored_version: Option<u32>,
}

impl Default for SettingsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl SettingsRegistry {
	/// Creates an empty registry writing [`SETTINGS_VERSION`].
	pub fn new() -> Self {
		Self::with_version(SETTINGS_VERSION)
	}

	/// Creates an empty registry writing `version`.
	pub fn with_version(version: u32) -> Self {
		Self {
			containers: Vec::new(),
			properties: PropertyMap::default(),
			version,
			stored_version: None,
		}
	}

	/// Creates a registry from every enabled provider, in order.
	pub fn from_providers<'a>(providers: impl IntoIterator<Item = &'a dyn SettingsProvider>) -> Result<Self> {
		let mut registry = Self::new();
		for provider in providers {
			if !provider.enabled() {
				continue;
			}
			registry.register(provider.container()?)?;
		}
		Ok(registry)
	}

	/// Initialises `container` and indexes its persistent properties.
	///
	/// Disabled containers are skipped. An identity already claimed by
	/// another container fails with [`SettingsError::DuplicateProperty`]; a
	/// retained stub with that identity is replaced and its raw value
	/// restored into the new property.
	pub fn register(&mut self, container: Rc<SettingsContainer>) -> Result<()> {
		if !container.enabled() {
			tracing::debug!(
				domain = "settings",
				container = container.identifier(),
				"skipping disabled settings container",
			);
			return Ok(());
		}
		container.init()?;

		let persistent = container.persistent_properties();
		for property in &persistent {
			let id = property.id();
			if self.properties.get(&id).is_some_and(|p| !p.is_stub()) {
				return Err(SettingsError::DuplicateProperty { id });
			}
		}

		for property in persistent {
			let id = property.id();
			if let Some(stub) = self.properties.get(&id) {
				let raw = stub.as_persistent().map(|p| p.persisted());
				if let (Some(raw), Some(target)) = (raw, property.as_persistent()) {
					target.restore(&raw);
				}
			}
			self.properties.insert(id, property);
		}
		self.containers.push(container);
		Ok(())
	}

	/// Registered containers, in registration order.
	pub fn containers(&self) -> &[Rc<SettingsContainer>] {
		&self.containers
	}

	/// Version this registry writes.
	pub fn version(&self) -> u32 {
		self.version
	}

	/// Version read by the last import. `None` before any import.
	pub fn stored_version(&self) -> Option<u32> {
		self.stored_version
	}

	/// Persistent property or retained stub with the given identity.
	pub fn get(&self, group_path: &str, name: &str) -> Result<Rc<dyn AnyProperty>> {
		let id = PropertyId::new(group_path, name);
		self.properties.get(&id).cloned().ok_or_else(|| SettingsError::PropertyNotFound {
			name: id.to_string(),
			suggestion: suggest_name(name, self.properties.keys().map(|k| k.name.as_str())),
		})
	}

	/// Retained placeholders for unknown entries.
	pub fn stubs(&self) -> impl Iterator<Item = &Rc<dyn AnyProperty>> {
		self.properties.values().filter(|p| p.is_stub())
	}

	/// Serializes every persistent property and retained stub, followed by
	/// the version entry.
	pub fn export(&self) -> SettingsState {
		let mut entries: Vec<PersistentEntry> = self
			.properties
			.iter()
			.filter_map(|(id, property)| {
				property
					.as_persistent()
					.map(|p| PersistentEntry::new(id.group_path.clone(), id.name.clone(), p.persisted()))
			})
			.collect();
		entries.push(PersistentEntry::version(self.version));
		SettingsState { entries }
	}

	/// Applies persisted state, then runs every container's post-load hook.
	pub fn import(&mut self, state: &SettingsState) {
		let stored = match state.version_entry() {
			None => self.version,
			Some(entry) => parse_version(&entry.value).unwrap_or_else(|| {
				tracing::warn!(
					domain = "settings",
					raw = %entry.value,
					"unparseable settings version; treating stored settings as outdated",
				);
				0
			}),
		};
		self.stored_version = Some(stored);
		let keep_unknown = stored >= self.version;

		let (mut applied, mut retained, mut dropped) = (0_usize, 0_usize, 0_usize);
		for entry in state.entries.iter().filter(|e| !e.is_version()) {
			let id = entry.id();
			if let Some(property) = self.properties.get(&id) {
				if let Some(persistent) = property.as_persistent() {
					persistent.restore(&entry.value);
					applied += 1;
				}
				continue;
			}

			if keep_unknown {
				let stub: Rc<dyn AnyProperty> = StubProperty::new(&entry.group_path, &entry.name, entry.value.clone());
				self.properties.insert(id, stub);
				retained += 1;
			} else {
				tracing::debug!(domain = "settings", entry = %id, "dropping unknown outdated entry");
				dropped += 1;
			}
		}

		tracing::debug!(
			domain = "settings",
			stored,
			current = self.version,
			applied,
			retained,
			dropped,
			"settings imported",
		);

		for container in &self.containers {
			container.on_settings_loaded();
		}
	}
}
