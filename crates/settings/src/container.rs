//! Top-level settings containers and their providers.
//!
//! A [`SettingsContainer`] owns a root group (identified by the container
//! identifier) and a hidden group (`<identifier>_hidden`) for state that is
//! persisted but never rendered. Containers are built once, then
//! [`init`](SettingsContainer::init) wires every property's condition.
//!
//! Providers decide whether a container applies to the running platform and
//! construct it on demand.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::error::{Result, SettingsError};
use crate::group::{GroupBuilder, SettingsGroup, suggest_name};
use crate::property::AnyProperty;

type LoadedHook = Box<dyn Fn()>;

/// A root and hidden group declared together, with a post-load hook.
pub struct SettingsContainer {
	identifier: String,
	enabled: bool,
	root: SettingsGroup,
	hidden: SettingsGroup,
	on_loaded: Option<LoadedHook>,
}

/// Builder for [`SettingsContainer`].
pub struct ContainerBuilder {
	identifier: String,
	enabled: bool,
	on_loaded: Option<LoadedHook>,
}

impl ContainerBuilder {
	/// Sets whether the container applies to the running platform.
	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Sets the hook run after persisted state has been applied.
	pub fn on_settings_loaded(mut self, hook: impl Fn() + 'static) -> Self {
		self.on_loaded = Some(Box::new(hook));
		self
	}

	/// Declares the container's properties.
	///
	/// Fails with [`SettingsError::DuplicateProperty`] if two properties
	/// share a group path and name.
	pub fn build(self, init: impl FnOnce(&mut GroupBuilder)) -> Result<SettingsContainer> {
		let root = SettingsGroup::detached(self.identifier.clone());
		let hidden = SettingsGroup::detached(format!("{}_hidden", self.identifier));

		let mut builder = GroupBuilder::new(root.clone(), hidden.clone());
		init(&mut builder);
		builder.finish();

		let container = SettingsContainer {
			identifier: self.identifier,
			enabled: self.enabled,
			root,
			hidden,
			on_loaded: self.on_loaded,
		};
		container.check_identities()?;
		Ok(container)
	}
}

impl SettingsContainer {
	/// Starts declaring an enabled container.
	pub fn builder(identifier: impl Into<String>) -> ContainerBuilder {
		ContainerBuilder {
			identifier: identifier.into(),
			enabled: true,
			on_loaded: None,
		}
	}

	/// Container identifier, also the root group's path.
	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	/// Whether the container applies to the running platform.
	pub fn enabled(&self) -> bool {
		self.enabled
	}

	/// Group holding the rendered settings.
	pub fn root(&self) -> &SettingsGroup {
		&self.root
	}

	/// Group holding persisted, unrendered state.
	pub fn hidden(&self) -> &SettingsGroup {
		&self.hidden
	}

	/// Subgroups of the root group.
	pub fn subgroups(&self) -> Vec<SettingsGroup> {
		self.root.subgroups()
	}

	/// Every property, rendered ones first, then hidden ones.
	pub fn all_properties(&self) -> Vec<Rc<dyn AnyProperty>> {
		let mut out = self.root.all_properties();
		out.extend(self.hidden.all_properties());
		out
	}

	/// Properties with a persisted form.
	pub fn persistent_properties(&self) -> Vec<Rc<dyn AnyProperty>> {
		self.all_properties()
			.into_iter()
			.filter(|p| p.as_persistent().is_some())
			.collect()
	}

	/// Finds a property by name in the root, then the hidden group.
	pub fn find(&self, name: &str) -> Result<Rc<dyn AnyProperty>> {
		self.root.find(name).or_else(|_| self.hidden.find(name)).map_err(|_| {
			let properties = self.all_properties();
			SettingsError::PropertyNotFound {
				name: name.to_string(),
				suggestion: suggest_name(name, properties.iter().map(|p| p.name())),
			}
		})
	}

	/// Whether the container declares no properties at all.
	pub fn is_totally_empty(&self) -> bool {
		self.root.is_totally_empty() && self.hidden.is_totally_empty()
	}

	/// Builds every property's condition and checks choice fallbacks.
	pub fn init(&self) -> Result<()> {
		let properties = self.all_properties();
		for property in &properties {
			property.active_condition().build()?;
			if let Some(choice) = property.as_choice() {
				choice.check_fallback()?;
			}
		}
		tracing::debug!(
			domain = "settings",
			container = %self.identifier,
			properties = properties.len(),
			"settings container initialised",
		);
		Ok(())
	}

	/// Runs the post-load hook.
	pub fn on_settings_loaded(&self) {
		if let Some(hook) = &self.on_loaded {
			hook();
		}
	}

	fn check_identities(&self) -> Result<()> {
		let mut seen = FxHashSet::default();
		for property in self.all_properties() {
			let id = property.id();
			if !seen.insert(id.clone()) {
				return Err(SettingsError::DuplicateProperty { id });
			}
		}
		Ok(())
	}
}

impl fmt::Debug for SettingsContainer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SettingsContainer")
			.field("identifier", &self.identifier)
			.field("enabled", &self.enabled)
			.field("root", &self.root)
			.field("hidden", &self.hidden)
			.finish_non_exhaustive()
	}
}

/// Typed settings object that owns a container.
pub trait SettingsHandle {
	/// The container to register.
	fn container(&self) -> Rc<SettingsContainer>;
}

impl SettingsHandle for Rc<SettingsContainer> {
	fn container(&self) -> Rc<SettingsContainer> {
		Rc::clone(self)
	}
}

/// Source of a settings container.
pub trait SettingsProvider {
	/// Whether the container applies. Disabled providers are never asked to
	/// construct it.
	fn enabled(&self) -> bool {
		true
	}

	/// Returns the container, constructing it if necessary.
	fn container(&self) -> Result<Rc<SettingsContainer>>;
}

/// Provider that constructs its settings once, on first request.
pub struct SingletonProvider<T> {
	enabled: bool,
	factory: Box<dyn Fn() -> Result<T>>,
	instance: OnceCell<Rc<T>>,
}

impl<T: SettingsHandle> SingletonProvider<T> {
	/// Creates a provider around `factory`.
	pub fn new(enabled: bool, factory: impl Fn() -> Result<T> + 'static) -> Self {
		Self {
			enabled,
			factory: Box::new(factory),
			instance: OnceCell::new(),
		}
	}

	/// The settings, constructed on first call.
	pub fn get(&self) -> Result<Rc<T>> {
		if let Some(instance) = self.instance.get() {
			return Ok(Rc::clone(instance));
		}
		let instance = Rc::new((self.factory)()?);
		let _ = self.instance.set(Rc::clone(&instance));
		Ok(instance)
	}
}

impl<T: SettingsHandle> SettingsProvider for SingletonProvider<T> {
	fn enabled(&self) -> bool {
		self.enabled
	}

	fn container(&self) -> Result<Rc<SettingsContainer>> {
		Ok(self.get()?.container())
	}
}
