use std::rc::Rc;

use super::Condition;
use crate::error::{Result, SettingsError};
use crate::group::{SettingsGroup, WeakGroup};
use crate::property::{AnyProperty, effective};
use crate::value::PropertyValue;

/// How a lazily linked condition finds its property.
pub enum PropertyLookup {
	/// By name, searched from a group scope outward through its ancestors.
	Named {
		/// Group the search starts from.
		scope: WeakGroup,
		/// Property name.
		name: String,
	},
	/// A property handle known at declaration time.
	Direct(Rc<dyn AnyProperty>),
}

impl PropertyLookup {
	/// Looks `name` up from `scope` when the condition is built.
	pub fn named(scope: &SettingsGroup, name: impl Into<String>) -> Self {
		Self::Named {
			scope: scope.downgrade(),
			name: name.into(),
		}
	}

	/// Links directly to `property`.
	pub fn direct(property: Rc<dyn AnyProperty>) -> Self {
		Self::Direct(property)
	}

	/// Resolves the property.
	pub fn resolve(&self) -> Result<Rc<dyn AnyProperty>> {
		match self {
			Self::Named { scope, name } => scope
				.upgrade()
				.ok_or_else(|| SettingsError::PropertyNotFound {
					name: name.clone(),
					suggestion: None,
				})?
				.find(name),
			Self::Direct(property) => Ok(Rc::clone(property)),
		}
	}
}

pub(super) trait Link {
	/// Resolves the linked property and keeps `target` in sync with it.
	fn link(&self, target: &Condition) -> Result<()>;
}

pub(super) struct PreviewLink<T> {
	lookup: PropertyLookup,
	predicate: Rc<dyn Fn(&T) -> bool>,
}

impl<T: PropertyValue> PreviewLink<T> {
	pub(super) fn new(lookup: PropertyLookup, predicate: impl Fn(&T) -> bool + 'static) -> Self {
		Self {
			lookup,
			predicate: Rc::new(predicate),
		}
	}
}

impl<T: PropertyValue> Link for PreviewLink<T> {
	fn link(&self, target: &Condition) -> Result<()> {
		let property = self.lookup.resolve()?;
		let effective = effective::<T>(&property)?;
		tracing::trace!(
			domain = "settings",
			property = %effective.id(),
			"linking condition to preview",
		);

		let predicate = Rc::clone(&self.predicate);
		let target = target.downgrade();
		effective.preview_cell().register_listener(move |_, new| {
			if let Some(condition) = target.upgrade() {
				condition.store(predicate(new));
			}
		});
		Ok(())
	}
}
