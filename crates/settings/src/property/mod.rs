//! Typed properties and the erased interface the rendering layer walks.
//!
//! A property pairs a committed `value` with a `preview` the UI edits before
//! applying. Properties stack as decorators:
//!
//! ```text
//! ChoiceProperty ─▶ PersistentProperty ─▶ TransformingProperty ─▶ SimpleProperty
//!                                                           (effective property)
//! ```
//!
//! Every layer forwards identity (name, description, group, active
//! condition) to its backing property; only the innermost
//! [`SimpleProperty`] owns them. [`effective`] walks to that innermost layer.
//!
//! [`AnyProperty`] is the object-safe view used by groups, the persistence
//! codec and the rendering layer. [`ValueProperty<T>`] is the typed view.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::condition::Condition;
use crate::error::{Result, SettingsError};
use crate::group::SettingsGroup;
use crate::observable::{Listener, ListenerId};
use crate::value::{PropertyValue, SettingValue, ValueKind};

/// Forwards the identity and erased-value methods of [`AnyProperty`] to a
/// field. `into_any`, `as_persistent` and `as_choice` stay with the caller.
macro_rules! forward_any_property {
	($field:ident) => {
		fn name(&self) -> &str {
			self.$field.name()
		}

		fn description(&self) -> &str {
			self.$field.description()
		}

		fn group(&self) -> Option<$crate::group::SettingsGroup> {
			self.$field.group()
		}

		fn active_condition(&self) -> $crate::condition::Condition {
			self.$field.active_condition()
		}

		fn set_active_condition(&self, condition: $crate::condition::Condition) {
			self.$field.set_active_condition(condition)
		}

		fn backing_any(&self) -> Option<std::rc::Rc<dyn $crate::property::AnyProperty>> {
			self.$field.backing_any()
		}

		fn value_kind(&self) -> $crate::value::ValueKind {
			self.$field.value_kind()
		}

		fn setting_value(&self) -> $crate::value::SettingValue {
			self.$field.setting_value()
		}

		fn preview_value(&self) -> $crate::value::SettingValue {
			self.$field.preview_value()
		}

		fn set_preview_value(&self, value: &$crate::value::SettingValue) -> $crate::error::Result<()> {
			self.$field.set_preview_value(value)
		}

		fn apply_preview(&self) {
			self.$field.apply_preview()
		}

		fn revert_preview(&self) {
			self.$field.revert_preview()
		}

		fn value_debug(&self) -> String {
			self.$field.value_debug()
		}
	};
}

/// Forwards [`ValueProperty<T>`] to a field.
macro_rules! forward_value_property {
	($field:ident, $t:ty) => {
		fn value(&self) -> $t {
			self.$field.value()
		}

		fn set_value(&self, value: $t) {
			self.$field.set_value(value)
		}

		fn preview(&self) -> $t {
			self.$field.preview()
		}

		fn set_preview(&self, value: $t) {
			self.$field.set_preview(value)
		}

		fn register_listener(
			&self,
			slot: $crate::property::Slot,
			listener: $crate::observable::Listener<$t>,
		) -> $crate::observable::ListenerId {
			self.$field.register_listener(slot, listener)
		}
	};
}

mod choice;
mod persistent;
mod simple;
mod stub;
mod transforming;

#[cfg(test)]
mod tests;

pub use choice::{AnyChoice, ChoiceProperty, ChoicesProvider, PersistentChoiceProperty, Renderer};
pub use persistent::{PersistentProperty, PersistentValue};
pub use simple::SimpleProperty;
pub use stub::StubProperty;
pub use transforming::{TransformingProperty, TransformingValueProperty};

/// The two observable fields every property carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
	/// The committed value.
	Value,
	/// The uncommitted value shown while editing.
	Preview,
}

/// Identity of a property within a container: its group path and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId {
	/// `:`-joined identifiers of the property's group and its ancestors.
	pub group_path: String,
	/// The property name.
	pub name: String,
}

impl PropertyId {
	/// Creates an identity from its parts.
	pub fn new(group_path: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			group_path: group_path.into(),
			name: name.into(),
		}
	}
}

impl fmt::Display for PropertyId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.group_path, self.name)
	}
}

/// Object-safe view of a property.
pub trait AnyProperty: 'static {
	/// Property name, unique within its group.
	fn name(&self) -> &str;

	/// Human-readable label. Defaults to the name.
	fn description(&self) -> &str;

	/// Owning group, if it is still alive.
	fn group(&self) -> Option<SettingsGroup>;

	/// Path of the owning group.
	fn group_path(&self) -> String {
		self.group().map(|g| g.path()).unwrap_or_default()
	}

	/// Identity used for duplicate detection and persistence.
	fn id(&self) -> PropertyId {
		PropertyId::new(self.group_path(), self.name())
	}

	/// Condition deciding whether the property is editable.
	fn active_condition(&self) -> Condition;

	/// Replaces the active condition.
	fn set_active_condition(&self, condition: Condition);

	/// Next property in the decorator chain.
	fn backing_any(&self) -> Option<Rc<dyn AnyProperty>> {
		None
	}

	/// Upcast for checked downcasting.
	fn into_any(self: Rc<Self>) -> Rc<dyn Any>;

	/// Kind of the exposed value.
	fn value_kind(&self) -> ValueKind;

	/// Committed exposed value.
	fn setting_value(&self) -> SettingValue;

	/// Preview exposed value.
	fn preview_value(&self) -> SettingValue;

	/// Sets the preview from an erased value.
	///
	/// Fails with [`SettingsError::TypeMismatch`] if the variant does not fit
	/// the exposed type.
	fn set_preview_value(&self, value: &SettingValue) -> Result<()>;

	/// Commits the effective preview into the value.
	fn apply_preview(&self);

	/// Restores the preview from the committed value.
	fn revert_preview(&self);

	/// Debug rendering of the committed value.
	fn value_debug(&self) -> String;

	/// Persistence view, for properties that serialize to a string.
	fn as_persistent(&self) -> Option<&dyn PersistentValue> {
		None
	}

	/// Choice view, for properties offering a fixed list of values.
	fn as_choice(&self) -> Option<&dyn AnyChoice> {
		None
	}

	/// Whether this is a placeholder for an unknown persisted entry.
	fn is_stub(&self) -> bool {
		false
	}
}

/// Typed view of a property exposing values of type `T`.
pub trait ValueProperty<T>: AnyProperty {
	/// Committed value.
	fn value(&self) -> T;

	/// Commits a value.
	fn set_value(&self, value: T);

	/// Preview value.
	fn preview(&self) -> T;

	/// Stages a preview value.
	fn set_preview(&self, value: T);

	/// Registers a change listener on one of the property's fields.
	///
	/// The listener is replayed the current value immediately.
	fn register_listener(&self, slot: Slot, listener: Listener<T>) -> ListenerId;
}

impl fmt::Debug for dyn AnyProperty {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Property")
			.field("id", &self.id())
			.field("value", &self.value_debug())
			.finish()
	}
}

/// Walks the decorator chain to the innermost property.
pub fn innermost(property: &Rc<dyn AnyProperty>) -> Rc<dyn AnyProperty> {
	let mut current = Rc::clone(property);
	while let Some(next) = current.backing_any() {
		current = next;
	}
	current
}

/// Resolves the innermost property of `property` as a `SimpleProperty<T>`.
///
/// Conditions and the rendering layer read and stage previews on this
/// property rather than on its decorators.
pub fn effective<T: PropertyValue>(property: &Rc<dyn AnyProperty>) -> Result<Rc<SimpleProperty<T>>> {
	let base = innermost(property);
	let value = base.value_debug();
	base.into_any()
		.downcast::<SimpleProperty<T>>()
		.map_err(|_| SettingsError::TypeMismatch {
			property: property.name().to_string(),
			value,
			expected: std::any::type_name::<T>(),
		})
}
