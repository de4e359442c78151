use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{AnyProperty, Slot, ValueProperty};
use crate::condition::Condition;
use crate::error::{Result, SettingsError};
use crate::group::{SettingsGroup, WeakGroup};
use crate::observable::{Listener, ListenerId, Observable};
use crate::value::{PropertyValue, SettingValue, ValueKind};

/// Property over an externally owned value cell.
///
/// The owner keeps its own handle on the cell and reads settings from it; the
/// property adds a preview that follows every committed change.
pub struct SimpleProperty<T> {
	name: String,
	description: String,
	group: WeakGroup,
	condition: RefCell<Condition>,
	value: Observable<T>,
	preview: Observable<T>,
}

impl<T: PropertyValue> SimpleProperty<T> {
	/// Creates a property over `value`. An empty description falls back to
	/// the name.
	///
	/// The property is not added to `group`; declare properties through
	/// [`GroupBuilder`](crate::group::GroupBuilder) to do both.
	pub fn new(
		name: impl Into<String>,
		description: impl Into<String>,
		value: Observable<T>,
		group: &SettingsGroup,
	) -> Rc<Self> {
		let name = name.into();
		let mut description = description.into();
		if description.is_empty() {
			description = name.clone();
		}

		let preview = Observable::new(value.get());
		let mirror = preview.clone();
		value.register_listener(move |_, new| {
			mirror.set(new.clone());
		});

		Rc::new(Self {
			name,
			description,
			group: group.downgrade(),
			condition: RefCell::new(Condition::always()),
			value,
			preview,
		})
	}

	/// The committed value cell.
	pub fn value_cell(&self) -> &Observable<T> {
		&self.value
	}

	/// The preview cell.
	pub fn preview_cell(&self) -> &Observable<T> {
		&self.preview
	}
}

impl<T: PropertyValue> fmt::Debug for SimpleProperty<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SimpleProperty")
			.field("name", &self.name)
			.field("value", &self.value)
			.field("preview", &self.preview)
			.finish_non_exhaustive()
	}
}

impl<T: PropertyValue> ValueProperty<T> for SimpleProperty<T> {
	fn value(&self) -> T {
		self.value.get()
	}

	fn set_value(&self, value: T) {
		self.value.set(value);
	}

	fn preview(&self) -> T {
		self.preview.get()
	}

	fn set_preview(&self, value: T) {
		self.preview.set(value);
	}

	fn register_listener(&self, slot: Slot, listener: Listener<T>) -> ListenerId {
		match slot {
			Slot::Value => self.value.register_shared(listener),
			Slot::Preview => self.preview.register_shared(listener),
		}
	}
}

impl<T: PropertyValue> AnyProperty for SimpleProperty<T> {
	fn name(&self) -> &str {
		&self.name
	}

	fn description(&self) -> &str {
		&self.description
	}

	fn group(&self) -> Option<SettingsGroup> {
		self.group.upgrade()
	}

	fn active_condition(&self) -> Condition {
		self.condition.borrow().clone()
	}

	fn set_active_condition(&self, condition: Condition) {
		*self.condition.borrow_mut() = condition;
	}

	fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
		self
	}

	fn value_kind(&self) -> ValueKind {
		T::kind()
	}

	fn setting_value(&self) -> SettingValue {
		self.value.with(T::to_setting_value)
	}

	fn preview_value(&self) -> SettingValue {
		self.preview.with(T::to_setting_value)
	}

	fn set_preview_value(&self, value: &SettingValue) -> Result<()> {
		let typed = T::from_setting_value(value).ok_or_else(|| SettingsError::TypeMismatch {
			property: self.name.clone(),
			value: value.to_string(),
			expected: std::any::type_name::<T>(),
		})?;
		self.preview.set(typed);
		Ok(())
	}

	fn apply_preview(&self) {
		self.value.set(self.preview.get());
	}

	fn revert_preview(&self) {
		self.preview.set(self.value.get());
	}

	fn value_debug(&self) -> String {
		self.value.with(|v| format!("{v:?}"))
	}
}
