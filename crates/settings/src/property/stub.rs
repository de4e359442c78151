use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::{AnyProperty, PersistentValue};
use crate::condition::Condition;
use crate::error::{Result, SettingsError};
use crate::group::SettingsGroup;
use crate::value::{SettingValue, ValueKind};

/// Placeholder for a persisted entry no declared property claims.
///
/// Keeps the raw string so a later export writes it back unchanged. Owns a
/// detached group named by the entry's raw group path.
pub struct StubProperty {
	name: String,
	group: SettingsGroup,
	raw: RefCell<String>,
	condition: RefCell<Condition>,
}

impl StubProperty {
	/// Creates a stub for the entry `group_path`/`name`.
	pub fn new(group_path: &str, name: &str, raw: impl Into<String>) -> Rc<Self> {
		Rc::new(Self {
			name: name.to_string(),
			group: SettingsGroup::detached(group_path),
			raw: RefCell::new(raw.into()),
			condition: RefCell::new(Condition::always()),
		})
	}

	/// The retained raw value.
	pub fn raw(&self) -> String {
		self.raw.borrow().clone()
	}
}

impl PersistentValue for StubProperty {
	fn persisted(&self) -> String {
		self.raw()
	}

	fn restore(&self, raw: &str) {
		*self.raw.borrow_mut() = raw.to_string();
	}
}

impl AnyProperty for StubProperty {
	fn name(&self) -> &str {
		&self.name
	}

	fn description(&self) -> &str {
		""
	}

	fn group(&self) -> Option<SettingsGroup> {
		Some(self.group.clone())
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
		ValueKind::String
	}

	fn setting_value(&self) -> SettingValue {
		SettingValue::String(self.raw())
	}

	fn preview_value(&self) -> SettingValue {
		self.setting_value()
	}

	fn set_preview_value(&self, value: &SettingValue) -> Result<()> {
		let raw = value.as_str().ok_or_else(|| SettingsError::TypeMismatch {
			property: self.name.clone(),
			value: value.to_string(),
			expected: "String",
		})?;
		self.restore(raw);
		Ok(())
	}

	fn apply_preview(&self) {}

	fn revert_preview(&self) {}

	fn value_debug(&self) -> String {
		format!("{:?}", self.raw.borrow())
	}

	fn as_persistent(&self) -> Option<&dyn PersistentValue> {
		Some(self)
	}

	fn is_stub(&self) -> bool {
		true
	}
}
