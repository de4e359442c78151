use std::any::Any;
use std::rc::Rc;

use super::{AnyProperty, Slot, ValueProperty};
use crate::condition::Condition;
use crate::error::{Result, SettingsError};
use crate::group::SettingsGroup;
use crate::observable::{Listener, ListenerId, Observable};
use crate::transform::Transformer;
use crate::value::{PropertyValue, SettingValue, ValueKind};

/// A property exposing its backing property's value through a transformer.
pub trait TransformingValueProperty<R, T>: ValueProperty<T> {
	/// The decorated property.
	fn backing_property(&self) -> Rc<dyn ValueProperty<R>>;

	/// Conversion between the backing and exposed values.
	fn transformer(&self) -> &Transformer<R, T>;
}

/// Decorator exposing a `ValueProperty<R>` as a `ValueProperty<T>`.
///
/// Reads and writes of the value go through the transformer into the
/// backing property. The preview is the backing preview read through the
/// transformer: staging writes into the backing preview, and any change
/// there, staged or committed, flows back.
pub struct TransformingProperty<R, T> {
	backing: Rc<dyn ValueProperty<R>>,
	backing_any: Rc<dyn AnyProperty>,
	transformer: Transformer<R, T>,
	preview: Observable<T>,
}

impl<R: PropertyValue, T: PropertyValue> TransformingProperty<R, T> {
	/// Wraps `backing`.
	pub fn new<P: ValueProperty<R>>(backing: Rc<P>, transformer: Transformer<R, T>) -> Self {
		let preview = Observable::new(transformer.read(&backing.preview()));
		let mirror = preview.clone();
		let read = transformer.clone();
		backing.register_listener(
			Slot::Preview,
			Rc::new(move |_: &R, new: &R| {
				mirror.set(read.read(new));
			}),
		);

		Self {
			backing_any: backing.clone(),
			backing,
			transformer,
			preview,
		}
	}
}

impl<R: PropertyValue, T: PropertyValue> TransformingValueProperty<R, T> for TransformingProperty<R, T> {
	fn backing_property(&self) -> Rc<dyn ValueProperty<R>> {
		Rc::clone(&self.backing)
	}

	fn transformer(&self) -> &Transformer<R, T> {
		&self.transformer
	}
}

impl<R: PropertyValue, T: PropertyValue> ValueProperty<T> for TransformingProperty<R, T> {
	fn value(&self) -> T {
		self.transformer.read(&self.backing.value())
	}

	fn set_value(&self, value: T) {
		self.backing.set_value(self.transformer.write(&value));
	}

	fn preview(&self) -> T {
		self.preview.get()
	}

	fn set_preview(&self, value: T) {
		self.backing.set_preview(self.transformer.write(&value));
	}

	fn register_listener(&self, slot: Slot, listener: Listener<T>) -> ListenerId {
		match slot {
			Slot::Value => {
				let read = self.transformer.clone();
				self.backing.register_listener(
					Slot::Value,
					Rc::new(move |old: &R, new: &R| listener(&read.read(old), &read.read(new))),
				)
			}
			Slot::Preview => self.preview.register_shared(listener),
		}
	}
}

impl<R: PropertyValue, T: PropertyValue> AnyProperty for TransformingProperty<R, T> {
	fn name(&self) -> &str {
		self.backing_any.name()
	}

	fn description(&self) -> &str {
		self.backing_any.description()
	}

	fn group(&self) -> Option<SettingsGroup> {
		self.backing_any.group()
	}

	fn active_condition(&self) -> Condition {
		self.backing_any.active_condition()
	}

	fn set_active_condition(&self, condition: Condition) {
		self.backing_any.set_active_condition(condition);
	}

	fn backing_any(&self) -> Option<Rc<dyn AnyProperty>> {
		Some(Rc::clone(&self.backing_any))
	}

	fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
		self
	}

	fn value_kind(&self) -> ValueKind {
		T::kind()
	}

	fn setting_value(&self) -> SettingValue {
		self.value().to_setting_value()
	}

	fn preview_value(&self) -> SettingValue {
		self.preview.with(T::to_setting_value)
	}

	fn set_preview_value(&self, value: &SettingValue) -> Result<()> {
		let typed = T::from_setting_value(value).ok_or_else(|| SettingsError::TypeMismatch {
			property: self.name().to_string(),
			value: value.to_string(),
			expected: std::any::type_name::<T>(),
		})?;
		self.set_preview(typed);
		Ok(())
	}

	fn apply_preview(&self) {
		self.backing_any.apply_preview();
	}

	fn revert_preview(&self) {
		self.backing_any.revert_preview();
	}

	fn value_debug(&self) -> String {
		format!("{:?}", self.value())
	}
}
