use std::any::Any;
use std::rc::Rc;

use super::{AnyProperty, TransformingProperty, TransformingValueProperty, ValueProperty};
use crate::transform::Transformer;
use crate::value::PropertyValue;

/// String form of a property, as read and written by the persistence codec.
pub trait PersistentValue {
	/// Current value in persisted form.
	fn persisted(&self) -> String;

	/// Commits a persisted string through the property's transformer.
	fn restore(&self, raw: &str);
}

/// A transforming property whose exposed type is `String`.
pub struct PersistentProperty<R> {
	inner: TransformingProperty<R, String>,
}

impl<R: PropertyValue> PersistentProperty<R> {
	/// Wraps `backing` with a string transformer.
	pub fn new<P: ValueProperty<R>>(backing: Rc<P>, transformer: Transformer<R, String>) -> Self {
		Self {
			inner: TransformingProperty::new(backing, transformer),
		}
	}
}

impl<R: PropertyValue> PersistentValue for PersistentProperty<R> {
	fn persisted(&self) -> String {
		self.inner.value()
	}

	fn restore(&self, raw: &str) {
		self.inner.set_value(raw.to_string());
	}
}

impl<R: PropertyValue> TransformingValueProperty<R, String> for PersistentProperty<R> {
	fn backing_property(&self) -> Rc<dyn ValueProperty<R>> {
		self.inner.backing_property()
	}

	fn transformer(&self) -> &Transformer<R, String> {
		self.inner.transformer()
	}
}

impl<R: PropertyValue> ValueProperty<String> for PersistentProperty<R> {
	forward_value_property!(inner, String);
}

impl<R: PropertyValue> AnyProperty for PersistentProperty<R> {
	forward_any_property!(inner);

	fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
		self
	}

	fn as_persistent(&self) -> Option<&dyn PersistentValue> {
		Some(self)
	}
}
