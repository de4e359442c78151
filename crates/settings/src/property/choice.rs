use std::any::Any;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use super::{
	AnyProperty, PersistentProperty, PersistentValue, TransformingProperty, TransformingValueProperty,
	ValueProperty,
};
use crate::error::{Result, SettingsError};
use crate::transform::Transformer;
use crate::value::PropertyValue;

/// Produces the current list of choices. Called afresh on every request.
pub type ChoicesProvider<R> = Rc<dyn Fn() -> Vec<R>>;

/// Renders a choice for display.
pub type Renderer<R> = Rc<dyn Fn(&R) -> String>;

/// A persisted choice property.
pub type PersistentChoiceProperty<R> = ChoiceProperty<R, String, PersistentProperty<R>>;

/// Erased view of a choice property used by the rendering layer.
pub trait AnyChoice {
	/// Rendered labels of the current choices.
	fn labels(&self) -> Vec<String>;

	/// Position of the effective preview among the current choices.
	fn selected_index(&self) -> Option<usize>;

	/// Stages the choice at `index` as the effective preview.
	fn select(&self, index: usize) -> Result<()>;

	/// Checks that the declared fallback is among the current choices.
	fn check_fallback(&self) -> Result<()>;
}

/// Decorator adding a list of allowed values to a transforming property.
///
/// Choices are values of the backing type `R`; the exposed type `T` is what
/// the inner property presents (a `String` for persisted choices).
pub struct ChoiceProperty<R, T, P = TransformingProperty<R, T>> {
	inner: P,
	choices: RefCell<ChoicesProvider<R>>,
	renderer: RefCell<Renderer<R>>,
	fallback: Option<R>,
	_exposed: PhantomData<fn() -> T>,
}

impl<R, T, P> ChoiceProperty<R, T, P>
where
	R: PropertyValue,
	T: PropertyValue,
	P: TransformingValueProperty<R, T>,
{
	/// Wraps `inner` with no choices and a debug renderer.
	pub fn new(inner: P, fallback: Option<R>) -> Self {
		let choices: ChoicesProvider<R> = Rc::new(Vec::<R>::new);
		let renderer: Renderer<R> = Rc::new(|choice: &R| format!("{choice:?}"));
		Self {
			inner,
			choices: RefCell::new(choices),
			renderer: RefCell::new(renderer),
			fallback,
			_exposed: PhantomData,
		}
	}

	/// Sets the choices provider.
	pub fn choices_from(&self, provider: impl Fn() -> Vec<R> + 'static) -> &Self {
		let provider: ChoicesProvider<R> = Rc::new(provider);
		*self.choices.borrow_mut() = provider;
		self
	}

	/// Sets the display renderer.
	pub fn render_with(&self, renderer: impl Fn(&R) -> String + 'static) -> &Self {
		let renderer: Renderer<R> = Rc::new(renderer);
		*self.renderer.borrow_mut() = renderer;
		self
	}

	/// Current choices.
	pub fn choices(&self) -> Vec<R> {
		let provider = Rc::clone(&self.choices.borrow());
		provider()
	}

	/// Display string for `choice`.
	pub fn render(&self, choice: &R) -> String {
		let renderer = Rc::clone(&self.renderer.borrow());
		renderer(choice)
	}

	/// Committed backing value.
	pub fn choice_value(&self) -> R {
		self.inner.backing_property().value()
	}

	/// Commits a backing value.
	pub fn set_choice_value(&self, choice: R) {
		self.inner.backing_property().set_value(choice);
	}

	/// Value substituted when a persisted string fails to parse.
	pub fn fallback(&self) -> Option<&R> {
		self.fallback.as_ref()
	}

	/// The decorated property.
	pub fn inner(&self) -> &P {
		&self.inner
	}
}

impl<R, T, P> AnyChoice for ChoiceProperty<R, T, P>
where
	R: PropertyValue,
	T: PropertyValue,
	P: TransformingValueProperty<R, T>,
{
	fn labels(&self) -> Vec<String> {
		self.choices().iter().map(|c| self.render(c)).collect()
	}

	fn selected_index(&self) -> Option<usize> {
		let current = self.inner.backing_property().preview();
		self.choices().iter().position(|c| *c == current)
	}

	fn select(&self, index: usize) -> Result<()> {
		let choices = self.choices();
		let choice = choices
			.get(index)
			.cloned()
			.ok_or_else(|| SettingsError::ChoiceOutOfRange {
				property: self.inner.name().to_string(),
				index,
				len: choices.len(),
			})?;
		self.inner.backing_property().set_preview(choice);
		Ok(())
	}

	fn check_fallback(&self) -> Result<()> {
		let Some(fallback) = &self.fallback else {
			return Ok(());
		};
		if self.choices().contains(fallback) {
			return Ok(());
		}
		Err(SettingsError::FallbackNotInChoices {
			property: self.inner.name().to_string(),
			fallback: format!("{fallback:?}"),
		})
	}
}

impl<R, T, P> TransformingValueProperty<R, T> for ChoiceProperty<R, T, P>
where
	R: PropertyValue,
	T: PropertyValue,
	P: TransformingValueProperty<R, T>,
{
	fn backing_property(&self) -> Rc<dyn ValueProperty<R>> {
		self.inner.backing_property()
	}

	fn transformer(&self) -> &Transformer<R, T> {
		self.inner.transformer()
	}
}

impl<R, T, P> ValueProperty<T> for ChoiceProperty<R, T, P>
where
	R: PropertyValue,
	T: PropertyValue,
	P: TransformingValueProperty<R, T>,
{
	forward_value_property!(inner, T);
}

impl<R, T, P> AnyProperty for ChoiceProperty<R, T, P>
where
	R: PropertyValue,
	T: PropertyValue,
	P: TransformingValueProperty<R, T>,
{
	forward_any_property!(inner);

	fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
		self
	}

	fn as_persistent(&self) -> Option<&dyn PersistentValue> {
		self.inner.as_persistent()
	}

	fn as_choice(&self) -> Option<&dyn AnyChoice> {
		Some(self)
	}
}
