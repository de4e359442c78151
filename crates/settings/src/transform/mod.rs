//! Bidirectional value conversion.
//!
//! A [`Transformer<R, T>`] converts between a stored (raw) type `R` and an
//! exposed type `T`: [`write`](Transformer::write) maps `T → R` and
//! [`read`](Transformer::read) maps `R → T`. Persistent properties use
//! `T = String`, so `write` parses a persisted string and `read` formats the
//! stored value for export.
//!
//! # Composition
//!
//! [`Transformer::and_then`] chains in opposite orders per direction: writes
//! run the outer transformer first, reads run this transformer first. The
//! fallback wrappers turn `Option`-producing parsers into total conversions so
//! a bad persisted value degrades to a default rather than an error.

use std::rc::Rc;

use crate::observable::Observable;

pub mod parse;


/// Bidirectional conversion between a stored type `R` and an exposed type `T`.
pub struct Transformer<R, T> {
	write: Rc<dyn Fn(&T) -> R>,
	read: Rc<dyn Fn(&R) -> T>,
}

impl<R, T> Clone for Transformer<R, T> {
	fn clone(&self) -> Self {
		Self {
			write: Rc::clone(&self.write),
			read: Rc::clone(&self.read),
		}
	}
}

impl<R: 'static, T: 'static> Transformer<R, T> {
	/// Builds a transformer from its two directions.
	pub fn new(write: impl Fn(&T) -> R + 'static, read: impl Fn(&R) -> T + 'static) -> Self {
		Self {
			write: Rc::new(write),
			read: Rc::new(read),
		}
	}

	/// Converts an exposed value into its stored form.
	pub fn write(&self, value: &T) -> R {
		(self.write)(value)
	}

	/// Converts a stored value into its exposed form.
	pub fn read(&self, value: &R) -> T {
		(self.read)(value)
	}

	/// Chains `other` after this transformer, exposing `S` over stored `R`.
	pub fn and_then<S: 'static>(&self, other: &Transformer<T, S>) -> Transformer<R, S> {
		let (outer_write, inner_write) = (Rc::clone(&self.write), Rc::clone(&other.write));
		let (outer_read, inner_read) = (Rc::clone(&self.read), Rc::clone(&other.read));
		Transformer {
			write: Rc::new(move |value: &S| outer_write(&inner_write(value))),
			read: Rc::new(move |value: &R| inner_read(&outer_read(value))),
		}
	}

	/// Read/write adapter that stores through this transformer into `backing`.
	pub fn delegate(&self, backing: Observable<R>) -> TransformerDelegate<R, T>
	where
		R: Clone + PartialEq,
	{
		TransformerDelegate {
			backing,
			transformer: self.clone(),
		}
	}
}

impl<R: Clone + 'static> Transformer<R, R> {
	/// Transformer that passes values through unchanged.
	pub fn identity() -> Self {
		Self::new(R::clone, R::clone)
	}
}

impl<R: 'static, T: Clone + 'static> Transformer<R, Option<T>> {
	/// Makes reads total by substituting `fallback` for `None`.
	pub fn read_fallback(&self, fallback: T) -> Transformer<R, T> {
		self.and_then(&Transformer::new(
			|value: &T| Some(value.clone()),
			move |value: &Option<T>| value.clone().unwrap_or_else(|| fallback.clone()),
		))
	}
}

impl<R: Clone + 'static, T: 'static> Transformer<Option<R>, T> {
	/// Makes writes total by substituting `fallback` for `None`.
	pub fn write_fallback(&self, fallback: R) -> Transformer<R, T> {
		Transformer::new(
			move |value: &Option<R>| value.clone().unwrap_or_else(|| fallback.clone()),
			|value: &R| Some(value.clone()),
		)
		.and_then(self)
	}
}

/// Exposes a stored [`Observable<R>`] as a `T` through a [`Transformer`].
pub struct TransformerDelegate<R, T> {
	backing: Observable<R>,
	transformer: Transformer<R, T>,
}

impl<R: Clone + PartialEq + 'static, T: 'static> TransformerDelegate<R, T> {
	/// Reads the backing value through the transformer.
	pub fn get(&self) -> T {
		self.backing.with(|raw| self.transformer.read(raw))
	}

	/// Writes `value` into the backing cell through the transformer.
	pub fn set(&self, value: &T) -> bool {
		self.backing.set(self.transformer.write(value))
	}

	/// The backing cell.
	pub fn backing(&self) -> &Observable<R> {
		&self.backing
	}
}
