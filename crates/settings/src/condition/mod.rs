//! Boolean enablement expressions.
//!
//! A [`Condition`] is a cheap-clone handle on a predicate plus an observable
//! boolean. Construction and wiring are separate: conditions are declared
//! while the settings tree is still being built, and [`Condition::build`]
//! later resolves property references and registers the listeners that keep
//! `value` current.
//!
//! # Variants
//!
//! | constructor                    | value source                                  |
//! |--------------------------------|-----------------------------------------------|
//! | [`Condition::constant`]        | fixed; cannot be set                          |
//! | [`Condition::settable`]        | pushed from outside via [`Condition::set`]    |
//! | [`Condition::computed`]        | recomputed from a function on `invoke`        |
//! | [`Condition::preview_equals`]  | an effective property's preview, live         |
//! | [`Condition::compound`]        | two children and a combinator                 |
//!
//! Computed conditions are pull-based: only [`Condition::invoke`] refreshes
//! them. Every other variant is push-driven once built.
//!
//! # Compound recombination
//!
//! When a compound child changes, the compound recombines the child's new
//! value with a fresh [`invoke`](Condition::invoke) of the other child, so a
//! pull-based sibling is never read stale. Invoking a constant, settable or
//! linked child only reads its value.

use std::cell::Cell;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::rc::{Rc, Weak};

use crate::error::{Result, SettingsError};
use crate::observable::{ListenerId, Observable};
use crate::value::PropertyValue;

mod link;

#[cfg(test)]
mod tests;

pub use link::PropertyLookup;
use link::{Link, PreviewLink};

/// Combines the values of a compound condition's two children.
pub type Combinator = fn(bool, bool) -> bool;

/// Logical AND combinator.
pub fn and(a: bool, b: bool) -> bool {
	a && b
}

/// Logical OR combinator.
pub fn or(a: bool, b: bool) -> bool {
	a || b
}

/// Exclusive OR combinator. With a constant-true second child it negates.
pub fn xor(a: bool, b: bool) -> bool {
	a ^ b
}

enum Kind {
	Constant,
	Settable,
	Computed(Box<dyn Fn() -> bool>),
	Linked(Box<dyn Link>),
	Compound {
		first: Condition,
		second: Condition,
		combinator: Combinator,
	},
}

impl Kind {
	fn name(&self) -> &'static str {
		match self {
			Self::Constant => "constant",
			Self::Settable => "settable",
			Self::Computed(_) => "computed",
			Self::Linked(_) => "linked",
			Self::Compound { .. } => "compound",
		}
	}
}

struct Inner {
	kind: Kind,
	value: Observable<bool>,
	built: Cell<bool>,
}

/// Shared handle on an observable boolean expression.
#[derive(Clone)]
pub struct Condition {
	inner: Rc<Inner>,
}

#[derive(Clone)]
pub(crate) struct WeakCondition(Weak<Inner>);

impl WeakCondition {
	pub(crate) fn upgrade(&self) -> Option<Condition> {
		self.0.upgrade().map(|inner| Condition { inner })
	}
}

impl Condition {
	fn from_kind(kind: Kind, initial: bool) -> Self {
		Self {
			inner: Rc::new(Inner {
				kind,
				value: Observable::new(initial),
				built: Cell::new(false),
			}),
		}
	}

	/// The always-true constant, the default for every property.
	pub fn always() -> Self {
		Self::constant(true)
	}

	/// A fixed condition.
	pub fn constant(value: bool) -> Self {
		Self::from_kind(Kind::Constant, value)
	}

	/// A condition driven from outside through [`set`](Self::set).
	pub fn settable(initial: bool) -> Self {
		Self::from_kind(Kind::Settable, initial)
	}

	/// A condition recomputed from `source` on each [`invoke`](Self::invoke).
	pub fn computed(source: impl Fn() -> bool + 'static) -> Self {
		let initial = source();
		Self::from_kind(Kind::Computed(Box::new(source)), initial)
	}

	/// Holds while the effective preview of the looked-up property equals
	/// `expected`. Reads `true` until built.
	pub fn preview_equals<T: PropertyValue>(lookup: PropertyLookup, expected: T) -> Self {
		Self::preview_satisfies(lookup, move |value: &T| *value == expected)
	}

	/// Holds while `predicate` accepts the effective preview of the
	/// looked-up property. Reads `true` until built.
	pub fn preview_satisfies<T: PropertyValue>(
		lookup: PropertyLookup,
		predicate: impl Fn(&T) -> bool + 'static,
	) -> Self {
		Self::from_kind(Kind::Linked(Box::new(PreviewLink::new(lookup, predicate))), true)
	}

	/// Combines two conditions.
	pub fn compound(first: &Condition, second: &Condition, combinator: Combinator) -> Self {
		let initial = combinator(first.value(), second.value());
		Self::from_kind(
			Kind::Compound {
				first: first.clone(),
				second: second.clone(),
				combinator,
			},
			initial,
		)
	}

	/// Holds while both conditions hold.
	pub fn and(&self, other: &Condition) -> Self {
		Self::compound(self, other, and)
	}

	/// Holds while either condition holds.
	pub fn or(&self, other: &Condition) -> Self {
		Self::compound(self, other, or)
	}

	/// Holds while this condition does not.
	pub fn negate(&self) -> Self {
		Self::compound(self, &Self::always(), xor)
	}

	/// Last evaluated value.
	pub fn value(&self) -> bool {
		self.inner.value.get()
	}

	/// Recomputes, stores and returns the value.
	pub fn invoke(&self) -> bool {
		match &self.inner.kind {
			Kind::Constant | Kind::Settable | Kind::Linked(_) => self.value(),
			Kind::Computed(source) => {
				let value = source();
				self.store(value);
				value
			}
			Kind::Compound {
				first,
				second,
				combinator,
			} => {
				let value = combinator(first.invoke(), second.invoke());
				self.store(value);
				value
			}
		}
	}

	/// Assigns the value of a settable or computed condition.
	///
	/// Constant, linked and compound conditions derive their value and
	/// reject assignment with [`SettingsError::ImmutableCondition`].
	pub fn set(&self, value: bool) -> Result<()> {
		match &self.inner.kind {
			Kind::Settable | Kind::Computed(_) => {
				self.store(value);
				Ok(())
			}
			kind => Err(SettingsError::ImmutableCondition { kind: kind.name() }),
		}
	}

	/// Resolves property references and wires change propagation.
	///
	/// Compound conditions build both children first. Building an already
	/// built condition does nothing; a failed build may be retried.
	pub fn build(&self) -> Result<()> {
		if self.inner.built.replace(true) {
			return Ok(());
		}

		let result = match &self.inner.kind {
			Kind::Constant | Kind::Settable => Ok(()),
			Kind::Computed(_) => {
				self.invoke();
				Ok(())
			}
			Kind::Linked(link) => link.link(self),
			Kind::Compound {
				first,
				second,
				combinator,
			} => self.wire(first, second, *combinator),
		};

		if result.is_err() {
			self.inner.built.set(false);
		}
		tracing::trace!(
			domain = "settings",
			kind = self.inner.kind.name(),
			value = self.value(),
			ok = result.is_ok(),
			"condition built",
		);
		result
	}

	fn wire(&self, first: &Condition, second: &Condition, combinator: Combinator) -> Result<()> {
		first.build()?;
		second.build()?;

		let (this, other) = (self.downgrade(), second.downgrade());
		first.register_listener(move |_, changed| {
			if let (Some(this), Some(other)) = (this.upgrade(), other.upgrade()) {
				this.store(combinator(*changed, other.invoke()));
			}
		});

		let (this, other) = (self.downgrade(), first.downgrade());
		second.register_listener(move |_, changed| {
			if let (Some(this), Some(other)) = (this.upgrade(), other.upgrade()) {
				this.store(combinator(other.invoke(), *changed));
			}
		});
		Ok(())
	}

	/// Whether [`build`](Self::build) has completed.
	pub fn is_built(&self) -> bool {
		self.inner.built.get()
	}

	/// Whether this is a constant that always holds.
	pub fn is_always_true(&self) -> bool {
		matches!(self.inner.kind, Kind::Constant) && self.value()
	}

	/// Registers a listener on the value; replays the current value.
	pub fn register_listener(&self, listener: impl Fn(&bool, &bool) + 'static) -> ListenerId {
		self.inner.value.register_listener(listener)
	}

	/// Removes a value listener.
	pub fn remove_listener(&self, id: ListenerId) -> bool {
		self.inner.value.remove_listener(id)
	}

	/// Whether both handles point at the same condition.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	pub(crate) fn downgrade(&self) -> WeakCondition {
		WeakCondition(Rc::downgrade(&self.inner))
	}

	pub(crate) fn store(&self, value: bool) {
		self.inner.value.set(value);
	}
}

impl Default for Condition {
	fn default() -> Self {
		Self::always()
	}
}

impl fmt::Debug for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Condition")
			.field("kind", &self.inner.kind.name())
			.field("value", &self.value())
			.field("built", &self.is_built())
			.finish()
	}
}

impl BitAnd for Condition {
	type Output = Condition;

	fn bitand(self, rhs: Condition) -> Condition {
		self.and(&rhs)
	}
}

impl BitOr for Condition {
	type Output = Condition;

	fn bitor(self, rhs: Condition) -> Condition {
		self.or(&rhs)
	}
}

impl Not for Condition {
	type Output = Condition;

	fn not(self) -> Condition {
		self.negate()
	}
}

impl Not for &Condition {
	type Output = Condition;

	fn not(self) -> Condition {
		self.negate()
	}
}
