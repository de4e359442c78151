use std::rc::Rc;

use super::SettingsGroup;
use crate::condition::{Condition, PropertyLookup};
use crate::notice::{NoticeState, OneTimeNotice};
use crate::observable::Observable;
use crate::property::{
	AnyProperty, ChoiceProperty, PersistentChoiceProperty, PersistentProperty, SimpleProperty,
	TransformingProperty,
};
use crate::transform::{Transformer, parse};
use crate::value::PropertyValue;

/// Declares properties and subgroups into a group.
///
/// Each builder scopes one optional enablement condition, set with
/// [`active_if`](Self::active_if). When the builder completes, the condition
/// replaces the always-true condition of every property it covers, or is
/// ANDed with a condition the property already had. A builder covers the
/// properties it declared and everything in the groups it created.
pub struct GroupBuilder {
	group: SettingsGroup,
	hidden: SettingsGroup,
	condition: Option<Condition>,
	added: Vec<Rc<dyn AnyProperty>>,
	children: Vec<SettingsGroup>,
}

impl GroupBuilder {
	pub(crate) fn new(group: SettingsGroup, hidden: SettingsGroup) -> Self {
		Self {
			group,
			hidden,
			condition: None,
			added: Vec::new(),
			children: Vec::new(),
		}
	}

	/// The group properties are declared into.
	pub fn current_group(&self) -> &SettingsGroup {
		&self.group
	}

	/// Enables this builder's properties only while `condition` holds.
	/// Repeated calls AND together.
	pub fn active_if(&mut self, condition: Condition) -> &mut Self {
		self.condition = Some(match self.condition.take() {
			Some(existing) => existing.and(&condition),
			None => condition,
		});
		self
	}

	/// Declares a subgroup. An empty `name` creates an untitled group with a
	/// synthetic identifier.
	pub fn group(&mut self, name: &str, init: impl FnOnce(&mut GroupBuilder)) -> SettingsGroup {
		let child = self.group.add_subgroup(name);
		let mut builder = GroupBuilder::new(child.clone(), self.hidden.clone());
		init(&mut builder);
		builder.finish();
		self.children.push(child.clone());
		child
	}

	/// Declares properties into the current group under their own condition
	/// scope.
	pub fn unnamed_group(&mut self, init: impl FnOnce(&mut GroupBuilder)) {
		let mut builder = GroupBuilder::new(self.group.clone(), self.hidden.clone());
		init(&mut builder);
		let (added, children) = builder.finish();
		self.added.extend(added);
		self.children.extend(children);
	}

	/// Declares properties into the container's hidden group. They are
	/// persisted but never rendered, and not covered by this builder's
	/// condition.
	pub fn hidden(&mut self, init: impl FnOnce(&mut GroupBuilder)) {
		let mut builder = GroupBuilder::new(self.hidden.clone(), self.hidden.clone());
		init(&mut builder);
		builder.finish();
	}

	pub(crate) fn finish(self) -> (Vec<Rc<dyn AnyProperty>>, Vec<SettingsGroup>) {
		if let Some(condition) = &self.condition {
			for property in self.covered() {
				attach_condition(&property, condition);
			}
		}
		(self.added, self.children)
	}

	fn covered(&self) -> Vec<Rc<dyn AnyProperty>> {
		let mut out = self.added.clone();
		for child in &self.children {
			out.extend(child.all_properties());
		}
		out
	}

	fn register<P: AnyProperty>(&mut self, property: Rc<P>) -> Rc<P> {
		let erased: Rc<dyn AnyProperty> = property.clone();
		self.group.add_property(Rc::clone(&erased));
		self.added.push(erased);
		property
	}

	fn simple<T: PropertyValue>(&self, name: &str, description: &str, cell: &Observable<T>) -> Rc<SimpleProperty<T>> {
		SimpleProperty::new(name, description, cell.clone(), &self.group)
	}

	/// Declares a property over `cell`.
	pub fn property<T: PropertyValue>(
		&mut self,
		name: &str,
		description: &str,
		cell: &Observable<T>,
	) -> Rc<SimpleProperty<T>> {
		let property = self.simple(name, description, cell);
		self.register(property)
	}

	/// Declares a property exposing `cell` through `transformer`.
	pub fn transforming<R: PropertyValue, T: PropertyValue>(
		&mut self,
		name: &str,
		description: &str,
		cell: &Observable<R>,
		transformer: Transformer<R, T>,
	) -> Rc<TransformingProperty<R, T>> {
		let backing = self.simple(name, description, cell);
		self.register(Rc::new(TransformingProperty::new(backing, transformer)))
	}

	/// Declares an unpersisted choice property. Configure its choices with
	/// [`ChoiceProperty::choices_from`].
	pub fn choice<R: PropertyValue, T: PropertyValue>(
		&mut self,
		name: &str,
		description: &str,
		cell: &Observable<R>,
		transformer: Transformer<R, T>,
	) -> Rc<ChoiceProperty<R, T>> {
		let backing = self.simple(name, description, cell);
		let inner = TransformingProperty::new(backing, transformer);
		self.register(Rc::new(ChoiceProperty::new(inner, None)))
	}

	/// Declares a property persisted through `transformer`.
	pub fn persistent<R: PropertyValue>(
		&mut self,
		name: &str,
		description: &str,
		cell: &Observable<R>,
		transformer: Transformer<R, String>,
	) -> Rc<PersistentProperty<R>> {
		let backing = self.simple(name, description, cell);
		self.register(Rc::new(PersistentProperty::new(backing, transformer)))
	}

	/// Declares a persisted string.
	pub fn persistent_string(
		&mut self,
		name: &str,
		description: &str,
		cell: &Observable<String>,
	) -> Rc<PersistentProperty<String>> {
		self.persistent(name, description, cell, parse::string_identity())
	}

	/// Declares a persisted boolean. Unparseable strings restore the cell's
	/// value at declaration time.
	pub fn persistent_bool(
		&mut self,
		name: &str,
		description: &str,
		cell: &Observable<bool>,
	) -> Rc<PersistentProperty<bool>> {
		let fallback = cell.get();
		self.persistent(name, description, cell, parse::bool_string(fallback))
	}

	/// Declares a persisted integer. Unparseable strings restore the cell's
	/// value at declaration time.
	pub fn persistent_int(
		&mut self,
		name: &str,
		description: &str,
		cell: &Observable<i64>,
	) -> Rc<PersistentProperty<i64>> {
		let fallback = cell.get();
		self.persistent(name, description, cell, parse::int_string(fallback))
	}

	/// Declares a persisted choice. `parse` maps persisted strings to a
	/// choice, with `None` falling back to `fallback`; `fallback` must be
	/// among the choices when the container is initialised.
	pub fn persistent_choice<R: PropertyValue>(
		&mut self,
		name: &str,
		description: &str,
		cell: &Observable<R>,
		parse: Transformer<Option<R>, String>,
		fallback: R,
	) -> Rc<PersistentChoiceProperty<R>> {
		let backing = self.simple(name, description, cell);
		let inner = PersistentProperty::new(backing, parse.write_fallback(fallback.clone()));
		self.register(Rc::new(ChoiceProperty::new(inner, Some(fallback))))
	}

	/// Declares the persisted state of a fire-once notice.
	pub fn notice(&mut self, name: &str, notice: &OneTimeNotice) -> Rc<PersistentProperty<NoticeState>> {
		self.persistent(
			name,
			"",
			notice.state(),
			parse::display_string(NoticeState::Pending),
		)
	}

	/// Condition that holds while the named boolean's preview is `true`.
	pub fn is_true(&self, name: &str) -> Condition {
		self.is_equal(name, true)
	}

	/// Condition that holds while the named boolean's preview is `false`.
	pub fn is_false(&self, name: &str) -> Condition {
		self.is_equal(name, false)
	}

	/// Condition that holds while the named property's preview equals
	/// `expected`. The name resolves from this builder's group when the
	/// condition is built.
	pub fn is_equal<T: PropertyValue>(&self, name: &str, expected: T) -> Condition {
		Condition::preview_equals(PropertyLookup::named(&self.group, name), expected)
	}

	/// Condition that holds while `predicate` accepts the named property's
	/// preview.
	pub fn satisfies<T: PropertyValue>(&self, name: &str, predicate: impl Fn(&T) -> bool + 'static) -> Condition {
		Condition::preview_satisfies(PropertyLookup::named(&self.group, name), predicate)
	}
}

fn attach_condition(property: &Rc<dyn AnyProperty>, condition: &Condition) {
	let current = property.active_condition();
	let next = if current.is_always_true() {
		condition.clone()
	} else {
		current.and(condition)
	};
	property.set_active_condition(next);
}
