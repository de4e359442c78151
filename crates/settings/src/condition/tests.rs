use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::container::SettingsContainer;
use crate::observable::Observable;
use crate::property::{AnyProperty, ValueProperty, effective};

fn counting(value: bool) -> (Condition, Rc<Cell<usize>>) {
	let calls = Rc::new(Cell::new(0));
	let counter = Rc::clone(&calls);
	let condition = Condition::computed(move || {
		counter.set(counter.get() + 1);
		value
	});
	(condition, calls)
}

#[rstest]
#[case(and, [false, false, false, true])]
#[case(or, [false, true, true, true])]
#[case(xor, [false, true, true, false])]
fn test_combinators(#[case] combinator: Combinator, #[case] table: [bool; 4]) {
	let inputs = [(false, false), (false, true), (true, false), (true, true)];
	for ((a, b), expected) in inputs.into_iter().zip(table) {
		assert_eq!(combinator(a, b), expected, "{a} {b}");
	}
}

#[test]
fn test_compound_follows_settable_children() {
	let a = Condition::settable(true);
	let b = Condition::settable(false);
	let both = a.and(&b);
	both.build().unwrap();
	assert!(!both.value());

	b.set(true).unwrap();
	assert!(both.value());
	assert!(a.value());
}

#[test]
fn test_compound_reads_computed_sibling_fresh() {
	let source = Rc::new(Cell::new(true));
	let read = Rc::clone(&source);
	let a = Condition::computed(move || read.get());
	let b = Condition::settable(false);
	let both = a.and(&b);
	both.build().unwrap();

	source.set(false);
	b.set(true).unwrap();
	assert!(!both.value(), "sibling is invoked on recombination");
	assert!(!a.value());
}

#[test]
fn test_compound_invokes_sibling_once_per_change() {
	let (a, calls) = counting(true);
	let b = Condition::settable(true);
	let both = a.and(&b);
	both.build().unwrap();
	let after_build = calls.get();

	b.set(false).unwrap();
	assert!(!both.value());
	b.set(true).unwrap();
	assert!(both.value());
	assert_eq!(calls.get(), after_build + 2);
}

#[test]
fn test_invoke_pulls_computed_children() {
	let source = Rc::new(Cell::new(true));
	let read = Rc::clone(&source);
	let a = Condition::computed(move || read.get());
	let b = Condition::settable(true);
	let both = a.and(&b);
	both.build().unwrap();

	source.set(false);
	assert!(both.value(), "computed conditions are pull-based");
	assert!(!both.invoke());
	assert!(!a.value());
	assert!(!both.value());
}

#[test]
fn test_or_and_negate() {
	let a = Condition::settable(false);
	let b = Condition::settable(false);
	let either = a.clone() | b.clone();
	let neither = !&either;
	neither.build().unwrap();

	assert!(!either.value());
	assert!(neither.value());
	b.set(true).unwrap();
	assert!(either.value());
	assert!(!neither.value());
	a.set(true).unwrap();
	b.set(false).unwrap();
	assert!(either.value());
}

#[test]
fn test_operators_compose() {
	let a = Condition::settable(true);
	let b = Condition::settable(true);
	let c = Condition::settable(false);
	let expr = (a.clone() & b.clone()) | c.clone();
	expr.build().unwrap();
	assert!(expr.value());

	a.set(false).unwrap();
	assert!(!expr.value());
	c.set(true).unwrap();
	assert!(expr.value());
}

#[rstest]
#[case(Condition::constant(true), "constant")]
#[case(Condition::always().and(&Condition::always()), "compound")]
fn test_derived_conditions_reject_set(#[case] condition: Condition, #[case] kind: &'static str) {
	assert_eq!(condition.set(false), Err(SettingsError::ImmutableCondition { kind }));
}

#[test]
fn test_computed_accepts_set_until_next_invoke() {
	let (computed, _) = counting(true);
	computed.set(false).unwrap();
	assert!(!computed.value());
	assert!(computed.invoke());
}

#[test]
fn test_build_is_idempotent() {
	let a = Condition::settable(true);
	let b = Condition::settable(true);
	let both = a.and(&b);
	both.build().unwrap();
	both.build().unwrap();
	assert!(both.is_built());

	let fired = Rc::new(Cell::new(0));
	let counter = Rc::clone(&fired);
	both.register_listener(move |_, _| counter.set(counter.get() + 1));
	a.set(false).unwrap();
	assert_eq!(fired.get(), 2, "replay plus one change");
}

#[test]
fn test_listener_sees_old_and_new() {
	let a = Condition::settable(true);
	let seen = Rc::new(RefCell::new(Vec::new()));
	let log = Rc::clone(&seen);
	let id = a.register_listener(move |old, new| log.borrow_mut().push((*old, *new)));
	a.set(false).unwrap();
	assert!(a.remove_listener(id));
	a.set(true).unwrap();
	assert_eq!(*seen.borrow(), [(true, true), (true, false)]);
}

#[test]
fn test_reentrant_flip_settles() {
	let a = Condition::settable(false);
	let b = Condition::settable(false);
	let both = a.or(&b);
	both.build().unwrap();

	// Turning `a` on turns `b` off from inside the notification.
	let weak_b = b.downgrade();
	a.register_listener(move |_, new| {
		if let (true, Some(b)) = (*new, weak_b.upgrade()) {
			b.set(false).unwrap();
		}
	});
	b.set(true).unwrap();
	a.set(true).unwrap();

	assert!(!b.value());
	assert!(both.value());
}

fn flag_container(flag: &Observable<bool>, level: &Observable<i64>) -> SettingsContainer {
	SettingsContainer::builder("general")
		.build(|root| {
			root.persistent_bool("flag", "", flag);
			root.persistent_int("level", "", level);
		})
		.unwrap()
}

#[test]
fn test_linked_condition_tracks_preview() {
	let flag = Observable::new(false);
	let level = Observable::new(0_i64);
	let container = flag_container(&flag, &level);
	let property = container.find("flag").unwrap();

	let condition = Condition::preview_equals(PropertyLookup::direct(Rc::clone(&property)), true);
	assert!(condition.value(), "unbuilt linked conditions read true");
	condition.build().unwrap();
	assert!(!condition.value());

	let effective = effective::<bool>(&property).unwrap();
	effective.set_preview(true);
	assert!(condition.value());
	assert!(!flag.get(), "preview edits leave the value alone");

	effective.revert_preview();
	assert!(!condition.value());

	flag.set(true);
	assert!(condition.value(), "committed changes flow into the preview");
}

#[test]
fn test_linked_condition_follows_decorator_preview() {
	let flag = Observable::new(false);
	let level = Observable::new(0_i64);
	let container = flag_container(&flag, &level);
	let property = container.find("level").unwrap();

	let condition = Condition::preview_satisfies(PropertyLookup::direct(Rc::clone(&property)), |v: &i64| *v > 2);
	condition.build().unwrap();
	assert!(!condition.value());

	property.set_preview_value(&"5".into()).unwrap();
	assert!(condition.value());
	assert_eq!(level.get(), 0);
}

#[test]
fn test_linked_condition_type_mismatch() {
	let flag = Observable::new(false);
	let level = Observable::new(0_i64);
	let container = flag_container(&flag, &level);
	let property = container.find("flag").unwrap();

	let condition = Condition::preview_equals(PropertyLookup::direct(property), 3_i64);
	let err = condition.build().unwrap_err();
	assert!(matches!(err, SettingsError::TypeMismatch { ref property, .. } if property == "flag"));
	assert!(!condition.is_built());
}

#[test]
fn test_named_lookup_resolves_at_build() {
	let flag = Observable::new(true);
	let level = Observable::new(0_i64);
	let container = flag_container(&flag, &level);

	let late = Condition::preview_equals(PropertyLookup::named(container.root(), "flag"), true);
	let missing = Condition::preview_equals(PropertyLookup::named(container.root(), "flga"), true);
	late.build().unwrap();
	assert!(late.value());
	assert_eq!(
		missing.build(),
		Err(SettingsError::PropertyNotFound {
			name: "flga".into(),
			suggestion: Some("flag".into()),
		})
	);
}

#[test]
fn test_dropped_compound_detaches() {
	let a = Condition::settable(true);
	let b = Condition::settable(true);
	{
		let both = a.and(&b);
		both.build().unwrap();
	}
	a.set(false).unwrap();
	assert!(!a.value());
}
