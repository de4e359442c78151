use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::container::SettingsContainer;
use crate::observable::Observable;
use crate::transform::{Transformer, parse};

fn font_size_parse() -> Transformer<Option<i64>, String> {
	Transformer::new(
		|raw: &String| parse::parse_int(raw),
		|value: &Option<i64>| value.map(|n| n.to_string()).unwrap_or_default(),
	)
}

#[test]
fn test_preview_follows_committed_value() {
	let cell = Observable::new(false);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.property("flag", "", &cell);
		})
		.unwrap();
	let flag = effective::<bool>(&container.find("flag").unwrap()).unwrap();

	cell.set(true);
	assert!(flag.preview());

	flag.set_preview(false);
	assert!(cell.get(), "staging leaves the value alone");

	flag.apply_preview();
	assert!(!cell.get());

	flag.set_preview(true);
	flag.revert_preview();
	assert!(!flag.preview());
}

#[test]
fn test_transforming_reads_and_writes_through() {
	let size = Observable::new(12_i64);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.transforming("size", "", &size, parse::int_string(12));
		})
		.unwrap();
	let property = container.find("size").unwrap();

	assert_eq!(property.value_kind(), ValueKind::String);
	assert_eq!(property.setting_value(), SettingValue::from("12"));

	property.set_preview_value(&"14".into()).unwrap();
	assert_eq!(property.preview_value(), SettingValue::from("14"));
	assert_eq!(effective::<i64>(&property).unwrap().preview(), 14);
	assert_eq!(size.get(), 12);

	property.apply_preview();
	assert_eq!(size.get(), 14);
	assert_eq!(property.setting_value(), SettingValue::from("14"));

	size.set(9);
	assert_eq!(property.preview_value(), SettingValue::from("9"));
}

#[test]
fn test_transforming_revert_restores_both_layers() {
	let size = Observable::new(12_i64);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.persistent_int("size", "", &size);
		})
		.unwrap();
	let property = container.find("size").unwrap();

	property.set_preview_value(&"20".into()).unwrap();
	property.revert_preview();
	assert_eq!(property.preview_value(), SettingValue::from("12"));
	assert_eq!(effective::<i64>(&property).unwrap().preview(), 12);
}

#[test]
fn test_value_listener_is_mapped_through_read() {
	let size = Observable::new(12_i64);
	let property = Rc::new(TransformingProperty::new(
		SimpleProperty::new("size", "", size.clone(), &crate::group::SettingsGroup::detached("g")),
		parse::int_string(0),
	));

	let seen = Rc::new(RefCell::new(Vec::new()));
	let log = Rc::clone(&seen);
	property.register_listener(
		Slot::Value,
		Rc::new(move |old: &String, new: &String| log.borrow_mut().push((old.clone(), new.clone()))),
	);
	size.set(3);

	assert_eq!(
		*seen.borrow(),
		[("12".to_string(), "12".to_string()), ("12".to_string(), "3".to_string())]
	);
}

#[test]
fn test_effective_walks_every_layer() {
	let size = Observable::new(12_i64);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.persistent_choice("size", "Font size", &size, font_size_parse(), 12)
				.choices_from(|| vec![10, 12, 14]);
		})
		.unwrap();
	let property = container.find("size").unwrap();

	let base = effective::<i64>(&property).unwrap();
	assert!(base.value_cell().ptr_eq(&size));
	assert_eq!(innermost(&property).description(), "Font size");
	assert!(property.backing_any().is_some());
	assert!(base.backing_any().is_none());

	let err = effective::<bool>(&property).unwrap_err();
	assert_eq!(
		err,
		SettingsError::TypeMismatch {
			property: "size".into(),
			value: "12".into(),
			expected: "bool",
		}
	);
}

#[test]
fn test_choice_select_and_labels() {
	let size = Observable::new(12_i64);
	let mut handle = None;
	let container = SettingsContainer::builder("general")
		.build(|b| {
			let choice = b.persistent_choice("size", "", &size, font_size_parse(), 12);
			choice.choices_from(|| vec![10, 12, 14]).render_with(|n| format!("{n}pt"));
			handle = Some(choice);
		})
		.unwrap();
	let choice = handle.unwrap();
	container.init().unwrap();

	let erased = container.find("size").unwrap();
	let view = erased.as_choice().unwrap();
	assert_eq!(view.labels(), ["10pt", "12pt", "14pt"]);
	assert_eq!(view.selected_index(), Some(1));

	view.select(2).unwrap();
	assert_eq!(view.selected_index(), Some(2));
	assert_eq!(size.get(), 12);
	assert_eq!(effective::<i64>(&erased).unwrap().preview(), 14);
	assert_eq!(choice.preview(), "14");

	erased.apply_preview();
	assert_eq!(size.get(), 14);
	assert_eq!(choice.preview(), "14");
	assert_eq!(choice.choice_value(), 14);
	assert_eq!(erased.as_persistent().unwrap().persisted(), "14");

	assert_eq!(
		view.select(3),
		Err(SettingsError::ChoiceOutOfRange {
			property: "size".into(),
			index: 3,
			len: 3,
		})
	);
}

#[test]
fn test_choice_selection_shows_in_every_layer() {
	let size = Observable::new(12_i64);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.persistent_choice("size", "", &size, font_size_parse(), 12)
				.choices_from(|| vec![10, 12, 14]);
		})
		.unwrap();
	let erased = container.find("size").unwrap();
	let view = erased.as_choice().unwrap();

	view.select(2).unwrap();
	assert_eq!(erased.preview_value(), SettingValue::from("14"));
	assert_eq!(erased.setting_value(), SettingValue::from("12"));

	erased.revert_preview();
	assert_eq!(erased.preview_value(), SettingValue::from("12"));
	assert_eq!(view.selected_index(), Some(1));

	view.select(0).unwrap();
	erased.apply_preview();
	assert_eq!(size.get(), 10);
	assert_eq!(erased.preview_value(), SettingValue::from("10"));
}

#[test]
fn test_non_canonical_preview_is_normalised() {
	let flag = Observable::new(false);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.persistent_bool("flag", "", &flag);
		})
		.unwrap();
	let property = container.find("flag").unwrap();

	property.set_preview_value(&"YES".into()).unwrap();
	assert_eq!(property.preview_value(), SettingValue::from("true"));
	assert!(effective::<bool>(&property).unwrap().preview());
}

#[test]
fn test_choice_restore_falls_back() {
	let size = Observable::new(14_i64);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.persistent_choice("size", "", &size, font_size_parse(), 12)
				.choices_from(|| vec![10, 12, 14]);
		})
		.unwrap();
	let persistent = container.find("size").unwrap();
	let persistent = persistent.as_persistent().unwrap();

	persistent.restore("large");
	assert_eq!(size.get(), 12);
	persistent.restore("10");
	assert_eq!(size.get(), 10);
}

#[test]
fn test_fallback_outside_choices_fails_init() {
	let size = Observable::new(12_i64);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.persistent_choice("size", "", &size, font_size_parse(), 11)
				.choices_from(|| vec![10, 12, 14]);
		})
		.unwrap();

	assert_eq!(
		container.init(),
		Err(SettingsError::FallbackNotInChoices {
			property: "size".into(),
			fallback: "11".into(),
		})
	);
}

#[test]
fn test_choices_are_requested_afresh() {
	let available = Rc::new(RefCell::new(vec!["Light".to_string()]));
	let theme = Observable::new("Light".to_string());
	let mut handle = None;
	let _container = SettingsContainer::builder("general")
		.build(|b| {
			let choice = b.choice("theme", "", &theme, Transformer::identity());
			let source = Rc::clone(&available);
			choice.choices_from(move || source.borrow().clone());
			handle = Some(choice);
		})
		.unwrap();
	let choice = handle.unwrap();

	assert_eq!(choice.choices(), ["Light"]);
	available.borrow_mut().push("Dark".into());
	assert_eq!(choice.labels(), ["\"Light\"", "\"Dark\""]);
	assert!(choice.as_persistent().is_none());
	assert!(choice.fallback().is_none());
}

#[test]
fn test_erased_preview_rejects_wrong_variant() {
	let cell = Observable::new(false);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.property("flag", "", &cell);
		})
		.unwrap();
	let property = container.find("flag").unwrap();

	assert_eq!(
		property.set_preview_value(&SettingValue::Int(1)),
		Err(SettingsError::TypeMismatch {
			property: "flag".into(),
			value: "1".into(),
			expected: "bool",
		})
	);
	property.set_preview_value(&true.into()).unwrap();
	assert_eq!(property.preview_value(), SettingValue::Bool(true));
	assert!(!cell.get());
}

#[test]
fn test_stub_keeps_raw_string() {
	let stub = StubProperty::new("g2:nested", "unknownProp", "42");
	let erased: Rc<dyn AnyProperty> = stub.clone();

	assert!(erased.is_stub());
	assert_eq!(erased.id(), PropertyId::new("g2:nested", "unknownProp"));
	assert_eq!(erased.setting_value(), SettingValue::from("42"));
	assert!(erased.set_preview_value(&SettingValue::Int(3)).is_err());

	erased.set_preview_value(&"43".into()).unwrap();
	erased.revert_preview();
	assert_eq!(stub.raw(), "43");
	assert_eq!(erased.as_persistent().unwrap().persisted(), "43");
}

#[test]
fn test_decorators_share_the_condition() {
	let cell = Observable::new(false);
	let container = SettingsContainer::builder("general")
		.build(|b| {
			b.persistent_bool("flag", "", &cell);
		})
		.unwrap();
	let property = container.find("flag").unwrap();
	let gate = Condition::settable(false);

	property.set_active_condition(gate.clone());
	assert!(innermost(&property).active_condition().ptr_eq(&gate));
}
