//! End-to-end persistence: declare, register, export to JSON, reload.

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use umbra_settings::persist::SETTINGS_VERSION;
use umbra_settings::{
	AnyProperty, Observable, OneTimeNotice, PersistentEntry, SettingsContainer, SettingsRegistry, SettingsState,
	ValueProperty, effective,
};

struct Editor {
	line_numbers: Observable<bool>,
	tab_width: Observable<i64>,
	font: Observable<String>,
	welcome: OneTimeNotice,
	container: Rc<SettingsContainer>,
}

impl Editor {
	fn new(loaded: Rc<Cell<usize>>) -> Self {
		let line_numbers = Observable::new(true);
		let tab_width = Observable::new(4_i64);
		let font = Observable::new("Mono".to_string());
		let welcome = OneTimeNotice::new();

		let container = SettingsContainer::builder("editor")
			.on_settings_loaded(move || loaded.set(loaded.get() + 1))
			.build(|root| {
				root.group("Gutter", |g| {
					g.persistent_bool("line_numbers", "Show line numbers", &line_numbers);
					g.unnamed_group(|u| {
						let shown = u.is_true("line_numbers");
						u.active_if(shown);
						u.persistent_int("gutter_width", "Gutter width", &tab_width);
					});
				});
				root.persistent_string("font", "Font", &font);
				root.hidden(|h| {
					h.notice("welcome_shown", &welcome);
				});
			})
			.expect("editor settings declare cleanly");

		Self {
			line_numbers,
			tab_width,
			font,
			welcome,
			container: Rc::new(container),
		}
	}
}

fn store(state: &SettingsState) -> String {
	serde_json::to_string(state).unwrap()
}

fn load(raw: &str) -> SettingsState {
	serde_json::from_str(raw).unwrap()
}

#[test]
fn test_round_trip_through_json() {
	let _ = tracing_subscriber::fmt::try_init();
	let loaded = Rc::new(Cell::new(0));

	let first = Editor::new(Rc::clone(&loaded));
	let mut registry = SettingsRegistry::new();
	registry.register(Rc::clone(&first.container)).unwrap();
	first.line_numbers.set(false);
	first.tab_width.set(8);
	first.font.set("Iosevka".into());
	assert!(first.welcome.fire(|| {}));
	let saved = store(&registry.export());

	let second = Editor::new(Rc::clone(&loaded));
	let mut registry = SettingsRegistry::new();
	registry.register(Rc::clone(&second.container)).unwrap();
	registry.import(&load(&saved));

	assert!(!second.line_numbers.get());
	assert_eq!(second.tab_width.get(), 8);
	assert_eq!(second.font.get(), "Iosevka");
	assert!(!second.welcome.is_pending());
	assert_eq!(loaded.get(), 1);
}

#[test]
fn test_export_identities() {
	let _ = tracing_subscriber::fmt::try_init();
	let editor = Editor::new(Rc::new(Cell::new(0)));
	let mut registry = SettingsRegistry::new();
	registry.register(Rc::clone(&editor.container)).unwrap();

	assert_eq!(
		registry.export(),
		SettingsState::new([
			PersistentEntry::new("editor", "font", "Mono"),
			PersistentEntry::new("editor:Gutter", "line_numbers", "true"),
			PersistentEntry::new("editor:Gutter", "gutter_width", "4"),
			PersistentEntry::new("editor_hidden", "welcome_shown", "pending"),
			PersistentEntry::version(SETTINGS_VERSION),
		])
	);
}

#[test]
fn test_newer_entries_survive_an_older_build() {
	let _ = tracing_subscriber::fmt::try_init();
	let from_newer = SettingsState::new([
		PersistentEntry::version(SETTINGS_VERSION),
		PersistentEntry::new("editor", "font", "Fira"),
		PersistentEntry::new("editor:Minimap", "enabled", "true"),
	]);

	let editor = Editor::new(Rc::new(Cell::new(0)));
	let mut registry = SettingsRegistry::new();
	registry.register(Rc::clone(&editor.container)).unwrap();
	registry.import(&load(&store(&from_newer)));

	let exported = registry.export();
	assert_eq!(editor.font.get(), "Fira");
	assert_eq!(exported.get("editor:Minimap", "enabled"), Some("true"));
	assert_eq!(exported.entries.last(), Some(&PersistentEntry::version(SETTINGS_VERSION)));
}

#[test]
fn test_import_drives_conditions() {
	let _ = tracing_subscriber::fmt::try_init();
	let editor = Editor::new(Rc::new(Cell::new(0)));
	let mut registry = SettingsRegistry::new();
	registry.register(Rc::clone(&editor.container)).unwrap();

	let width: Rc<dyn AnyProperty> = editor.container.find("gutter_width").unwrap();
	assert!(width.active_condition().value());

	registry.import(&SettingsState::new([PersistentEntry::new(
		"editor:Gutter",
		"line_numbers",
		"off",
	)]));
	assert!(!width.active_condition().value());

	let toggle = editor.container.find("line_numbers").unwrap();
	effective::<bool>(&toggle).unwrap().set_preview(true);
	assert!(width.active_condition().value(), "conditions follow the preview");
	assert!(!editor.line_numbers.get());
}

#[test]
fn test_corrupt_values_fall_back() {
	let _ = tracing_subscriber::fmt::try_init();
	let editor = Editor::new(Rc::new(Cell::new(0)));
	let mut registry = SettingsRegistry::new();
	registry.register(Rc::clone(&editor.container)).unwrap();

	registry.import(&SettingsState::new([
		PersistentEntry::new("editor:Gutter", "gutter_width", "wide"),
		PersistentEntry::new("editor_hidden", "welcome_shown", "maybe"),
	]));

	assert_eq!(editor.tab_width.get(), 4);
	assert!(editor.welcome.is_pending());
}
