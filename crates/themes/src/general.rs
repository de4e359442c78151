//! IDE theme and editor scheme selection.

use std::collections::BTreeSet;
use std::rc::Rc;

use umbra_settings::{
	AnyProperty, Observable, PersistentChoiceProperty, PropertyValue, Result, SettingsContainer, SettingsHandle, Transformer,
};

/// Identifier of the general settings container.
pub const GENERAL_SETTINGS: &str = "general_settings";

/// An installed UI theme or editor color scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Theme {
	/// Stable identifier, persisted.
	pub id: String,
	/// Display name.
	pub name: String,
}

impl Theme {
	/// Creates a theme.
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
		}
	}
}

impl PropertyValue for Theme {}

/// Lists the themes the host has installed.
pub type ThemeSource = Rc<dyn Fn() -> Vec<Theme>>;

/// Defaults bundled with every host, in light, dark, high contrast order.
#[derive(Debug, Clone)]
pub struct ThemeDefaults {
	/// Default light entry.
	pub light: Theme,
	/// Default dark entry.
	pub dark: Theme,
	/// Default high contrast entry.
	pub high_contrast: Theme,
}

impl ThemeDefaults {
	/// Bundled IDE themes.
	pub fn ide() -> Self {
		Self {
			light: Theme::new("light", "Light"),
			dark: Theme::new("dark", "Dark"),
			high_contrast: Theme::new("high_contrast", "High Contrast"),
		}
	}

	/// Bundled editor schemes.
	pub fn editor() -> Self {
		Self {
			light: Theme::new("default", "Default"),
			dark: Theme::new("darcula", "Darcula"),
			high_contrast: Theme::new("high_contrast", "High contrast"),
		}
	}

	fn all(&self) -> [Theme; 3] {
		[self.light.clone(), self.dark.clone(), self.high_contrast.clone()]
	}
}

/// Installed themes with the defaults always present.
///
/// A selection is only highlighted if it equals one of the offered choices,
/// so the defaults used as fallbacks are seeded into the list.
fn seeded(source: &ThemeSource, defaults: &ThemeDefaults) -> Vec<Theme> {
	let mut themes: BTreeSet<Theme> = defaults.all().into_iter().collect();
	themes.extend(source());
	themes.into_iter().collect()
}

/// Persists a theme by id, resolving ids against the seeded list.
fn theme_transformer(source: &ThemeSource, defaults: &ThemeDefaults) -> Transformer<Option<Theme>, String> {
	let (source, defaults) = (Rc::clone(source), defaults.clone());
	Transformer::new(
		move |id: &String| seeded(&source, &defaults).into_iter().find(|t| t.id == *id),
		|theme: &Option<Theme>| theme.as_ref().map(|t| t.id.clone()).unwrap_or_default(),
	)
}

/// Which themes to switch between and whether to switch at all.
pub struct GeneralThemeSettings {
	/// Switch the IDE theme with the system.
	pub change_ide_theme: Observable<bool>,
	/// Switch the editor scheme with the system.
	pub change_editor_theme: Observable<bool>,
	/// Follow the system's high contrast mode.
	pub check_high_contrast: Observable<bool>,
	/// IDE theme used in light mode.
	pub light_theme: Observable<Theme>,
	/// IDE theme used in dark mode.
	pub dark_theme: Observable<Theme>,
	/// IDE theme used in high contrast mode.
	pub high_contrast_theme: Observable<Theme>,
	/// Editor scheme used in light mode.
	pub light_scheme: Observable<Theme>,
	/// Editor scheme used in dark mode.
	pub dark_scheme: Observable<Theme>,
	/// Editor scheme used in high contrast mode.
	pub high_contrast_scheme: Observable<Theme>,
	container: Rc<SettingsContainer>,
}

struct ChoiceGroup<'a> {
	title: &'static str,
	toggle: (&'static str, &'static str, &'a Observable<bool>),
	cells: [(&'static str, &'a Observable<Theme>); 3],
	source: &'a ThemeSource,
	defaults: &'a ThemeDefaults,
}

impl GeneralThemeSettings {
	/// Declares the general settings over the host's installed themes and
	/// editor schemes.
	pub fn new(ide_themes: ThemeSource, editor_schemes: ThemeSource) -> Result<Self> {
		let (ide, editor) = (ThemeDefaults::ide(), ThemeDefaults::editor());
		let change_ide_theme = Observable::new(true);
		let change_editor_theme = Observable::new(true);
		let check_high_contrast = Observable::new(true);
		let light_theme = Observable::new(ide.light.clone());
		let dark_theme = Observable::new(ide.dark.clone());
		let high_contrast_theme = Observable::new(ide.high_contrast.clone());
		let light_scheme = Observable::new(editor.light.clone());
		let dark_scheme = Observable::new(editor.dark.clone());
		let high_contrast_scheme = Observable::new(editor.high_contrast.clone());

		let groups = [
			ChoiceGroup {
				title: "IDE Theme",
				toggle: ("change_ide_theme", "Change IDE Theme", &change_ide_theme),
				cells: [
					("light_theme", &light_theme),
					("dark_theme", &dark_theme),
					("high_contrast_theme", &high_contrast_theme),
				],
				source: &ide_themes,
				defaults: &ide,
			},
			ChoiceGroup {
				title: "Editor Theme",
				toggle: ("change_editor_theme", "Change Editor Theme", &change_editor_theme),
				cells: [
					("light_scheme", &light_scheme),
					("dark_scheme", &dark_scheme),
					("high_contrast_scheme", &high_contrast_scheme),
				],
				source: &editor_schemes,
				defaults: &editor,
			},
		];

		let container = SettingsContainer::builder(GENERAL_SETTINGS).build(|root| {
			for section in &groups {
				root.group(section.title, |g| {
					let (toggle, label, cell) = section.toggle;
					g.persistent_bool(toggle, label, cell);
					g.group("", |choices| {
						let enabled = choices.is_true(toggle);
						choices.active_if(enabled);

						let parse = theme_transformer(section.source, section.defaults);
						let fallbacks = section.defaults.all();
						let descriptions = ["Light", "Dark", "High Contrast"];
						for (((name, cell), fallback), description) in
							section.cells.into_iter().zip(fallbacks).zip(descriptions)
						{
							let property = choices.persistent_choice(name, description, cell, parse.clone(), fallback);
							theme_choices(&property, section.source, section.defaults);
							if name.starts_with("high_contrast") {
								property.set_active_condition(choices.is_true("check_high_contrast"));
							}
						}
					});
				});
			}
			root.group("Other", |g| {
				g.persistent_bool("check_high_contrast", "Check for high contrast", &check_high_contrast);
			});
		})?;

		Ok(Self {
			change_ide_theme,
			change_editor_theme,
			check_high_contrast,
			light_theme,
			dark_theme,
			high_contrast_theme,
			light_scheme,
			dark_scheme,
			high_contrast_scheme,
			container: Rc::new(container),
		})
	}
}

fn theme_choices(property: &PersistentChoiceProperty<Theme>, source: &ThemeSource, defaults: &ThemeDefaults) {
	let (source, defaults) = (Rc::clone(source), defaults.clone());
	property
		.choices_from(move || seeded(&source, &defaults))
		.render_with(|theme| theme.name.clone());
}

impl SettingsHandle for GeneralThemeSettings {
	fn container(&self) -> Rc<SettingsContainer> {
		Rc::clone(&self.container)
	}
}
