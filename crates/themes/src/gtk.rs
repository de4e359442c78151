//! GTK theme selection for GTK based desktops.

use std::collections::BTreeSet;
use std::rc::Rc;

use umbra_settings::{
	Observable, OneTimeNotice, PersistentChoiceProperty, PropertyValue, Result, SettingsContainer, SettingsHandle,
	Transformer,
};

use crate::platform::NoticeSink;

/// Identifier of the GTK settings container. Named after the GNOME-only
/// container it replaced so stored settings keep loading.
pub const GTK_SETTINGS: &str = "gnome_settings";

const GUESSING_NOTICE: &str = "Guessing whether the current GTK theme is dark or light from its name. \
	Pick your light, dark and high contrast themes explicitly in the settings for better results.";

/// A GTK theme, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GtkTheme(pub String);

impl GtkTheme {
	/// Bundled light theme.
	pub fn light() -> Self {
		Self("Adwaita".into())
	}

	/// Bundled dark theme.
	pub fn dark() -> Self {
		Self("Adwaita-dark".into())
	}

	/// Bundled high contrast theme.
	pub fn high_contrast() -> Self {
		Self("HighContrast".into())
	}

	/// Theme name.
	pub fn name(&self) -> &str {
		&self.0
	}
}

impl PropertyValue for GtkTheme {}

/// Lists the names of the installed GTK themes.
pub type GtkThemeSource = Rc<dyn Fn() -> Vec<String>>;

/// GTK themes to switch between, or whether to guess them.
pub struct GtkSettings {
	/// Guess light and dark from the current theme's name.
	pub guess_light_and_dark: Observable<bool>,
	/// Theme used in light mode.
	pub light_theme: Observable<GtkTheme>,
	/// Theme used in dark mode.
	pub dark_theme: Observable<GtkTheme>,
	/// Theme used in high contrast mode.
	pub high_contrast_theme: Observable<GtkTheme>,
	guessing_notice: OneTimeNotice,
	container: Rc<SettingsContainer>,
}

impl GtkSettings {
	/// Declares the GTK settings over the installed themes. The guessing
	/// notice goes to `sink` after the first load.
	pub fn new(installed: GtkThemeSource, sink: NoticeSink) -> Result<Self> {
		let guess_light_and_dark = Observable::new(true);
		let light_theme = Observable::new(GtkTheme::light());
		let dark_theme = Observable::new(GtkTheme::dark());
		let high_contrast_theme = Observable::new(GtkTheme::high_contrast());
		let guessing_notice = OneTimeNotice::new();

		let notice = guessing_notice.clone();
		let container = SettingsContainer::builder(GTK_SETTINGS)
			.on_settings_loaded(move || {
				notice.fire(|| sink.notify(GUESSING_NOTICE));
			})
			.build(|root| {
				root.group("Gtk Theme", |g| {
					g.persistent_bool(
						"guess_light_and_dark",
						"Guess light/dark theme based on name",
						&guess_light_and_dark,
					);
					g.group("", |themes| {
						let guessing_off = themes.is_false("guess_light_and_dark");
						themes.active_if(guessing_off);

						let choices = [
							("light_gtk_theme", "Light GTK Theme", &light_theme, GtkTheme::light()),
							("dark_gtk_theme", "Dark GTK Theme", &dark_theme, GtkTheme::dark()),
							(
								"high_contrast_gtk_theme",
								"High Contrast GTK Theme",
								&high_contrast_theme,
								GtkTheme::high_contrast(),
							),
						];
						for (name, description, cell, fallback) in choices {
							let property = themes.persistent_choice(name, description, cell, gtk_transformer(), fallback);
							gtk_choices(&property, &installed);
						}
					});
				});
				root.hidden(|h| {
					h.notice("guessing_notice", &guessing_notice);
				});
			})?;

		Ok(Self {
			guess_light_and_dark,
			light_theme,
			dark_theme,
			high_contrast_theme,
			guessing_notice,
			container: Rc::new(container),
		})
	}

	/// Whether the guessing notice has not been shown yet.
	pub fn guessing_notice_pending(&self) -> bool {
		self.guessing_notice.is_pending()
	}
}

/// Installed themes plus the bundled defaults, sorted by name.
fn installed_themes(installed: &GtkThemeSource) -> Vec<GtkTheme> {
	let mut themes: BTreeSet<GtkTheme> = [GtkTheme::light(), GtkTheme::dark(), GtkTheme::high_contrast()].into();
	themes.extend(installed().into_iter().map(GtkTheme));
	themes.into_iter().collect()
}

fn gtk_transformer() -> Transformer<Option<GtkTheme>, String> {
	Transformer::new(
		|name: &String| Some(name.trim()).filter(|n| !n.is_empty()).map(|n| GtkTheme(n.to_string())),
		|theme: &Option<GtkTheme>| theme.as_ref().map(|t| t.0.clone()).unwrap_or_default(),
	)
}

fn gtk_choices(property: &PersistentChoiceProperty<GtkTheme>, installed: &GtkThemeSource) {
	let installed = Rc::clone(installed);
	property
		.choices_from(move || installed_themes(&installed))
		.render_with(|theme| theme.name().to_string());
}

impl SettingsHandle for GtkSettings {
	fn container(&self) -> Rc<SettingsContainer> {
		Rc::clone(&self.container)
	}
}
