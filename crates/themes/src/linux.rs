//! Choice of theme monitoring backend on Linux.

use std::rc::Rc;

use strum_macros::{Display, EnumString};
use umbra_settings::{
	AnyProperty, Observable, OneTimeNotice, PropertyValue, Result, SettingsContainer, SettingsHandle, Transformer, ValueProperty,
	effective,
};

use crate::platform::{NoticeSink, PlatformInfo};

/// Identifier of the advanced Linux settings container.
pub const ADVANCED_LINUX_SETTINGS: &str = "advanced_linux_settings";

const GUESSED_IMPLEMENTATION_NOTICE: &str = "The theme monitoring backend was guessed. \
	Select one that works for your desktop in the advanced settings.";

/// Backend that watches the desktop for theme changes.
///
/// Persisted by variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ImplementationType {
	/// GTK through xsettings.
	GtkXsettings,
	/// GNOME before 42, through gsettings.
	GtkGsettings,
	/// The XDG desktop portal.
	XdgDesktop,
}

impl ImplementationType {
	/// Label shown in the settings UI.
	pub fn label(self) -> &'static str {
		match self {
			Self::GtkXsettings => "GTK (xsettings)",
			Self::GtkGsettings => "GTK-Gnome v.<42 (gsettings)",
			Self::XdgDesktop => "Xdg-Desktop",
		}
	}

	/// Whether the backend needs the native GTK bridge.
	pub fn needs_gtk_library(self) -> bool {
		matches!(self, Self::GtkXsettings | Self::GtkGsettings)
	}

	/// Best backend for `platform`.
	pub fn guess(platform: &PlatformInfo) -> Self {
		if platform.gnome {
			Self::GtkGsettings
		} else if platform.gtk {
			Self::GtkXsettings
		} else {
			Self::XdgDesktop
		}
	}

	/// Backends offered on `platform`. Overriding GTK detection offers the
	/// GTK backends regardless.
	pub fn supported(platform: &PlatformInfo, override_gtk: bool) -> Vec<Self> {
		let mut out = Vec::with_capacity(3);
		if platform.gtk || override_gtk {
			out.push(Self::GtkXsettings);
		}
		if platform.gnome || override_gtk {
			out.push(Self::GtkGsettings);
		}
		out.push(Self::XdgDesktop);
		out
	}
}

impl PropertyValue for ImplementationType {}

/// Backend selection and the GTK detection override.
pub struct AdvancedLinuxSettings {
	/// Selected backend.
	pub implementation: Observable<ImplementationType>,
	/// Offer GTK backends even where GTK was not detected.
	pub override_gtk_detection: Observable<bool>,
	platform: PlatformInfo,
	guessed_notice: OneTimeNotice,
	container: Rc<SettingsContainer>,
}

impl AdvancedLinuxSettings {
	/// Declares the advanced settings for `platform`. Unless GTK detection is
	/// overridden, a notice about the guessed backend goes to `sink` after
	/// the first load.
	pub fn new(platform: PlatformInfo, sink: NoticeSink) -> Result<Self> {
		let guessed = ImplementationType::guess(&platform);
		let implementation = Observable::new(guessed);
		let override_gtk_detection = Observable::new(false);
		let guessed_notice = OneTimeNotice::new();

		let mut override_property: Option<Rc<dyn AnyProperty>> = None;
		let (notice, overriding) = (guessed_notice.clone(), override_gtk_detection.clone());
		let container = SettingsContainer::builder(ADVANCED_LINUX_SETTINGS)
			.on_settings_loaded(move || {
				if !overriding.get() {
					notice.fire(|| sink.notify(GUESSED_IMPLEMENTATION_NOTICE));
				}
			})
			.build(|root| {
				root.group("Advanced", |g| {
					let overriding = override_gtk_detection.clone();
					g.persistent_choice(
						"implementation_type",
						"Implementation Type",
						&implementation,
						implementation_transformer(),
						guessed,
					)
					.choices_from(move || ImplementationType::supported(&platform, overriding.get()))
					.render_with(|t| t.label().to_string());

					if !platform.gtk {
						let property = g.persistent_bool(
							"override_gtk_detection",
							"Override Gtk detection (Enforce availability of Gtk implementations)",
							&override_gtk_detection,
						);
						let gtk_free = g.satisfies("implementation_type", |t: &ImplementationType| {
							!t.needs_gtk_library()
						});
						property.set_active_condition(gtk_free);
						override_property = Some(property as Rc<dyn AnyProperty>);
					}
				});
				root.hidden(|h| {
					h.notice("guessed_implementation_notice", &guessed_notice);
				});
			})?;

		// Commit toggles immediately so the offered backends update live.
		if let Some(erased) = override_property {
			let base = effective::<bool>(&erased)?;
			let weak = Rc::downgrade(&base);
			base.preview_cell().register_listener(move |_, staged| {
				if let Some(base) = weak.upgrade() {
					base.set_value(*staged);
				}
			});
		}

		Ok(Self {
			implementation,
			override_gtk_detection,
			platform,
			guessed_notice,
			container: Rc::new(container),
		})
	}

	/// The selected backend, or the XDG portal if it needs a GTK bridge that
	/// did not load.
	pub fn effective_implementation(&self) -> ImplementationType {
		let selected = self.implementation.get();
		if selected.needs_gtk_library() && !self.platform.gtk_library_loaded {
			ImplementationType::XdgDesktop
		} else {
			selected
		}
	}

	/// Whether the guessed-backend notice has not been shown yet.
	pub fn guessed_notice_pending(&self) -> bool {
		self.guessed_notice.is_pending()
	}
}

fn implementation_transformer() -> Transformer<Option<ImplementationType>, String> {
	Transformer::new(
		|raw: &String| raw.parse::<ImplementationType>().ok(),
		|value: &Option<ImplementationType>| value.map(|t| t.to_string()).unwrap_or_default(),
	)
}

impl SettingsHandle for AdvancedLinuxSettings {
	fn container(&self) -> Rc<SettingsContainer> {
		Rc::clone(&self.container)
	}
}
