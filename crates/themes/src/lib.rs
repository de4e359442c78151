//! Settings containers for automatic light/dark theme switching.
//!
//! - [`general`] - IDE theme and editor scheme per mode
//! - [`gtk`] - GTK themes per mode, on GTK desktops
//! - [`linux`] - Theme monitoring backend, on Linux
//! - [`platform`] - Host facts the containers are gated on
//!
//! [`ThemeProviders::registry`] wires every container that applies to the host into one
//! [`SettingsRegistry`].

use std::rc::Rc;

use umbra_settings::{Result, SettingsProvider, SettingsRegistry, SingletonProvider};

pub mod general;
pub mod gtk;
pub mod linux;
pub mod platform;

pub use general::{GeneralThemeSettings, Theme, ThemeSource};
pub use gtk::{GtkSettings, GtkTheme, GtkThemeSource};
pub use linux::{AdvancedLinuxSettings, ImplementationType};
pub use platform::{NoticeSink, PlatformInfo};

/// Installed themes reported by the host.
#[derive(Clone)]
pub struct ThemeCatalog {
	/// Installed IDE themes.
	pub ide_themes: ThemeSource,
	/// Installed editor color schemes.
	pub editor_schemes: ThemeSource,
	/// Names of installed GTK themes.
	pub gtk_themes: GtkThemeSource,
}

impl Default for ThemeCatalog {
	/// Nothing installed beyond the bundled defaults.
	fn default() -> Self {
		Self {
			ide_themes: Rc::new(Vec::<Theme>::new),
			editor_schemes: Rc::new(Vec::<Theme>::new),
			gtk_themes: Rc::new(Vec::<String>::new),
		}
	}
}

/// Lazily constructed providers for every theme container.
pub struct ThemeProviders {
	/// General theme settings, always enabled.
	pub general: SingletonProvider<GeneralThemeSettings>,
	/// GTK theme settings, enabled on GTK desktops with the bridge loaded.
	pub gtk: SingletonProvider<GtkSettings>,
	/// Advanced Linux settings, enabled on Linux.
	pub linux: SingletonProvider<AdvancedLinuxSettings>,
}

impl ThemeProviders {
	/// Creates the providers. Nothing is constructed until first use.
	pub fn new(platform: PlatformInfo, catalog: ThemeCatalog, sink: NoticeSink) -> Self {
		let ThemeCatalog {
			ide_themes,
			editor_schemes,
			gtk_themes,
		} = catalog;
		let gtk_sink = sink.clone();
		Self {
			general: SingletonProvider::new(true, move || {
				GeneralThemeSettings::new(Rc::clone(&ide_themes), Rc::clone(&editor_schemes))
			}),
			gtk: SingletonProvider::new(platform.gtk_available(), move || {
				GtkSettings::new(Rc::clone(&gtk_themes), gtk_sink.clone())
			}),
			linux: SingletonProvider::new(platform.linux, move || {
				AdvancedLinuxSettings::new(platform, sink.clone())
			}),
		}
	}

	/// Providers in registration order.
	pub fn all(&self) -> [&dyn SettingsProvider; 3] {
		[&self.general, &self.gtk, &self.linux]
	}

	/// Registers every enabled container.
	pub fn registry(&self) -> Result<SettingsRegistry> {
		let registry = SettingsRegistry::from_providers(self.all())?;
		tracing::debug!(
			domain = "themes",
			containers = registry.containers().len(),
			"theme settings registered",
		);
		Ok(registry)
	}
}
