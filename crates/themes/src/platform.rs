//! Host facts the theme containers are gated on.

use std::fmt;
use std::rc::Rc;

/// What native detection found about the desktop environment.
///
/// Detection itself lives with the host; containers only read these flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformInfo {
	/// Running on Linux.
	pub linux: bool,
	/// A GTK based desktop was detected.
	pub gtk: bool,
	/// The desktop is GNOME.
	pub gnome: bool,
	/// The native GTK bridge loaded successfully.
	pub gtk_library_loaded: bool,
}

impl PlatformInfo {
	/// A GNOME desktop with the GTK bridge loaded.
	pub fn gnome() -> Self {
		Self {
			linux: true,
			gtk: true,
			gnome: true,
			gtk_library_loaded: true,
		}
	}

	/// A Linux desktop with neither GTK nor GNOME.
	pub fn plain_linux() -> Self {
		Self {
			linux: true,
			..Self::default()
		}
	}

	/// Whether GTK settings can be offered at all.
	pub fn gtk_available(&self) -> bool {
		self.gtk && self.gtk_library_loaded
	}
}

/// Surfaces a user-facing notice.
#[derive(Clone)]
pub struct NoticeSink(Rc<dyn Fn(&str)>);

impl NoticeSink {
	/// Wraps a callback.
	pub fn new(sink: impl Fn(&str) + 'static) -> Self {
		Self(Rc::new(sink))
	}

	/// Delivers `message`.
	pub fn notify(&self, message: &str) {
		(self.0)(message)
	}
}

impl Default for NoticeSink {
	/// Logs notices at info level.
	fn default() -> Self {
		Self::new(|message| tracing::info!(domain = "themes", "{message}"))
	}
}

impl fmt::Debug for NoticeSink {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("NoticeSink")
	}
}
