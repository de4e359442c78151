//! Fire-once notices persisted alongside settings.
//!
//! A [`OneTimeNotice`] remembers whether its action already ran. Declare its
//! state with [`GroupBuilder::notice`](crate::group::GroupBuilder::notice),
//! usually inside a hidden group, so the answer survives restarts.

use strum_macros::{Display, EnumString};

use crate::observable::Observable;
use crate::value::PropertyValue;

/// Persisted state of a [`OneTimeNotice`].
///
/// Parses the legacy boolean encoding too: `false` is pending, `true` fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum NoticeState {
	/// The action has not run yet.
	#[default]
	#[strum(to_string = "pending", serialize = "false")]
	Pending,
	/// The action ran.
	#[strum(to_string = "fired", serialize = "true")]
	Fired,
}

impl PropertyValue for NoticeState {}

/// An action that runs at most once across restarts.
#[derive(Debug, Clone, Default)]
pub struct OneTimeNotice {
	state: Observable<NoticeState>,
}

impl OneTimeNotice {
	/// Creates a pending notice.
	pub fn new() -> Self {
		Self::default()
	}

	/// The state cell.
	pub fn state(&self) -> &Observable<NoticeState> {
		&self.state
	}

	/// Whether the action has not run yet.
	pub fn is_pending(&self) -> bool {
		self.state.get() == NoticeState::Pending
	}

	/// Runs `action` unless it already ran. Returns whether it ran.
	pub fn fire(&self, action: impl FnOnce()) -> bool {
		if !self.is_pending() {
			return false;
		}
		self.state.set(NoticeState::Fired);
		action();
		true
	}

	/// Makes the notice pending again.
	pub fn reset(&self) {
		self.state.set(NoticeState::Pending);
	}
}
