//! Error types for declaring, wiring and restoring settings.

use thiserror::Error;

use crate::property::PropertyId;

/// Errors raised while building containers, wiring conditions or editing
/// properties through the erased rendering interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
	/// Two properties resolved to the same `(group path, name)` identity.
	#[error("property {id} is already defined")]
	DuplicateProperty {
		/// The clashing identity.
		id: PropertyId,
	},

	/// A named lookup found no property in the searched scopes.
	#[error("property '{name}' not found{}", suggestion_suffix(.suggestion))]
	PropertyNotFound {
		/// The requested property name.
		name: String,
		/// Closest known name, if one is near enough to be a likely typo.
		suggestion: Option<String>,
	},

	/// The effective value of a property is not of the requested type.
	#[error("value {value} of property '{property}' isn't of type {expected}")]
	TypeMismatch {
		/// Name of the property that was inspected.
		property: String,
		/// Debug rendering of the offending value.
		value: String,
		/// Name of the requested type.
		expected: &'static str,
	},

	/// Attempted to assign a condition whose value is not externally settable.
	#[error("{kind} condition cannot be assigned")]
	ImmutableCondition {
		/// The condition variant (`constant`, `linked` or `compound`).
		kind: &'static str,
	},

	/// A choice property's fallback is not offered by its choice provider.
	#[error("fallback {fallback} of choice property '{property}' is not among its choices")]
	FallbackNotInChoices {
		/// Name of the choice property.
		property: String,
		/// Debug rendering of the fallback value.
		fallback: String,
	},

	/// A choice index outside the current choice list was selected.
	#[error("choice {index} out of range for '{property}' ({len} choices)")]
	ChoiceOutOfRange {
		/// Name of the choice property.
		property: String,
		/// The requested index.
		index: usize,
		/// Number of choices offered at the time of the request.
		len: usize,
	},
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
	suggestion
		.as_ref()
		.map(|s| format!(" (did you mean '{s}'?)"))
		.unwrap_or_default()
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
