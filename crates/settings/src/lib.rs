//! Reactive typed settings.
//!
//! Settings are declared once as a tree of groups and properties, edited
//! through a staged preview, and persisted as flat string entries.
//!
//! # Modules
//!
//! - [`observable`] - Single-threaded observable cells with replaying listeners
//! - [`transform`] - Bidirectional conversions and the stock string codecs
//! - [`property`] - Value, transforming, persistent and choice properties
//! - [`condition`] - Observable boolean expressions gating properties
//! - [`group`] - Group hierarchy and the declaration builder
//! - [`container`] - Top-level containers and their providers
//! - [`persist`] - Versioned export and import with forward-compatible stubs
//! - [`notice`] - Persisted fire-once notices
//!
//! # Lifecycle
//!
//! 1. Declare a [`SettingsContainer`] with [`SettingsContainer::builder`].
//!    Duplicate `(group path, name)` identities fail the build.
//! 2. Register it with a [`SettingsRegistry`], which builds every condition.
//! 3. [`SettingsRegistry::import`] applies stored entries and runs each
//!    container's post-load hook; [`SettingsRegistry::export`] writes them
//!    back, including entries no property claimed.
//!
//! Everything here is `!Send`. Listeners run synchronously, depth-first, on
//! the thread that mutates the cell.

pub mod condition;
pub mod container;
pub mod error;
pub mod group;
pub mod notice;
pub mod observable;
pub mod persist;
pub mod property;
pub mod transform;
pub mod value;

pub use condition::{Condition, PropertyLookup};
pub use container::{ContainerBuilder, SettingsContainer, SettingsHandle, SettingsProvider, SingletonProvider};
pub use error::{Result, SettingsError};
pub use group::{GroupBuilder, SettingsGroup};
pub use notice::{NoticeState, OneTimeNotice};
pub use observable::{ListenerId, Observable};
pub use persist::{PersistentEntry, SettingsRegistry, SettingsState};
pub use property::{
	AnyChoice, AnyProperty, ChoiceProperty, PersistentChoiceProperty, PersistentProperty, PersistentValue,
	PropertyId, SimpleProperty, Slot, StubProperty, TransformingProperty, ValueProperty, effective,
};
pub use transform::Transformer;
pub use value::{PropertyValue, SettingValue, ValueKind};
