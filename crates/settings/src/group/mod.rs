//! Hierarchical grouping of properties.
//!
//! A [`SettingsGroup`] holds ordered properties and ordered subgroups. Its
//! path is the `:`-joined identifiers of itself and its ancestors; together
//! with a property name it forms the property's persisted identity.
//!
//! Groups are declared through [`GroupBuilder`], which also scopes
//! enablement conditions and name-based condition lookups.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Result, SettingsError};
use crate::property::AnyProperty;

mod builder;

#[cfg(test)]
mod tests;

pub use builder::GroupBuilder;

/// Separator between identifiers in a group path.
pub const PATH_SEPARATOR: &str = ":";

struct GroupInner {
	identifier: String,
	title: Option<String>,
	parent: Option<Weak<GroupInner>>,
	properties: RefCell<Vec<Rc<dyn AnyProperty>>>,
	subgroups: RefCell<Vec<SettingsGroup>>,
	next_synthetic: Cell<usize>,
}

/// Shared handle on a node of the settings tree.
#[derive(Clone)]
pub struct SettingsGroup {
	inner: Rc<GroupInner>,
}

/// Non-owning handle held by properties and lazy conditions.
#[derive(Clone, Default)]
pub struct WeakGroup(Weak<GroupInner>);

impl WeakGroup {
	/// Upgrades to a strong handle if the group is alive.
	pub fn upgrade(&self) -> Option<SettingsGroup> {
		self.0.upgrade().map(|inner| SettingsGroup { inner })
	}
}

impl SettingsGroup {
	fn with_parent(identifier: String, title: Option<String>, parent: Option<&SettingsGroup>) -> Self {
		Self {
			inner: Rc::new(GroupInner {
				identifier,
				title,
				parent: parent.map(|p| Rc::downgrade(&p.inner)),
				properties: RefCell::new(Vec::new()),
				subgroups: RefCell::new(Vec::new()),
				next_synthetic: Cell::new(0),
			}),
		}
	}

	/// Creates a parentless group. Its path is `identifier`.
	pub fn detached(identifier: impl Into<String>) -> Self {
		Self::with_parent(identifier.into(), None, None)
	}

	/// Appends a subgroup. An empty `name` gets a synthetic `group_<n>`
	/// identifier from a per-parent counter and no title.
	pub(crate) fn add_subgroup(&self, name: &str) -> SettingsGroup {
		let (identifier, title) = if name.is_empty() {
			let n = self.inner.next_synthetic.get();
			self.inner.next_synthetic.set(n + 1);
			(format!("group_{n}"), None)
		} else {
			(name.to_string(), Some(name.to_string()))
		};
		let child = Self::with_parent(identifier, title, Some(self));
		self.inner.subgroups.borrow_mut().push(child.clone());
		child
	}

	pub(crate) fn add_property(&self, property: Rc<dyn AnyProperty>) {
		self.inner.properties.borrow_mut().push(property);
	}

	/// Identifier of this group within its parent.
	pub fn identifier(&self) -> &str {
		&self.inner.identifier
	}

	/// Display title. `None` for unnamed groups, which render inline.
	pub fn title(&self) -> Option<&str> {
		self.inner.title.as_deref()
	}

	/// Parent group, if any.
	pub fn parent(&self) -> Option<SettingsGroup> {
		self.inner
			.parent
			.as_ref()
			.and_then(Weak::upgrade)
			.map(|inner| SettingsGroup { inner })
	}

	/// `:`-joined identifiers from the root to this group.
	pub fn path(&self) -> String {
		let mut segments = vec![self.inner.identifier.clone()];
		let mut current = self.parent();
		while let Some(group) = current {
			segments.push(group.inner.identifier.clone());
			current = group.parent();
		}
		segments.reverse();
		segments.join(PATH_SEPARATOR)
	}

	/// Properties declared directly in this group.
	pub fn properties(&self) -> Vec<Rc<dyn AnyProperty>> {
		self.inner.properties.borrow().clone()
	}

	/// Direct subgroups in declaration order.
	pub fn subgroups(&self) -> Vec<SettingsGroup> {
		self.inner.subgroups.borrow().clone()
	}

	/// Own properties, then each subgroup's, depth-first.
	pub fn all_properties(&self) -> Vec<Rc<dyn AnyProperty>> {
		let mut out = self.properties();
		for group in self.subgroups() {
			out.extend(group.all_properties());
		}
		out
	}

	/// Whether this group declares no properties of its own.
	pub fn is_empty(&self) -> bool {
		self.inner.properties.borrow().is_empty()
	}

	/// Whether neither this group nor any descendant declares a property.
	pub fn is_totally_empty(&self) -> bool {
		self.is_empty() && self.subgroups().iter().all(SettingsGroup::is_totally_empty)
	}

	/// Finds a property by name in this subtree, then in each ancestor's.
	pub fn find(&self, name: &str) -> Result<Rc<dyn AnyProperty>> {
		let mut known = Vec::new();
		let mut scope = Some(self.clone());
		while let Some(group) = scope {
			let properties = group.all_properties();
			if let Some(found) = properties.iter().find(|p| p.name() == name) {
				return Ok(Rc::clone(found));
			}
			known.extend(properties.iter().map(|p| p.name().to_string()));
			scope = group.parent();
		}
		Err(SettingsError::PropertyNotFound {
			name: name.to_string(),
			suggestion: suggest_name(name, known.iter().map(String::as_str)),
		})
	}

	/// Non-owning handle on this group.
	pub fn downgrade(&self) -> WeakGroup {
		WeakGroup(Rc::downgrade(&self.inner))
	}

	/// Whether both handles point at the same group.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for SettingsGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SettingsGroup")
			.field("path", &self.path())
			.field("properties", &self.inner.properties.borrow().len())
			.field("subgroups", &self.inner.subgroups.borrow().len())
			.finish()
	}
}

/// Suggests a similar property name using fuzzy matching.
pub(crate) fn suggest_name<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
	candidates
		.into_iter()
		.min_by_key(|c| strsim::levenshtein(name, c))
		.filter(|c| strsim::levenshtein(name, c) <= 3)
		.map(str::to_string)
}
