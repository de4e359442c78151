//! Change-notification primitive.
//!
//! [`Observable<T>`] is a shared, single-threaded value cell. Clones are
//! handles onto the same slot, so a settings container can keep one handle
//! for its own reads while a property holds another for the editing UI.
//!
//! # Semantics
//!
//! - [`Observable::set`] notifies only when the new value differs from the
//!   stored one, calling every listener with `(old, new)` in registration
//!   order.
//! - [`Observable::register_listener`] replays the current value to the new
//!   listener as `(current, current)` before returning.
//! - Listeners are not deduplicated. Registering the same closure twice
//!   yields two calls per change.
//! - Notification is synchronous and depth-first. Listeners may set other
//!   cells, register listeners, or set the cell that notified them; nesting
//!   beyond [`MAX_NOTIFY_DEPTH`] is dropped with a warning.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;


/// Deepest nesting of notifications on a single cell before further
/// notifications are dropped.
pub const MAX_NOTIFY_DEPTH: u32 = 64;

/// Shared change listener receiving `(old, new)`.
pub type Listener<T> = Rc<dyn Fn(&T, &T)>;

/// Handle returned by listener registration, used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Inner<T> {
	value: RefCell<T>,
	listeners: RefCell<Vec<(ListenerId, Listener<T>)>>,
	next_id: Cell<u64>,
	depth: Cell<u32>,
}

/// Shared value cell with ordered change listeners.
pub struct Observable<T> {
	inner: Rc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observable")
			.field("value", &*self.inner.value.borrow())
			.field("listeners", &self.inner.listeners.borrow().len())
			.finish()
	}
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
	/// Creates a cell holding `value` with no listeners.
	pub fn new(value: T) -> Self {
		Self {
			inner: Rc::new(Inner {
				value: RefCell::new(value),
				listeners: RefCell::new(Vec::new()),
				next_id: Cell::new(0),
				depth: Cell::new(0),
			}),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T {
		self.inner.value.borrow().clone()
	}

	/// Runs `f` against the current value without cloning it.
	///
	/// `f` must not set this cell.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.inner.value.borrow())
	}

	/// Stores `value`, notifying listeners if it differs from the current one.
	///
	/// Returns whether the stored value changed.
	pub fn set(&self, value: T) -> bool {
		let old = {
			let mut slot = self.inner.value.borrow_mut();
			if *slot == value {
				return false;
			}
			std::mem::replace(&mut *slot, value.clone())
		};
		self.notify(&old, &value);
		true
	}

	/// Appends a listener and immediately replays the current value to it.
	pub fn register_listener(&self, listener: impl Fn(&T, &T) + 'static) -> ListenerId {
		self.register_shared(Rc::new(listener))
	}

	/// Appends an already shared listener and replays the current value to it.
	pub fn register_shared(&self, listener: Listener<T>) -> ListenerId {
		let id = ListenerId(self.inner.next_id.get());
		self.inner.next_id.set(id.0 + 1);
		self.inner
			.listeners
			.borrow_mut()
			.push((id, Rc::clone(&listener)));

		let current = self.get();
		listener(&current, &current);
		id
	}

	/// Removes a listener. Returns `false` if it was not registered.
	pub fn remove_listener(&self, id: ListenerId) -> bool {
		let mut listeners = self.inner.listeners.borrow_mut();
		let before = listeners.len();
		listeners.retain(|(lid, _)| *lid != id);
		listeners.len() != before
	}

	/// Removes every listener.
	pub fn clear_listeners(&self) {
		self.inner.listeners.borrow_mut().clear();
	}

	/// Number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.inner.listeners.borrow().len()
	}

	/// Whether both handles point at the same cell.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	fn notify(&self, old: &T, new: &T) {
		let depth = self.inner.depth.get();
		if depth >= MAX_NOTIFY_DEPTH {
			tracing::warn!(
				domain = "settings",
				depth,
				"listener recursion limit reached; dropping notification",
			);
			return;
		}

		let listeners: Vec<Listener<T>> = self
			.inner
			.listeners
			.borrow()
			.iter()
			.map(|(_, l)| Rc::clone(l))
			.collect();

		let _guard = DepthGuard::enter(&self.inner.depth);
		for listener in listeners {
			listener(old, new);
		}
	}
}

struct DepthGuard<'a> {
	depth: &'a Cell<u32>,
}

impl<'a> DepthGuard<'a> {
	fn enter(depth: &'a Cell<u32>) -> Self {
		depth.set(depth.get() + 1);
		Self { depth }
	}
}

impl Drop for DepthGuard<'_> {
	fn drop(&mut self) {
		self.depth.set(self.depth.get().saturating_sub(1));
	}
}
