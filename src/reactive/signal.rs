//! Signal - shared reactive value.
//!
//! `Signal<T>` holds a value behind `Rc<RefCell<T>>` so clones share state,
//! and notifies subscribers through an [`EventChannel`] whenever the value
//! is replaced or updated. Unlike a full fine-grained reactivity runtime
//! there is no implicit dependency tracking: consumers subscribe
//! explicitly and receive a disposer, which keeps the navigation engine
//! free of any ambient global state.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::channel::{EventChannel, Subscription};

/// A reactive value with explicit change subscription.
///
/// ## Cloning
///
/// `Signal<T>` implements `Clone` and shares the value via `Rc<RefCell<T>>`.
/// All clones of the same signal observe the same value and the same
/// subscriber list.
pub struct Signal<T: 'static> {
	value: Rc<RefCell<T>>,
	changes: EventChannel<T>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			value: Rc::clone(&self.value),
			changes: self.changes.clone(),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Creates a new signal with the given initial value.
	pub fn new(value: T) -> Self {
		Self {
			value: Rc::new(RefCell::new(value)),
			changes: EventChannel::new(),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Reads the current value without cloning it.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Replaces the value and notifies subscribers.
	pub fn set(&self, value: T)
	where
		T: Clone,
	{
		*self.value.borrow_mut() = value;
		self.notify();
	}

	/// Updates the value in place and notifies subscribers.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
		T: Clone,
	{
		f(&mut self.value.borrow_mut());
		self.notify();
	}

	/// Registers a change listener; the callback receives the new value.
	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		self.changes.subscribe(listener)
	}

	/// Returns the number of registered change listeners.
	pub fn listener_count(&self) -> usize {
		self.changes.listener_count()
	}

	// Dispatch happens on a snapshot so listeners may read or even set the
	// signal without hitting an outstanding borrow.
	fn notify(&self)
	where
		T: Clone,
	{
		let snapshot = self.value.borrow().clone();
		self.changes.emit(&snapshot);
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("value", &*self.value.borrow())
			.finish()
	}
}
