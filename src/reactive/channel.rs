//! Publish/subscribe channel with explicit observer lists.
//!
//! This is the notification backbone of the router: route-change events,
//! auth-state changes, and signal updates all flow through an
//! [`EventChannel`]. Subscribing returns a [`Subscription`] disposer;
//! dropping it (or calling [`Subscription::unsubscribe`]) removes the
//! listener, so listener registration and removal stay balanced across
//! repeated mount/unmount cycles.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A registered listener callback.
type Listener<T> = Rc<dyn Fn(&T)>;

struct ChannelInner<T> {
	next_id: u64,
	listeners: Vec<(u64, Listener<T>)>,
}

impl<T> ChannelInner<T> {
	fn remove(&mut self, id: u64) {
		self.listeners.retain(|(listener_id, _)| *listener_id != id);
	}
}

/// A single-threaded publish/subscribe channel.
///
/// Clones share the same listener list, so a channel can be handed to both
/// the publishing component and its consumers.
pub struct EventChannel<T> {
	inner: Rc<RefCell<ChannelInner<T>>>,
}

impl<T> Clone for EventChannel<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: 'static> Default for EventChannel<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: 'static> EventChannel<T> {
	/// Creates a channel with no listeners.
	pub fn new() -> Self {
		Self {
			inner: Rc::new(RefCell::new(ChannelInner {
				next_id: 0,
				listeners: Vec::new(),
			})),
		}
	}

	/// Registers a listener and returns its disposer.
	///
	/// The listener is removed when the returned [`Subscription`] is dropped
	/// or explicitly unsubscribed.
	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		let id = {
			let mut inner = self.inner.borrow_mut();
			let id = inner.next_id;
			inner.next_id += 1;
			inner.listeners.push((id, Rc::new(listener)));
			id
		};

		let weak: Weak<RefCell<ChannelInner<T>>> = Rc::downgrade(&self.inner);
		Subscription::new(move || {
			if let Some(inner) = weak.upgrade() {
				inner.borrow_mut().remove(id);
			}
		})
	}

	/// Delivers `event` to every registered listener, in subscription order.
	///
	/// The listener list is snapshotted before dispatch so a listener may
	/// subscribe or unsubscribe during delivery without invalidating the
	/// iteration.
	pub fn emit(&self, event: &T) {
		let listeners: Vec<Listener<T>> = self
			.inner
			.borrow()
			.listeners
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();

		for listener in listeners {
			listener(event);
		}
	}

	/// Returns the number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.inner.borrow().listeners.len()
	}

	/// Removes every listener at once.
	///
	/// Outstanding [`Subscription`] disposers become no-ops.
	pub fn clear(&self) {
		self.inner.borrow_mut().listeners.clear();
	}
}

impl<T> std::fmt::Debug for EventChannel<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventChannel")
			.field("listeners", &self.inner.borrow().listeners.len())
			.finish()
	}
}

/// Disposer handle for a channel listener.
///
/// Unsubscribes on drop. Use [`Subscription::forget`] to keep the listener
/// registered for the remaining lifetime of the channel.
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	fn new<F: FnOnce() + 'static>(cancel: F) -> Self {
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// Removes the listener immediately.
	pub fn unsubscribe(mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}

	/// Detaches the disposer, leaving the listener registered permanently.
	pub fn forget(mut self) {
		self.cancel.take();
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.cancel.is_some())
			.finish()
	}
}
