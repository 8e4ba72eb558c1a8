//! External authentication signal.
//!
//! `SessionState` is the router's read-side view of the application's
//! authentication service: an `is_authenticated`/`is_loading` signal pair
//! plus an injected logout action. The service owns token issuance and
//! validation; the router only observes the booleans. Clones share state,
//! so the handle can be constructor-injected into every consumer without
//! any ambient global lookup.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive::{EventChannel, Signal, Subscription};

/// Shared handle on the external authentication state.
#[derive(Clone)]
pub struct SessionState {
	is_authenticated: Signal<bool>,
	is_loading: Signal<bool>,
	changes: EventChannel<()>,
	on_logout: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl std::fmt::Debug for SessionState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionState")
			.field("is_authenticated", &self.is_authenticated.get())
			.field("is_loading", &self.is_loading.get())
			.finish()
	}
}

impl Default for SessionState {
	fn default() -> Self {
		Self::new()
	}
}

impl SessionState {
	/// Creates a session handle in its pre-resolution state:
	/// unauthenticated, with the loading flag raised until the
	/// authentication service reports in.
	pub fn new() -> Self {
		Self {
			is_authenticated: Signal::new(false),
			is_loading: Signal::new(true),
			changes: EventChannel::new(),
			on_logout: Rc::new(RefCell::new(None)),
		}
	}

	/// Creates a session handle whose initialization already settled.
	/// Mostly useful in tests.
	pub fn resolved(authenticated: bool) -> Self {
		let session = Self::new();
		session.is_authenticated.set(authenticated);
		session.is_loading.set(false);
		session
	}

	/// Whether the user is authenticated.
	pub fn is_authenticated(&self) -> bool {
		self.is_authenticated.get()
	}

	/// Whether the authentication service is still initializing.
	pub fn is_loading(&self) -> bool {
		self.is_loading.get()
	}

	/// The authentication flag as a subscribable signal.
	pub fn is_authenticated_signal(&self) -> Signal<bool> {
		self.is_authenticated.clone()
	}

	/// The loading flag as a subscribable signal.
	pub fn is_loading_signal(&self) -> Signal<bool> {
		self.is_loading.clone()
	}

	/// Records a new authentication verdict and notifies observers.
	pub fn set_authenticated(&self, authenticated: bool) {
		self.is_authenticated.set(authenticated);
		self.changes.emit(&());
	}

	/// Records the service's loading state and notifies observers.
	pub fn set_loading(&self, loading: bool) {
		self.is_loading.set(loading);
		self.changes.emit(&());
	}

	/// Injects the external logout action invoked by
	/// [`SessionState::logout`].
	pub fn on_logout<F: Fn() + 'static>(&self, action: F) {
		*self.on_logout.borrow_mut() = Some(Rc::new(action));
	}

	/// Invokes the injected logout action and drops the authenticated
	/// flag. The gate's redirect-to-login rule picks the change up on its
	/// next evaluation.
	pub fn logout(&self) {
		let action = self.on_logout.borrow().clone();
		if let Some(action) = action {
			action();
		}
		self.set_authenticated(false);
	}

	/// Registers an observer fired on every auth-state change.
	pub fn subscribe<F: Fn() + 'static>(&self, observer: F) -> Subscription {
		self.changes.subscribe(move |_| observer())
	}
}
