//! Authentication gate.
//!
//! A state machine evaluated on every route change and every auth-state
//! change. It decides whether the current combination of route and
//! authentication state calls for a redirect to the login view, or for
//! resuming a deferred destination after login, and whether that redirect
//! must be a full document navigation (pre-hydration, where client-side
//! view machinery has not finished initializing and an in-memory
//! navigation would flash a blank screen) or an ordinary in-memory
//! replace-navigation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error_log;
use crate::reactive::Subscription;
use crate::router::{NavigateOptions, PathPattern, RouterController, history};

use super::session::SessionState;

/// Lifecycle phase of the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
	/// Before the application has hydrated from its server-rendered
	/// shell.
	InitialLoad,
	/// After hydration. The transition happens exactly once and never
	/// reverses.
	Hydrated,
}

/// The authentication gate. Generic over the view-module type only
/// because it holds the controller handle; the gate itself never touches
/// views.
pub struct AuthGate<V> {
	controller: Rc<RouterController<V>>,
	session: SessionState,
	login_pattern: PathPattern,
	phase: Cell<GatePhase>,
	pending_redirect: RefCell<Option<String>>,
	redirect_in_flight: RefCell<Option<String>>,
	subscriptions: RefCell<Vec<Subscription>>,
}

impl<V> std::fmt::Debug for AuthGate<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthGate")
			.field("phase", &self.phase.get())
			.field("login", &self.login_pattern)
			.field("pending_redirect", &*self.pending_redirect.borrow())
			.finish()
	}
}

impl<V: 'static> AuthGate<V> {
	/// Creates a gate over the given controller and session handle.
	/// `login_path` names the dedicated login route, which is always
	/// exempt from the authentication requirement.
	pub fn new(
		controller: Rc<RouterController<V>>,
		session: SessionState,
		login_path: &str,
	) -> Rc<Self> {
		Rc::new(Self {
			controller,
			session,
			login_pattern: PathPattern::new(login_path),
			phase: Cell::new(GatePhase::InitialLoad),
			pending_redirect: RefCell::new(None),
			redirect_in_flight: RefCell::new(None),
			subscriptions: RefCell::new(Vec::new()),
		})
	}

	/// Subscribes the gate to route changes and auth-state changes, then
	/// evaluates the current combination once. Re-attaching replaces the
	/// previous subscriptions.
	pub fn attach(self: &Rc<Self>) {
		let mut subscriptions = Vec::with_capacity(2);

		let weak = Rc::downgrade(self);
		subscriptions.push(self.controller.subscribe(move |_event| {
			if let Some(gate) = weak.upgrade() {
				// A committed navigation supersedes any redirect the gate
				// still considered in flight.
				gate.redirect_in_flight.borrow_mut().take();
				gate.evaluate();
			}
		}));

		let weak = Rc::downgrade(self);
		subscriptions.push(self.session.subscribe(move || {
			if let Some(gate) = weak.upgrade() {
				gate.evaluate();
			}
		}));

		*self.subscriptions.borrow_mut() = subscriptions;
		self.evaluate();
	}

	/// Drops the gate's subscriptions. Safe to call multiple times.
	pub fn detach(&self) {
		self.subscriptions.borrow_mut().clear();
	}

	/// Marks the shell as hydrated. Called once, on mount; the transition
	/// never reverses. Triggers a re-evaluation, since the redirect
	/// strategy depends on the phase.
	pub fn mark_hydrated(&self) {
		if self.phase.get() == GatePhase::InitialLoad {
			self.phase.set(GatePhase::Hydrated);
			self.evaluate();
		}
	}

	/// The current lifecycle phase.
	pub fn phase(&self) -> GatePhase {
		self.phase.get()
	}

	/// The recorded destination to resume after login, if any.
	pub fn pending_redirect(&self) -> Option<String> {
		self.pending_redirect.borrow().clone()
	}

	/// Whether `path` requires authentication: the dedicated login route
	/// never does; every other path takes its registered definition's
	/// flag, and unknown routes are protected by default (fail closed).
	pub fn requires_auth(&self, path: &str) -> bool {
		if self.is_login(path) {
			return false;
		}
		self.controller
			.find_route(path)
			.map(|definition| definition.auth_required())
			.unwrap_or(true)
	}

	/// Evaluates the redirect rules against the current route and auth
	/// state. Idempotent: repeated evaluation with no state change does
	/// not re-trigger a redirect already in flight.
	pub fn evaluate(&self) {
		let route = self.controller.current_route();
		let path = route.path().to_string();

		// Arrival and suppression handling for an in-flight redirect.
		let arrived = {
			let in_flight = self.redirect_in_flight.borrow();
			match in_flight.as_deref() {
				Some(target) if target == path => true,
				Some(_) => return,
				None => false,
			}
		};
		if arrived {
			self.redirect_in_flight.borrow_mut().take();
		}

		let authenticated = self.session.is_authenticated();
		let loading = self.session.is_loading();

		// Redirect-to-login: an unauthenticated, settled session on a
		// protected route is bounced to the login view.
		if self.requires_auth(&path) && !authenticated && !loading {
			if !self.is_login(&path) {
				*self.pending_redirect.borrow_mut() = Some(path.clone());
			}

			let login = self.login_pattern.as_str().to_string();
			*self.redirect_in_flight.borrow_mut() = Some(login.clone());

			// Pre-hydration, client-side view machinery is not ready; and
			// the root route is served as the bare shell when
			// unauthenticated. Both cases take the hard load.
			if self.phase.get() == GatePhase::InitialLoad || path == "/" {
				history::assign(&login);
			} else {
				self.redirect(&login);
			}
			return;
		}

		// Redirect-after-login: landing authenticated on the login route
		// resumes the deferred destination.
		if authenticated && self.is_login(&path) {
			let target = self
				.pending_redirect
				.borrow_mut()
				.take()
				.unwrap_or_else(|| "/".to_string());

			*self.redirect_in_flight.borrow_mut() = Some(target.clone());

			if self.phase.get() == GatePhase::InitialLoad {
				history::assign(&target);
			} else {
				self.redirect(&target);
			}
		}
	}

	fn is_login(&self, path: &str) -> bool {
		self.login_pattern.matches(path).is_some()
	}

	fn redirect(&self, to: &str) {
		if let Err(error) = self.controller.navigate(to, NavigateOptions::replace()) {
			error_log!("auth redirect to {to} failed: {error}");
		}
	}
}

impl<V> Drop for AuthGate<V> {
	fn drop(&mut self) {
		self.subscriptions.borrow_mut().clear();
	}
}
