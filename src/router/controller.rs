//! Router controller.
//!
//! The outward-facing navigation API: a thin façade holding one
//! [`RouteEngine`] instance, re-exposing navigation and the latest parsed
//! route, and re-publishing engine events to consumers. The controller
//! additionally owns the `is_loading` flag: set synchronously the instant
//! a navigation is requested and cleared synchronously the instant the
//! corresponding [`NavigationEvent`] is observed, giving callers a
//! transition indicator without polling.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive::{EventChannel, Signal, Subscription};

use super::engine::{NavigateOptions, NavigationEvent, RouteEngine, RouterError};
use super::route::RouteDefinition;
use super::url::ParsedRoute;

/// The outward-facing navigation API. Wraps a single [`RouteEngine`].
pub struct RouterController<V> {
	engine: Rc<RouteEngine<V>>,
	events: EventChannel<NavigationEvent>,
	loading: Signal<bool>,
	engine_sub: RefCell<Option<Subscription>>,
}

impl<V> std::fmt::Debug for RouterController<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterController")
			.field("engine", &self.engine)
			.field("is_loading", &self.loading.get())
			.finish()
	}
}

impl<V: 'static> RouterController<V> {
	/// Wraps an engine. Call [`RouterController::initialize`] before
	/// navigating.
	pub fn new(engine: Rc<RouteEngine<V>>) -> Rc<Self> {
		let controller = Rc::new(Self {
			engine,
			events: EventChannel::new(),
			loading: Signal::new(false),
			engine_sub: RefCell::new(None),
		});
		controller.attach_to_engine();
		controller
	}

	/// Initializes the wrapped engine (idempotent) and re-establishes the
	/// event relay, which a prior [`RouterController::destroy`] tears down.
	pub fn initialize(self: &Rc<Self>) -> Result<(), RouterError> {
		self.engine.initialize()?;
		self.attach_to_engine();
		Ok(())
	}

	/// Tears down the wrapped engine and its subscriptions. Safe to call
	/// multiple times.
	pub fn destroy(&self) {
		self.engine.destroy();
		self.engine_sub.borrow_mut().take();
	}

	/// Requests a navigation. `is_loading` is raised before the engine
	/// commits and cleared when the resulting event is observed; on error
	/// the flag is lowered again immediately.
	pub fn navigate(&self, to: &str, options: NavigateOptions) -> Result<(), RouterError> {
		self.loading.set(true);
		let result = self.engine.navigate(to, options);
		if result.is_err() {
			self.loading.set(false);
		}
		result
	}

	/// Traverses one history entry back. The loading flag clears when the
	/// traversal's navigation event arrives; traversal at the edge of the
	/// history stack produces no event.
	pub fn back(&self) {
		self.loading.set(true);
		self.engine.back();
	}

	/// Forward counterpart of [`RouterController::back`].
	pub fn forward(&self) {
		self.loading.set(true);
		self.engine.forward();
	}

	/// The latest parsed route.
	pub fn current_route(&self) -> ParsedRoute {
		self.engine.current_route()
	}

	/// Whether a requested navigation has not yet committed.
	pub fn is_loading(&self) -> bool {
		self.loading.get()
	}

	/// The loading flag as a subscribable signal.
	pub fn loading_signal(&self) -> Signal<bool> {
		self.loading.clone()
	}

	/// Registers a listener on the controller's re-published navigation
	/// events.
	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn(&NavigationEvent) + 'static,
	{
		self.events.subscribe(listener)
	}

	/// Route-table lookup, re-exposed for the view resolver and the auth
	/// gate.
	pub fn find_route(&self, path: &str) -> Option<RouteDefinition<V>> {
		self.engine.find_route(path)
	}

	/// The wrapped engine.
	pub fn engine(&self) -> &Rc<RouteEngine<V>> {
		&self.engine
	}

	// Relays engine events: clears the loading flag, then re-publishes.
	fn attach_to_engine(self: &Rc<Self>) {
		let weak = Rc::downgrade(self);
		let subscription = self.engine.subscribe(move |event| {
			if let Some(controller) = weak.upgrade() {
				controller.loading.set(false);
				controller.events.emit(event);
			}
		});
		*self.engine_sub.borrow_mut() = Some(subscription);
	}
}
