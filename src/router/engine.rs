//! Route engine.
//!
//! The engine owns the registered route table, the last-parsed route, the
//! browser-history integration, and the navigation-event channel. A
//! navigation request's history update and its resulting re-parse/emit run
//! within one synchronous call, so no other navigation can interleave in
//! the middle of a commit; back/forward traversal funnels through the same
//! re-parse/emit path via the history listener, making both sources
//! indistinguishable to subscribers.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::reactive::{EventChannel, Signal, Subscription};

use super::head;
use super::history::{self, HistoryError, HistoryState};
use super::route::RouteDefinition;
use super::url::{self, ParsedRoute};

/// Error type for route engine operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RouterError {
	/// The history backend rejected a navigation.
	#[error("navigation failed: {0}")]
	NavigationFailed(String),
	/// A navigation was requested before [`RouteEngine::initialize`].
	#[error("route engine used before initialize()")]
	NotInitialized,
}

impl From<HistoryError> for RouterError {
	fn from(error: HistoryError) -> Self {
		Self::NavigationFailed(error.to_string())
	}
}

/// A committed navigation, published exactly once per URL transition
/// (including browser back/forward).
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEvent {
	/// The route that was current before the transition. `None` only when
	/// no route had been parsed yet.
	pub from: Option<ParsedRoute>,
	/// The newly current route.
	pub to: ParsedRoute,
}

/// Options for a programmatic navigation.
#[derive(Debug, Clone, Default)]
pub struct NavigateOptions {
	/// Replace the current history entry instead of pushing a new one.
	pub replace: bool,
	/// Structured state attached to the history entry.
	pub state: serde_json::Value,
}

impl NavigateOptions {
	/// Options for a replace-navigation.
	pub fn replace() -> Self {
		Self {
			replace: true,
			..Self::default()
		}
	}

	/// Attaches structured state to the history entry.
	pub fn with_state(mut self, state: serde_json::Value) -> Self {
		self.state = state;
		self
	}
}

/// The route engine. See the module docs for the synchronization model.
///
/// Engines are shared behind `Rc`; [`RouteEngine::initialize`] takes the
/// `Rc` receiver so the history listener can hold a weak back-reference.
pub struct RouteEngine<V> {
	routes: RefCell<Vec<RouteDefinition<V>>>,
	current: Signal<ParsedRoute>,
	has_parsed: Cell<bool>,
	initialized: Cell<bool>,
	events: EventChannel<NavigationEvent>,
	listener: RefCell<Option<history::HistoryListenerHandle>>,
}

impl<V> std::fmt::Debug for RouteEngine<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteEngine")
			.field("routes", &self.routes.borrow().len())
			.field("initialized", &self.initialized.get())
			.finish()
	}
}

impl<V: 'static> Default for RouteEngine<V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<V: 'static> RouteEngine<V> {
	/// Creates an engine with an empty route table.
	pub fn new() -> Self {
		Self {
			routes: RefCell::new(Vec::new()),
			current: Signal::new(ParsedRoute::root()),
			has_parsed: Cell::new(false),
			initialized: Cell::new(false),
			events: EventChannel::new(),
			listener: RefCell::new(None),
		}
	}

	/// Appends a route to the table.
	///
	/// Registration order is the tie-break for overlapping patterns: the
	/// earliest registered match wins, so a literal route must be
	/// registered before a same-shape parameterized route to take
	/// precedence. All routes must be registered before
	/// [`RouteEngine::initialize`] performs its first parse so the first
	/// render sees the full table.
	pub fn add_route(&self, route: RouteDefinition<V>) {
		self.routes.borrow_mut().push(route);
	}

	/// Appends several routes in order.
	pub fn add_routes(&self, routes: impl IntoIterator<Item = RouteDefinition<V>>) {
		self.routes.borrow_mut().extend(routes);
	}

	/// Returns the number of registered routes.
	pub fn route_count(&self) -> usize {
		self.routes.borrow().len()
	}

	/// Finds the first registered definition matching `path`.
	pub fn find_route(&self, path: &str) -> Option<RouteDefinition<V>> {
		self.routes
			.borrow()
			.iter()
			.find(|route| route.pattern().matches(path).is_some())
			.cloned()
	}

	/// Registers the history-changed listener and performs the initial URL
	/// parse. Idempotent: calling twice is a no-op, which prevents
	/// duplicate listeners when the surrounding UI layer re-renders.
	pub fn initialize(self: &Rc<Self>) -> Result<(), RouterError> {
		if self.initialized.get() {
			return Ok(());
		}
		self.initialized.set(true);

		let weak: Weak<Self> = Rc::downgrade(self);
		let handle = history::listen(move || {
			if let Some(engine) = weak.upgrade() {
				engine.commit();
			}
		});
		*self.listener.borrow_mut() = Some(handle);

		// Initial parse: establishes the current route and applies its
		// document metadata without publishing a navigation event.
		let route = self.parse_current_url();
		self.apply_head(&route);
		self.current.set(route);
		self.has_parsed.set(true);

		Ok(())
	}

	/// Whether [`RouteEngine::initialize`] has run (and
	/// [`RouteEngine::destroy`] has not).
	pub fn is_initialized(&self) -> bool {
		self.initialized.get()
	}

	/// Reads the current location and derives a [`ParsedRoute`].
	///
	/// The reserved `spa-path`/`ssr-path` parameters override the literal
	/// pathname as the logical path. The route table populates `params`;
	/// failure to match simply yields empty `params`; matching is
	/// advisory for parameter extraction, not a gate.
	pub fn parse_current_url(&self) -> ParsedRoute {
		let mut route = url::parse_url(&history::current_url());
		let params = self
			.routes
			.borrow()
			.iter()
			.find_map(|definition| definition.pattern().matches(route.path()))
			.unwrap_or_default();
		route.set_params(params);
		route
	}

	/// Issues a history push or replace, then re-parses and publishes a
	/// [`NavigationEvent`]. The whole commit is synchronous.
	pub fn navigate(&self, to: &str, options: NavigateOptions) -> Result<(), RouterError> {
		if !self.initialized.get() {
			return Err(RouterError::NotInitialized);
		}

		let state = HistoryState::new(to).with_state(options.state);
		if options.replace {
			history::replace_state(&state)?;
		} else {
			history::push_state(&state)?;
		}

		self.commit();
		Ok(())
	}

	/// Delegates to browser history traversal. The resulting
	/// history-changed callback triggers the same re-parse/emit path as
	/// programmatic navigation.
	pub fn back(&self) {
		history::back();
	}

	/// Forward counterpart of [`RouteEngine::back`].
	pub fn forward(&self) {
		history::forward();
	}

	/// The last-parsed route.
	pub fn current_route(&self) -> ParsedRoute {
		self.current.get()
	}

	/// Registers a navigation-event listener.
	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn(&NavigationEvent) + 'static,
	{
		self.events.subscribe(listener)
	}

	/// Removes the history listener and clears all subscriptions. Safe to
	/// call multiple times; the engine may be initialized again afterwards.
	pub fn destroy(&self) {
		self.listener.borrow_mut().take();
		self.events.clear();
		self.initialized.set(false);
	}

	// The single re-parse-and-emit step every committed navigation funnels
	// through, for both programmatic navigation and history traversal.
	fn commit(&self) {
		let from = if self.has_parsed.get() {
			Some(self.current.get())
		} else {
			None
		};

		let to = self.parse_current_url();
		self.apply_head(&to);
		self.current.set(to.clone());
		self.has_parsed.set(true);

		self.events.emit(&NavigationEvent { from, to });
	}

	fn apply_head(&self, route: &ParsedRoute) {
		let Some(definition) = self.find_route(route.path()) else {
			// No match: prior metadata stays untouched.
			return;
		};

		if let Some(title) = definition.title() {
			head::set_title(title);
		}
		for (name, content) in definition.meta() {
			head::upsert_meta(name, content);
		}
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::router::route::ViewLoadError;
	use serial_test::serial;
	use std::cell::Cell;

	fn route(pattern: &str) -> RouteDefinition<&'static str> {
		RouteDefinition::new(pattern, || async { Ok("view") })
	}

	fn engine_with(routes: Vec<RouteDefinition<&'static str>>) -> Rc<RouteEngine<&'static str>> {
		let engine = Rc::new(RouteEngine::new());
		engine.add_routes(routes);
		engine
	}

	#[test]
	#[serial(history)]
	fn test_initialize_is_idempotent() {
		history::reset_with("/");
		let engine = engine_with(vec![route("/")]);

		engine.initialize().unwrap();
		engine.initialize().unwrap();

		assert_eq!(history::listener_count(), 1);
	}

	#[test]
	#[serial(history)]
	fn test_navigate_before_initialize_errors() {
		history::reset_with("/");
		let engine = engine_with(vec![route("/")]);

		let result = engine.navigate("/users", NavigateOptions::default());
		assert!(matches!(result, Err(RouterError::NotInitialized)));
	}

	#[test]
	#[serial(history)]
	fn test_navigate_updates_current_route() {
		history::reset_with("/");
		let engine = engine_with(vec![route("/"), route("/post/:id")]);
		engine.initialize().unwrap();

		engine.navigate("/post/42", NavigateOptions::default()).unwrap();

		let current = engine.current_route();
		assert_eq!(current.path(), "/post/42");
		assert_eq!(current.param("id"), Some("42"));
	}

	#[test]
	#[serial(history)]
	fn test_exactly_one_event_per_navigation() {
		history::reset_with("/");
		let engine = engine_with(vec![route("/"), route("/users")]);
		engine.initialize().unwrap();

		let events = Rc::new(RefCell::new(Vec::new()));
		let events_clone = Rc::clone(&events);
		let _sub = engine.subscribe(move |event| {
			events_clone.borrow_mut().push(event.clone());
		});

		engine.navigate("/users", NavigateOptions::default()).unwrap();

		let events = events.borrow();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].to.path(), "/users");
		assert_eq!(events[0].from.as_ref().map(ParsedRoute::path), Some("/"));
	}

	#[test]
	#[serial(history)]
	fn test_registration_order_breaks_ties() {
		history::reset_with("/");
		// Literal registered first wins over the same-shape parameterized
		// pattern; the captured params prove which definition matched.
		let engine = engine_with(vec![route("/"), route("/post/new"), route("/post/:id")]);
		engine.initialize().unwrap();

		engine.navigate("/post/new", NavigateOptions::default()).unwrap();
		assert!(engine.current_route().params().is_empty());

		engine.navigate("/post/7", NavigateOptions::default()).unwrap();
		assert_eq!(engine.current_route().param("id"), Some("7"));
	}

	#[test]
	#[serial(history)]
	fn test_no_match_yields_empty_params() {
		history::reset_with("/");
		let engine = engine_with(vec![route("/")]);
		engine.initialize().unwrap();

		engine
			.navigate("/unregistered/path", NavigateOptions::default())
			.unwrap();

		let current = engine.current_route();
		assert_eq!(current.path(), "/unregistered/path");
		assert!(current.params().is_empty());
	}

	#[test]
	#[serial(history)]
	fn test_back_funnels_through_same_emit_path() {
		history::reset_with("/");
		let engine = engine_with(vec![route("/"), route("/a"), route("/b")]);
		engine.initialize().unwrap();

		let count = Rc::new(Cell::new(0));
		let count_clone = Rc::clone(&count);
		let _sub = engine.subscribe(move |_| count_clone.set(count_clone.get() + 1));

		engine.navigate("/a", NavigateOptions::default()).unwrap();
		engine.navigate("/b", NavigateOptions::default()).unwrap();
		engine.back();

		assert_eq!(count.get(), 3);
		assert_eq!(engine.current_route().path(), "/a");

		engine.forward();
		assert_eq!(engine.current_route().path(), "/b");
	}

	#[test]
	#[serial(history)]
	fn test_replace_navigation_keeps_stack_depth() {
		history::reset_with("/");
		let engine = engine_with(vec![route("/"), route("/login")]);
		engine.initialize().unwrap();

		let depth = history::entry_count();
		engine.navigate("/login", NavigateOptions::replace()).unwrap();

		assert_eq!(history::entry_count(), depth);
		assert_eq!(engine.current_route().path(), "/login");
	}

	#[test]
	#[serial(history)]
	fn test_spa_path_override_applies() {
		history::reset_with("/shell?spa-path=/post/9");
		let engine = engine_with(vec![route("/post/:id")]);
		engine.initialize().unwrap();

		let current = engine.current_route();
		assert_eq!(current.path(), "/post/9");
		assert_eq!(current.param("id"), Some("9"));
	}

	#[test]
	#[serial(history)]
	fn test_head_side_effects_on_match() {
		history::reset_with("/");
		head::reset();

		let engine: Rc<RouteEngine<&'static str>> = Rc::new(RouteEngine::new());
		engine.add_route(
			RouteDefinition::new("/", || async { Ok("home") })
				.with_title("Home")
				.with_meta("description", "landing"),
		);
		engine.initialize().unwrap();

		assert_eq!(head::document_title(), "Home");
		assert_eq!(head::meta_content("description"), Some("landing".to_string()));
	}

	#[test]
	#[serial(history)]
	fn test_head_untouched_without_match() {
		history::reset_with("/");
		head::reset();

		let engine = engine_with(vec![route("/").with_title("Home")]);
		engine.initialize().unwrap();
		assert_eq!(head::document_title(), "Home");

		engine
			.navigate("/nowhere", NavigateOptions::default())
			.unwrap();
		assert_eq!(head::document_title(), "Home");
	}

	#[test]
	#[serial(history)]
	fn test_destroy_is_repeatable_and_balanced() {
		history::reset_with("/");
		let engine = engine_with(vec![route("/")]);
		engine.initialize().unwrap();
		let _sub = engine.subscribe(|_| {});

		engine.destroy();
		engine.destroy();

		assert_eq!(history::listener_count(), 0);
		assert!(!engine.is_initialized());

		// A destroyed engine can be mounted again.
		engine.initialize().unwrap();
		assert_eq!(history::listener_count(), 1);
	}

	#[test]
	#[serial(history)]
	fn test_failing_loader_does_not_affect_navigation() {
		history::reset_with("/");
		let engine: Rc<RouteEngine<&'static str>> = Rc::new(RouteEngine::new());
		engine.add_route(RouteDefinition::new("/broken", || async {
			Err(ViewLoadError::new("boom"))
		}));
		engine.initialize().unwrap();

		// The engine never invokes loaders; navigation must succeed.
		engine.navigate("/broken", NavigateOptions::default()).unwrap();
		assert_eq!(engine.current_route().path(), "/broken");
	}
}
