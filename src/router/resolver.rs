//! View resolver.
//!
//! Turns a path into a renderable view module, asynchronously. Resolution
//! order: the matched route definition's loader first, a secondary flat
//! list of `(pattern, loader)` pairs second, the designated not-found view
//! last. Loader failures are contained here and surfaced as the error
//! view; they never propagate and crash the navigation flow.
//!
//! Resolution is keyed by path: if the controller's current path changes
//! before a resolution settles, the stale result is discarded on arrival
//! (last-requested-path-wins), so rapid successive navigations never flash
//! an outdated view.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::spawn;
use crate::{debug_log, warn_log};

use super::controller::RouterController;
use super::pattern::PathPattern;
use super::route::ViewLoader;

/// The outcome of a view resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome<V> {
	/// The view module for the requested path.
	Ready(V),
	/// No registered loader matched and no not-found view is configured.
	NotFound,
	/// The matched loader failed; render the error view with this message
	/// and offer a full reload ([`history::reload`]) as recovery.
	///
	/// [`history::reload`]: super::history::reload
	Failed {
		/// Human-readable failure description.
		message: String,
	},
	/// The current path changed while the load was in flight; the result
	/// was discarded and must not be rendered.
	Superseded,
}

impl<V> ResolveOutcome<V> {
	/// Returns the loaded view module, if any.
	pub fn ready(self) -> Option<V> {
		match self {
			Self::Ready(view) => Some(view),
			_ => None,
		}
	}
}

/// Asynchronous path-to-view resolution with memoization and preloading.
pub struct ViewResolver<V> {
	controller: Rc<RouterController<V>>,
	fallbacks: RefCell<Vec<(PathPattern, ViewLoader<V>)>>,
	not_found: RefCell<Option<Rc<dyn Fn() -> V>>>,
	// Loaded modules keyed by the pattern that produced them, so repeat
	// visits and preloads share one factory invocation.
	cache: RefCell<HashMap<String, V>>,
}

impl<V> std::fmt::Debug for ViewResolver<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewResolver")
			.field("fallbacks", &self.fallbacks.borrow().len())
			.field("cached", &self.cache.borrow().len())
			.finish()
	}
}

impl<V: Clone + 'static> ViewResolver<V> {
	/// Creates a resolver over the given controller's route table.
	pub fn new(controller: Rc<RouterController<V>>) -> Rc<Self> {
		Rc::new(Self {
			controller,
			fallbacks: RefCell::new(Vec::new()),
			not_found: RefCell::new(None),
			cache: RefCell::new(HashMap::new()),
		})
	}

	/// Appends a `(pattern, loader)` pair to the secondary fallback table.
	/// Fallbacks are checked in list order, after the route table.
	pub fn add_fallback<F, Fut>(&self, pattern: &str, loader: F)
	where
		F: Fn() -> Fut + 'static,
		Fut: Future<Output = Result<V, super::route::ViewLoadError>> + 'static,
	{
		use futures_util::FutureExt;
		self.fallbacks.borrow_mut().push((
			PathPattern::new(pattern),
			Rc::new(move || loader().boxed_local()),
		));
	}

	/// Designates the view rendered when nothing matches a path.
	pub fn set_not_found<F>(&self, factory: F)
	where
		F: Fn() -> V + 'static,
	{
		*self.not_found.borrow_mut() = Some(Rc::new(factory));
	}

	/// Resolves `path` to a view module.
	///
	/// The result is only valid if `path` still matches the controller's
	/// current path at completion time; otherwise
	/// [`ResolveOutcome::Superseded`] is returned and the caller must
	/// discard the request.
	pub async fn resolve(&self, path: &str) -> ResolveOutcome<V> {
		let outcome = self.load_for(path).await;

		if self.controller.current_route().path() != path {
			debug_log!("discarding stale resolution for {path}");
			return ResolveOutcome::Superseded;
		}
		outcome
	}

	/// Resolves the controller's current path.
	pub async fn resolve_current(&self) -> ResolveOutcome<V> {
		let path = self.controller.current_route().path().to_string();
		self.resolve(&path).await
	}

	/// Best-effort warm-up of `path` with identical resolution rules; the
	/// result is discarded and failures are logged, never surfaced.
	pub async fn preload(&self, path: &str) {
		if let ResolveOutcome::Failed { message } = self.load_for(path).await {
			warn_log!("preload of {path} failed: {message}");
		}
	}

	/// Spawns [`ViewResolver::preload`] in the background. Used
	/// opportunistically after the first view has rendered to warm
	/// frequently visited destinations.
	pub fn warm(self: &Rc<Self>, path: &str) {
		let resolver = Rc::clone(self);
		let path = path.to_string();
		spawn::spawn_local(async move {
			resolver.preload(&path).await;
		});
	}

	/// Number of memoized view modules.
	pub fn cached_len(&self) -> usize {
		self.cache.borrow().len()
	}

	// Resolution without the staleness check; shared by resolve and
	// preload.
	async fn load_for(&self, path: &str) -> ResolveOutcome<V> {
		if let Some(definition) = self.controller.find_route(path) {
			let key = definition.pattern().as_str().to_string();
			return self.invoke(key, definition.loader()).await;
		}

		let fallback = self
			.fallbacks
			.borrow()
			.iter()
			.find(|(pattern, _)| pattern.matches(path).is_some())
			.map(|(pattern, loader)| (pattern.as_str().to_string(), Rc::clone(loader)));
		if let Some((key, loader)) = fallback {
			return self.invoke(key, loader).await;
		}

		let not_found = self.not_found.borrow().clone();
		match not_found {
			Some(factory) => ResolveOutcome::Ready(factory()),
			None => ResolveOutcome::NotFound,
		}
	}

	async fn invoke(&self, key: String, loader: ViewLoader<V>) -> ResolveOutcome<V> {
		if let Some(cached) = self.cache.borrow().get(&key).cloned() {
			return ResolveOutcome::Ready(cached);
		}

		match loader().await {
			Ok(view) => {
				self.cache.borrow_mut().insert(key, view.clone());
				ResolveOutcome::Ready(view)
			}
			Err(error) => ResolveOutcome::Failed {
				message: error.to_string(),
			},
		}
	}
}
