//! Route definitions.
//!
//! A [`RouteDefinition`] binds a path pattern to a deferred view-module
//! factory plus the document metadata and authentication requirement for
//! the route. Definitions are created once from a static table at
//! application startup and are immutable thereafter; the engine clones
//! them freely (the loader is reference-counted).

use std::fmt;
use std::rc::Rc;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use super::pattern::PathPattern;

/// Error produced by a failed view-module load.
///
/// Loader failures never propagate out of the resolver; they are converted
/// into the error view at the resolution boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ViewLoadError {
	/// Human-readable failure description, surfaced on the error view.
	pub message: String,
}

impl ViewLoadError {
	/// Creates a load error with the given message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// A deferred view-module factory.
///
/// Invoking the loader starts materialization of the view module (network
/// fetch, plugin registry lookup, or anything else); the engine is
/// agnostic to the mechanism.
pub type ViewLoader<V> = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<V, ViewLoadError>>>;

/// A single entry of the route table.
pub struct RouteDefinition<V> {
	pattern: PathPattern,
	loader: ViewLoader<V>,
	title: Option<String>,
	meta: Vec<(String, String)>,
	auth_required: Option<bool>,
}

impl<V> Clone for RouteDefinition<V> {
	fn clone(&self) -> Self {
		Self {
			pattern: self.pattern.clone(),
			loader: Rc::clone(&self.loader),
			title: self.title.clone(),
			meta: self.meta.clone(),
			auth_required: self.auth_required,
		}
	}
}

impl<V> fmt::Debug for RouteDefinition<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteDefinition")
			.field("pattern", &self.pattern)
			.field("title", &self.title)
			.field("auth_required", &self.auth_required())
			.finish()
	}
}

impl<V> RouteDefinition<V> {
	/// Creates a route for `pattern` backed by the given loader.
	pub fn new<F, Fut>(pattern: &str, loader: F) -> Self
	where
		F: Fn() -> Fut + 'static,
		Fut: Future<Output = Result<V, ViewLoadError>> + 'static,
	{
		Self {
			pattern: PathPattern::new(pattern),
			loader: Rc::new(move || loader().boxed_local()),
			title: None,
			meta: Vec::new(),
			auth_required: None,
		}
	}

	/// Sets the document title applied when this route activates.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Adds a named meta tag applied when this route activates.
	pub fn with_meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
		self.meta.push((name.into(), content.into()));
		self
	}

	/// Marks the route as reachable without authentication.
	pub fn public(mut self) -> Self {
		self.auth_required = Some(false);
		self
	}

	/// Marks the route as explicitly requiring authentication.
	///
	/// This is also the default for routes that never state a preference.
	pub fn protected(mut self) -> Self {
		self.auth_required = Some(true);
		self
	}

	/// Returns the route's pattern.
	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	/// Returns the document title, if one was declared.
	pub fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	/// Returns the declared meta tags.
	pub fn meta(&self) -> &[(String, String)] {
		&self.meta
	}

	/// Whether the route requires authentication. Routes that never state
	/// a preference are protected (fail closed).
	pub fn auth_required(&self) -> bool {
		self.auth_required.unwrap_or(true)
	}

	/// Starts loading the route's view module.
	pub fn load(&self) -> LocalBoxFuture<'static, Result<V, ViewLoadError>> {
		(self.loader)()
	}

	pub(crate) fn loader(&self) -> ViewLoader<V> {
		Rc::clone(&self.loader)
	}
}
