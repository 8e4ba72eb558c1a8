//! Wayfarer - Client-Side Navigation Engine
//!
//! A self-contained single-page-application router for hybrid SSR/SPA
//! applications: the application may start from a server-rendered path and
//! later transition to fully client-driven navigation.
//!
//! ## Features
//!
//! - **Pattern matching**: literal and `:param` segments with
//!   registration-order precedence
//! - **History synchronization**: pushState/replaceState plus popstate-
//!   driven back/forward, all funneled through one re-parse/emit step
//! - **Auth-gated redirection**: a per-route authentication requirement
//!   enforced by a hydration-aware redirect state machine
//! - **View resolution**: on-demand, memoized view-module loading with
//!   contained failures and last-requested-path-wins race suppression
//!
//! ## Architecture
//!
//! - [`reactive`]: signals and the observer-list event channel
//! - [`router`]: pattern matcher, route engine, controller, view resolver
//! - [`auth`]: session signal consumption and the auth gate
//! - [`spawn`]: fire-and-forget task spawning for preloads
//! - [`logging`]: console/stderr logging macros
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use wayfarer::{
//!     AuthGate, RouteDefinition, RouteEngine, RouterController,
//!     SessionState, ViewResolver,
//! };
//!
//! let engine = Rc::new(RouteEngine::new());
//! engine.add_routes(vec![
//!     RouteDefinition::new("/", || async { Ok(home_view()) })
//!         .with_title("Home"),
//!     RouteDefinition::new("/login", || async { Ok(login_view()) })
//!         .public(),
//!     RouteDefinition::new("/post/:id", || async { load_post_view().await })
//!         .with_title("Post"),
//! ]);
//!
//! let controller = RouterController::new(engine);
//! controller.initialize()?;
//!
//! let resolver = ViewResolver::new(Rc::clone(&controller));
//! resolver.set_not_found(|| not_found_view());
//!
//! let session = SessionState::new();
//! let gate = AuthGate::new(Rc::clone(&controller), session, "/login");
//! gate.attach();
//! gate.mark_hydrated();
//! ```
//!
//! The view-module type is a generic parameter: wayfarer resolves and
//! hands back whatever the application renders with, and never inspects
//! it.

#![warn(missing_docs)]

// Core modules
pub mod logging;
pub mod reactive;
pub mod spawn;

// Client-side routing
pub mod router;

// Authentication gating
pub mod auth;

// Re-export commonly used types
pub use auth::{AuthGate, GatePhase, SessionState};
pub use reactive::{EventChannel, Signal, Subscription};
pub use router::history::HistoryState;
pub use router::{
	NavigateOptions, NavigationEvent, ParsedRoute, PathPattern, ResolveOutcome, RouteDefinition,
	RouteEngine, RouterController, RouterError, ViewLoadError, ViewLoader, ViewResolver,
};

// Logging macros are exported via #[macro_export]:
// wayfarer::debug_log!, wayfarer::info_log!, wayfarer::warn_log!,
// wayfarer::error_log!.
