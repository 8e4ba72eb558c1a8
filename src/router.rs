//! Client-side routing.
//!
//! The routing stack, leaf to root:
//!
//! - [`pattern`]: pure path-pattern matching with parameter extraction
//! - [`url`]: URL decomposition into a [`ParsedRoute`], including the
//!   hybrid-bootstrap reserved parameters
//! - [`history`]: the browser history backend (in-memory on native
//!   targets)
//! - [`head`]: document title and meta-tag side effects
//! - [`route`]: route definitions and deferred view loaders
//! - [`engine`]: the route engine owning the table, the current route,
//!   and the navigation-event channel
//! - [`controller`]: the outward-facing navigation façade
//! - [`resolver`]: asynchronous path-to-view resolution

pub mod controller;
pub mod engine;
pub mod head;
pub mod history;
pub mod pattern;
pub mod resolver;
pub mod route;
pub mod url;

pub use controller::RouterController;
pub use engine::{NavigateOptions, NavigationEvent, RouteEngine, RouterError};
pub use pattern::PathPattern;
pub use resolver::{ResolveOutcome, ViewResolver};
pub use route::{RouteDefinition, ViewLoadError, ViewLoader};
pub use url::ParsedRoute;
