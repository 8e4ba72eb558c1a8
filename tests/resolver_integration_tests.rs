//! Integration tests for the view resolver
//!
//! These tests verify asynchronous view resolution end to end:
//! 1. Resolution order: route table, fallback list, not-found view
//! 2. Failure containment (the error view, never a crash)
//! 3. Memoization and opportunistic preloading
//! 4. The last-requested-path-wins race rule

#![cfg(not(target_arch = "wasm32"))]

use std::cell::Cell;
use std::rc::Rc;

use serial_test::serial;
use wayfarer::router::history;
use wayfarer::{
	NavigateOptions, ResolveOutcome, RouteDefinition, RouteEngine, RouterController, ViewLoadError,
	ViewResolver,
};

type View = &'static str;

fn setup(
	routes: Vec<RouteDefinition<View>>,
) -> (Rc<RouterController<View>>, Rc<ViewResolver<View>>) {
	history::reset_with("/");
	let engine = Rc::new(RouteEngine::new());
	engine.add_routes(routes);
	let controller = RouterController::new(engine);
	controller.initialize().unwrap();
	let resolver = ViewResolver::new(Rc::clone(&controller));
	(controller, resolver)
}

/// Success Criterion 1: the matched definition's loader wins; same-shape
/// patterns never cross wires.
#[tokio::test]
#[serial(history)]
async fn test_post_route_resolves_post_view_not_profile_view() {
	let (controller, resolver) = setup(vec![
		RouteDefinition::new("/post/:id", || async { Ok("post") }),
		RouteDefinition::new("/profile/:id", || async { Ok("profile") }),
	]);

	controller
		.navigate("/post/42", NavigateOptions::default())
		.unwrap();
	assert_eq!(controller.current_route().param("id"), Some("42"));
	assert_eq!(
		resolver.resolve("/post/42").await,
		ResolveOutcome::Ready("post")
	);

	controller
		.navigate("/profile/42", NavigateOptions::default())
		.unwrap();
	assert_eq!(
		resolver.resolve("/profile/42").await,
		ResolveOutcome::Ready("profile")
	);
}

/// Success Criterion 1: the fallback list is only consulted when the
/// route table has no match, in list order.
#[tokio::test]
#[serial(history)]
async fn test_fallback_list_after_route_table() {
	let (controller, resolver) = setup(vec![RouteDefinition::new("/post/:id", || async {
		Ok("post")
	})]);
	resolver.add_fallback("/post/:id", || async { Ok("shadowed") });
	resolver.add_fallback("/legacy/:page", || async { Ok("legacy") });

	controller
		.navigate("/post/1", NavigateOptions::default())
		.unwrap();
	assert_eq!(resolver.resolve("/post/1").await, ResolveOutcome::Ready("post"));

	controller
		.navigate("/legacy/faq", NavigateOptions::default())
		.unwrap();
	assert_eq!(
		resolver.resolve("/legacy/faq").await,
		ResolveOutcome::Ready("legacy")
	);
}

/// Success Criterion 1: unmatched paths resolve to the designated
/// not-found view.
#[tokio::test]
#[serial(history)]
async fn test_not_found_resolution() {
	let (controller, resolver) = setup(vec![]);
	resolver.set_not_found(|| "404");

	controller
		.navigate("/no/such/route", NavigateOptions::default())
		.unwrap();
	assert_eq!(
		resolver.resolve("/no/such/route").await,
		ResolveOutcome::Ready("404")
	);
}

/// Success Criterion 2: a rejecting loader is contained as the error
/// view, carrying the failure message.
#[tokio::test]
#[serial(history)]
async fn test_loader_rejection_becomes_error_view() {
	let (controller, resolver) = setup(vec![RouteDefinition::new("/reports", || async {
		Err(ViewLoadError::new("network unreachable"))
	})]);

	controller
		.navigate("/reports", NavigateOptions::default())
		.unwrap();

	match resolver.resolve("/reports").await {
		ResolveOutcome::Failed { message } => assert_eq!(message, "network unreachable"),
		other => panic!("expected Failed, got {other:?}"),
	}

	// The navigation pipeline survived; a later navigation still works.
	controller.navigate("/", NavigateOptions::default()).unwrap();
	assert_eq!(controller.current_route().path(), "/");
}

/// Success Criterion 3: one loader invocation serves repeat visits.
#[tokio::test]
#[serial(history)]
async fn test_memoized_loads() {
	let invocations = Rc::new(Cell::new(0));
	let counter = Rc::clone(&invocations);

	let (controller, resolver) = setup(vec![RouteDefinition::new("/post/:id", move || {
		counter.set(counter.get() + 1);
		async { Ok("post") }
	})]);

	controller
		.navigate("/post/1", NavigateOptions::default())
		.unwrap();
	resolver.resolve("/post/1").await.ready().unwrap();
	resolver.resolve("/post/1").await.ready().unwrap();

	assert_eq!(invocations.get(), 1);
}

/// Success Criterion 3: preloading warms the same cache and swallows
/// failures.
#[tokio::test]
#[serial(history)]
async fn test_preload_shares_cache_with_resolve() {
	let invocations = Rc::new(Cell::new(0));
	let counter = Rc::clone(&invocations);

	let (controller, resolver) = setup(vec![
		RouteDefinition::new("/post/:id", move || {
			counter.set(counter.get() + 1);
			async { Ok("post") }
		}),
		RouteDefinition::new("/flaky", || async { Err(ViewLoadError::new("timeout")) }),
	]);

	// Warm the post route before it is ever visited.
	resolver.preload("/post/9").await;
	// Preload failures have no user-visible effect.
	resolver.preload("/flaky").await;

	controller
		.navigate("/post/9", NavigateOptions::default())
		.unwrap();
	assert_eq!(
		resolver.resolve("/post/9").await,
		ResolveOutcome::Ready("post")
	);
	assert_eq!(invocations.get(), 1);
}

/// Success Criterion 4: navigate(A) then navigate(B) before A's
/// resolution settles renders B's view, never A's.
#[tokio::test]
#[serial(history)]
async fn test_rapid_navigation_discards_stale_resolution() {
	let (controller, resolver) = setup(vec![
		RouteDefinition::new("/a", || async { Ok("a") }),
		RouteDefinition::new("/b", || async { Ok("b") }),
	]);

	controller.navigate("/a", NavigateOptions::default()).unwrap();
	let resolution_for_a = resolver.resolve("/a");

	controller.navigate("/b", NavigateOptions::default()).unwrap();

	// A's resolution settles after the path moved on: discarded.
	assert_eq!(resolution_for_a.await, ResolveOutcome::Superseded);
	assert_eq!(
		resolver.resolve_current().await,
		ResolveOutcome::Ready("b")
	);
}

/// Success Criterion 4: resolve_current tracks the controller.
#[tokio::test]
#[serial(history)]
async fn test_resolve_current_follows_controller() {
	let (controller, resolver) = setup(vec![
		RouteDefinition::new("/", || async { Ok("home") }),
		RouteDefinition::new("/a", || async { Ok("a") }),
	]);

	assert_eq!(
		resolver.resolve_current().await,
		ResolveOutcome::Ready("home")
	);

	controller.navigate("/a", NavigateOptions::default()).unwrap();
	assert_eq!(resolver.resolve_current().await, ResolveOutcome::Ready("a"));
}
