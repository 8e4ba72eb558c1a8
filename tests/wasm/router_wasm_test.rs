//! WASM smoke tests for the platform-independent routing layers.
//!
//! Exercises pattern matching, URL decomposition, and route definitions
//! under `wasm32-unknown-unknown`. Navigation flows against the real
//! History API are covered by the native suites through the in-memory
//! backend.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::wasm_bindgen_test;
use wayfarer::router::url::parse_url;
use wayfarer::{PathPattern, RouteDefinition};

#[wasm_bindgen_test]
fn pattern_matches_and_extracts() {
	let pattern = PathPattern::new("/post/:id");

	let params = pattern.matches("/post/42").unwrap();
	assert_eq!(params.get("id"), Some(&"42".to_string()));
	assert!(pattern.matches("/post/42/comments").is_none());
}

#[wasm_bindgen_test]
fn root_pattern_is_exact() {
	let root = PathPattern::new("/");
	assert!(root.matches("/").is_some());
	assert!(root.matches("/anything").is_none());
}

#[wasm_bindgen_test]
fn url_decomposition() {
	let route = parse_url("/search?q=wasm&ssr-mode=1#top");

	assert_eq!(route.path(), "/search");
	assert_eq!(route.query_first("q"), Some("wasm"));
	assert!(route.ssr_mode());
	assert_eq!(route.hash(), "top");
}

#[wasm_bindgen_test]
fn spa_path_override() {
	let route = parse_url("/shell?spa-path=/post/7");
	assert_eq!(route.path(), "/post/7");
}

#[wasm_bindgen_test]
fn route_definition_defaults_to_protected() {
	let route: RouteDefinition<&'static str> =
		RouteDefinition::new("/settings", || async { Ok("settings") });
	assert!(route.auth_required());
	assert!(!route.clone().public().auth_required());
}
