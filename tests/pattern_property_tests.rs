//! Property-based tests for the pattern matcher
//!
//! Exercises the matcher's structural guarantees over generated inputs:
//! 1. Differing segment counts never match
//! 2. A single parameter segment captures exactly one decoded value
//! 3. The root pattern matches only the root path
//! 4. reverse() is a right inverse of matches() for plain values

#![cfg(not(target_arch = "wasm32"))]

use proptest::prelude::*;
use wayfarer::PathPattern;

/// A URL-safe path segment with no percent escapes.
fn segment() -> impl Strategy<Value = String> {
	"[a-z0-9_-]{1,8}"
}

fn join(segments: &[String]) -> String {
	format!("/{}", segments.join("/"))
}

proptest! {
	/// Patterns and paths with differing segment counts never match.
	#[test]
	fn prop_segment_count_mismatch_never_matches(
		pattern_segments in prop::collection::vec(segment(), 1..5),
		path_segments in prop::collection::vec(segment(), 1..5),
	) {
		prop_assume!(pattern_segments.len() != path_segments.len());

		let pattern = PathPattern::new(&join(&pattern_segments));
		prop_assert!(pattern.matches(&join(&path_segments)).is_none());
	}

	/// A pattern with exactly one parameter segment captures exactly that
	/// key with the corresponding segment value.
	#[test]
	fn prop_single_param_extraction(
		prefix in prop::collection::vec(segment(), 0..3),
		suffix in prop::collection::vec(segment(), 0..3),
		name in "[a-z_]{1,6}",
		value in segment(),
	) {
		let mut pattern_segments = prefix.clone();
		pattern_segments.push(format!(":{name}"));
		pattern_segments.extend(suffix.clone());

		let mut path_segments = prefix;
		path_segments.push(value.clone());
		path_segments.extend(suffix);

		let pattern = PathPattern::new(&join(&pattern_segments));
		let params = pattern.matches(&join(&path_segments)).unwrap();

		prop_assert_eq!(params.len(), 1);
		prop_assert_eq!(params.get(&name), Some(&value));
	}

	/// The root pattern matches only "/".
	#[test]
	fn prop_root_matches_only_root(path_segments in prop::collection::vec(segment(), 1..4)) {
		let root = PathPattern::new("/");
		prop_assert!(root.matches("/").is_some());
		prop_assert!(root.matches(&join(&path_segments)).is_none());
	}

	/// Rebuilding a matched path from its captured params yields a path
	/// the pattern matches again with the same captures.
	#[test]
	fn prop_reverse_round_trips(
		literal in segment(),
		value in segment(),
	) {
		let pattern = PathPattern::new(&format!("/{literal}/:id"));
		let params = pattern.matches(&format!("/{literal}/{value}")).unwrap();

		let rebuilt = pattern.reverse(&params).unwrap();
		let reparsed = pattern.matches(&rebuilt).unwrap();
		prop_assert_eq!(reparsed, params);
	}

	/// Literal patterns only match themselves among same-length paths.
	#[test]
	fn prop_literal_mismatch_fails(
		a in segment(),
		b in segment(),
	) {
		prop_assume!(a != b);

		let pattern = PathPattern::new(&format!("/{a}"));
		let b_path = format!("/{b}");
		prop_assert!(pattern.matches(&b_path).is_none());
	}
}
