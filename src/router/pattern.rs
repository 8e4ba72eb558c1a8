//! Path pattern matching.
//!
//! A [`PathPattern`] is a path template made of literal segments and
//! parameter segments (`:name`). Matching is exact and segment-wise: there
//! are no wildcards, no optional segments, and a candidate path with a
//! different segment count never matches. Overlapping patterns are
//! disambiguated by registration order in the route table, not by any
//! specificity rule; see [`RouteEngine::add_route`].
//!
//! [`RouteEngine::add_route`]: super::engine::RouteEngine::add_route

use std::collections::HashMap;

/// Marker prefix for parameter segments.
const PARAM_MARKER: char = ':';

/// One segment of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	/// Must equal the path segment byte-for-byte.
	Literal(String),
	/// Matches any path segment; captures it under the given name.
	Param(String),
}

/// A parsed path template, e.g. `/post/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
	raw: String,
	segments: Vec<Segment>,
}

impl PathPattern {
	/// Parses a pattern string.
	///
	/// Leading and trailing slashes carry no meaning; `"/users/"` and
	/// `"/users"` produce the same pattern. The empty string is treated as
	/// the root pattern `"/"`.
	pub fn new(pattern: &str) -> Self {
		let segments = split_segments(pattern)
			.into_iter()
			.map(|segment| match segment.strip_prefix(PARAM_MARKER) {
				Some(name) => Segment::Param(name.to_string()),
				None => Segment::Literal(segment.to_string()),
			})
			.collect();

		Self {
			raw: pattern.to_string(),
			segments,
		}
	}

	/// Returns the original pattern string.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Returns whether this is the root pattern `"/"`.
	pub fn is_root(&self) -> bool {
		self.segments.is_empty()
	}

	/// Returns the declared parameter names, in pattern order.
	pub fn param_names(&self) -> Vec<&str> {
		self.segments
			.iter()
			.filter_map(|segment| match segment {
				Segment::Param(name) => Some(name.as_str()),
				Segment::Literal(_) => None,
			})
			.collect()
	}

	/// Matches a concrete path against this pattern.
	///
	/// Returns the captured parameters on success, `None` on no-match.
	/// Parameter values are percent-decoded; a value that fails to decode
	/// is captured as the raw segment instead (matching is advisory for
	/// extraction, not a gate).
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		// Root matches only the literal root path. Decomposing "/" into
		// zero segments would make every pattern with zero segments match
		// every path trivially.
		if self.is_root() {
			return if path == "/" {
				Some(HashMap::new())
			} else {
				None
			};
		}

		let path_segments = split_segments(path);
		if path_segments.len() != self.segments.len() {
			return None;
		}

		let mut params = HashMap::new();
		for (segment, candidate) in self.segments.iter().zip(path_segments) {
			match segment {
				Segment::Param(name) => {
					params.insert(name.clone(), decode_segment(candidate));
				}
				Segment::Literal(literal) => {
					if literal != candidate {
						return None;
					}
				}
			}
		}

		Some(params)
	}

	/// Rebuilds a concrete path from this pattern and a parameter map.
	///
	/// Returns `None` if a declared parameter is missing from the map.
	/// Parameter values are percent-encoded on the way out, mirroring the
	/// decode applied by [`PathPattern::matches`].
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		if self.is_root() {
			return Some("/".to_string());
		}

		let mut path = String::new();
		for segment in &self.segments {
			path.push('/');
			match segment {
				Segment::Literal(literal) => path.push_str(literal),
				Segment::Param(name) => {
					let value = params.get(name)?;
					path.push_str(&urlencoding::encode(value));
				}
			}
		}

		Some(path)
	}
}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.raw)
	}
}

/// Splits a path on `/`, discarding empty segments produced by leading,
/// trailing, or doubled slashes.
fn split_segments(path: &str) -> Vec<&str> {
	path.split('/').filter(|segment| !segment.is_empty()).collect()
}

fn decode_segment(segment: &str) -> String {
	match urlencoding::decode(segment) {
		Ok(decoded) => decoded.into_owned(),
		Err(_) => segment.to_string(),
	}
}
