//! URL decomposition and the parsed-route value.
//!
//! A [`ParsedRoute`] is derived wholesale from the current location on
//! every navigation and never mutated in place. Decomposition also applies
//! the hybrid-bootstrap contract: when the server renders a generic shell,
//! it passes the intended client route through reserved query parameters
//! instead of the literal pathname.

use std::collections::HashMap;

/// Reserved query parameter overriding the literal pathname as the logical
/// route path.
pub const SPA_PATH_PARAM: &str = "spa-path";

/// Reserved query parameter naming the fallback initial path when
/// [`SPA_PATH_PARAM`] is absent.
pub const SSR_PATH_PARAM: &str = "ssr-path";

/// Reserved query parameter flagging that the shell should render its
/// server-provided children verbatim until hydration completes.
pub const SSR_MODE_PARAM: &str = "ssr-mode";

/// The structured result of parsing the current URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRoute {
	path: String,
	params: HashMap<String, String>,
	query: Vec<(String, String)>,
	hash: String,
}

impl Default for ParsedRoute {
	fn default() -> Self {
		Self::root()
	}
}

impl ParsedRoute {
	/// The parsed form of the root path `/` with no query or hash.
	pub fn root() -> Self {
		Self {
			path: "/".to_string(),
			params: HashMap::new(),
			query: Vec::new(),
			hash: String::new(),
		}
	}

	/// The logical route path (pathname, or the reserved-parameter
	/// override when present).
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Parameters extracted by the route table's pattern match. Empty when
	/// no registered pattern matched.
	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// Looks up a single extracted parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// The full query multi-map, in document order.
	pub fn query(&self) -> &[(String, String)] {
		&self.query
	}

	/// The first query value for `name`, if any.
	pub fn query_first(&self, name: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// All query values for `name`, in document order.
	pub fn query_all(&self, name: &str) -> Vec<&str> {
		self.query
			.iter()
			.filter(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
			.collect()
	}

	/// The fragment, without the leading `#`. Empty when absent.
	pub fn hash(&self) -> &str {
		&self.hash
	}

	/// Whether the shell was asked to render server-provided children
	/// verbatim until hydration completes ([`SSR_MODE_PARAM`]).
	pub fn ssr_mode(&self) -> bool {
		matches!(self.query_first(SSR_MODE_PARAM), Some("true") | Some("1"))
	}

	pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
		self.params = params;
	}
}

/// Decomposes a relative URL (`/path?query#hash`) into a [`ParsedRoute`]
/// with empty `params`.
///
/// The logical path is resolved in priority order: [`SPA_PATH_PARAM`]
/// override, then [`SSR_PATH_PARAM`] fallback, then the literal pathname.
/// Pattern parameters are filled in afterwards by the route engine, which
/// owns the route table.
pub fn parse_url(url: &str) -> ParsedRoute {
	let (without_hash, hash) = match url.split_once('#') {
		Some((head, fragment)) => (head, fragment.to_string()),
		None => (url, String::new()),
	};

	let (pathname, query_string) = match without_hash.split_once('?') {
		Some((path, query)) => (path, query),
		None => (without_hash, ""),
	};

	let query: Vec<(String, String)> =
		serde_urlencoded::from_str(query_string).unwrap_or_default();

	let path = logical_path(pathname, &query);

	ParsedRoute {
		path,
		params: HashMap::new(),
		query,
		hash,
	}
}

fn logical_path(pathname: &str, query: &[(String, String)]) -> String {
	let override_path = query
		.iter()
		.find(|(key, _)| key == SPA_PATH_PARAM)
		.or_else(|| query.iter().find(|(key, _)| key == SSR_PATH_PARAM))
		.map(|(_, value)| value.as_str());

	normalize_path(override_path.unwrap_or(pathname))
}

fn normalize_path(path: &str) -> String {
	if path.is_empty() {
		"/".to_string()
	} else if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{path}")
	}
}
