//! Browser history backend.
//!
//! On `wasm32` this wraps the History API: `pushState`/`replaceState` for
//! programmatic navigation, a `popstate` listener for back/forward, and
//! `Location::assign`/`reload` for the two full-document navigation cases.
//! On native targets the same surface is backed by an in-memory history
//! (entry stack, listener registry, full-load and reload logs) so every
//! navigation flow is exercisable under plain `cargo test`.
//!
//! The engine never calls the browser's native page-load navigation except
//! through [`assign`] and [`reload`].

use serde::{Deserialize, Serialize};

/// Errors raised by the history backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HistoryError {
	/// The browser window or its history object is unavailable.
	#[error("history backend unavailable: {0}")]
	Unavailable(String),
	/// The underlying history call was rejected.
	#[error("history operation failed: {0}")]
	Backend(String),
}

/// The state payload attached to a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
	/// The relative URL of the entry (`/path?query#hash`).
	pub path: String,
	/// Caller-supplied structured state carried with the entry.
	#[serde(default)]
	pub state: serde_json::Value,
}

impl HistoryState {
	/// Creates a state payload with no attached data.
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			state: serde_json::Value::Null,
		}
	}

	/// Attaches structured state to the entry.
	pub fn with_state(mut self, state: serde_json::Value) -> Self {
		self.state = state;
		self
	}
}

/// Handle for a registered history-change listener.
///
/// The listener is removed when the handle is dropped, keeping
/// registration and removal balanced across repeated mounts.
pub struct HistoryListenerHandle {
	#[cfg(not(target_arch = "wasm32"))]
	id: u64,
	#[cfg(target_arch = "wasm32")]
	closure: Option<wasm_bindgen::closure::Closure<dyn FnMut(web_sys::PopStateEvent)>>,
}

impl std::fmt::Debug for HistoryListenerHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HistoryListenerHandle").finish_non_exhaustive()
	}
}

// ---------------------------------------------------------------------------
// WASM backend
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
mod backend {
	use super::{HistoryError, HistoryListenerHandle, HistoryState};
	use wasm_bindgen::JsCast;
	use wasm_bindgen::closure::Closure;

	fn window() -> Result<web_sys::Window, HistoryError> {
		web_sys::window()
			.ok_or_else(|| HistoryError::Unavailable("window not available".to_string()))
	}

	fn history() -> Result<web_sys::History, HistoryError> {
		window()?
			.history()
			.map_err(|_| HistoryError::Unavailable("history not available".to_string()))
	}

	fn state_to_js(state: &HistoryState) -> Result<wasm_bindgen::JsValue, HistoryError> {
		let json = serde_json::to_string(state)
			.map_err(|e| HistoryError::Backend(e.to_string()))?;
		js_sys::JSON::parse(&json)
			.map_err(|_| HistoryError::Backend("state serialization rejected".to_string()))
	}

	pub fn current_url() -> String {
		let Ok(window) = window() else {
			return "/".to_string();
		};
		let location = window.location();
		let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
		let search = location.search().unwrap_or_default();
		let hash = location.hash().unwrap_or_default();
		format!("{pathname}{search}{hash}")
	}

	pub fn push_state(state: &HistoryState) -> Result<(), HistoryError> {
		let js_state = state_to_js(state)?;
		history()?
			.push_state_with_url(&js_state, "", Some(&state.path))
			.map_err(|_| HistoryError::Backend("pushState rejected".to_string()))
	}

	pub fn replace_state(state: &HistoryState) -> Result<(), HistoryError> {
		let js_state = state_to_js(state)?;
		history()?
			.replace_state_with_url(&js_state, "", Some(&state.path))
			.map_err(|_| HistoryError::Backend("replaceState rejected".to_string()))
	}

	pub fn back() {
		if let Ok(history) = history() {
			let _ = history.back();
		}
	}

	pub fn forward() {
		if let Ok(history) = history() {
			let _ = history.forward();
		}
	}

	pub fn assign(url: &str) {
		if let Ok(window) = window() {
			let _ = window.location().assign(url);
		}
	}

	pub fn reload() {
		if let Ok(window) = window() {
			let _ = window.location().reload();
		}
	}

	pub fn listen<F: Fn() + 'static>(callback: F) -> HistoryListenerHandle {
		let closure =
			Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(move |_event| callback());

		if let Ok(window) = window() {
			let _ = window.add_event_listener_with_callback(
				"popstate",
				closure.as_ref().unchecked_ref(),
			);
		}

		HistoryListenerHandle {
			closure: Some(closure),
		}
	}

	pub fn unlisten(handle: &mut HistoryListenerHandle) {
		if let Some(closure) = handle.closure.take()
			&& let Ok(window) = window()
		{
			let _ = window.remove_event_listener_with_callback(
				"popstate",
				closure.as_ref().unchecked_ref(),
			);
		}
	}
}

// ---------------------------------------------------------------------------
// Native backend: in-memory history for tests
// ---------------------------------------------------------------------------

#[cfg(not(target_arch = "wasm32"))]
mod backend {
	use super::{HistoryError, HistoryListenerHandle, HistoryState};
	use std::cell::RefCell;
	use std::rc::Rc;

	struct MockHistory {
		entries: Vec<HistoryState>,
		index: usize,
		next_listener: u64,
		listeners: Vec<(u64, Rc<dyn Fn()>)>,
		full_loads: Vec<String>,
		reloads: u32,
	}

	impl MockHistory {
		fn new() -> Self {
			Self {
				entries: vec![HistoryState::new("/")],
				index: 0,
				next_listener: 0,
				listeners: Vec::new(),
				full_loads: Vec::new(),
				reloads: 0,
			}
		}

		fn dispatch(&self) -> Vec<Rc<dyn Fn()>> {
			self.listeners
				.iter()
				.map(|(_, listener)| Rc::clone(listener))
				.collect()
		}
	}

	thread_local! {
		static HISTORY: RefCell<MockHistory> = RefCell::new(MockHistory::new());
	}

	pub fn current_url() -> String {
		HISTORY.with(|h| {
			let h = h.borrow();
			h.entries[h.index].path.clone()
		})
	}

	pub fn push_state(state: &HistoryState) -> Result<(), HistoryError> {
		HISTORY.with(|h| {
			let mut h = h.borrow_mut();
			let index = h.index;
			h.entries.truncate(index + 1);
			h.entries.push(state.clone());
			h.index += 1;
		});
		Ok(())
	}

	pub fn replace_state(state: &HistoryState) -> Result<(), HistoryError> {
		HISTORY.with(|h| {
			let mut h = h.borrow_mut();
			let index = h.index;
			h.entries[index] = state.clone();
		});
		Ok(())
	}

	// Traversal dispatches listeners synchronously, standing in for the
	// asynchronous popstate event a real browser delivers.
	pub fn back() {
		let listeners = HISTORY.with(|h| {
			let mut h = h.borrow_mut();
			if h.index == 0 {
				return Vec::new();
			}
			h.index -= 1;
			h.dispatch()
		});
		for listener in listeners {
			listener();
		}
	}

	pub fn forward() {
		let listeners = HISTORY.with(|h| {
			let mut h = h.borrow_mut();
			if h.index + 1 >= h.entries.len() {
				return Vec::new();
			}
			h.index += 1;
			h.dispatch()
		});
		for listener in listeners {
			listener();
		}
	}

	pub fn assign(url: &str) {
		HISTORY.with(|h| {
			let mut h = h.borrow_mut();
			let index = h.index;
			h.entries.truncate(index + 1);
			h.entries.push(HistoryState::new(url));
			h.index += 1;
			h.full_loads.push(url.to_string());
		});
	}

	pub fn reload() {
		HISTORY.with(|h| h.borrow_mut().reloads += 1);
	}

	pub fn listen<F: Fn() + 'static>(callback: F) -> HistoryListenerHandle {
		let id = HISTORY.with(|h| {
			let mut h = h.borrow_mut();
			let id = h.next_listener;
			h.next_listener += 1;
			h.listeners.push((id, Rc::new(callback)));
			id
		});
		HistoryListenerHandle { id }
	}

	pub fn unlisten(handle: &mut HistoryListenerHandle) {
		HISTORY.with(|h| {
			h.borrow_mut()
				.listeners
				.retain(|(id, _)| *id != handle.id);
		});
	}

	pub fn reset_with(url: &str) {
		HISTORY.with(|h| {
			let mut h = h.borrow_mut();
			*h = MockHistory::new();
			h.entries[0] = HistoryState::new(url);
		});
	}

	pub fn full_load_log() -> Vec<String> {
		HISTORY.with(|h| h.borrow().full_loads.clone())
	}

	pub fn reload_count() -> u32 {
		HISTORY.with(|h| h.borrow().reloads)
	}

	pub fn entry_count() -> usize {
		HISTORY.with(|h| h.borrow().entries.len())
	}

	pub fn listener_count() -> usize {
		HISTORY.with(|h| h.borrow().listeners.len())
	}
}

impl Drop for HistoryListenerHandle {
	fn drop(&mut self) {
		backend::unlisten(self);
	}
}

/// The current relative URL (`/path?query#hash`).
pub fn current_url() -> String {
	backend::current_url()
}

/// Pushes a new history entry.
pub fn push_state(state: &HistoryState) -> Result<(), HistoryError> {
	backend::push_state(state)
}

/// Replaces the current history entry.
pub fn replace_state(state: &HistoryState) -> Result<(), HistoryError> {
	backend::replace_state(state)
}

/// Traverses one entry back. The resulting history-changed callback is the
/// only signal that the traversal took effect.
pub fn back() {
	backend::back();
}

/// Traverses one entry forward.
pub fn forward() {
	backend::forward();
}

/// Performs a full document navigation (a hard browser load).
pub fn assign(url: &str) {
	backend::assign(url);
}

/// Reloads the current document. This is the universal recovery action
/// offered by the error view.
pub fn reload() {
	backend::reload();
}

/// Registers a history-changed listener, fired on back/forward traversal.
pub fn listen<F: Fn() + 'static>(callback: F) -> HistoryListenerHandle {
	backend::listen(callback)
}

/// Resets the in-memory history to a single entry at `url`.
///
/// Test-only: simulates a fresh document load.
#[cfg(not(target_arch = "wasm32"))]
pub fn reset_with(url: &str) {
	backend::reset_with(url);
}

/// Full-document navigations recorded by the in-memory backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn full_load_log() -> Vec<String> {
	backend::full_load_log()
}

/// Number of reloads recorded by the in-memory backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn reload_count() -> u32 {
	backend::reload_count()
}

/// Number of entries in the in-memory history stack.
#[cfg(not(target_arch = "wasm32"))]
pub fn entry_count() -> usize {
	backend::entry_count()
}

/// Number of registered history listeners in the in-memory backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn listener_count() -> usize {
	backend::listener_count()
}
