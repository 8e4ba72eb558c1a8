//! Fire-and-forget task spawning.
//!
//! Navigation work is single-threaded and its futures are not `Send`, so
//! spawning goes through the platform's local executor:
//! `wasm_bindgen_futures::spawn_local` on wasm, `tokio::task::spawn_local`
//! on native targets (which requires running inside a
//! `tokio::task::LocalSet`, as the test suites do).

/// Spawns a future onto the local executor and detaches it.
#[cfg(target_arch = "wasm32")]
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(future);
}

/// Spawns a future onto the local executor and detaches it.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	drop(tokio::task::spawn_local(future));
}
