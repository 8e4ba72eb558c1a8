//! Authentication-gated navigation.
//!
//! The router does not implement session storage or token validation; it
//! consumes an external authentication signal ([`SessionState`]) and
//! enforces per-route requirements through a small state machine
//! ([`AuthGate`]) that decides, on every route change and every
//! auth-state change, whether to redirect to the login view or resume a
//! deferred destination.

pub mod gate;
pub mod session;

pub use gate::{AuthGate, GatePhase};
pub use session::SessionState;
