//! Reactive primitives for the navigation engine.
//!
//! This module provides the two building blocks every other component is
//! wired together with:
//!
//! - [`Signal`]: a shared mutable value with change notification
//! - [`EventChannel`]: an explicit observer list with disposer-based
//!   unsubscription
//!
//! Both are single-threaded (`Rc`/`RefCell`): all navigation work runs on
//! the UI event loop, so no synchronization is required.

pub mod channel;
pub mod signal;

pub use channel::{EventChannel, Subscription};
pub use signal::Signal;
