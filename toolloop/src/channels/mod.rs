//! State update strategies for graph runs.
//!
//! See [`StateUpdater`]; the messages reducer lives next to its state type in
//! [`crate::state`].

mod updater;

pub use updater::{BoxedStateUpdater, ReplaceUpdater, StateUpdater};
