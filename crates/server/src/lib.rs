//! Async host for the sprout growth engine.
//!
//! Wires a [`sprout_engine::GrowthEngine`] to a shared in-memory world, a
//! broadcast event bus and a tokio timer, plus the demo terrain and default
//! Konstructs configuration the `sprout` binary runs with.

pub mod block;
pub mod event_bus;
pub mod host;
pub mod metrics;
pub mod terrain;
