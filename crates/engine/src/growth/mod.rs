//! Growth pipeline, in data-flow order: trigger → classify (→ select) →
//! queue → throttle → apply.

pub mod apply;
pub mod classify;
pub mod queue;
pub mod select;
pub mod throttle;
pub mod trigger;
