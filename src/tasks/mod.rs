//! Background Tasks Module
//!
//! Long-running tasks owned by the data service.
//!
//! # Tasks
//! - Cache sweep: removes expired cache entries at a fixed interval
//! - Live tracking: one polling task per tracked game, fanned out through
//!   the [`EventBus`]

mod cleanup;
mod events;
mod live;

pub use cleanup::spawn_cleanup_task;
pub use events::{Callback, EventBus, Subscription};
pub use live::{LiveTracker, LIVE_SUMMARY_TTL_SECS};
