//! Polling orchestration.
//!
//! On each pass, for every tracked token: load the signal and update
//! history from the store, fetch a current market reading, run the
//! decision engine, and when the decision passes persist a new update
//! record and emit a notification job downstream.

pub mod config;
pub mod engine;
pub mod types;

pub use self::config::TrackerConfig;
pub use self::engine::{TrackerEngine, run_tracker};
pub use self::types::{NotifySender, UpdateNotification};
