//! # aura-scheduler
//!
//! Turns stored task frequencies into recurring reminder deliveries:
//! frequency parsing, the in-memory job table with idempotent replace,
//! the timer-driven scheduler service, and the change-feed listener
//! that keeps the job table consistent with the task store.

pub mod listener;
pub mod recurrence;
pub mod service;

pub use listener::FeedListener;
pub use recurrence::{parse_frequency, Recurrence};
pub use service::{ReminderPayload, SchedulerService};
