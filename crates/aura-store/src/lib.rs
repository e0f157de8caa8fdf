//! # aura-store
//!
//! SQLite-backed persistence for users, conversations, messages, and
//! tasks, plus the in-process change feed over the task table.

pub mod feed;
pub mod store;

pub use feed::TaskFeed;
pub use store::Store;
