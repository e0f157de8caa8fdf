//! # aura-core
//!
//! Core types, traits, configuration, and error handling for the Aura assistant.

pub mod config;
pub mod error;
pub mod model;
pub mod traits;

pub use error::AuraError;
