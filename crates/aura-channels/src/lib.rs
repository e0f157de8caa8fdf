//! # aura-channels
//!
//! Messaging platform integrations for Aura. Currently WhatsApp via the
//! Meta Cloud API.

pub mod whatsapp;

pub use whatsapp::WhatsAppMessenger;
