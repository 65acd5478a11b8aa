//! Shared domain types for firstgame.
//!
//! Characters, their equipment slots, the flat permission model, caller
//! identity, configuration, and the error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod auth;
pub mod character;
pub mod config;
pub mod equipment;
pub mod error;
pub mod permission;
