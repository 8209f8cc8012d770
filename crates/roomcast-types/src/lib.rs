//! Shared domain types for Roomcast.
//!
//! This crate contains the core domain types used across the Roomcast chat
//! backend: Room, Message, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod error;
pub mod message;
pub mod room;
