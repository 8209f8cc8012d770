//! Business logic for the Roomcast chat backend.
//!
//! This crate owns the room session and message-log subsystem: the room
//! registry (room existence and the single append path), per-room message
//! logs, tail-relative pagination, and the broadcast router that fans new
//! messages out to room subscribers.
//!
//! It defines the `RoomStore` port that the infrastructure layer implements.
//! It depends only on `roomcast-types` -- never on `roomcast-infra` or any
//! database/IO crate.

pub mod broadcast;
pub mod log;
pub mod page;
pub mod registry;
pub mod router;
pub mod store;
