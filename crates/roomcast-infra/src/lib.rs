//! Infrastructure layer for Roomcast.
//!
//! Contains the SQLite implementation of the `RoomStore` port defined in
//! `roomcast-core`.

pub mod sqlite;
