//! SQLite-backed persistence for rooms and their message logs.

pub mod pool;
pub mod room;

pub use pool::DatabasePool;
pub use room::SqliteRoomStore;
