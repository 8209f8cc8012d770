//! `RoomStore` trait definition -- the durable store port.
//!
//! Implementations live in roomcast-infra (e.g., `SqliteRoomStore`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use roomcast_types::error::StoreError;
use roomcast_types::room::Room;

/// Port for persisting rooms and their message logs.
///
/// The registry treats the store as a bounded, fallible external call: a
/// failed save aborts the request that triggered it, and the core never
/// retries internally.
pub trait RoomStore: Send + Sync {
    /// Persist a room together with its full ordered message log.
    ///
    /// Must be idempotent for messages that were already persisted, so that
    /// re-saving a room after an append costs only the new tail.
    fn save_room(
        &self,
        room: &Room,
    ) -> impl std::future::Future<Output = Result<Room, StoreError>> + Send;

    /// Load a room with its full ordered message log, or `None` if no room
    /// with that identifier exists.
    fn find_room(
        &self,
        room_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Room>, StoreError>> + Send;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory `RoomStore` for unit tests, with fault injection and call
    //! counting.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use tokio::sync::Mutex;

    use roomcast_types::error::StoreError;
    use roomcast_types::room::Room;

    use super::RoomStore;

    #[derive(Default)]
    pub(crate) struct MemoryRoomStore {
        rooms: Mutex<HashMap<String, Room>>,
        save_calls: AtomicUsize,
        fail_saves: AtomicBool,
    }

    impl MemoryRoomStore {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent `save_room` fail.
        pub(crate) fn fail_saves(&self, fail: bool) {
            self.fail_saves.store(fail, Ordering::SeqCst);
        }

        /// Number of `save_room` calls observed.
        pub(crate) fn save_calls(&self) -> usize {
            self.save_calls.load(Ordering::SeqCst)
        }

        /// Seed a room directly, bypassing the registry (restart scenarios).
        pub(crate) async fn seed(&self, room: Room) {
            self.rooms.lock().await.insert(room.room_id.clone(), room);
        }

        /// What the store currently holds for a room.
        pub(crate) async fn stored(&self, room_id: &str) -> Option<Room> {
            self.rooms.lock().await.get(room_id).cloned()
        }
    }

    impl RoomStore for MemoryRoomStore {
        async fn save_room(&self, room: &Room) -> Result<Room, StoreError> {
            self.save_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(StoreError::Query("injected save failure".to_string()));
            }
            self.rooms
                .lock()
                .await
                .insert(room.room_id.clone(), room.clone());
            Ok(room.clone())
        }

        async fn find_room(&self, room_id: &str) -> Result<Option<Room>, StoreError> {
            Ok(self.rooms.lock().await.get(room_id).cloned())
        }
    }
}
