//! Room registry: the single authority for room existence and log mutation.
//!
//! The registry maps room identifiers to their message logs and owns the
//! only append path. Each room's log sits behind its own `RwLock`, so
//! appends to one room serialize against each other while unrelated rooms
//! proceed concurrently -- there is no global lock across rooms.
//!
//! The registry is a cache over the durable [`RoomStore`]: lookups that miss
//! the in-memory map fall back to the store and hydrate, so rooms survive a
//! process restart.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::RwLock;
use tracing::{debug, info};

use roomcast_types::error::RoomError;
use roomcast_types::message::Message;
use roomcast_types::room::Room;

use crate::log::MessageLog;
use crate::page;
use crate::store::RoomStore;

/// Per-room slot: identity plus the log behind its append lock.
struct RoomState {
    room_id: String,
    created_at: DateTime<Utc>,
    log: RwLock<MessageLog>,
}

impl RoomState {
    fn from_room(room: Room) -> Self {
        Self {
            room_id: room.room_id,
            created_at: room.created_at,
            log: RwLock::new(MessageLog::from_messages(room.messages)),
        }
    }
}

/// Process-wide room map, generic over the durable store.
pub struct RoomRegistry<S: RoomStore> {
    store: S,
    rooms: DashMap<String, Arc<RoomState>>,
}

impl<S: RoomStore> RoomRegistry<S> {
    /// Create an empty registry backed by the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            rooms: DashMap::new(),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a new empty room.
    ///
    /// Fails with [`RoomError::AlreadyExists`] if the identifier is taken,
    /// in memory or durably. The room is persisted before it becomes
    /// visible; a failed save leaves the registry unchanged.
    pub async fn create_room(&self, room_id: &str) -> Result<Room, RoomError> {
        if self.rooms.contains_key(room_id) {
            return Err(RoomError::AlreadyExists(room_id.to_string()));
        }
        if let Some(existing) = self.store.find_room(room_id).await? {
            // Cache the durable room so later lookups skip the store.
            self.insert_if_absent(existing);
            return Err(RoomError::AlreadyExists(room_id.to_string()));
        }

        let room = Room::new(room_id);
        let saved = self.store.save_room(&room).await?;

        // Map insertion is the commit point: under a concurrent duplicate
        // create, exactly one caller lands the entry.
        match self.rooms.entry(room_id.to_string()) {
            Entry::Occupied(_) => Err(RoomError::AlreadyExists(room_id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(RoomState::from_room(saved.clone())));
                info!(%room_id, "room created");
                Ok(saved)
            }
        }
    }

    /// Look up a room and a point-in-time snapshot of its log.
    ///
    /// Pure read; no mutation.
    pub async fn get_room(&self, room_id: &str) -> Result<Room, RoomError> {
        let state = self.resolve(room_id).await?;
        let log = state.log.read().await;
        Ok(Room {
            room_id: state.room_id.clone(),
            created_at: state.created_at,
            messages: log.snapshot(),
        })
    }

    /// Append a message to a room's log and return it with its
    /// server-assigned id and timestamp.
    ///
    /// This is the only mutation path for a room's log. Stamping and
    /// persisting both happen under the room's write lock, so concurrent
    /// sends into one room serialize and the log's timestamp order holds.
    /// The store call completes before the message becomes visible: a
    /// failed save means readers never observe the message.
    pub async fn append_message(
        &self,
        room_id: &str,
        sender: &str,
        content: &str,
    ) -> Result<Message, RoomError> {
        let state = self.resolve(room_id).await?;

        // Per-room critical section.
        let mut log = state.log.write().await;

        let mut message = Message::new(sender, content);
        // Wall clocks can step backward; the log's timestamp order may not.
        if let Some(last) = log.last_timestamp() {
            if message.timestamp < last {
                message.timestamp = last;
            }
        }

        let mut messages = log.snapshot();
        messages.push(message.clone());
        let room = Room {
            room_id: state.room_id.clone(),
            created_at: state.created_at,
            messages,
        };
        self.store.save_room(&room).await?;

        log.append(message.clone());
        debug!(room_id = %state.room_id, len = log.len(), "message appended");
        Ok(message)
    }

    /// Check that a room exists, hydrating it on a cache miss, without
    /// copying its log.
    pub async fn ensure_room(&self, room_id: &str) -> Result<(), RoomError> {
        self.resolve(room_id).await.map(|_| ())
    }

    /// One page of a room's history, newest page 0.
    ///
    /// Out-of-range or non-positive inputs are normalized, never rejected;
    /// only an unknown room is an error.
    pub async fn page_messages(
        &self,
        room_id: &str,
        page_number: i64,
        page_size: i64,
    ) -> Result<Vec<Message>, RoomError> {
        let state = self.resolve(room_id).await?;
        let log = state.log.read().await;
        Ok(page::page(log.messages(), page_number, page_size))
    }

    /// Resolve a room slot, hydrating from the store on a cache miss.
    async fn resolve(&self, room_id: &str) -> Result<Arc<RoomState>, RoomError> {
        if let Some(state) = self.rooms.get(room_id) {
            return Ok(Arc::clone(&state));
        }
        match self.store.find_room(room_id).await? {
            Some(room) => {
                debug!(%room_id, "room hydrated from store");
                Ok(self.insert_if_absent(room))
            }
            None => Err(RoomError::NotFound(room_id.to_string())),
        }
    }

    /// Insert a hydrated room unless a concurrent caller beat us to it; the
    /// first slot in wins either way.
    fn insert_if_absent(&self, room: Room) -> Arc<RoomState> {
        let entry = self
            .rooms
            .entry(room.room_id.clone())
            .or_insert_with(|| Arc::new(RoomState::from_room(room)));
        Arc::clone(&entry)
    }
}

impl<S: RoomStore> std::fmt::Debug for RoomRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRegistry")
            .field("rooms", &self.rooms.len())
            .finish()
    }
}
