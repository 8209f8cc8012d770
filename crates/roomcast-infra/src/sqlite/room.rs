//! SQLite room store implementation.
//!
//! Implements `RoomStore` from `roomcast-core` using sqlx with the split
//! read/write pool: raw queries, private Row structs, reads on the reader
//! half and writes on the single-connection writer.
//!
//! Messages are keyed by their UUID and carry a per-room `seq` column that
//! preserves append order, so `save_room` is idempotent: re-saving a room
//! inserts only the messages past the highest persisted `seq`.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use roomcast_core::store::RoomStore;
use roomcast_types::error::StoreError;
use roomcast_types::message::Message;
use roomcast_types::room::Room;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `RoomStore`.
pub struct SqliteRoomStore {
    pool: DatabasePool,
}

impl SqliteRoomStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct RoomRow {
    room_id: String,
    created_at: String,
}

impl RoomRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            room_id: row.try_get("room_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_room(self, messages: Vec<Message>) -> Result<Room, StoreError> {
        let created_at = parse_datetime(&self.created_at)?;
        Ok(Room {
            room_id: self.room_id,
            created_at,
            messages,
        })
    }
}

struct MessageRow {
    id: String,
    sender: String,
    content: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender: row.try_get("sender")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid message id: {e}")))?;
        let timestamp = parse_datetime(&self.timestamp)?;
        Ok(Message {
            id,
            sender: self.sender,
            content: self.content,
            timestamp,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// RoomStore implementation
// ---------------------------------------------------------------------------

impl RoomStore for SqliteRoomStore {
    async fn save_room(&self, room: &Room) -> Result<Room, StoreError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO rooms (room_id, created_at) VALUES (?, ?)
             ON CONFLICT(room_id) DO NOTHING",
        )
        .bind(&room.room_id)
        .bind(format_datetime(&room.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        // Append-only log: only rows past the highest persisted seq are new.
        let max_seq: (Option<i64>,) =
            sqlx::query_as("SELECT MAX(seq) FROM room_messages WHERE room_id = ?")
                .bind(&room.room_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;
        let next_seq = max_seq.0.map(|m| m + 1).unwrap_or(0) as usize;

        for (seq, message) in room.messages.iter().enumerate().skip(next_seq) {
            sqlx::query(
                "INSERT INTO room_messages (id, room_id, seq, sender, content, timestamp)
                 VALUES (?, ?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO NOTHING",
            )
            .bind(message.id.to_string())
            .bind(&room.room_id)
            .bind(seq as i64)
            .bind(&message.sender)
            .bind(&message.content)
            .bind(format_datetime(&message.timestamp))
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(room.clone())
    }

    async fn find_room(&self, room_id: &str) -> Result<Option<Room>, StoreError> {
        let row = sqlx::query("SELECT room_id, created_at FROM rooms WHERE room_id = ?")
            .bind(room_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let room_row = RoomRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;

        let message_rows = sqlx::query(
            "SELECT id, sender, content, timestamp FROM room_messages
             WHERE room_id = ? ORDER BY seq",
        )
        .bind(room_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let messages = message_rows
            .iter()
            .map(|r| {
                MessageRow::from_row(r)
                    .map_err(|e| StoreError::Query(e.to_string()))?
                    .into_message()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(room_row.into_room(messages)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store(dir: &tempfile::TempDir, name: &str) -> SqliteRoomStore {
        let db_path = dir.path().join(name);
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        SqliteRoomStore::new(DatabasePool::new(&url).await.unwrap())
    }

    fn room_with_messages(room_id: &str, contents: &[&str]) -> Room {
        let mut room = Room::new(room_id);
        for content in contents {
            room.messages.push(Message::new("alice", *content));
        }
        room
    }

    #[tokio::test]
    async fn find_missing_room_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir, "missing.db").await;

        assert!(store.find_room("nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_room_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir, "empty.db").await;

        let room = Room::new("general");
        store.save_room(&room).await.unwrap();

        let found = store.find_room("general").await.unwrap().unwrap();
        assert_eq!(found.room_id, "general");
        assert!(found.messages.is_empty());
    }

    #[tokio::test]
    async fn messages_come_back_in_append_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir, "ordered.db").await;

        let room = room_with_messages("general", &["one", "two", "three"]);
        store.save_room(&room).await.unwrap();

        let found = store.find_room("general").await.unwrap().unwrap();
        let contents: Vec<&str> = found.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
        assert_eq!(found.messages[0].id, room.messages[0].id);
    }

    #[tokio::test]
    async fn resave_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir, "idempotent.db").await;

        let room = room_with_messages("general", &["one", "two"]);
        store.save_room(&room).await.unwrap();
        store.save_room(&room).await.unwrap();

        let found = store.find_room("general").await.unwrap().unwrap();
        assert_eq!(found.messages.len(), 2);
    }

    #[tokio::test]
    async fn incremental_saves_extend_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir, "incremental.db").await;

        let mut room = room_with_messages("general", &["one"]);
        store.save_room(&room).await.unwrap();

        room.messages.push(Message::new("bob", "two"));
        store.save_room(&room).await.unwrap();

        let found = store.find_room("general").await.unwrap().unwrap();
        let contents: Vec<&str> = found.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two"]);
    }

    #[tokio::test]
    async fn rooms_do_not_share_messages() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir, "isolated.db").await;

        store
            .save_room(&room_with_messages("a", &["for a"]))
            .await
            .unwrap();
        store
            .save_room(&room_with_messages("b", &["for b"]))
            .await
            .unwrap();

        let a = store.find_room("a").await.unwrap().unwrap();
        let b = store.find_room("b").await.unwrap().unwrap();
        assert_eq!(a.messages[0].content, "for a");
        assert_eq!(b.messages[0].content, "for b");
    }

    #[tokio::test]
    async fn registry_round_trip_over_sqlite() {
        use roomcast_core::registry::RoomRegistry;

        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("registry.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        {
            let store = SqliteRoomStore::new(DatabasePool::new(&url).await.unwrap());
            let registry = RoomRegistry::new(store);
            registry.create_room("general").await.unwrap();
            registry
                .append_message("general", "alice", "survives restart")
                .await
                .unwrap();
        }

        // A fresh registry over the same database hydrates the room.
        let store = SqliteRoomStore::new(DatabasePool::new(&url).await.unwrap());
        let registry = RoomRegistry::new(store);
        let room = registry.get_room("general").await.unwrap();
        assert_eq!(room.messages.len(), 1);
        assert_eq!(room.messages[0].content, "survives restart");
    }
}
