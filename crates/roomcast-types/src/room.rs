//! Room domain type for Roomcast.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A named, persistent container for an ordered message history.
///
/// The `room_id` is supplied by the client at creation and is immutable
/// afterwards. Messages appear in append order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Room {
    /// Create an empty room with the given identifier.
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_room_is_empty() {
        let room = Room::new("general");
        assert_eq!(room.room_id, "general");
        assert!(room.messages.is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut room = Room::new("general");
        room.messages.push(Message::new("alice", "hello"));

        let json = serde_json::to_string(&room).unwrap();
        assert!(json.contains("\"room_id\":\"general\""));

        let parsed: Room = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.room_id, "general");
        assert_eq!(parsed.messages.len(), 1);
    }
}
