//! Chat message domain type for Roomcast.
//!
//! A `Message` is an immutable value: once appended to a room's log it is
//! never edited, moved, or deleted. The timestamp is always assigned by the
//! server at append time, never taken from the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single message within a room's log.
///
/// Messages are ordered by append position within a room; timestamps are
/// non-decreasing along the log because they are assigned under the room's
/// append lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// UUIDv7 message ID (time-sortable, server-assigned).
    pub id: Uuid,
    /// Identifier of the sender. Non-empty.
    pub sender: String,
    /// Message body. May be empty.
    pub content: String,
    /// When the server appended the message.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current server time.
    ///
    /// Callers that need the ordering invariant must invoke this inside the
    /// room's append critical section.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: sender.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_id_and_timestamp() {
        let before = Utc::now();
        let msg = Message::new("alice", "hello");
        let after = Utc::now();

        assert_eq!(msg.sender, "alice");
        assert_eq!(msg.content, "hello");
        assert!(msg.timestamp >= before && msg.timestamp <= after);
    }

    #[test]
    fn test_new_ids_are_unique_and_sortable() {
        let a = Message::new("alice", "first");
        let b = Message::new("alice", "second");
        assert_ne!(a.id, b.id);
        // UUIDv7 is time-ordered, so sequential creation sorts.
        assert!(a.id < b.id);
    }

    #[test]
    fn test_empty_content_is_allowed() {
        let msg = Message::new("bob", "");
        assert!(msg.content.is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let msg = Message::new("alice", "hi there");
        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains("\"sender\":\"alice\""));
        assert!(json.contains("\"content\":\"hi there\""));
        assert!(json.contains("\"timestamp\""));

        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
