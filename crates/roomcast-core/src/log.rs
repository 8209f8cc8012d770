//! Append-only, per-room ordered message sequence.

use chrono::{DateTime, Utc};
use roomcast_types::message::Message;

/// The ordered message history of a single room.
///
/// Append-only: messages are pushed to the tail and never reordered or
/// removed. Callers are expected to serialize writes per room (the registry
/// holds one log per room behind an `RwLock`); the log itself is a plain
/// sequence with no interior locking.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from an already-ordered message sequence (store
    /// hydration path).
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Append a message to the tail. O(1) amortized.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full ordered sequence, borrowed.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// An owned copy of the full ordered sequence.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Timestamp of the most recent message, if any.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.timestamp)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut log = MessageLog::new();
        log.append(Message::new("alice", "one"));
        log.append(Message::new("bob", "two"));
        log.append(Message::new("alice", "three"));

        let contents: Vec<&str> = log
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut log = MessageLog::new();
        log.append(Message::new("alice", "one"));

        let snapshot = log.snapshot();
        log.append(Message::new("alice", "two"));

        // The snapshot taken before the second append does not grow.
        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_last_timestamp() {
        let mut log = MessageLog::new();
        assert!(log.last_timestamp().is_none());

        let msg = Message::new("alice", "one");
        let ts = msg.timestamp;
        log.append(msg);
        assert_eq!(log.last_timestamp(), Some(ts));
    }

    #[test]
    fn test_from_messages_hydration() {
        let msgs = vec![Message::new("a", "1"), Message::new("b", "2")];
        let log = MessageLog::from_messages(msgs.clone());
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages(), msgs.as_slice());
    }
}
