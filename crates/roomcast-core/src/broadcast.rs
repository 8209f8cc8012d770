//! Per-room broadcast channels for real-time fan-out.
//!
//! Built on `tokio::sync::broadcast`: one sender per room, created lazily on
//! first subscribe or publish. Delivery is best-effort and at-most-once --
//! a subscriber that lags past the channel buffer drops messages, a room
//! with no subscribers drops the publish entirely, and neither case slows
//! the publisher or the other subscribers. History fetch is the backfill
//! path for anything missed.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use roomcast_types::message::Message;

/// Buffer size for per-room broadcast channels.
const CHANNEL_BUFFER: usize = 1024;

/// Lazily-created per-room broadcast channels.
pub struct RoomChannels {
    senders: DashMap<String, broadcast::Sender<Message>>,
}

impl RoomChannels {
    pub fn new() -> Self {
        Self {
            senders: DashMap::new(),
        }
    }

    /// Subscribe to a room's channel, creating it on first use.
    ///
    /// The receiver sees only messages published after this call -- no
    /// replay of earlier history.
    pub fn subscribe(&self, room_id: &str) -> broadcast::Receiver<Message> {
        let entry = self
            .senders
            .entry(room_id.to_string())
            .or_insert_with(|| {
                let (tx, _) = broadcast::channel(CHANNEL_BUFFER);
                tx
            });
        entry.subscribe()
    }

    /// Publish a message to a room's current subscribers.
    ///
    /// Returns the number of subscribers the message was handed to. A room
    /// whose channel does not exist or has no subscribers gets 0 and the
    /// message is silently dropped.
    pub fn publish(&self, room_id: &str, message: Message) -> usize {
        if let Some(sender) = self.senders.get(room_id) {
            match sender.send(message) {
                Ok(count) => count,
                Err(_) => {
                    debug!(%room_id, "no active subscribers, message dropped from channel");
                    0
                }
            }
        } else {
            debug!(%room_id, "no channel for room, message dropped from channel");
            0
        }
    }

    /// Current subscriber count for a room's channel.
    pub fn subscriber_count(&self, room_id: &str) -> usize {
        self.senders
            .get(room_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for RoomChannels {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoomChannels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomChannels")
            .field("rooms", &self.senders.len())
            .finish()
    }
}
