//! The send pipeline: resolve room, append durably, then fan out.
//!
//! `MessageRouter` ties the registry and the per-room channels together.
//! A send commits the message to the room's log (and the durable store)
//! before any subscriber hears about it, so a client that reconnects and
//! pages history is guaranteed to see everything it was ever notified of.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use roomcast_types::error::RoomError;
use roomcast_types::message::Message;

use crate::broadcast::RoomChannels;
use crate::registry::RoomRegistry;
use crate::store::RoomStore;

/// Routes inbound sends into room logs and out to subscribers.
pub struct MessageRouter<S: RoomStore> {
    registry: Arc<RoomRegistry<S>>,
    channels: Arc<RoomChannels>,
}

impl<S: RoomStore> MessageRouter<S> {
    pub fn new(registry: Arc<RoomRegistry<S>>, channels: Arc<RoomChannels>) -> Self {
        Self { registry, channels }
    }

    /// Access the room registry.
    pub fn registry(&self) -> &RoomRegistry<S> {
        &self.registry
    }

    /// Subscribe to a room's real-time feed.
    ///
    /// Existence is not checked here; callers that want to reject unknown
    /// rooms resolve them through the registry first.
    pub fn subscribe(&self, room_id: &str) -> broadcast::Receiver<Message> {
        self.channels.subscribe(room_id)
    }

    /// Send a message into a room.
    ///
    /// Fails with [`RoomError::NotFound`] for an unknown room and
    /// [`RoomError::Store`] when the durable save fails; in both cases no
    /// subscriber is notified and the log is untouched. On success the
    /// stored message (with its server-assigned id and timestamp) is
    /// published best-effort to the room's current subscribers and
    /// returned.
    pub async fn send(
        &self,
        room_id: &str,
        sender: &str,
        content: &str,
    ) -> Result<Message, RoomError> {
        let message = self.registry.append_message(room_id, sender, content).await?;

        let delivered = self.channels.publish(room_id, message.clone());
        debug!(%room_id, delivered, "message broadcast");

        Ok(message)
    }
}

impl<S: RoomStore> Clone for MessageRouter<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            channels: Arc::clone(&self.channels),
        }
    }
}

impl<S: RoomStore> std::fmt::Debug for MessageRouter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRouter")
            .field("registry", &self.registry)
            .field("channels", &self.channels)
            .finish()
    }
}
