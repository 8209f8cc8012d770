//! Application state wiring the registry, channels, and router together.
//!
//! The core components are generic over the `RoomStore` trait; AppState
//! pins them to the SQLite implementation from roomcast-infra.

use std::sync::Arc;

use roomcast_core::broadcast::RoomChannels;
use roomcast_core::registry::RoomRegistry;
use roomcast_core::router::MessageRouter;
use roomcast_infra::sqlite::pool::{DatabasePool, default_database_url, resolve_data_dir};
use roomcast_infra::sqlite::room::SqliteRoomStore;

/// Concrete type aliases pinning the core generics to the SQLite store.
pub type ConcreteRegistry = RoomRegistry<SqliteRoomStore>;
pub type ConcreteRouter = MessageRouter<SqliteRoomStore>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConcreteRegistry>,
    pub router: ConcreteRouter,
}

impl AppState {
    /// Initialize the application state: connect to the database, wire the
    /// registry and broadcast router.
    ///
    /// With no explicit URL the database lands in the resolved data
    /// directory, which is created if missing.
    pub async fn init(database_url: Option<String>) -> anyhow::Result<Self> {
        let database_url = match database_url {
            Some(url) => url,
            None => {
                tokio::fs::create_dir_all(resolve_data_dir()).await?;
                default_database_url()
            }
        };

        let db_pool = DatabasePool::new(&database_url).await?;
        let registry = Arc::new(RoomRegistry::new(SqliteRoomStore::new(db_pool)));
        let channels = Arc::new(RoomChannels::new());
        let router = MessageRouter::new(Arc::clone(&registry), channels);

        Ok(Self { registry, router })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_wires_a_working_registry() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        let state = AppState::init(Some(url)).await.unwrap();

        state.registry.create_room("general").await.unwrap();
        let mut rx = state.router.subscribe("general");
        let sent = state.router.send("general", "alice", "hi").await.unwrap();
        assert_eq!(rx.recv().await.unwrap().id, sent.id);
    }
}
