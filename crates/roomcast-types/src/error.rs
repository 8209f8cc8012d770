use thiserror::Error;

/// Errors from durable store operations (used by the `RoomStore` trait
/// definition in roomcast-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors related to room operations.
///
/// `AlreadyExists` and `NotFound` are recoverable, user-facing conditions;
/// `Store` means the durable store call failed and the request was aborted
/// with no partial effects.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room '{0}' already exists")]
    AlreadyExists(String),

    #[error("room '{0}' not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_error_display() {
        let err = RoomError::AlreadyExists("general".to_string());
        assert_eq!(err.to_string(), "room 'general' already exists");

        let err = RoomError::NotFound("lobby".to_string());
        assert_eq!(err.to_string(), "room 'lobby' not found");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_store_error_converts_to_room_error() {
        let err: RoomError = StoreError::Connection.into();
        assert!(matches!(err, RoomError::Store(StoreError::Connection)));
    }
}
