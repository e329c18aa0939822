//! Unified error type for the server crate.

use pontoon_protocol::ProtocolError;
use pontoon_room::RoomError;

/// Top-level error that wraps the lower-layer errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts lower-layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A socket-level error (bind, accept).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A WebSocket-level error (handshake, send, recv).
    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not joinable, already seated, gone).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pontoon_protocol::RoomId;

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotJoinable(RoomId(3));
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Room(_)));
        assert!(server_err.to_string().contains("R-3"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Protocol(_)));
    }
}
