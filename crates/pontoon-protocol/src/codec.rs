//! Codec trait and the JSON implementation.
//!
//! The server doesn't care how messages are framed — it goes through the
//! [`Codec`] trait, so the wire format can change without touching the
//! connection handling. [`JsonCodec`] produces text frames, which is what
//! browser clients consume.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts messages to and from wire frames.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into a text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes an inbound frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the frame is malformed or
    /// doesn't match the expected message shape. Callers drop such
    /// frames silently per the error policy.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that speaks JSON via `serde_json`.
///
/// Behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientMessage, PlayerId, ServerMessage};

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        let msg = ServerMessage::Welcome {
            player_id: PlayerId(9),
        };
        let frame = codec.encode(&msg).unwrap();
        let decoded: ServerMessage = codec.decode(frame.as_bytes()).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_json_codec_rejects_garbage() {
        let codec = JsonCodec;
        let result: Result<ClientMessage, _> = codec.decode(b"not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_json_codec_rejects_wrong_shape() {
        let codec = JsonCodec;
        let result: Result<ClientMessage, _> =
            codec.decode(br#"{"kind":"hit"}"#);
        assert!(result.is_err());
    }
}
