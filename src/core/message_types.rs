//! Wire message types for the shared world protocol
//!
//! Every frame is an envelope `{"type": ..., "payload": ...}`. Inbound frames
//! are decoded in two stages: the envelope first, then the payload for the
//! recognised tag. The set of accepted messages is closed; anything else
//! decodes to [`ClientMessage::Unknown`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::core::player_table::GameSnapshot;
use crate::error::{Result, SyncError};

pub const SET_PLAYER_INFO: &str = "setPlayerInfo";
pub const UPDATE_POSITION: &str = "updatePosition";
pub const SEND_MESSAGE: &str = "sendMessage";
pub const GAME_STATE: &str = "gameState";

/// Outer wrapper of every inbound frame, payload kept undecoded
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

// Payload fields follow zero-value semantics: an absent or null field
// decodes to its default, a field of the wrong type fails the message.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfoPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "spriteType", default, deserialize_with = "null_as_default")]
    pub sprite_type: String,
}

/// Only the coordinates are applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPayload {
    pub x: f64,
    pub y: f64,
}

/// `updatePosition` carries a whole player shape. The non-coordinate fields
/// are type-checked and then discarded so they can never reach the table.
#[derive(Debug, Deserialize)]
struct PlayerShapedPosition {
    #[serde(default, deserialize_with = "null_as_default")]
    x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    y: f64,
    #[serde(default)]
    #[allow(dead_code)]
    id: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    message: Option<String>,
    #[serde(rename = "spriteType", default)]
    #[allow(dead_code)]
    sprite_type: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    name: Option<String>,
}

impl From<PlayerShapedPosition> for PositionPayload {
    fn from(shape: PlayerShapedPosition) -> Self {
        Self {
            x: shape.x,
            y: shape.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Client-to-server message types
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    SetPlayerInfo(PlayerInfoPayload),
    UpdatePosition(PositionPayload),
    SendMessage(ChatPayload),
    /// Well-formed envelope with a tag this server does not handle
    Unknown(String),
}

impl ClientMessage {
    /// Decode a text frame
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_slice(text.as_bytes())
    }

    /// Decode a raw frame body
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| SyncError::MessageParseError(format!("Invalid envelope: {}", e)))?;
        Self::from_envelope(envelope)
    }

    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        let Envelope { kind, payload } = envelope;
        match kind.as_str() {
            SET_PLAYER_INFO => decode_payload(&kind, payload).map(Self::SetPlayerInfo),
            UPDATE_POSITION => decode_payload::<PlayerShapedPosition>(&kind, payload)
                .map(|shape| Self::UpdatePosition(shape.into())),
            SEND_MESSAGE => decode_payload(&kind, payload).map(Self::SendMessage),
            _ => Ok(Self::Unknown(kind)),
        }
    }

    /// Wire tag of this message
    pub fn kind(&self) -> &str {
        match self {
            Self::SetPlayerInfo(_) => SET_PLAYER_INFO,
            Self::UpdatePosition(_) => UPDATE_POSITION,
            Self::SendMessage(_) => SEND_MESSAGE,
            Self::Unknown(kind) => kind,
        }
    }
}

// A null or missing payload decodes like an empty object
fn decode_payload<T: DeserializeOwned>(kind: &str, payload: Value) -> Result<T> {
    let payload = match payload {
        Value::Null => Value::Object(Map::new()),
        Value::Object(fields) => Value::Object(fields),
        other => {
            return Err(SyncError::PayloadError {
                kind: kind.to_string(),
                reason: format!("expected an object, got {}", other),
            })
        }
    };
    serde_json::from_value(payload).map_err(|e| SyncError::PayloadError {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

/// Server-to-client message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Full player table keyed by player id
    #[serde(rename = "gameState")]
    GameState(GameSnapshot),
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldSettings;
    use crate::core::player::Player;
    use serde_json::json;

    #[test]
    fn test_decode_set_player_info() {
        let msg = ClientMessage::from_text(
            r#"{"type":"setPlayerInfo","payload":{"name":"Ann","spriteType":"cat"}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SetPlayerInfo(PlayerInfoPayload {
                name: "Ann".to_string(),
                sprite_type: "cat".to_string(),
            })
        );
        assert_eq!(msg.kind(), SET_PLAYER_INFO);
    }

    #[test]
    fn test_update_position_ignores_extra_fields() {
        let msg = ClientMessage::from_text(
            r#"{"type":"updatePosition","payload":{"x":3.5,"y":-2,"id":"other","name":"Spoof","spriteType":"dragon"}}"#,
        )
        .unwrap();
        assert_eq!(msg, ClientMessage::UpdatePosition(PositionPayload { x: 3.5, y: -2.0 }));
    }

    #[test]
    fn test_unknown_tag_is_not_an_error() {
        let msg = ClientMessage::from_text(r#"{"type":"teleport","payload":{}}"#).unwrap();
        assert_eq!(msg, ClientMessage::Unknown("teleport".to_string()));
    }

    #[test]
    fn test_malformed_envelope() {
        let err = ClientMessage::from_text("not json").unwrap_err();
        assert!(matches!(err, SyncError::MessageParseError(_)));

        let err = ClientMessage::from_text(r#"{"type":4,"payload":{}}"#).unwrap_err();
        assert!(matches!(err, SyncError::MessageParseError(_)));
    }

    #[test]
    fn test_missing_type_is_unknown() {
        let msg = ClientMessage::from_text(r#"{"payload":{}}"#).unwrap();
        assert_eq!(msg, ClientMessage::Unknown(String::new()));
    }

    #[test]
    fn test_partial_payload_fills_defaults() {
        let msg =
            ClientMessage::from_text(r#"{"type":"setPlayerInfo","payload":{"name":"Ann"}}"#)
                .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SetPlayerInfo(PlayerInfoPayload {
                name: "Ann".to_string(),
                sprite_type: String::new(),
            })
        );

        let msg = ClientMessage::from_text(r#"{"type":"updatePosition","payload":{"y":1}}"#)
            .unwrap();
        assert_eq!(msg, ClientMessage::UpdatePosition(PositionPayload { x: 0.0, y: 1.0 }));

        let msg = ClientMessage::from_text(
            r#"{"type":"setPlayerInfo","payload":{"name":null,"spriteType":"cat"}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SetPlayerInfo(PlayerInfoPayload {
                name: String::new(),
                sprite_type: "cat".to_string(),
            })
        );
    }

    #[test]
    fn test_null_or_absent_payload_decodes_as_empty() {
        for text in [
            r#"{"type":"sendMessage","payload":null}"#,
            r#"{"type":"sendMessage"}"#,
            r#"{"type":"sendMessage","payload":{}}"#,
        ] {
            let msg = ClientMessage::from_text(text).unwrap();
            assert_eq!(
                msg,
                ClientMessage::SendMessage(ChatPayload {
                    message: String::new()
                }),
                "{}",
                text
            );
        }

        let msg = ClientMessage::from_text(r#"{"type":"setPlayerInfo"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::SetPlayerInfo(PlayerInfoPayload {
                name: String::new(),
                sprite_type: String::new(),
            })
        );
    }

    #[test]
    fn test_update_position_rejects_wrong_typed_player_fields() {
        let cases = [
            r#"{"type":"updatePosition","payload":{"x":7,"y":8,"name":5}}"#,
            r#"{"type":"updatePosition","payload":{"x":7,"y":8,"id":true}}"#,
            r#"{"type":"updatePosition","payload":{"x":7,"y":8,"spriteType":[]}}"#,
            r#"{"type":"updatePosition","payload":{"x":7,"y":8,"message":{}}}"#,
        ];
        for case in cases {
            let err = ClientMessage::from_text(case).unwrap_err();
            assert!(
                matches!(err, SyncError::PayloadError { .. }),
                "expected payload error for {}",
                case
            );
        }
    }

    #[test]
    fn test_malformed_payloads() {
        let cases = [
            r#"{"type":"updatePosition","payload":{"x":"left","y":1}}"#,
            r#"{"type":"setPlayerInfo","payload":{"name":7,"spriteType":"cat"}}"#,
            r#"{"type":"sendMessage","payload":{"message":false}}"#,
            r#"{"type":"sendMessage","payload":"hello"}"#,
            r#"{"type":"updatePosition","payload":[1,2]}"#,
        ];
        for case in cases {
            let err = ClientMessage::from_text(case).unwrap_err();
            assert!(
                matches!(err, SyncError::PayloadError { .. }),
                "expected payload error for {}",
                case
            );
        }
    }

    #[test]
    fn test_game_state_wire_shape() {
        let mut snapshot = GameSnapshot::new();
        let mut player = Player::new("p1".to_string(), 100.0, 100.0, &WorldSettings::default());
        player.message = "hi".to_string();
        snapshot.insert(player.id.clone(), player);

        let value: Value =
            serde_json::from_str(&ServerMessage::GameState(snapshot).to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "gameState",
                "payload": {
                    "p1": {
                        "id": "p1",
                        "x": 100.0,
                        "y": 100.0,
                        "message": "hi",
                        "spriteType": "ghost",
                        "name": "Player"
                    }
                }
            })
        );
    }
}
