use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::Username;

/// Messages sent from client to server.
///
/// Offer/candidate payloads are optional at the parse layer; the router
/// enforces presence where the protocol requires it, so a missing payload is
/// a protocol violation rather than a parse error.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Register the sending connection under a username
    #[serde(rename = "store_user")]
    StoreUser { username: Username },

    /// Publish a session description on the named peer
    #[serde(rename = "store_offer")]
    StoreOffer {
        username: Username,
        offer: Option<Value>,
    },

    /// Append an ICE candidate to the named peer
    #[serde(rename = "store_candidate")]
    StoreCandidate {
        username: Username,
        candidate: Option<Value>,
    },

    /// Forward an answer to the named peer's connection
    #[serde(rename = "send_answer")]
    SendAnswer {
        username: Username,
        answer: Option<Value>,
    },

    /// Forward a candidate to the named peer's connection
    #[serde(rename = "send_candidate")]
    SendCandidate {
        username: Username,
        candidate: Option<Value>,
    },

    /// Retrieve the named peer's stored offer and candidates
    #[serde(rename = "join_call")]
    JoinCall { username: Username },
}

impl ClientMessage {
    /// The peer this message is about.
    pub fn username(&self) -> &Username {
        match self {
            Self::StoreUser { username }
            | Self::StoreOffer { username, .. }
            | Self::StoreCandidate { username, .. }
            | Self::SendAnswer { username, .. }
            | Self::SendCandidate { username, .. }
            | Self::JoinCall { username } => username,
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// A stored session description, in reply to `join_call`
    #[serde(rename = "offer")]
    Offer { offer: Value },

    /// An answer forwarded from another peer
    #[serde(rename = "answer")]
    Answer { answer: Value },

    /// An ICE candidate, forwarded or replayed from stored state
    #[serde(rename = "candidate")]
    Candidate { candidate: Value },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_store_user() {
        let json = r#"{"type": "store_user", "username": "alice"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::StoreUser { .. }));
        assert_eq!(msg.username().as_str(), "alice");
    }

    #[test]
    fn parse_store_offer() {
        let json = r#"{"type": "store_offer", "username": "alice", "offer": {"sdp": "v=0"}}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        if let ClientMessage::StoreOffer { username, offer } = msg {
            assert_eq!(username.as_str(), "alice");
            assert_eq!(offer.unwrap()["sdp"], "v=0");
        } else {
            panic!("Expected StoreOffer");
        }
    }

    #[test]
    fn parse_store_offer_without_payload() {
        let json = r#"{"type": "store_offer", "username": "alice"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        if let ClientMessage::StoreOffer { offer, .. } = msg {
            assert!(offer.is_none());
        } else {
            panic!("Expected StoreOffer");
        }
    }

    #[test]
    fn parse_store_candidate() {
        let json =
            r#"{"type": "store_candidate", "username": "alice", "candidate": {"port": 5000}}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        if let ClientMessage::StoreCandidate { candidate, .. } = msg {
            assert_eq!(candidate.unwrap()["port"], 5000);
        } else {
            panic!("Expected StoreCandidate");
        }
    }

    #[test]
    fn parse_send_answer_without_payload() {
        let json = r#"{"type": "send_answer", "username": "alice"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        if let ClientMessage::SendAnswer { answer, .. } = msg {
            assert!(answer.is_none());
        } else {
            panic!("Expected SendAnswer");
        }
    }

    #[test]
    fn parse_join_call() {
        let json = r#"{"type": "join_call", "username": "alice"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::JoinCall { .. }));
    }

    #[test]
    fn parse_rejects_unknown_type() {
        let json = r#"{"type": "open_portal", "username": "alice"}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn parse_rejects_missing_username() {
        let json = r#"{"type": "join_call"}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn parse_ignores_extra_fields() {
        let json = r#"{"type": "store_user", "username": "alice", "extra": 1}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_ok());
    }

    #[test]
    fn serialize_offer() {
        let msg = ServerMessage::Offer {
            offer: json!({"sdp": "v=0"}),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"offer\""));
        assert!(json.contains("v=0"));
    }

    #[test]
    fn serialize_answer() {
        let msg = ServerMessage::Answer {
            answer: json!({"sdp": "v=0 answer"}),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"answer\""));
    }

    #[test]
    fn serialize_candidate() {
        let msg = ServerMessage::Candidate {
            candidate: json!({"port": 5000}),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"candidate\""));
        assert!(json.contains("5000"));
    }
}
