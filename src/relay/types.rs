use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_tungstenite::tungstenite::Utf8Bytes;

use super::messages::ServerMessage;

/// Relay protocol errors. Every variant is fatal for the connection that
/// triggered it; none of them is fatal for the process.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("unknown peer: {0}")]
    UnknownPeer(Username),

    #[error("no stored offer for peer: {0}")]
    NoStoredOffer(Username),

    #[error("missing {0} payload")]
    MissingPayload(&'static str),

    #[error("username is empty")]
    EmptyUsername,

    #[error("directory unavailable")]
    DirectoryClosed,
}

/// Client-chosen peer identifier, unique among registered peers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier for one accepted transport connection, allocated by the accept
/// loop. Deregistration is keyed on this, not on the username.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(pub(crate) u64);

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Wrapper for outbound WebSocket messages using tungstenite's Utf8Bytes.
#[derive(Debug, Clone)]
pub struct OutboundMessage(Utf8Bytes);

impl OutboundMessage {
    /// Serialize a server message for the wire.
    pub fn encode(msg: &ServerMessage) -> Self {
        // ServerMessage carries only JSON values; serialization cannot fail
        let json =
            serde_json::to_string(msg).expect("ServerMessage serialization should never fail");
        Self(Utf8Bytes::from(json))
    }

    /// Get the inner Utf8Bytes for tungstenite Message::Text
    pub fn into_inner(self) -> Utf8Bytes {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
