//! WebSocket signaling relay for WebRTC peer discovery
//!
//! Peers register under a username, publish an offer and ICE candidates, and
//! other peers retrieve that state or forward answers back. The relay never
//! touches media; it only brokers the negotiation handshake.

mod actor;
mod directory;
mod messages;
mod router;
mod server;
mod types;

pub use actor::DirectoryHandle;
pub use messages::{ClientMessage, ServerMessage};
pub use server::{DEFAULT_PORT, RelayServer};
pub use types::{ConnId, OutboundMessage, RelayError, Username};
