//! Waypost: a WebSocket signaling relay for WebRTC peer discovery.

pub mod relay;
