use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::mpsc;

use super::types::{ConnId, OutboundMessage, Username};

/// One registered peer: its connection and its negotiation state.
#[derive(Debug)]
pub(crate) struct Peer {
    pub conn: ConnId,
    /// Channel into the connection's writer task.
    pub tx: mpsc::UnboundedSender<OutboundMessage>,
    offer: Option<Value>,
    candidates: Vec<Value>,
}

impl Peer {
    fn new(conn: ConnId, tx: mpsc::UnboundedSender<OutboundMessage>) -> Self {
        Self {
            conn,
            tx,
            offer: None,
            candidates: Vec::new(),
        }
    }

    /// Overwrite the stored session description.
    pub fn set_offer(&mut self, payload: Value) {
        self.offer = Some(payload);
    }

    /// Append an ICE candidate. No deduplication, insertion order kept.
    pub fn append_candidate(&mut self, payload: Value) {
        self.candidates.push(payload);
    }

    /// Read-only copy of the negotiation state for relaying to a requester.
    pub fn snapshot(&self) -> (Option<Value>, Vec<Value>) {
        (self.offer.clone(), self.candidates.clone())
    }
}

/// Registry of connected peers, keyed by username. Owned exclusively by the
/// directory actor task; all access is serialized through it.
#[derive(Debug, Default)]
pub(crate) struct Directory {
    peers: HashMap<Username, Peer>,
    /// Reverse index so removal on disconnect does not scan the map. A
    /// connection may register more than one username; all of them die with
    /// it.
    by_conn: HashMap<ConnId, Vec<Username>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `username` for `conn`. Returns true if a new entry was
    /// created. An existing entry is left untouched: the first registrant
    /// keeps the binding and later registrations are no-ops.
    pub fn register(
        &mut self,
        username: Username,
        conn: ConnId,
        tx: mpsc::UnboundedSender<OutboundMessage>,
    ) -> bool {
        if self.peers.contains_key(&username) {
            return false;
        }
        self.by_conn.entry(conn).or_default().push(username.clone());
        self.peers.insert(username, Peer::new(conn, tx));
        true
    }

    pub fn lookup(&self, username: &Username) -> Option<&Peer> {
        self.peers.get(username)
    }

    pub fn lookup_mut(&mut self, username: &Username) -> Option<&mut Peer> {
        self.peers.get_mut(username)
    }

    /// Remove every peer registered by `conn`. Idempotent; a connection that
    /// never registered is a no-op.
    pub fn remove(&mut self, conn: ConnId) -> Vec<Username> {
        let usernames = self.by_conn.remove(&conn).unwrap_or_default();
        for username in &usernames {
            self.peers.remove(username);
        }
        usernames
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }
}
