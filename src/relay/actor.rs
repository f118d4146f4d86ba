use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::directory::Directory;
use super::messages::ServerMessage;
use super::types::{ConnId, OutboundMessage, RelayError, Username};

/// Commands sent to the directory actor
pub(crate) enum DirectoryCommand {
    Register {
        username: Username,
        conn: ConnId,
        peer_tx: mpsc::UnboundedSender<OutboundMessage>,
        reply: oneshot::Sender<()>,
    },
    StoreOffer {
        username: Username,
        offer: Value,
        reply: oneshot::Sender<Result<(), RelayError>>,
    },
    StoreCandidate {
        username: Username,
        candidate: Value,
        reply: oneshot::Sender<Result<(), RelayError>>,
    },
    ForwardAnswer {
        username: Username,
        answer: Value,
    },
    ForwardCandidate {
        username: Username,
        candidate: Value,
    },
    JoinCall {
        username: Username,
        reply: oneshot::Sender<Result<(Value, Vec<Value>), RelayError>>,
    },
    Deregister {
        conn: ConnId,
    },
}

/// Owns the peer directory and serializes every lookup and mutation, so a
/// join never observes a half-registered or half-removed peer.
pub(crate) async fn directory_actor(mut rx: mpsc::Receiver<DirectoryCommand>) {
    let mut directory = Directory::new();

    while let Some(cmd) = rx.recv().await {
        match cmd {
            DirectoryCommand::Register {
                username,
                conn,
                peer_tx,
                reply,
            } => {
                if directory.register(username.clone(), conn, peer_tx) {
                    info!(
                        "Peer {} registered on {} ({} peers)",
                        username,
                        conn,
                        directory.len()
                    );
                } else {
                    debug!("Peer {} already registered, keeping existing binding", username);
                }
                let _ = reply.send(());
            }

            DirectoryCommand::StoreOffer {
                username,
                offer,
                reply,
            } => {
                let result = match directory.lookup_mut(&username) {
                    Some(peer) => {
                        peer.set_offer(offer);
                        debug!("Offer stored for {}", username);
                        Ok(())
                    }
                    None => Err(RelayError::UnknownPeer(username)),
                };
                let _ = reply.send(result);
            }

            DirectoryCommand::StoreCandidate {
                username,
                candidate,
                reply,
            } => {
                let result = match directory.lookup_mut(&username) {
                    Some(peer) => {
                        peer.append_candidate(candidate);
                        debug!("Candidate stored for {}", username);
                        Ok(())
                    }
                    None => Err(RelayError::UnknownPeer(username)),
                };
                let _ = reply.send(result);
            }

            DirectoryCommand::ForwardAnswer { username, answer } => {
                match directory.lookup(&username) {
                    Some(peer) => {
                        debug!("Answer for {} forwarded to {}", username, peer.conn);
                        let msg = OutboundMessage::encode(&ServerMessage::Answer { answer });
                        let _ = peer.tx.send(msg);
                    }
                    None => debug!("Answer for unknown peer {} dropped", username),
                }
            }

            DirectoryCommand::ForwardCandidate {
                username,
                candidate,
            } => match directory.lookup(&username) {
                Some(peer) => {
                    debug!("Candidate for {} forwarded to {}", username, peer.conn);
                    let msg = OutboundMessage::encode(&ServerMessage::Candidate { candidate });
                    let _ = peer.tx.send(msg);
                }
                None => debug!("Candidate for unknown peer {} dropped", username),
            },

            DirectoryCommand::JoinCall { username, reply } => {
                let result = match directory.lookup(&username) {
                    Some(peer) => match peer.snapshot() {
                        (Some(offer), candidates) => Ok((offer, candidates)),
                        (None, _) => Err(RelayError::NoStoredOffer(username)),
                    },
                    None => Err(RelayError::UnknownPeer(username)),
                };
                let _ = reply.send(result);
            }

            DirectoryCommand::Deregister { conn } => {
                for username in directory.remove(conn) {
                    info!("Peer {} deregistered ({} closed)", username, conn);
                }
            }
        }
    }
}

/// Handle to communicate with the directory actor
#[derive(Clone)]
pub struct DirectoryHandle {
    pub(crate) tx: mpsc::Sender<DirectoryCommand>,
}

impl DirectoryHandle {
    /// Spawn a directory actor and return a handle to it.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<DirectoryCommand>(1024);
        tokio::spawn(directory_actor(rx));
        Self { tx }
    }

    /// Register `username` for the given connection. Idempotent: an existing
    /// entry keeps its original connection.
    pub async fn register(
        &self,
        username: Username,
        conn: ConnId,
        peer_tx: mpsc::UnboundedSender<OutboundMessage>,
    ) -> Result<(), RelayError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = self
            .tx
            .send(DirectoryCommand::Register {
                username,
                conn,
                peer_tx,
                reply: reply_tx,
            })
            .await;
        reply_rx.await.map_err(|_| RelayError::DirectoryClosed)
    }

    /// Store an offer on a registered peer.
    pub async fn store_offer(&self, username: Username, offer: Value) -> Result<(), RelayError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = self
            .tx
            .send(DirectoryCommand::StoreOffer {
                username,
                offer,
                reply: reply_tx,
            })
            .await;
        reply_rx.await.map_err(|_| RelayError::DirectoryClosed)?
    }

    /// Append a candidate on a registered peer.
    pub async fn store_candidate(
        &self,
        username: Username,
        candidate: Value,
    ) -> Result<(), RelayError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = self
            .tx
            .send(DirectoryCommand::StoreCandidate {
                username,
                candidate,
                reply: reply_tx,
            })
            .await;
        reply_rx.await.map_err(|_| RelayError::DirectoryClosed)?
    }

    /// Forward an answer to the named peer's connection. Dropped silently if
    /// the peer is not registered.
    pub async fn forward_answer(&self, username: Username, answer: Value) {
        let _ = self
            .tx
            .send(DirectoryCommand::ForwardAnswer { username, answer })
            .await;
    }

    /// Forward a candidate to the named peer's connection. Dropped silently
    /// if the peer is not registered.
    pub async fn forward_candidate(&self, username: Username, candidate: Value) {
        let _ = self
            .tx
            .send(DirectoryCommand::ForwardCandidate {
                username,
                candidate,
            })
            .await;
    }

    /// Snapshot the named peer's stored offer and candidates.
    pub async fn join_call(&self, username: Username) -> Result<(Value, Vec<Value>), RelayError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = self
            .tx
            .send(DirectoryCommand::JoinCall {
                username,
                reply: reply_tx,
            })
            .await;
        reply_rx.await.map_err(|_| RelayError::DirectoryClosed)?
    }

    /// Remove whatever peer the connection registered, if any.
    pub async fn deregister(&self, conn: ConnId) {
        let _ = self.tx.send(DirectoryCommand::Deregister { conn }).await;
    }
}
