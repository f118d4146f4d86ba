use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use super::actor::DirectoryHandle;
use super::messages::{ClientMessage, ServerMessage};
use super::types::{ConnId, OutboundMessage, RelayError};

/// Payload sent in place of an absent answer/candidate on the forwarding
/// paths, matching the wire behavior clients already expect.
fn empty_payload() -> Value {
    Value::String(String::new())
}

/// Dispatch one inbound message against the shared directory.
///
/// `Err` is a protocol violation: the caller must tear the connection down
/// and deregister it. Missing forward targets are the one soft case — the
/// message is dropped and the connection stays open.
pub(crate) async fn dispatch(
    msg: ClientMessage,
    conn: ConnId,
    tx: &mpsc::UnboundedSender<OutboundMessage>,
    directory: &DirectoryHandle,
) -> Result<(), RelayError> {
    if msg.username().is_empty() {
        return Err(RelayError::EmptyUsername);
    }

    match msg {
        ClientMessage::StoreUser { username } => {
            directory.register(username, conn, tx.clone()).await
        }

        ClientMessage::StoreOffer { username, offer } => {
            let offer = offer.ok_or(RelayError::MissingPayload("offer"))?;
            directory.store_offer(username, offer).await
        }

        ClientMessage::StoreCandidate {
            username,
            candidate,
        } => {
            let candidate = candidate.ok_or(RelayError::MissingPayload("candidate"))?;
            directory.store_candidate(username, candidate).await
        }

        ClientMessage::SendAnswer { username, answer } => {
            directory
                .forward_answer(username, answer.unwrap_or_else(empty_payload))
                .await;
            Ok(())
        }

        ClientMessage::SendCandidate {
            username,
            candidate,
        } => {
            directory
                .forward_candidate(username, candidate.unwrap_or_else(empty_payload))
                .await;
            Ok(())
        }

        ClientMessage::JoinCall { username } => {
            debug!("{} joining call with {}", conn, username);
            let (offer, candidates) = directory.join_call(username).await?;

            // offer first, then candidates in insertion order; the writer
            // task drains this channel in FIFO order
            let _ = tx.send(OutboundMessage::encode(&ServerMessage::Offer { offer }));
            for candidate in candidates {
                let _ = tx.send(OutboundMessage::encode(&ServerMessage::Candidate {
                    candidate,
                }));
            }
            Ok(())
        }
    }
}
