//! Channel bridge between the plugin and whoever owns the creation window.
//!
//! The popup usually lives somewhere the plugin cannot reach directly: a UI
//! thread, another task, the far side of an FFI boundary. [`ChannelCreatorFactory`]
//! turns every creation attempt into a [`PendingCreation`] on a bounded queue.
//! The window owner drains the queue, runs the flow, and answers each request
//! through [`PendingCreation::respond`].
//!
//! ```
//! use sessionkit_creator::channel::ChannelCreatorFactory;
//! use sessionkit_creator::creator::{AccountCreator, AccountCreatorFactory, CreationReply, CreationRequest};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let (factory, mut pending) = ChannelCreatorFactory::new(4);
//! tokio::spawn(async move {
//!     while let Some(creation) = pending.recv().await {
//!         creation.respond(CreationReply::failed("not today"));
//!     }
//! });
//!
//! let creator = factory.build(CreationRequest::new(Vec::new()));
//! assert_eq!(creator.create_account().await, CreationReply::failed("not today"));
//! # });
//! ```

use tokio::sync::{mpsc, oneshot};

use sessionkit::BoxFuture;

use crate::creator::{AccountCreator, AccountCreatorFactory, CreationReply, CreationRequest};

/// Reply used when the window owner goes away without answering.
pub const WINDOW_CLOSED_MESSAGE: &str =
    "The account creation window was closed before completing.";

/// A creation request waiting for the window owner's answer.
#[derive(Debug)]
pub struct PendingCreation {
    request: CreationRequest,
    responder: oneshot::Sender<CreationReply>,
}

impl PendingCreation {
    /// The request to show to the user.
    #[must_use]
    pub const fn request(&self) -> &CreationRequest {
        &self.request
    }

    /// Answers the request.
    ///
    /// Returns `false` if the waiting creator has already gone away.
    pub fn respond(self, reply: CreationReply) -> bool {
        self.responder.send(reply).is_ok()
    }

    /// Answers the request with the service's raw JSON message.
    ///
    /// A message that does not decode is reported to the creator as a
    /// declared failure carrying the decode error, so the waiting plugin
    /// always gets an answer.
    pub fn respond_message(self, message: &str) -> bool {
        let reply = CreationReply::from_json(message).unwrap_or_else(|e| {
            #[cfg(feature = "telemetry")]
            tracing::warn!(error = %e, "Undecodable account creation reply");
            CreationReply::failed(format!("Invalid reply from account creation service: {e}"))
        });
        self.respond(reply)
    }
}

/// Receiving half handed to the window owner.
pub type PendingCreations = mpsc::Receiver<PendingCreation>;

/// Builds [`ChannelCreator`]s that forward requests over a bounded channel.
#[derive(Debug, Clone)]
pub struct ChannelCreatorFactory {
    sender: mpsc::Sender<PendingCreation>,
}

impl ChannelCreatorFactory {
    /// Creates a factory and the receiver its requests arrive on.
    ///
    /// `capacity` bounds how many requests may queue before creators wait;
    /// it is raised to at least one.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, PendingCreations) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl AccountCreatorFactory for ChannelCreatorFactory {
    type Creator = ChannelCreator;

    fn build(&self, request: CreationRequest) -> ChannelCreator {
        ChannelCreator {
            sender: self.sender.clone(),
            request,
        }
    }
}

/// A creator whose flow runs on the other end of a channel.
#[derive(Debug)]
pub struct ChannelCreator {
    sender: mpsc::Sender<PendingCreation>,
    request: CreationRequest,
}

impl AccountCreator for ChannelCreator {
    fn create_account(&self) -> BoxFuture<'_, CreationReply> {
        Box::pin(async move {
            let (responder, reply) = oneshot::channel();
            let pending = PendingCreation {
                request: self.request.clone(),
                responder,
            };
            if self.sender.send(pending).await.is_err() {
                #[cfg(feature = "telemetry")]
                tracing::warn!("Account creation receiver dropped");
                return CreationReply::failed(WINDOW_CLOSED_MESSAGE);
            }
            reply
                .await
                .unwrap_or_else(|_| CreationReply::failed(WINDOW_CLOSED_MESSAGE))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessionkit::ChainIndex;

    #[tokio::test]
    async fn test_reply_reaches_creator() {
        let (factory, mut pending) = ChannelCreatorFactory::new(1);
        let request = CreationRequest::new(vec![ChainIndex::Eos.chain_id()]);
        let creator = factory.build(request.clone());

        let owner = tokio::spawn(async move {
            let creation = pending.recv().await.unwrap();
            let seen = creation.request().clone();
            assert!(creation.respond(CreationReply::created("abc", "alice")));
            seen
        });

        let reply = creator.create_account().await;
        assert_eq!(reply, CreationReply::created("abc", "alice"));
        assert_eq!(owner.await.unwrap(), request);
    }

    #[tokio::test]
    async fn test_raw_message_is_decoded() {
        let (factory, mut pending) = ChannelCreatorFactory::new(1);
        let creator = factory.build(CreationRequest::new(Vec::new()));

        tokio::spawn(async move {
            let creation = pending.recv().await.unwrap();
            creation.respond_message(r#"{"error":"User cancelled"}"#);
        });

        assert_eq!(
            creator.create_account().await,
            CreationReply::failed("User cancelled")
        );
    }

    #[tokio::test]
    async fn test_garbage_message_is_a_failure() {
        let (factory, mut pending) = ChannelCreatorFactory::new(1);
        let creator = factory.build(CreationRequest::new(Vec::new()));

        tokio::spawn(async move {
            let creation = pending.recv().await.unwrap();
            creation.respond_message("not json");
        });

        match creator.create_account().await {
            CreationReply::Failed { message } => {
                assert!(message.starts_with("Invalid reply from account creation service"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dropped_responder_closes_window() {
        let (factory, mut pending) = ChannelCreatorFactory::new(1);
        let creator = factory.build(CreationRequest::new(Vec::new()));

        tokio::spawn(async move {
            drop(pending.recv().await);
        });

        assert_eq!(
            creator.create_account().await,
            CreationReply::failed(WINDOW_CLOSED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_dropped_receiver_closes_window() {
        let (factory, pending) = ChannelCreatorFactory::new(0);
        drop(pending);
        let creator = factory.build(CreationRequest::new(Vec::new()));

        assert_eq!(
            creator.create_account().await,
            CreationReply::failed(WINDOW_CLOSED_MESSAGE)
        );
    }
}
