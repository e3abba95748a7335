//! The contract between the plugin and the external account creator.
//!
//! The plugin only ever does two things with a creator: build one for a
//! [`CreationRequest`] and await a single [`CreationReply`] from it. Everything
//! in between (opening a window, cross-window messaging, user input) belongs
//! to the creator.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use sessionkit::{BoxFuture, ChainId};

/// A unit struct representing the string literal `"wallet"`.
///
/// This is the scope tag sent with every request, telling the creation
/// service it was opened from a wallet session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WalletScope;

impl WalletScope {
    /// The string literal value: `"wallet"`.
    pub const VALUE: &'static str = "wallet";
}

impl std::fmt::Display for WalletScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Self::VALUE)
    }
}

impl AsRef<str> for WalletScope {
    fn as_ref(&self) -> &str {
        Self::VALUE
    }
}

impl Serialize for WalletScope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(Self::VALUE)
    }
}

impl<'de> Deserialize<'de> for WalletScope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == Self::VALUE {
            Ok(Self)
        } else {
            Err(serde::de::Error::custom(format!(
                "expected '{}', got '{s}'",
                Self::VALUE,
            )))
        }
    }
}

/// What the creation service is asked to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationRequest {
    /// Chains the user may create an account on, in preference order.
    /// May be empty; the service decides whether that is acceptable.
    pub supported_chains: Vec<ChainId>,
    /// Calling context tag.
    pub scope: WalletScope,
}

impl CreationRequest {
    /// Creates a wallet-scoped request for the given chains.
    #[must_use]
    pub const fn new(supported_chains: Vec<ChainId>) -> Self {
        Self {
            supported_chains,
            scope: WalletScope,
        }
    }
}

/// Error message used when the service reports a registered chain but no
/// account.
pub const MISSING_ACCOUNT_NAME_MESSAGE: &str =
    "No account name was returned by the account creation service.";

/// The single terminal reply of an external creator.
///
/// Deserializes from the service's [`ReplyMessage`] wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ReplyMessage")]
pub enum CreationReply {
    /// The service reported a chain id.
    Created {
        /// Id of the chain the account lives on, exactly as returned.
        chain_id: String,
        /// The new account's name, if the service sent one.
        account_name: Option<String>,
    },
    /// The service declared failure.
    Failed {
        /// The service's error message.
        message: String,
    },
    /// The service reported success without a chain id.
    MissingChainId {
        /// Account name, if the service sent one anyway.
        account_name: Option<String>,
    },
}

impl CreationReply {
    /// Creates a success reply.
    pub fn created(chain_id: impl Into<String>, account_name: impl Into<String>) -> Self {
        Self::Created {
            chain_id: chain_id.into(),
            account_name: Some(account_name.into()),
        }
    }

    /// Creates a declared failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Decodes a reply from the service's JSON message.
    ///
    /// # Errors
    ///
    /// Returns an error if `message` is not a JSON object of the
    /// [`ReplyMessage`] shape.
    pub fn from_json(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(message)
    }
}

/// Raw message posted back by the creation service.
///
/// ```json
/// { "error": "...", "cid": "<chain id>", "sa": "<account name>" }
/// ```
///
/// Every field is optional on the wire. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMessage {
    /// Error message, present when the service failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Chain id of the created account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    /// Name of the created account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sa: Option<String>,
}

impl From<ReplyMessage> for CreationReply {
    /// Empty `error` and `cid` strings count as absent. An error always wins.
    fn from(message: ReplyMessage) -> Self {
        let ReplyMessage { error, cid, sa } = message;
        if let Some(message) = error.filter(|m| !m.is_empty()) {
            return Self::Failed { message };
        }
        match cid.filter(|c| !c.is_empty()) {
            None => Self::MissingChainId { account_name: sa },
            Some(chain_id) => Self::Created {
                chain_id,
                account_name: sa,
            },
        }
    }
}

/// An external account creator bound to one request.
///
/// Implementations resolve exactly once. Transport problems (window closed,
/// messaging failure) are reported as [`CreationReply::Failed`].
pub trait AccountCreator: Send + Sync {
    /// Runs the creation flow and returns its terminal reply.
    fn create_account(&self) -> BoxFuture<'_, CreationReply>;
}

impl<T: AccountCreator + ?Sized> AccountCreator for Arc<T> {
    fn create_account(&self) -> BoxFuture<'_, CreationReply> {
        (**self).create_account()
    }
}

impl<T: AccountCreator + ?Sized> AccountCreator for Box<T> {
    fn create_account(&self) -> BoxFuture<'_, CreationReply> {
        (**self).create_account()
    }
}

/// Builds an [`AccountCreator`] for each request.
pub trait AccountCreatorFactory: Send + Sync {
    /// The creator type produced.
    type Creator: AccountCreator;

    /// Builds a creator for `request`.
    fn build(&self, request: CreationRequest) -> Self::Creator;
}

impl<F, C> AccountCreatorFactory for F
where
    F: Fn(CreationRequest) -> C + Send + Sync,
    C: AccountCreator,
{
    type Creator = C;

    fn build(&self, request: CreationRequest) -> C {
        self(request)
    }
}
