#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Account creation through an external creation service.
//!
//! [`CreatorPlugin`] implements [`sessionkit::AccountCreationPlugin`] by
//! handing a [`CreationRequest`] to an external creator (typically a popup
//! window driven by the embedding application), then validating the single
//! [`CreationReply`] it gets back against the host's chain registry.
//!
//! # Flow
//!
//! 1. Pick the chains to offer: the context's single chain, else its candidate
//!    list, else the configured defaults.
//! 2. Build a creator for the request and await its reply.
//! 3. Map the reply onto a [`sessionkit::CreateAccountResponse`], or classify
//!    the failure, report it to the host's UI and return it.
//!
//! # Modules
//!
//! - [`creator`] - Request, reply and the creator traits
//! - [`channel`] - Channel bridge for creators living on another task
//! - [`config`] - Plugin configuration and TOML loading
//! - [`plugin`] - The plugin itself
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod channel;
pub mod config;
pub mod creator;
pub mod plugin;

pub use channel::{ChannelCreator, ChannelCreatorFactory, PendingCreation};
pub use config::{ConfigError, CreatorConfig, CreatorFileConfig};
pub use creator::{
    AccountCreator, AccountCreatorFactory, CreationReply, CreationRequest, ReplyMessage,
    WalletScope,
};
pub use plugin::{CreatorPlugin, PLUGIN_ID, PLUGIN_LOGO, resolve_reply};
