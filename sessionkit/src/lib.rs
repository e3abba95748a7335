#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Host-side interface for delegated account creation.
//!
//! This crate holds the narrow contract between a wallet session host and the
//! account creation plugins it loads. It knows nothing about popups, windows,
//! or how an account actually gets created; it only defines what a plugin is
//! handed and what it must hand back.
//!
//! # Modules
//!
//! - [`chain`] - Antelope chain identifiers, the known chain table and the id registry
//! - [`context`] - Per-call request context and the UI error sink
//! - [`error`] - Classified account creation failures
//! - [`plugin`] - The account creation plugin trait, metadata and responses
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod chain;
pub mod context;
pub mod error;
pub mod plugin;

pub use chain::{ChainDefinition, ChainId, ChainIndex, ChainRegistry};
pub use context::{CreateAccountContext, UserInterface};
pub use error::AccountCreationError;
pub use plugin::{
    AccountCreationPlugin, AccountCreationPluginConfig, AccountCreationPluginMetadata, BoxFuture,
    CreateAccountResponse,
};
