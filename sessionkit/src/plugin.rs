//! The account creation plugin interface.
//!
//! A host loads any number of [`AccountCreationPlugin`] implementations and
//! drives them through [`AccountCreationPlugin::create`]. The trait is
//! dyn-compatible so hosts can keep heterogeneous plugins in one list.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

use crate::chain::ChainDefinition;
use crate::context::CreateAccountContext;
use crate::error::AccountCreationError;

/// A boxed, `Send` future borrowed for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The normalized result of a successful account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountResponse {
    /// The chain the account was created on.
    pub chain: ChainDefinition,
    /// The new account's name, as reported by the creation service.
    pub account_name: String,
}

/// Display metadata for a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreationPluginMetadata {
    /// Display name.
    pub name: String,
    /// Short description of what the plugin does.
    pub description: String,
    /// Logo, usually a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Link to the service behind the plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

impl AccountCreationPluginMetadata {
    /// Creates metadata with a name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            logo: None,
            homepage: None,
        }
    }

    /// Sets the logo.
    #[must_use]
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Sets the homepage link.
    #[must_use]
    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }
}

/// Static configuration a plugin reports to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreationPluginConfig {
    /// Whether the host must ask the user to pick a chain before calling
    /// [`AccountCreationPlugin::create`].
    pub requires_chain_select: bool,
    /// Chains the plugin can create accounts on when the caller does not
    /// narrow the choice.
    pub supported_chains: Vec<ChainDefinition>,
}

/// An account creation plugin.
pub trait AccountCreationPlugin: Send + Sync {
    /// A unique, URL-friendly identifier for the plugin.
    fn id(&self) -> &str;

    /// Display name. Defaults to the metadata name.
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Display metadata.
    fn metadata(&self) -> &AccountCreationPluginMetadata;

    /// The plugin's static configuration.
    fn config(&self) -> AccountCreationPluginConfig;

    /// Creates an account.
    ///
    /// On failure the error has already been passed to
    /// [`UserInterface::on_error`](crate::UserInterface::on_error) by the
    /// time the future resolves.
    fn create<'a>(
        &'a self,
        context: &'a CreateAccountContext,
    ) -> BoxFuture<'a, Result<CreateAccountResponse, AccountCreationError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainIndex;

    #[test]
    fn test_response_serializes_camel_case() {
        let response = CreateAccountResponse {
            chain: ChainIndex::Eos.definition(),
            account_name: "alice".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accountName"], "alice");
        assert_eq!(json["chain"]["id"], ChainIndex::Eos.info().id);
    }

    #[test]
    fn test_metadata_skips_missing_fields() {
        let metadata = AccountCreationPluginMetadata::new("Creator", "Creates accounts");
        let json = serde_json::to_value(&metadata).unwrap();
        assert!(json.get("logo").is_none());
        assert!(json.get("homepage").is_none());

        let metadata = metadata.with_homepage("https://example.com");
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["homepage"], "https://example.com");
    }

    #[test]
    fn test_plugin_config_serializes_camel_case() {
        let config = AccountCreationPluginConfig {
            requires_chain_select: false,
            supported_chains: vec![ChainIndex::Wax.definition()],
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["requiresChainSelect"], false);
        assert_eq!(json["supportedChains"].as_array().map(Vec::len), Some(1));
    }
}
