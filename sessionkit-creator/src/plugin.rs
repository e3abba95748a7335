//! The account creation plugin.

#[cfg(feature = "telemetry")]
use tracing::instrument;

use sessionkit::{
    AccountCreationError, AccountCreationPlugin, AccountCreationPluginConfig,
    AccountCreationPluginMetadata, BoxFuture, ChainId, ChainRegistry, CreateAccountContext,
    CreateAccountResponse,
};

use crate::config::CreatorConfig;
use crate::creator::{
    AccountCreator, AccountCreatorFactory, CreationReply, CreationRequest,
    MISSING_ACCOUNT_NAME_MESSAGE,
};

/// Identifier this plugin reports to the host.
pub const PLUGIN_ID: &str = "account-creation-service";

/// Logo shown by the host next to the plugin name.
pub const PLUGIN_LOGO: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHZpZXdCb3g9IjAgMCAyNCAyNCI+PGNpcmNsZSBjeD0iMTIiIGN5PSI4IiByPSI0IiBmaWxsPSIjMzY1MGEyIi8+PHBhdGggZD0iTTQgMjFhOCA4IDAgMCAxIDE2IDB6IiBmaWxsPSIjMzY1MGEyIi8+PC9zdmc+";

/// An [`AccountCreationPlugin`] that delegates to an external creation service.
///
/// Each call to [`create`](AccountCreationPlugin::create) builds one creator
/// through the factory `F`, awaits its reply, and maps the reply onto the
/// host's chain registry. Nothing is retried and no state carries over
/// between calls.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sessionkit::{AccountCreationError, AccountCreationPlugin, BoxFuture, ChainIndex, CreateAccountContext};
/// use sessionkit_creator::{AccountCreator, CreationReply, CreationRequest, CreatorPlugin};
///
/// struct Instant;
///
/// impl AccountCreator for Instant {
///     fn create_account(&self) -> BoxFuture<'_, CreationReply> {
///         Box::pin(async { CreationReply::created(ChainIndex::Eos.info().id, "alice") })
///     }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let plugin = CreatorPlugin::new(|_: CreationRequest| Instant);
/// let context = CreateAccountContext::new(Arc::new(|_: &AccountCreationError| {}));
///
/// let response = plugin.create(&context).await.unwrap();
/// assert_eq!(response.chain, ChainIndex::Eos.definition());
/// assert_eq!(response.account_name, "alice");
/// # });
/// ```
#[derive(Debug)]
pub struct CreatorPlugin<F> {
    factory: F,
    config: CreatorConfig,
    registry: ChainRegistry,
    metadata: AccountCreationPluginMetadata,
}

impl<F: AccountCreatorFactory> CreatorPlugin<F> {
    /// Creates a plugin with the default configuration and the known chain
    /// registry.
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, CreatorConfig::default())
    }

    /// Creates a plugin with an explicit configuration.
    pub fn with_config(factory: F, config: CreatorConfig) -> Self {
        let metadata = AccountCreationPluginMetadata::new(
            "Account Creation Service",
            "Create an account using a hosted account creation service.",
        )
        .with_logo(PLUGIN_LOGO)
        .with_homepage(config.service_url.as_str());
        Self {
            factory,
            config,
            registry: ChainRegistry::known(),
            metadata,
        }
    }

    /// Replaces the chain registry used to resolve returned chain ids.
    #[must_use]
    pub fn with_registry(mut self, registry: ChainRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the display metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: AccountCreationPluginMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the plugin configuration.
    #[must_use]
    pub const fn creator_config(&self) -> &CreatorConfig {
        &self.config
    }

    /// Returns the chain registry.
    #[must_use]
    pub const fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Returns the creator factory.
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Chains to offer for `context`, in order.
    ///
    /// A single chain on the context wins over its candidate list, which wins
    /// over the configured defaults. The result may be empty.
    #[must_use]
    pub fn supported_chain_ids(&self, context: &CreateAccountContext) -> Vec<ChainId> {
        if let Some(chain) = &context.chain {
            return vec![chain.id.clone()];
        }
        context
            .chains
            .as_deref()
            .unwrap_or(self.config.supported_chains.as_slice())
            .iter()
            .map(|chain| chain.id.clone())
            .collect()
    }

    /// Runs one account creation attempt.
    ///
    /// Failures are passed to the context's UI sink and then returned.
    ///
    /// # Errors
    ///
    /// Returns the classified [`AccountCreationError`] for any reply that is
    /// not a success on a registered chain.
    #[cfg_attr(feature = "telemetry", instrument(name = "sessionkit.creator.create", skip_all, err))]
    pub async fn create_account(
        &self,
        context: &CreateAccountContext,
    ) -> Result<CreateAccountResponse, AccountCreationError> {
        let request = CreationRequest::new(self.supported_chain_ids(context));
        #[cfg(feature = "telemetry")]
        tracing::debug!(
            chains = request.supported_chains.len(),
            scope = %request.scope,
            "Dispatching account creation request"
        );

        let creator = self.factory.build(request);
        let reply = creator.create_account().await;

        match resolve_reply(reply, &self.registry) {
            Ok(response) => {
                #[cfg(feature = "telemetry")]
                tracing::info!(
                    chain = %response.chain.id,
                    account = %response.account_name,
                    "Account created"
                );
                Ok(response)
            }
            Err(error) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(reason = error.reason(), error = %error, "Account creation failed");
                context.ui.on_error(&error);
                Err(error)
            }
        }
    }
}

impl<F: AccountCreatorFactory> AccountCreationPlugin for CreatorPlugin<F> {
    fn id(&self) -> &str {
        PLUGIN_ID
    }

    fn metadata(&self) -> &AccountCreationPluginMetadata {
        &self.metadata
    }

    fn config(&self) -> AccountCreationPluginConfig {
        self.config.plugin_config()
    }

    fn create<'a>(
        &'a self,
        context: &'a CreateAccountContext,
    ) -> BoxFuture<'a, Result<CreateAccountResponse, AccountCreationError>> {
        Box::pin(self.create_account(context))
    }
}

/// Maps a creator reply onto the host's chain registry.
///
/// Checks run in a fixed order: declared failure, then missing chain id, then
/// unknown chain id, then missing account name. An empty chain id counts as
/// missing. The account name is passed through untouched.
///
/// # Errors
///
/// - [`AccountCreationError::ExternalService`] for [`CreationReply::Failed`],
///   or for a registered chain without an account name
/// - [`AccountCreationError::MissingChainId`] for [`CreationReply::MissingChainId`]
///   or an empty chain id
/// - [`AccountCreationError::UnsupportedChain`] if the chain id is not registered
pub fn resolve_reply(
    reply: CreationReply,
    registry: &ChainRegistry,
) -> Result<CreateAccountResponse, AccountCreationError> {
    let (chain_id, account_name) = match reply {
        CreationReply::Failed { message } => {
            return Err(AccountCreationError::ExternalService(message));
        }
        CreationReply::MissingChainId { .. } => return Err(AccountCreationError::MissingChainId),
        CreationReply::Created { chain_id, .. } if chain_id.is_empty() => {
            return Err(AccountCreationError::MissingChainId);
        }
        CreationReply::Created {
            chain_id,
            account_name,
        } => (chain_id, account_name),
    };

    let Some(chain) = registry.resolve(&chain_id) else {
        return Err(AccountCreationError::UnsupportedChain { chain_id });
    };
    let account_name = account_name
        .ok_or_else(|| AccountCreationError::external(MISSING_ACCOUNT_NAME_MESSAGE))?;

    Ok(CreateAccountResponse {
        chain: chain.clone(),
        account_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessionkit::{ChainDefinition, ChainIndex};
    use std::sync::Arc;

    struct Never;

    impl AccountCreator for Never {
        fn create_account(&self) -> BoxFuture<'_, CreationReply> {
            Box::pin(std::future::pending())
        }
    }

    fn plugin() -> CreatorPlugin<impl AccountCreatorFactory> {
        CreatorPlugin::new(|_: CreationRequest| Never)
    }

    fn context() -> CreateAccountContext {
        CreateAccountContext::new(Arc::new(|_: &AccountCreationError| {}))
    }

    #[test]
    fn test_single_chain_wins_over_candidates() {
        let ctx = context()
            .with_chain(ChainIndex::Jungle4.definition())
            .with_chains([ChainIndex::Eos.definition(), ChainIndex::Wax.definition()]);
        assert_eq!(
            plugin().supported_chain_ids(&ctx),
            vec![ChainIndex::Jungle4.chain_id()]
        );
    }

    #[test]
    fn test_candidates_keep_their_order() {
        let ctx = context().with_chains([
            ChainIndex::Wax.definition(),
            ChainIndex::Proton.definition(),
            ChainIndex::Eos.definition(),
        ]);
        assert_eq!(
            plugin().supported_chain_ids(&ctx),
            vec![
                ChainIndex::Wax.chain_id(),
                ChainIndex::Proton.chain_id(),
                ChainIndex::Eos.chain_id(),
            ]
        );
    }

    #[test]
    fn test_configured_defaults_when_context_is_silent() {
        assert_eq!(
            plugin().supported_chain_ids(&context()),
            vec![
                ChainIndex::Eos.chain_id(),
                ChainIndex::Telos.chain_id(),
                ChainIndex::Wax.chain_id(),
            ]
        );
    }

    #[test]
    fn test_empty_defaults_give_empty_set() {
        let plugin = CreatorPlugin::with_config(
            |_: CreationRequest| Never,
            CreatorConfig::default().with_supported_chains(Vec::<ChainDefinition>::new()),
        );
        assert!(plugin.supported_chain_ids(&context()).is_empty());
    }

    #[test]
    fn test_empty_candidate_list_is_not_replaced_by_defaults() {
        let ctx = context().with_chains(Vec::<ChainDefinition>::new());
        assert!(plugin().supported_chain_ids(&ctx).is_empty());
    }

    #[test]
    fn test_resolve_created() {
        let reply = CreationReply::created(ChainIndex::Eos.info().id, "alice");
        let response = resolve_reply(reply, &ChainRegistry::known()).unwrap();
        assert_eq!(response.chain, ChainIndex::Eos.definition());
        assert_eq!(response.account_name, "alice");
    }

    #[test]
    fn test_resolve_passes_account_name_verbatim() {
        let reply = CreationReply::created(ChainIndex::Wax.info().id, " Not.A.Valid.Name ");
        let response = resolve_reply(reply, &ChainRegistry::known()).unwrap();
        assert_eq!(response.account_name, " Not.A.Valid.Name ");
    }

    #[test]
    fn test_resolve_failed() {
        let err = resolve_reply(CreationReply::failed("Nope"), &ChainRegistry::known()).unwrap_err();
        assert_eq!(err, AccountCreationError::ExternalService("Nope".into()));
    }

    #[test]
    fn test_resolve_missing_chain_id_ignores_account_name() {
        let reply = CreationReply::MissingChainId {
            account_name: Some("alice".into()),
        };
        let err = resolve_reply(reply, &ChainRegistry::known()).unwrap_err();
        assert_eq!(err, AccountCreationError::MissingChainId);
    }

    #[test]
    fn test_resolve_unknown_chain() {
        let unknown = "9999999999999999999999999999999999999999999999999999999deadbeef";
        let registry = ChainRegistry::from_chains(&[*ChainIndex::Eos.info()]);
        let err = resolve_reply(CreationReply::created(unknown, "alice"), &registry).unwrap_err();
        assert_eq!(err, AccountCreationError::unsupported_chain(unknown));
        assert!(err.to_string().contains(unknown));
    }

    #[test]
    fn test_resolve_empty_chain_id_is_missing() {
        let err = resolve_reply(CreationReply::created("", "alice"), &ChainRegistry::known())
            .unwrap_err();
        assert_eq!(err, AccountCreationError::MissingChainId);
    }

    #[test]
    fn test_resolve_unknown_chain_without_account_name() {
        let unknown = "9999999999999999999999999999999999999999999999999999999deadbeef";
        let reply = CreationReply::from_json(&format!(r#"{{"cid":"{unknown}"}}"#)).unwrap();
        let err = resolve_reply(reply, &ChainRegistry::known()).unwrap_err();
        assert_eq!(err, AccountCreationError::unsupported_chain(unknown));
    }

    #[test]
    fn test_resolve_known_chain_without_account_name() {
        let reply = CreationReply::Created {
            chain_id: ChainIndex::Eos.info().id.to_owned(),
            account_name: None,
        };
        let err = resolve_reply(reply, &ChainRegistry::known()).unwrap_err();
        assert_eq!(err, AccountCreationError::external(MISSING_ACCOUNT_NAME_MESSAGE));
    }

    #[test]
    fn test_resolve_uses_given_registry() {
        let registry = ChainRegistry::from_chains(&[*ChainIndex::Eos.info()]);
        let reply = CreationReply::created(ChainIndex::Wax.info().id, "alice");
        assert!(matches!(
            resolve_reply(reply, &registry),
            Err(AccountCreationError::UnsupportedChain { .. })
        ));
    }

    #[test]
    fn test_metadata_and_config() {
        let plugin = plugin();
        assert_eq!(plugin.id(), PLUGIN_ID);
        assert_eq!(plugin.name(), "Account Creation Service");
        assert_eq!(plugin.metadata().logo.as_deref(), Some(PLUGIN_LOGO));
        assert_eq!(
            plugin.metadata().homepage.as_deref(),
            Some("https://create.anchor.link/")
        );
        let config = plugin.config();
        assert!(!config.requires_chain_select);
        assert_eq!(config.supported_chains.len(), 3);
    }
}
