//! Per-call context handed to account creation plugins.

use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::chain::ChainDefinition;
use crate::error::AccountCreationError;

/// The host's user-facing error sink.
///
/// Plugins call [`on_error`](Self::on_error) synchronously with every failure
/// before returning that failure to the caller.
pub trait UserInterface: Send + Sync {
    /// Displays or otherwise surfaces an account creation failure.
    fn on_error(&self, error: &AccountCreationError);
}

impl<F> UserInterface for F
where
    F: Fn(&AccountCreationError) + Send + Sync,
{
    fn on_error(&self, error: &AccountCreationError) {
        self(error);
    }
}

/// Context for a single account creation request.
///
/// `chain` pins creation to one chain and takes priority over `chains`, a list
/// of candidates. When neither is set the plugin falls back to its own
/// configured chains.
#[derive(Clone)]
pub struct CreateAccountContext {
    /// A single chain the account must be created on.
    pub chain: Option<ChainDefinition>,
    /// Candidate chains the user may choose from.
    pub chains: Option<Vec<ChainDefinition>>,
    /// Error sink for user-facing failure reporting.
    pub ui: Arc<dyn UserInterface>,
}

impl Debug for CreateAccountContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateAccountContext")
            .field("chain", &self.chain)
            .field("chains", &self.chains)
            .field("ui", &"<UserInterface>")
            .finish()
    }
}

impl CreateAccountContext {
    /// Creates a context with no chain preference.
    pub fn new(ui: Arc<dyn UserInterface>) -> Self {
        Self {
            chain: None,
            chains: None,
            ui,
        }
    }

    /// Pins creation to a single chain.
    #[must_use]
    pub fn with_chain(mut self, chain: ChainDefinition) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Sets the candidate chain list.
    #[must_use]
    pub fn with_chains(mut self, chains: impl IntoIterator<Item = ChainDefinition>) -> Self {
        self.chains = Some(chains.into_iter().collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainIndex;
    use std::sync::Mutex;

    #[test]
    fn test_closure_is_a_user_interface() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ctx = CreateAccountContext::new(Arc::new(move |err: &AccountCreationError| {
            sink.lock().unwrap().push(err.clone());
        }));

        ctx.ui.on_error(&AccountCreationError::MissingChainId);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![AccountCreationError::MissingChainId]
        );
    }

    #[test]
    fn test_builders_set_chain_preferences() {
        let ctx = CreateAccountContext::new(Arc::new(|_: &AccountCreationError| {}))
            .with_chain(ChainIndex::Eos.definition())
            .with_chains([ChainIndex::Wax.definition(), ChainIndex::Telos.definition()]);

        assert_eq!(ctx.chain, Some(ChainIndex::Eos.definition()));
        assert_eq!(ctx.chains.as_ref().map(Vec::len), Some(2));
        assert!(format!("{ctx:?}").contains("<UserInterface>"));
    }
}
