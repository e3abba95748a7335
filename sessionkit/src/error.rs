//! Error types for delegated account creation.
//!
//! Every failure a plugin reports to the host falls into one of three
//! classified kinds. None of them are retried by the plugin.

/// A classified account creation failure.
///
/// The same value is handed to [`UserInterface::on_error`](crate::UserInterface::on_error)
/// and then returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountCreationError {
    /// The external creation service declared failure. The message is passed
    /// through verbatim.
    #[error("{0}")]
    ExternalService(String),

    /// The service reported success but did not say which chain the account
    /// was created on.
    #[error("No chain ID was returned by the account creation service.")]
    MissingChainId,

    /// The service returned a chain id the host does not know.
    #[error("The chain ID \"{chain_id}\" is not supported by this account creation plugin.")]
    UnsupportedChain {
        /// The unrecognized chain id, exactly as returned.
        chain_id: String,
    },
}

impl AccountCreationError {
    /// Creates an external service error from the service's message.
    #[must_use]
    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalService(message.into())
    }

    /// Creates an unsupported chain error for the given id.
    #[must_use]
    pub fn unsupported_chain(chain_id: impl Into<String>) -> Self {
        Self::UnsupportedChain {
            chain_id: chain_id.into(),
        }
    }

    /// Machine-readable reason for the error.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ExternalService(_) => "external_service_error",
            Self::MissingChainId => "missing_chain_id",
            Self::UnsupportedChain { .. } => "unsupported_chain",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_message_is_verbatim() {
        let err = AccountCreationError::external("User closed the window");
        assert_eq!(err.to_string(), "User closed the window");
        assert_eq!(err.reason(), "external_service_error");
    }

    #[test]
    fn test_missing_chain_id_message() {
        assert_eq!(
            AccountCreationError::MissingChainId.to_string(),
            "No chain ID was returned by the account creation service."
        );
    }

    #[test]
    fn test_unsupported_chain_names_the_id() {
        let err = AccountCreationError::unsupported_chain("9999deadbeef");
        assert_eq!(
            err.to_string(),
            "The chain ID \"9999deadbeef\" is not supported by this account creation plugin."
        );
        assert_eq!(err.reason(), "unsupported_chain");
    }
}
