//! Creator plugin configuration.
//!
//! [`CreatorConfig`] is the immutable value a [`CreatorPlugin`](crate::CreatorPlugin)
//! is built with. [`CreatorFileConfig`] loads one from TOML with support for
//! environment variable expansion in string values. Variables use `$VAR` or
//! `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! service_url = "${CREATOR_SERVICE_URL}"
//! supported_chains = ["eos", "telos", "wax"]
//! ```
//!
//! # Environment Variables
//!
//! - `CREATOR_CONFIG`: Path to configuration file (default: `creator.toml`)
//! - `SERVICE_URL`: Override the creation service URL

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use sessionkit::{AccountCreationPluginConfig, ChainDefinition, ChainIndex};
use url::Url;

/// Public account creation service used when none is configured.
pub const DEFAULT_SERVICE_URL: &str = "https://create.anchor.link";

/// Chains offered when neither the caller nor the configuration narrows the choice.
pub const DEFAULT_SUPPORTED_CHAINS: [ChainIndex; 3] =
    [ChainIndex::Eos, ChainIndex::Telos, ChainIndex::Wax];

static DEFAULT_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(DEFAULT_SERVICE_URL).expect("default service url is a valid URL")
});

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// An override URL could not be parsed.
    #[error("invalid service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Configuration for a [`CreatorPlugin`](crate::CreatorPlugin).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorConfig {
    /// The account creation service the creator opens.
    pub service_url: Url,
    /// Chains offered when the request context names none.
    pub supported_chains: Vec<ChainDefinition>,
}

impl Default for CreatorConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_URL.clone(),
            supported_chains: DEFAULT_SUPPORTED_CHAINS
                .into_iter()
                .map(ChainIndex::definition)
                .collect(),
        }
    }
}

impl CreatorConfig {
    /// Sets the service URL.
    #[must_use]
    pub fn with_service_url(mut self, service_url: Url) -> Self {
        self.service_url = service_url;
        self
    }

    /// Replaces the default chain set.
    #[must_use]
    pub fn with_supported_chains(
        mut self,
        chains: impl IntoIterator<Item = ChainDefinition>,
    ) -> Self {
        self.supported_chains = chains.into_iter().collect();
        self
    }

    /// The configuration reported to the host. The creation service lets the
    /// user pick a chain itself, so no pre-selection is required.
    #[must_use]
    pub fn plugin_config(&self) -> AccountCreationPluginConfig {
        AccountCreationPluginConfig {
            requires_chain_select: false,
            supported_chains: self.supported_chains.clone(),
        }
    }
}

/// On-disk form of [`CreatorConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorFileConfig {
    /// Creation service URL (default: [`DEFAULT_SERVICE_URL`]).
    #[serde(default = "default_service_url")]
    pub service_url: Url,

    /// Default chains by index name (default: `["eos", "telos", "wax"]`).
    #[serde(default = "default_supported_chains")]
    pub supported_chains: Vec<ChainIndex>,
}

fn default_service_url() -> Url {
    DEFAULT_URL.clone()
}

fn default_supported_chains() -> Vec<ChainIndex> {
    DEFAULT_SUPPORTED_CHAINS.to_vec()
}

impl Default for CreatorFileConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            supported_chains: default_supported_chains(),
        }
    }
}

impl CreatorFileConfig {
    /// Loads configuration from the path given by the `CREATOR_CONFIG`
    /// environment variable, falling back to `creator.toml` in the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// `SERVICE_URL` is set to an invalid URL.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CREATOR_CONFIG").unwrap_or_else(|_| "creator.toml".to_owned());
        Self::load_from(path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the defaults. `SERVICE_URL` overrides the file
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// `SERVICE_URL` is set to an invalid URL.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with(path.as_ref(), |name| std::env::var(name).ok())
    }

    fn load_with(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let content = if path.exists() {
            std::fs::read_to_string(path)?
        } else {
            String::new()
        };

        let mut config = Self::from_toml_str(&content, &env)?;

        if let Some(url) = env("SERVICE_URL") {
            config.service_url = Url::parse(&url)?;
        }

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            path = %path.display(),
            service_url = %config.service_url,
            chains = config.supported_chains.len(),
            "Loaded creator configuration"
        );

        Ok(config)
    }

    /// Parses configuration from TOML, expanding `$VAR` / `${VAR}` references
    /// with `lookup` first.
    ///
    /// # Errors
    ///
    /// Returns an error if the expanded text is not valid configuration.
    pub fn from_toml_str(
        content: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let expanded = expand_vars(content, lookup);
        Ok(toml::from_str(&expanded)?)
    }

    /// Resolves chain names into descriptors.
    #[must_use]
    pub fn into_config(self) -> CreatorConfig {
        CreatorConfig {
            service_url: self.service_url,
            supported_chains: self
                .supported_chains
                .into_iter()
                .map(ChainIndex::definition)
                .collect(),
        }
    }
}

/// Expands `$VAR` and `${VAR}` patterns using `lookup`.
///
/// Unresolved or malformed references are echoed exactly as written.
fn expand_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        let mut closed = false;
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    closed = true;
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        let well_formed = !var_name.is_empty() && (closed || !braced);
        match well_formed.then(|| lookup(&var_name)).flatten() {
            Some(value) => result.push_str(&value),
            None => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if closed {
                    result.push('}');
                }
            }
        }
    }

    result
}
