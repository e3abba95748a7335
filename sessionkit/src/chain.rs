//! Antelope chain identifiers and the host's chain registry.
//!
//! - [`ChainId`] - A 32-byte chain checksum rendered as 64 lowercase hex characters
//! - [`ChainIndex`] - The host's canonical enumeration of known chains
//! - [`ChainDefinition`] - The chain descriptor handed back to the host
//! - [`ChainRegistry`] - Lookup from chain id strings to [`ChainIndex`] and descriptors
//! - [`KNOWN_CHAINS`] - Static table of well-known networks

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Length of a chain id in hex characters.
const CHAIN_ID_HEX_LEN: usize = 64;

/// An Antelope chain identifier.
///
/// Chain ids are the hash of a chain's genesis state, written as 64 hex
/// characters. Parsing lower-cases the input so that two spellings of the same
/// id compare equal.
///
/// # Serialization
///
/// Serializes to/from the bare hex string:
/// `"aca376f206b8fc25a6ed44dbdc66547c36c6c33e3a119ffbeaef943642f0e906"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(String);

impl ChainId {
    /// Wraps an id from the static chain table without validating it.
    fn from_static(id: &'static str) -> Self {
        Self(id.to_owned())
    }

    /// Returns the hex representation of the chain id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChainId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ChainId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<ChainId> for String {
    fn from(value: ChainId) -> Self {
        value.0
    }
}

/// Error returned when parsing an invalid chain id string.
///
/// A valid chain id is exactly 64 hexadecimal characters.
#[derive(Debug, thiserror::Error)]
#[error("Invalid chain id format {0}")]
pub struct ChainIdFormatError(String);

impl FromStr for ChainId {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != CHAIN_ID_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ChainIdFormatError(s.into()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

/// Canonical index of a chain known to the host.
///
/// The variant order matches [`KNOWN_CHAINS`]. Serializes in kebab-case,
/// e.g. `"eos"` or `"wax-testnet"`, which is also the form accepted in
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainIndex {
    /// EOS mainnet.
    Eos,
    /// FIO mainnet.
    Fio,
    /// FIO testnet.
    FioTestnet,
    /// Jungle 4 testnet.
    Jungle4,
    /// Kylin testnet.
    KylinTestnet,
    /// Libre mainnet.
    Libre,
    /// Libre testnet.
    LibreTestnet,
    /// Proton (XPR Network) mainnet.
    Proton,
    /// Proton (XPR Network) testnet.
    ProtonTestnet,
    /// Telos mainnet.
    Telos,
    /// Telos testnet.
    TelosTestnet,
    /// UX Network.
    Ux,
    /// WAX mainnet.
    Wax,
    /// WAX testnet.
    WaxTestnet,
}

impl ChainIndex {
    /// Every known chain index, in table order.
    pub const ALL: [Self; 14] = [
        Self::Eos,
        Self::Fio,
        Self::FioTestnet,
        Self::Jungle4,
        Self::KylinTestnet,
        Self::Libre,
        Self::LibreTestnet,
        Self::Proton,
        Self::ProtonTestnet,
        Self::Telos,
        Self::TelosTestnet,
        Self::Ux,
        Self::Wax,
        Self::WaxTestnet,
    ];

    /// Returns the static table entry for this chain.
    #[must_use]
    pub fn info(self) -> &'static ChainInfo {
        &KNOWN_CHAINS[self as usize]
    }

    /// Returns the chain id of this chain.
    #[must_use]
    pub fn chain_id(self) -> ChainId {
        self.info().chain_id()
    }

    /// Returns the chain descriptor for this chain.
    #[must_use]
    pub fn definition(self) -> ChainDefinition {
        self.info().definition()
    }
}

impl fmt::Display for ChainIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

/// A known chain with its index, display name, id and default API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainInfo {
    /// Canonical index of the chain.
    pub index: ChainIndex,
    /// Human-readable chain name (e.g. "EOS", "WAX (Testnet)").
    pub name: &'static str,
    /// Chain id as 64 lowercase hex characters.
    pub id: &'static str,
    /// Default public API endpoint.
    pub url: &'static str,
}

impl ChainInfo {
    /// Create a [`ChainId`] from this chain info.
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        ChainId::from_static(self.id)
    }

    /// Create a [`ChainDefinition`] from this chain info.
    #[must_use]
    pub fn definition(&self) -> ChainDefinition {
        ChainDefinition::new(self.chain_id(), self.url).with_name(self.name)
    }
}

/// Well-known Antelope networks, ordered as [`ChainIndex::ALL`].
pub static KNOWN_CHAINS: &[ChainInfo] = &[
    ChainInfo {
        index: ChainIndex::Eos,
        name: "EOS",
        id: "aca376f206b8fc25a6ed44dbdc66547c36c6c33e3a119ffbeaef943642f0e906",
        url: "https://eos.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::Fio,
        name: "FIO",
        id: "21dcae42c0182200e93f954a074011f9048a7624c6fe81d3c9541a614a88bd1c",
        url: "https://fio.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::FioTestnet,
        name: "FIO (Testnet)",
        id: "b20901380af44ef59c5918439a1f9a41d83669020319a80574b804a5f95cbd7e",
        url: "https://fiotestnet.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::Jungle4,
        name: "Jungle 4 (Testnet)",
        id: "73e4385a2708e6d7048834fbc1079f2fabb17b3c125b146af438971e90716c4d",
        url: "https://jungle4.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::KylinTestnet,
        name: "Kylin (Testnet)",
        id: "5fff1dae8dc8e2fc4d5b23b2c7665c97f9e9d8edf2b6485a86ba311c25639191",
        url: "https://kylintestnet.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::Libre,
        name: "Libre",
        id: "38b1d7815474d0c60683ecbea321d723e83f5da6ae5f1c1f9fecc69d9ba96465",
        url: "https://libre.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::LibreTestnet,
        name: "Libre (Testnet)",
        id: "b64646740308df2ee06c6b72f34c0f7fa066d940e831f752db2006fcc2b78dee",
        url: "https://libretestnet.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::Proton,
        name: "Proton",
        id: "384da888112027f0321850a169f737c33e53b388aad48b5adace4bab97f437e0",
        url: "https://proton.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::ProtonTestnet,
        name: "Proton (Testnet)",
        id: "71ee83bcf52142d61019d95f9cc5427ba6a0d7ff8accd9e2088ae2abeaf3d3dd",
        url: "https://proton-testnet.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::Telos,
        name: "Telos",
        id: "4667b205c6838ef70ff7988f6e8257e8be0e1284a2f59699054a018f743b1d11",
        url: "https://telos.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::TelosTestnet,
        name: "Telos (Testnet)",
        id: "1eaa0824707c8c16bd25145493bf062aecddfeb56c736f6ba6397f3195f33c9f",
        url: "https://telostestnet.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::Ux,
        name: "UX Network",
        id: "8fc6dce7942189f842170de953932b1f66693ad3788f766e777b6f9d22335c02",
        url: "https://api.uxnetwork.io",
    },
    ChainInfo {
        index: ChainIndex::Wax,
        name: "WAX",
        id: "1064487b3cd1a897ce03ae5b6a865651747e2e152090f99c1d19d44e01aea5a4",
        url: "https://wax.greymass.com",
    },
    ChainInfo {
        index: ChainIndex::WaxTestnet,
        name: "WAX (Testnet)",
        id: "f16b1833c747c43682f4386fca9cbb327929334a762755ebec17f6f23c9b8a12",
        url: "https://waxtestnet.greymass.com",
    },
];

/// The host's descriptor for a blockchain network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainDefinition {
    /// The chain id.
    pub id: ChainId,
    /// API endpoint used to talk to the chain.
    pub url: String,
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChainDefinition {
    /// Creates a new chain definition without a display name.
    pub fn new(id: ChainId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            name: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Registry mapping chain id strings to [`ChainIndex`] values and descriptors.
///
/// Built from one or more `&[ChainInfo]` slices. Lookups by id are exact
/// string matches; an id that is not registered is an unrecognized chain.
///
/// # Example
///
/// ```
/// use sessionkit::chain::{ChainIndex, ChainRegistry};
///
/// let registry = ChainRegistry::known();
/// let index = registry
///     .index_by_id("aca376f206b8fc25a6ed44dbdc66547c36c6c33e3a119ffbeaef943642f0e906");
/// assert_eq!(index, Some(ChainIndex::Eos));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    id_to_index: HashMap<ChainId, ChainIndex>,
    definitions: HashMap<ChainIndex, ChainDefinition>,
    order: Vec<ChainIndex>,
}

impl ChainRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every chain in [`KNOWN_CHAINS`].
    #[must_use]
    pub fn known() -> Self {
        Self::from_chains(KNOWN_CHAINS)
    }

    /// Creates a registry pre-populated from a chain info slice.
    #[must_use]
    pub fn from_chains(chains: &[ChainInfo]) -> Self {
        let mut registry = Self {
            id_to_index: HashMap::with_capacity(chains.len()),
            definitions: HashMap::with_capacity(chains.len()),
            order: Vec::with_capacity(chains.len()),
        };
        registry.register(chains);
        registry
    }

    /// Registers additional chains into this registry.
    ///
    /// Registering an index that is already present replaces its descriptor
    /// and id mapping.
    pub fn register(&mut self, chains: &[ChainInfo]) {
        for info in chains {
            self.insert(info.index, info.definition());
        }
    }

    /// Registers a single descriptor under the given index.
    ///
    /// A chain id maps to at most one index: if another index already claims
    /// `definition.id`, that index is unregistered.
    pub fn insert(&mut self, index: ChainIndex, definition: ChainDefinition) {
        if let Some(owner) = self
            .id_to_index
            .get(&definition.id)
            .copied()
            .filter(|owner| *owner != index)
        {
            #[cfg(feature = "telemetry")]
            tracing::debug!(chain = %index, displaced = %owner, "Chain id moved to another index");
            self.definitions.remove(&owner);
            self.order.retain(|registered| *registered != owner);
        }

        if let Some(previous) = self.definitions.remove(&index) {
            #[cfg(feature = "telemetry")]
            tracing::debug!(chain = %index, previous = %previous.id, "Replacing chain definition");
            if self.id_to_index.get(&previous.id) == Some(&index) {
                self.id_to_index.remove(&previous.id);
            }
        } else {
            self.order.push(index);
        }
        self.id_to_index.insert(definition.id.clone(), index);
        self.definitions.insert(index, definition);
    }

    /// Builder-style method: registers additional chains and returns `self`.
    #[must_use]
    pub fn with_chains(mut self, chains: &[ChainInfo]) -> Self {
        self.register(chains);
        self
    }

    /// Looks up a [`ChainIndex`] by its chain id string.
    #[must_use]
    pub fn index_by_id(&self, chain_id: &str) -> Option<ChainIndex> {
        self.id_to_index.get(chain_id).copied()
    }

    /// Looks up the descriptor registered for a [`ChainIndex`].
    #[must_use]
    pub fn definition(&self, index: ChainIndex) -> Option<&ChainDefinition> {
        self.definitions.get(&index)
    }

    /// Looks up a chain id string all the way to its descriptor.
    #[must_use]
    pub fn resolve(&self, chain_id: &str) -> Option<&ChainDefinition> {
        self.index_by_id(chain_id)
            .and_then(|index| self.definition(index))
    }

    /// Iterates over registered chains in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ChainIndex, &ChainDefinition)> {
        self.order
            .iter()
            .filter_map(|index| self.definitions.get(index).map(|def| (*index, def)))
    }

    /// Returns the number of registered chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if no chains are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
