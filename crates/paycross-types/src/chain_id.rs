//! CAIP-2 chain identifier types for blockchain-agnostic identification.
//!
//! A CAIP-2 chain id is `<namespace>:<reference>`, e.g. `eip155:8453` for Base
//! or `solana:devnet`. The orchestrator never assumes a caller has passed the
//! canonical form; the `paycross-chain` crate's resolver is the lookup chain
//! that normalizes arbitrary external identifiers into one of these.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Blockchain execution environment family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChainType {
    /// EVM-compatible chains, addressed under the `eip155` CAIP-2 namespace.
    Evm,
    /// Solana-class chains, addressed under the `solana` CAIP-2 namespace.
    Svm,
}

impl ChainType {
    /// The CAIP-2 namespace for this chain family.
    pub fn namespace(&self) -> &'static str {
        match self {
            ChainType::Evm => "eip155",
            ChainType::Svm => "solana",
        }
    }

    /// Returns the chain family whose namespace prefixes `caip2`, if any.
    pub fn from_namespace(namespace: &str) -> Option<Self> {
        match namespace {
            "eip155" => Some(ChainType::Evm),
            "solana" => Some(ChainType::Svm),
            _ => None,
        }
    }
}

/// A CAIP-2 compliant blockchain identifier: `namespace:reference`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caip2 {
    pub namespace: String,
    pub reference: String,
}

impl Caip2 {
    pub fn new<N: Into<String>, R: Into<String>>(namespace: N, reference: R) -> Self {
        Self {
            namespace: namespace.into(),
            reference: reference.into(),
        }
    }

    /// Builds the canonical CAIP-2 form for a `(chainType, chainRef)` pair, per
    /// the Chain entity invariant in the data model: `caip2 = chainType.namespace + ":" + chainRef`.
    pub fn for_chain(chain_type: ChainType, chain_ref: &str) -> Self {
        Self::new(chain_type.namespace(), chain_ref)
    }

    /// Strips a known namespace prefix (`eip155:` or `solana:`) and returns the
    /// bare reference, used by the resolver's third lookup attempt.
    pub fn strip_known_namespace(input: &str) -> Option<(&'static str, &str)> {
        for namespace in ["eip155", "solana"] {
            let prefix = concat_colon(namespace);
            if let Some(rest) = input.strip_prefix(&prefix) {
                return Some((namespace_static(namespace), rest));
            }
        }
        None
    }
}

fn concat_colon(namespace: &str) -> String {
    format!("{namespace}:")
}

fn namespace_static(namespace: &str) -> &'static str {
    match namespace {
        "eip155" => "eip155",
        "solana" => "solana",
        _ => unreachable!("namespace_static called with an unknown namespace"),
    }
}

impl fmt::Display for Caip2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

/// Error returned when parsing an invalid CAIP-2 string.
#[derive(Debug, thiserror::Error)]
#[error("invalid CAIP-2 identifier: {0:?}")]
pub struct Caip2FormatError(pub String);

impl FromStr for Caip2 {
    type Err = Caip2FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once(':') {
            Some((namespace, reference)) if !namespace.is_empty() && !reference.is_empty() => {
                Ok(Caip2::new(namespace, reference))
            }
            _ => Err(Caip2FormatError(s.to_string())),
        }
    }
}

impl Serialize for Caip2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Caip2 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Caip2::from_str(&s).map_err(de::Error::custom)
    }
}

/// Opaque 128-bit identifier for a [`Chain`] or other persisted entity.
///
/// Represented as a UUID-shaped value without pulling in a UUID crate
/// dependency at this layer; persistence drivers are out of scope (§1) and
/// may store this however they like as long as `to_string`/`FromStr` round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u128);

impl EntityId {
    pub fn from_u128(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid entity id: {0:?}")]
pub struct EntityIdFormatError(pub String);

impl FromStr for EntityId {
    type Err = EntityIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().replace('-', "");
        if hex.len() != 32 {
            return Err(EntityIdFormatError(s.to_string()));
        }
        u128::from_str_radix(&hex, 16)
            .map(EntityId)
            .map_err(|_| EntityIdFormatError(s.to_string()))
    }
}
