//! Blockchain addresses under assessment and the chains they belong to.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// The chain an address lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    Bitcoin,
    Ethereum,
    Solana,
    InternetComputer,
    Fradium,
    Unknown,
}

impl Chain {
    /// Infer the chain from the shape of an address.
    ///
    /// Checks run in a fixed order because the formats overlap: Ethereum hex,
    /// Bitcoin legacy and bech32 (mainnet and testnet), Internet Computer
    /// principals, then base58 Solana keys.
    pub fn detect(address: &str) -> Chain {
        let len = address.len();

        if len == 42
            && address.starts_with("0x")
            && address[2..].chars().all(|c| c.is_ascii_hexdigit())
        {
            return Chain::Ethereum;
        }

        let lower = address.to_ascii_lowercase();
        let legacy_len = (26..=35).contains(&len);
        if legacy_len && (address.starts_with('1') || address.starts_with('3')) {
            return Chain::Bitcoin;
        }
        if ["bc1q", "bc1p", "tb1q", "tb1p"]
            .iter()
            .any(|prefix| lower.starts_with(prefix))
        {
            return Chain::Bitcoin;
        }
        if legacy_len
            && (address.starts_with('m') || address.starts_with('n') || address.starts_with('2'))
        {
            return Chain::Bitcoin;
        }

        if len > 20
            && address
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Chain::InternetComputer;
        }

        if len >= 32 && address.chars().all(|c| BASE58_ALPHABET.contains(c)) {
            return Chain::Solana;
        }

        Chain::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "bitcoin",
            Chain::Ethereum => "ethereum",
            Chain::Solana => "solana",
            Chain::InternetComputer => "internet_computer",
            Chain::Fradium => "fradium",
            Chain::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An address submitted for reporting or analysis.
///
/// Stored trimmed; lookups are exact matches on the trimmed text.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainAddress(String);

impl ChainAddress {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyAddress);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Chain inferred from the address format.
    pub fn detect_chain(&self) -> Chain {
        Chain::detect(&self.0)
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ChainAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ChainAddress> for String {
    fn from(a: ChainAddress) -> Self {
        a.0
    }
}
