// Primitives - Fixed-point units, identities and storage keys
// Principle: Minimal, auditable, one canonical byte form per identity

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub use ethnum::{I256, U256};

// =============================================================================
// FIXED-POINT UNITS
// =============================================================================

/// Fixed-point unit: 10^18 represents "1.0"
pub const UNIT: U256 = U256::new(1_000_000_000_000_000_000);

/// Signed counterpart of [`UNIT`]
pub const SIGNED_UNIT: I256 = I256::new(1_000_000_000_000_000_000);

/// Time constants (seconds)
pub const HOUR: U256 = U256::new(3_600);
pub const DAY: U256 = U256::new(86_400);
pub const WEEK: U256 = U256::new(604_800);

/// Setting names, currency keys and storage keys are 32 bytes wide
pub const WORD_LEN: usize = 32;

// =============================================================================
// CURRENCY KEY
// =============================================================================

/// Currency symbol right-padded to 32 bytes (e.g. `sUSD`).
///
/// Serialized as its trimmed symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyKey([u8; WORD_LEN]);

impl CurrencyKey {
    /// Build a key from a symbol, rejecting empty or over-long symbols
    pub fn new(symbol: &str) -> Result<Self, IdentityError> {
        if symbol.is_empty() {
            return Err(IdentityError::EmptyCurrencyKey);
        }
        Ok(Self(pad_word(symbol).ok_or(IdentityError::CurrencyKeyTooLong(symbol.len()))?))
    }

    pub fn from_bytes(bytes: [u8; WORD_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; WORD_LEN] {
        &self.0
    }
}

impl FromStr for CurrencyKey {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for CurrencyKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let end = self.0.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        write!(f, "{}", String::from_utf8_lossy(&self.0[..end]))
    }
}

// =============================================================================
// ADDRESS
// =============================================================================

/// 20-byte account / contract identity (wrappers, collaterals, oracles).
///
/// Serialized as `0x`-prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = IdentityError;

    /// Parse a `0x`-prefixed (or bare) 40 hex character address
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits).map_err(|_| IdentityError::InvalidAddress(s.to_string()))?;
        let bytes: [u8; 20] = raw
            .try_into()
            .map_err(|_| IdentityError::InvalidAddress(s.to_string()))?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for CurrencyKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_display(self, serializer)
    }
}

impl<'de> Deserialize<'de> for CurrencyKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_display(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

/// Serialize through the `Display` text form
pub(crate) fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

/// Deserialize through the `FromStr` text form
pub(crate) fn deserialize_from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr,
    T::Err: fmt::Display,
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(de::Error::custom)
}

// =============================================================================
// STORAGE KEY
// =============================================================================

/// Record key under which a setting lives inside its module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey([u8; WORD_LEN]);

impl StorageKey {
    pub fn from_bytes(bytes: [u8; WORD_LEN]) -> Self {
        StorageKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; WORD_LEN] {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// Right-pad an ASCII name into a 32-byte word, `None` if it does not fit
pub fn pad_word(name: &str) -> Option<[u8; WORD_LEN]> {
    let bytes = name.as_bytes();
    if bytes.len() > WORD_LEN {
        return None;
    }
    let mut word = [0u8; WORD_LEN];
    word[..bytes.len()].copy_from_slice(bytes);
    Some(word)
}

/// Identity parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Currency key must not be empty")]
    EmptyCurrencyKey,

    #[error("Currency key is {0} bytes, at most 32 allowed")]
    CurrencyKeyTooLong(usize),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
