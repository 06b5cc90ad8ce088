// Setting values - The four value kinds the settings store understands
use super::primitives::{Address, CurrencyKey, I256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared kind of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    UInt,
    Int,
    Bool,
    Address,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueKind::UInt => "uint",
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::Address => "address",
        };
        write!(f, "{}", name)
    }
}

/// A typed setting value.
///
/// Serialized tagged by kind, integers as decimal strings:
/// `{"uint": "250000000000000000"}`, `{"address": "0x…"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingValue {
    UInt(#[serde(with = "ethnum::serde::decimal")] U256),
    Int(#[serde(with = "ethnum::serde::decimal")] I256),
    Bool(bool),
    Address(Address),
}

impl SettingValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SettingValue::UInt(_) => ValueKind::UInt,
            SettingValue::Int(_) => ValueKind::Int,
            SettingValue::Bool(_) => ValueKind::Bool,
            SettingValue::Address(_) => ValueKind::Address,
        }
    }

    /// Value read back for a setting that was never written
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::UInt => SettingValue::UInt(U256::ZERO),
            ValueKind::Int => SettingValue::Int(I256::ZERO),
            ValueKind::Bool => SettingValue::Bool(false),
            ValueKind::Address => SettingValue::Address(Address::ZERO),
        }
    }

    /// Parse textual input (config files, CLI) according to the expected kind
    pub fn parse(kind: ValueKind, text: &str) -> Result<Self, ValueParseError> {
        let text = text.trim();
        let invalid = || ValueParseError { kind, input: text.to_string() };
        match kind {
            ValueKind::UInt => text.parse::<U256>().map(SettingValue::UInt).map_err(|_| invalid()),
            ValueKind::Int => text.parse::<I256>().map(SettingValue::Int).map_err(|_| invalid()),
            ValueKind::Bool => match text {
                "true" => Ok(SettingValue::Bool(true)),
                "false" => Ok(SettingValue::Bool(false)),
                _ => Err(invalid()),
            },
            ValueKind::Address => text
                .parse::<Address>()
                .map(SettingValue::Address)
                .map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SettingValue::UInt(v) => write!(f, "{}", v),
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Bool(v) => write!(f, "{}", v),
            SettingValue::Address(v) => write!(f, "{}", v),
        }
    }
}

impl From<U256> for SettingValue {
    fn from(v: U256) -> Self {
        SettingValue::UInt(v)
    }
}

impl From<I256> for SettingValue {
    fn from(v: I256) -> Self {
        SettingValue::Int(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<Address> for SettingValue {
    fn from(v: Address) -> Self {
        SettingValue::Address(v)
    }
}

/// Secondary identifier addressing a per-entity variant of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Differentiator {
    /// Per-currency (synth) setting
    Currency(CurrencyKey),
    /// Per-wrapper / per-collateral setting
    Address(Address),
}

impl Differentiator {
    pub fn kind(&self) -> DifferentiatorKind {
        match self {
            Differentiator::Currency(_) => DifferentiatorKind::Currency,
            Differentiator::Address(_) => DifferentiatorKind::Address,
        }
    }

    /// Canonical bytes fed into key derivation
    pub fn canonical_bytes(&self) -> &[u8] {
        match self {
            Differentiator::Currency(key) => key.as_bytes(),
            Differentiator::Address(addr) => addr.as_bytes(),
        }
    }
}

impl fmt::Display for Differentiator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Differentiator::Currency(key) => write!(f, "{}", key),
            Differentiator::Address(addr) => write!(f, "{}", addr),
        }
    }
}

/// Which differentiator (if any) a setting is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifferentiatorKind {
    None,
    Currency,
    Address,
}

impl fmt::Display for DifferentiatorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DifferentiatorKind::None => "-",
            DifferentiatorKind::Currency => "currency",
            DifferentiatorKind::Address => "address",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot parse {input:?} as {kind}")]
pub struct ValueParseError {
    pub kind: ValueKind,
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_kind() {
        assert_eq!(
            SettingValue::parse(ValueKind::UInt, "1000000000000000000").unwrap(),
            SettingValue::UInt(U256::new(1_000_000_000_000_000_000))
        );
        assert_eq!(
            SettingValue::parse(ValueKind::Int, "-50").unwrap(),
            SettingValue::Int(I256::new(-50))
        );
        assert_eq!(SettingValue::parse(ValueKind::Bool, "true").unwrap(), SettingValue::Bool(true));
        assert!(SettingValue::parse(ValueKind::UInt, "-1").is_err());
        assert!(SettingValue::parse(ValueKind::Bool, "yes").is_err());
        assert!(SettingValue::parse(ValueKind::Address, "0x00").is_err());
    }

    #[test]
    fn test_zero_values_match_kind() {
        for kind in [ValueKind::UInt, ValueKind::Int, ValueKind::Bool, ValueKind::Address] {
            assert_eq!(SettingValue::zero(kind).kind(), kind);
        }
    }

    #[test]
    fn test_canonical_bytes_width() {
        let currency = Differentiator::Currency(CurrencyKey::new("sUSD").unwrap());
        let wrapper = Differentiator::Address(Address::from_bytes([7; 20]));
        assert_eq!(currency.canonical_bytes().len(), 32);
        assert_eq!(wrapper.canonical_bytes().len(), 20);
    }

    #[test]
    fn test_value_json_uses_decimal_text() {
        let value = SettingValue::UInt(U256::new(250_000_000_000_000_000));
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"uint":"250000000000000000"}"#);
        assert_eq!(serde_json::from_str::<SettingValue>(&json).unwrap(), value);

        assert_eq!(
            serde_json::to_string(&SettingValue::Int(I256::new(-50))).unwrap(),
            r#"{"int":"-50"}"#
        );
        assert_eq!(serde_json::to_string(&SettingValue::Bool(true)).unwrap(), r#"{"bool":true}"#);
    }

    #[test]
    fn test_differentiator_json() {
        let currency = Differentiator::Currency(CurrencyKey::new("sETH").unwrap());
        assert_eq!(serde_json::to_string(&currency).unwrap(), r#"{"currency":"sETH"}"#);

        let address = Differentiator::Address(Address::from_bytes([1; 20]));
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, r#"{"address":"0x0101010101010101010101010101010101010101"}"#);
        assert_eq!(serde_json::from_str::<Differentiator>(&json).unwrap(), address);
    }
}
