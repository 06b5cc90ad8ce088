// Bound validator - Static policy bounds on candidate values
//
// Principle: Bounds are part of the protocol's fixed policy and never change
// at runtime. Every range is inclusive on both ends.

use super::error::RejectReason;
use crate::types::{SettingValue, DAY, I256, SIGNED_UNIT, U256, UNIT, WEEK};
use std::fmt;

// =============================================================================
// POLICY CONSTANTS (IMMUTABLE)
// =============================================================================

/// Maximum issuance ratio (100%)
pub const MAX_ISSUANCE_RATIO: U256 = UNIT;

/// Fee period duration bounds (1 day - 60 days)
pub const MIN_FEE_PERIOD_DURATION: U256 = DAY;
pub const MAX_FEE_PERIOD_DURATION: U256 = U256::new(60 * 86_400);

/// Maximum target threshold, in whole percent
pub const MAX_TARGET_THRESHOLD: U256 = U256::new(50);

/// Liquidation delay bounds (1 day - 30 days)
pub const MIN_LIQUIDATION_DELAY: U256 = DAY;
pub const MAX_LIQUIDATION_DELAY: U256 = U256::new(30 * 86_400);

/// Maximum liquidation ratio (100% issuance ratio)
pub const MAX_LIQUIDATION_RATIO: U256 = UNIT;

/// Liquidation ratio must stay at least 2x the issuance ratio
pub const RATIO_FROM_TARGET_BUFFER: U256 = U256::new(2_000_000_000_000_000_000);

/// Maximum liquidation penalty (25%)
pub const MAX_LIQUIDATION_PENALTY: U256 = U256::new(250_000_000_000_000_000);

/// Maximum exchange fee rate (10%)
pub const MAX_EXCHANGE_FEE_RATE: U256 = U256::new(100_000_000_000_000_000);

/// Maximum minimum-stake time (1 week)
pub const MAX_MINIMUM_STAKE_TIME: U256 = WEEK;

/// Cross-domain message gas limit bounds
pub const MIN_CROSS_DOMAIN_GAS_LIMIT: U256 = U256::new(3_000_000);
pub const MAX_CROSS_DOMAIN_GAS_LIMIT: U256 = U256::new(8_000_000);

/// Wrapper fee rate bounds (-100% - 100%)
pub const MAX_WRAPPER_MINT_FEE_RATE: I256 = SIGNED_UNIT;
pub const MIN_WRAPPER_MINT_FEE_RATE: I256 = I256::new(-1_000_000_000_000_000_000);
pub const MAX_WRAPPER_BURN_FEE_RATE: I256 = SIGNED_UNIT;
pub const MIN_WRAPPER_BURN_FEE_RATE: I256 = I256::new(-1_000_000_000_000_000_000);

/// Ether wrapper fee rate cap (100%)
pub const MAX_ETHER_WRAPPER_FEE_RATE: U256 = UNIT;

/// Maximum collateral interaction delay (1 hour in fixed-point units)
pub const MAX_INTERACTION_DELAY: U256 = U256::new(3_600 * 1_000_000_000_000_000_000);

/// Maximum atomic volume per block (2^192 - 1)
pub const MAX_ATOMIC_VOLUME_PER_BLOCK: U256 = U256::from_words(u64::MAX as u128, u128::MAX);

/// Atomic TWAP window bounds (1 minute - 1 day)
pub const MIN_ATOMIC_TWAP_WINDOW: U256 = U256::new(60);
pub const MAX_ATOMIC_TWAP_WINDOW: U256 = DAY;

/// Atomic volatility consideration window bounds (1 minute - 1 day), 0 disables
pub const MIN_ATOMIC_VOLATILITY_CONSIDERATION_WINDOW: U256 = U256::new(60);
pub const MAX_ATOMIC_VOLATILITY_CONSIDERATION_WINDOW: U256 = DAY;

// =============================================================================
// BOUND RULES
// =============================================================================

/// Static rule attached to a setting kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Any value of the right kind
    Unbounded,
    /// `min <= v <= max`
    Range { min: U256, max: U256 },
    /// `v == 0`, or `min <= v <= max`
    ZeroOrRange { min: U256, max: U256 },
    /// `v != 0`
    NonZero,
    /// `v != 0` and `v <= max`
    NonZeroAtMost { max: U256 },
    /// Signed `min <= v <= max`
    SignedRange { min: I256, max: I256 },
    /// Address must not be zero
    NonZeroAddress,
}

impl Bound {
    pub const fn at_most(max: U256) -> Self {
        Bound::Range { min: U256::ZERO, max }
    }

    /// Symmetric signed cap `[-cap, cap]`
    pub fn signed_cap(cap: I256) -> Self {
        Bound::SignedRange { min: -cap, max: cap }
    }

    /// Check a candidate value. Kind agreement is checked by the dispatcher;
    /// a bound attached to another kind accepts the value unchanged.
    pub fn check(&self, value: &SettingValue) -> Result<(), RejectReason> {
        match (self, value) {
            (Bound::Unbounded, _) => Ok(()),
            (Bound::Range { min, max }, SettingValue::UInt(v)) => check_range(*v, *min, *max),
            (Bound::ZeroOrRange { min, max }, SettingValue::UInt(v)) => {
                if *v == U256::ZERO {
                    Ok(())
                } else {
                    check_range(*v, *min, *max)
                }
            }
            (Bound::NonZero, SettingValue::UInt(v)) => {
                if *v == U256::ZERO {
                    Err(RejectReason::ZeroValue)
                } else {
                    Ok(())
                }
            }
            (Bound::NonZeroAtMost { max }, SettingValue::UInt(v)) => {
                if *v == U256::ZERO {
                    return Err(RejectReason::ZeroValue);
                }
                check_range(*v, U256::ZERO, *max)
            }
            (Bound::SignedRange { min, max }, SettingValue::Int(v)) => {
                if v < min || v > max {
                    Err(RejectReason::SignedOutOfRange { value: *v, min: *min, max: *max })
                } else {
                    Ok(())
                }
            }
            (Bound::NonZeroAddress, SettingValue::Address(a)) => {
                if a.is_zero() {
                    Err(RejectReason::ZeroAddress)
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

fn check_range(value: U256, min: U256, max: U256) -> Result<(), RejectReason> {
    if value < min || value > max {
        return Err(RejectReason::OutOfRange { value, min, max });
    }
    Ok(())
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bound::Unbounded => write!(f, "any"),
            Bound::Range { min, max } => write!(f, "[{}, {}]", min, max),
            Bound::ZeroOrRange { min, max } => write!(f, "0 or [{}, {}]", min, max),
            Bound::NonZero => write!(f, "!= 0"),
            Bound::NonZeroAtMost { max } => write!(f, "(0, {}]", max),
            Bound::SignedRange { min, max } => write!(f, "[{}, {}]", min, max),
            Bound::NonZeroAddress => write!(f, "non-zero address"),
        }
    }
}
