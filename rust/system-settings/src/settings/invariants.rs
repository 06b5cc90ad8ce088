// Invariant checker - Cross-parameter rules evaluated at write time
//
// Each rule takes the currently configured related value(s) as explicit
// inputs. The caller reads them fresh from the store right before the check.

use super::bounds::{MAX_LIQUIDATION_RATIO, RATIO_FROM_TARGET_BUFFER};
use super::decimal::{divide_decimal, multiply_decimal};
use super::error::RejectReason;
use crate::types::{I256, U256, UNIT};

/// Cross-parameter rule attached to a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossRule {
    /// Liquidation ratio vs. liquidation penalty and issuance ratio
    LiquidationRatio,
    /// Negative mint fee must be covered by the wrapper's burn fee
    WrapperMintSignGuard,
    /// Negative burn fee must be covered by the wrapper's mint fee
    WrapperBurnSignGuard,
}

/// Liquidation ratio must leave room for the penalty and keep a 2x buffer
/// over the issuance ratio:
///
/// `issuance * 2 <= ratio <= MAX_LIQUIDATION_RATIO / (1 + penalty)`
pub fn check_liquidation_ratio(
    ratio: U256,
    current_penalty: U256,
    current_issuance_ratio: U256,
) -> Result<(), RejectReason> {
    let denominator = UNIT
        .checked_add(current_penalty)
        .ok_or(RejectReason::ArithmeticOverflow)?;
    let max = divide_decimal(MAX_LIQUIDATION_RATIO, denominator).ok_or(RejectReason::ArithmeticOverflow)?;
    if ratio > max {
        return Err(RejectReason::AbovePenaltyCap { ratio, max });
    }

    let min = multiply_decimal(RATIO_FROM_TARGET_BUFFER, current_issuance_ratio)
        .ok_or(RejectReason::ArithmeticOverflow)?;
    if ratio < min {
        return Err(RejectReason::BelowIssuanceBuffer { ratio, min });
    }

    Ok(())
}

/// A mint rebate larger than the burn fee makes mint+burn a free profit loop
pub fn check_wrapper_mint_fee_rate(rate: I256, current_burn_rate: I256) -> Result<(), RejectReason> {
    if rate < I256::ZERO && -rate > current_burn_rate {
        return Err(RejectReason::MintRebateExceedsBurnFee {
            rebate: -rate,
            burn_rate: current_burn_rate,
        });
    }
    Ok(())
}

/// Mirror of [`check_wrapper_mint_fee_rate`] for the burn side
pub fn check_wrapper_burn_fee_rate(rate: I256, current_mint_rate: I256) -> Result<(), RejectReason> {
    if rate < I256::ZERO && -rate > current_mint_rate {
        return Err(RejectReason::BurnRebateExceedsMintFee {
            rebate: -rate,
            mint_rate: current_mint_rate,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `hundredths` of a unit, e.g. `pct(5)` = 0.05
    fn pct(hundredths: u128) -> U256 {
        U256::new(hundredths * 10_000_000_000_000_000)
    }

    fn spct(hundredths: i128) -> I256 {
        I256::new(hundredths * 10_000_000_000_000_000)
    }

    #[test]
    fn test_liquidation_window_at_half_issuance_is_empty() {
        // issuance 0.5 -> min 1.0, penalty 0.1 -> max ~0.909: no candidate fits
        let issuance = pct(50);
        let penalty = pct(10);

        assert!(matches!(
            check_liquidation_ratio(pct(95), penalty, issuance),
            Err(RejectReason::AbovePenaltyCap { .. })
        ));
        assert!(matches!(
            check_liquidation_ratio(pct(99), penalty, issuance),
            Err(RejectReason::AbovePenaltyCap { .. })
        ));
        assert_eq!(
            check_liquidation_ratio(pct(90), penalty, issuance),
            Err(RejectReason::BelowIssuanceBuffer { ratio: pct(90), min: UNIT })
        );
    }

    #[test]
    fn test_liquidation_window_bounds_are_inclusive() {
        let issuance = pct(25);
        let penalty = pct(10);
        let max = U256::new(909_090_909_090_909_090);

        assert!(check_liquidation_ratio(pct(60), penalty, issuance).is_ok());
        assert!(check_liquidation_ratio(pct(50), penalty, issuance).is_ok());
        assert!(check_liquidation_ratio(max, penalty, issuance).is_ok());

        assert_eq!(
            check_liquidation_ratio(max + U256::ONE, penalty, issuance),
            Err(RejectReason::AbovePenaltyCap { ratio: max + U256::ONE, max })
        );
        assert!(matches!(
            check_liquidation_ratio(pct(50) - U256::ONE, penalty, issuance),
            Err(RejectReason::BelowIssuanceBuffer { .. })
        ));
    }

    #[test]
    fn test_liquidation_unset_values() {
        // Nothing configured yet: penalty 0 -> max 1.0, issuance 0 -> min 0
        assert!(check_liquidation_ratio(UNIT, U256::ZERO, U256::ZERO).is_ok());
        assert!(check_liquidation_ratio(U256::ZERO, U256::ZERO, U256::ZERO).is_ok());
        assert!(check_liquidation_ratio(UNIT + U256::ONE, U256::ZERO, U256::ZERO).is_err());
    }

    #[test]
    fn test_liquidation_overflow_in_stored_penalty() {
        assert_eq!(
            check_liquidation_ratio(pct(50), U256::MAX, U256::ZERO),
            Err(RejectReason::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_mint_sign_guard() {
        assert_eq!(
            check_wrapper_mint_fee_rate(spct(-5), spct(3)),
            Err(RejectReason::MintRebateExceedsBurnFee { rebate: spct(5), burn_rate: spct(3) })
        );
        assert!(check_wrapper_mint_fee_rate(spct(-5), spct(6)).is_ok());
        assert!(check_wrapper_mint_fee_rate(spct(-5), spct(5)).is_ok());
        // Positive fees are never constrained by the other side
        assert!(check_wrapper_mint_fee_rate(spct(5), spct(-100)).is_ok());
    }

    #[test]
    fn test_burn_sign_guard() {
        assert!(matches!(
            check_wrapper_burn_fee_rate(spct(-5), spct(3)),
            Err(RejectReason::BurnRebateExceedsMintFee { .. })
        ));
        assert!(check_wrapper_burn_fee_rate(spct(-5), spct(6)).is_ok());
        assert!(check_wrapper_burn_fee_rate(I256::ZERO, I256::ZERO).is_ok());
    }

    #[test]
    fn test_both_sides_negative_rejected() {
        assert!(check_wrapper_mint_fee_rate(spct(-1), spct(-1)).is_err());
        assert!(check_wrapper_burn_fee_rate(spct(-1), spct(-1)).is_err());
    }
}
