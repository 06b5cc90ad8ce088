// Settings catalogue - One table row per governed setting
//
// Principle: Adding a setting is a data change, not new control flow. The
// dispatcher reads kind, bound, cross-parameter rule and key shape from here.

use super::bounds::*;
use super::invariants::CrossRule;
use crate::types::primitives::deserialize_from_str;
use crate::types::{DifferentiatorKind, ValueKind, U256, UNIT};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Transformation applied between the accepted value and the stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    /// Stored as given
    Identity,
    /// Whole percent in, fixed-point fraction stored (`v * UNIT / 100`)
    PercentToUnit,
}

impl Scaling {
    /// Stored form of an accepted value, `None` on overflow
    pub fn apply(&self, value: U256) -> Option<U256> {
        match self {
            Scaling::Identity => Some(value),
            Scaling::PercentToUnit => value.checked_mul(UNIT).map(|v| v / U256::new(100)),
        }
    }
}

/// Static description of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingSpec {
    /// Storage name (at most 32 bytes)
    pub name: &'static str,
    pub kind: ValueKind,
    pub differentiator: DifferentiatorKind,
    pub bound: Bound,
    pub rule: Option<CrossRule>,
    pub scaling: Scaling,
    /// Name of the change event observers see
    pub event: &'static str,
}

impl SettingSpec {
    const fn new(name: &'static str, kind: ValueKind, event: &'static str) -> Self {
        Self {
            name,
            kind,
            differentiator: DifferentiatorKind::None,
            bound: Bound::Unbounded,
            rule: None,
            scaling: Scaling::Identity,
            event,
        }
    }

    const fn uint(name: &'static str, event: &'static str) -> Self {
        Self::new(name, ValueKind::UInt, event)
    }

    const fn bounded(self, bound: Bound) -> Self {
        Self { bound, ..self }
    }

    const fn per_currency(self) -> Self {
        Self { differentiator: DifferentiatorKind::Currency, ..self }
    }

    const fn per_address(self) -> Self {
        Self { differentiator: DifferentiatorKind::Address, ..self }
    }

    const fn with_rule(self, rule: CrossRule) -> Self {
        Self { rule: Some(rule), ..self }
    }

    const fn scaled(self, scaling: Scaling) -> Self {
        Self { scaling, ..self }
    }
}

const GAS_LIMIT: Bound = Bound::Range {
    min: MIN_CROSS_DOMAIN_GAS_LIMIT,
    max: MAX_CROSS_DOMAIN_GAS_LIMIT,
};

const GAS_LIMIT_EVENT: &str = "CrossDomainMessageGasLimitChanged";

/// Identifier of every governed setting. Serialized by its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingId {
    CrossDomainDepositGasLimit,
    CrossDomainEscrowGasLimit,
    CrossDomainRewardGasLimit,
    CrossDomainWithdrawalGasLimit,
    CrossDomainRelayGasLimit,
    CrossDomainCloseGasLimit,
    TradingRewardsEnabled,
    WaitingPeriodSecs,
    PriceDeviationThresholdFactor,
    IssuanceRatio,
    FeePeriodDuration,
    TargetThreshold,
    LiquidationDelay,
    LiquidationRatio,
    LiquidationPenalty,
    RateStalePeriod,
    ExchangeFeeRate,
    MinimumStakeTime,
    AggregatorWarningFlags,
    DebtSnapshotStaleTime,
    EtherWrapperMaxEth,
    EtherWrapperMintFeeRate,
    EtherWrapperBurnFeeRate,
    WrapperMaxTokenAmount,
    WrapperMintFeeRate,
    WrapperBurnFeeRate,
    InteractionDelay,
    CollapseFeeRate,
    AtomicMaxVolumePerBlock,
    AtomicTwapWindow,
    AtomicEquivalentForDexPricing,
    AtomicExchangeFeeRate,
    AtomicPriceBuffer,
    AtomicVolatilityConsiderationWindow,
    AtomicVolatilityUpdateThreshold,
    PureChainlinkPriceForAtomicSwapsEnabled,
    CrossChainSynthTransferEnabled,
    ExchangeDynamicFeeThreshold,
    ExchangeDynamicFeeWeightDecay,
    ExchangeDynamicFeeRounds,
    ExchangeMaxDynamicFee,
}

impl SettingId {
    pub const ALL: [SettingId; 41] = [
        SettingId::CrossDomainDepositGasLimit,
        SettingId::CrossDomainEscrowGasLimit,
        SettingId::CrossDomainRewardGasLimit,
        SettingId::CrossDomainWithdrawalGasLimit,
        SettingId::CrossDomainRelayGasLimit,
        SettingId::CrossDomainCloseGasLimit,
        SettingId::TradingRewardsEnabled,
        SettingId::WaitingPeriodSecs,
        SettingId::PriceDeviationThresholdFactor,
        SettingId::IssuanceRatio,
        SettingId::FeePeriodDuration,
        SettingId::TargetThreshold,
        SettingId::LiquidationDelay,
        SettingId::LiquidationRatio,
        SettingId::LiquidationPenalty,
        SettingId::RateStalePeriod,
        SettingId::ExchangeFeeRate,
        SettingId::MinimumStakeTime,
        SettingId::AggregatorWarningFlags,
        SettingId::DebtSnapshotStaleTime,
        SettingId::EtherWrapperMaxEth,
        SettingId::EtherWrapperMintFeeRate,
        SettingId::EtherWrapperBurnFeeRate,
        SettingId::WrapperMaxTokenAmount,
        SettingId::WrapperMintFeeRate,
        SettingId::WrapperBurnFeeRate,
        SettingId::InteractionDelay,
        SettingId::CollapseFeeRate,
        SettingId::AtomicMaxVolumePerBlock,
        SettingId::AtomicTwapWindow,
        SettingId::AtomicEquivalentForDexPricing,
        SettingId::AtomicExchangeFeeRate,
        SettingId::AtomicPriceBuffer,
        SettingId::AtomicVolatilityConsiderationWindow,
        SettingId::AtomicVolatilityUpdateThreshold,
        SettingId::PureChainlinkPriceForAtomicSwapsEnabled,
        SettingId::CrossChainSynthTransferEnabled,
        SettingId::ExchangeDynamicFeeThreshold,
        SettingId::ExchangeDynamicFeeWeightDecay,
        SettingId::ExchangeDynamicFeeRounds,
        SettingId::ExchangeMaxDynamicFee,
    ];

    /// Table row for this setting
    pub fn spec(&self) -> SettingSpec {
        match self {
            SettingId::CrossDomainDepositGasLimit => {
                SettingSpec::uint("crossDomainDepositGasLimit", GAS_LIMIT_EVENT).bounded(GAS_LIMIT)
            }
            SettingId::CrossDomainEscrowGasLimit => {
                SettingSpec::uint("crossDomainEscrowGasLimit", GAS_LIMIT_EVENT).bounded(GAS_LIMIT)
            }
            SettingId::CrossDomainRewardGasLimit => {
                SettingSpec::uint("crossDomainRewardGasLimit", GAS_LIMIT_EVENT).bounded(GAS_LIMIT)
            }
            SettingId::CrossDomainWithdrawalGasLimit => {
                SettingSpec::uint("crossDomainWithdrawalGasLimit", GAS_LIMIT_EVENT).bounded(GAS_LIMIT)
            }
            SettingId::CrossDomainRelayGasLimit => {
                SettingSpec::uint("crossDomainRelayGasLimit", GAS_LIMIT_EVENT).bounded(GAS_LIMIT)
            }
            SettingId::CrossDomainCloseGasLimit => {
                SettingSpec::uint("crossDomainCloseGasLimit", GAS_LIMIT_EVENT).bounded(GAS_LIMIT)
            }
            SettingId::TradingRewardsEnabled => {
                SettingSpec::new("tradingRewardsEnabled", ValueKind::Bool, "TradingRewardsEnabled")
            }
            SettingId::WaitingPeriodSecs => {
                SettingSpec::uint("waitingPeriodSecs", "WaitingPeriodSecsUpdated")
            }
            SettingId::PriceDeviationThresholdFactor => {
                SettingSpec::uint("priceDeviationThresholdFactor", "PriceDeviationThresholdUpdated")
            }
            SettingId::IssuanceRatio => SettingSpec::uint("issuanceRatio", "IssuanceRatioUpdated")
                .bounded(Bound::at_most(MAX_ISSUANCE_RATIO)),
            SettingId::FeePeriodDuration => SettingSpec::uint("feePeriodDuration", "FeePeriodDurationUpdated")
                .bounded(Bound::Range { min: MIN_FEE_PERIOD_DURATION, max: MAX_FEE_PERIOD_DURATION }),
            SettingId::TargetThreshold => SettingSpec::uint("targetThreshold", "TargetThresholdUpdated")
                .bounded(Bound::at_most(MAX_TARGET_THRESHOLD))
                .scaled(Scaling::PercentToUnit),
            SettingId::LiquidationDelay => SettingSpec::uint("liquidationDelay", "LiquidationDelayUpdated")
                .bounded(Bound::Range { min: MIN_LIQUIDATION_DELAY, max: MAX_LIQUIDATION_DELAY }),
            SettingId::LiquidationRatio => SettingSpec::uint("liquidationRatio", "LiquidationRatioUpdated")
                .with_rule(CrossRule::LiquidationRatio),
            SettingId::LiquidationPenalty => SettingSpec::uint("liquidationPenalty", "LiquidationPenaltyUpdated")
                .bounded(Bound::at_most(MAX_LIQUIDATION_PENALTY)),
            SettingId::RateStalePeriod => SettingSpec::uint("rateStalePeriod", "RateStalePeriodUpdated"),
            SettingId::ExchangeFeeRate => SettingSpec::uint("exchangeFeeRate", "ExchangeFeeUpdated")
                .bounded(Bound::at_most(MAX_EXCHANGE_FEE_RATE))
                .per_currency(),
            SettingId::MinimumStakeTime => SettingSpec::uint("minimumStakeTime", "MinimumStakeTimeUpdated")
                .bounded(Bound::at_most(MAX_MINIMUM_STAKE_TIME)),
            SettingId::AggregatorWarningFlags => {
                SettingSpec::new("aggregatorWarningFlags", ValueKind::Address, "AggregatorWarningFlagsUpdated")
                    .bounded(Bound::NonZeroAddress)
            }
            SettingId::DebtSnapshotStaleTime => {
                SettingSpec::uint("debtSnapshotStaleTime", "DebtSnapshotStaleTimeUpdated")
            }
            SettingId::EtherWrapperMaxEth => SettingSpec::uint("etherWrapperMaxETH", "EtherWrapperMaxETHUpdated"),
            SettingId::EtherWrapperMintFeeRate => {
                SettingSpec::uint("etherWrapperMintFeeRate", "EtherWrapperMintFeeRateUpdated")
                    .bounded(Bound::at_most(MAX_ETHER_WRAPPER_FEE_RATE))
            }
            SettingId::EtherWrapperBurnFeeRate => {
                SettingSpec::uint("etherWrapperBurnFeeRate", "EtherWrapperBurnFeeRateUpdated")
                    .bounded(Bound::at_most(MAX_ETHER_WRAPPER_FEE_RATE))
            }
            SettingId::WrapperMaxTokenAmount => {
                SettingSpec::uint("wrapperMaxTokens", "WrapperMaxTokenAmountUpdated").per_address()
            }
            SettingId::WrapperMintFeeRate => {
                SettingSpec::new("wrapperMintFeeRate", ValueKind::Int, "WrapperMintFeeRateUpdated")
                    .bounded(Bound::SignedRange {
                        min: MIN_WRAPPER_MINT_FEE_RATE,
                        max: MAX_WRAPPER_MINT_FEE_RATE,
                    })
                    .per_address()
                    .with_rule(CrossRule::WrapperMintSignGuard)
            }
            SettingId::WrapperBurnFeeRate => {
                SettingSpec::new("wrapperBurnFeeRate", ValueKind::Int, "WrapperBurnFeeRateUpdated")
                    .bounded(Bound::SignedRange {
                        min: MIN_WRAPPER_BURN_FEE_RATE,
                        max: MAX_WRAPPER_BURN_FEE_RATE,
                    })
                    .per_address()
                    .with_rule(CrossRule::WrapperBurnSignGuard)
            }
            SettingId::InteractionDelay => SettingSpec::uint("interactionDelay", "InteractionDelayUpdated")
                .bounded(Bound::at_most(MAX_INTERACTION_DELAY))
                .per_address(),
            SettingId::CollapseFeeRate => {
                SettingSpec::uint("collapseFeeRate", "CollapseFeeRateUpdated").per_address()
            }
            SettingId::AtomicMaxVolumePerBlock => {
                SettingSpec::uint("atomicMaxVolumePerBlock", "AtomicMaxVolumePerBlockUpdated")
                    .bounded(Bound::at_most(MAX_ATOMIC_VOLUME_PER_BLOCK))
            }
            SettingId::AtomicTwapWindow => SettingSpec::uint("atomicTwapWindow", "AtomicTwapWindowUpdated")
                .bounded(Bound::Range { min: MIN_ATOMIC_TWAP_WINDOW, max: MAX_ATOMIC_TWAP_WINDOW }),
            SettingId::AtomicEquivalentForDexPricing => SettingSpec::new(
                "atomicEquivalentForDexPricing",
                ValueKind::Address,
                "AtomicEquivalentForDexPricingUpdated",
            )
            .bounded(Bound::NonZeroAddress)
            .per_currency(),
            SettingId::AtomicExchangeFeeRate => {
                SettingSpec::uint("atomicExchangeFeeRate", "AtomicExchangeFeeUpdated")
                    .bounded(Bound::at_most(MAX_EXCHANGE_FEE_RATE))
                    .per_currency()
            }
            SettingId::AtomicPriceBuffer => {
                SettingSpec::uint("atomicPriceBuffer", "AtomicPriceBufferUpdated").per_currency()
            }
            SettingId::AtomicVolatilityConsiderationWindow => SettingSpec::uint(
                "atomicVolConsiderationWindow",
                "AtomicVolatilityConsiderationWindowUpdated",
            )
            .bounded(Bound::ZeroOrRange {
                min: MIN_ATOMIC_VOLATILITY_CONSIDERATION_WINDOW,
                max: MAX_ATOMIC_VOLATILITY_CONSIDERATION_WINDOW,
            })
            .per_currency(),
            SettingId::AtomicVolatilityUpdateThreshold => {
                SettingSpec::uint("atomicVolUpdateThreshold", "AtomicVolatilityUpdateThresholdUpdated")
                    .per_currency()
            }
            SettingId::PureChainlinkPriceForAtomicSwapsEnabled => SettingSpec::new(
                "pureChainlinkForAtomicsEnabled",
                ValueKind::Bool,
                "PureChainlinkPriceForAtomicSwapsEnabledUpdated",
            )
            .per_currency(),
            SettingId::CrossChainSynthTransferEnabled => {
                SettingSpec::uint("crossChainSynthTransferEnabled", "CrossChainSynthTransferEnabledUpdated")
                    .per_currency()
            }
            SettingId::ExchangeDynamicFeeThreshold => {
                SettingSpec::uint("exchangeDynamicFeeThreshold", "ExchangeDynamicFeeThresholdUpdated")
                    .bounded(Bound::NonZero)
            }
            SettingId::ExchangeDynamicFeeWeightDecay => {
                SettingSpec::uint("exchangeDynamicFeeWeightDecay", "ExchangeDynamicFeeWeightDecayUpdated")
                    .bounded(Bound::NonZero)
            }
            SettingId::ExchangeDynamicFeeRounds => {
                SettingSpec::uint("exchangeDynamicFeeRounds", "ExchangeDynamicFeeRoundsUpdated")
            }
            SettingId::ExchangeMaxDynamicFee => {
                SettingSpec::uint("exchangeMaxDynamicFee", "ExchangeMaxDynamicFeeUpdated")
                    .bounded(Bound::NonZeroAtMost { max: MAX_EXCHANGE_FEE_RATE })
            }
        }
    }

    /// Storage name of the setting
    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Look a setting up by its storage name
    pub fn from_name(name: &str) -> Option<SettingId> {
        SettingId::ALL.iter().copied().find(|id| id.name() == name)
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SettingId {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingId::from_name(s).ok_or_else(|| UnknownSetting(s.to_string()))
    }
}

impl Serialize for SettingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SettingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown setting: {0}")]
pub struct UnknownSetting(pub String);

/// Message types with their own cross-domain gas limit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossDomainMessageGasLimits {
    Deposit,
    Escrow,
    Reward,
    Withdrawal,
    Relay,
    CloseFeePeriod,
}

impl CrossDomainMessageGasLimits {
    pub fn setting(&self) -> SettingId {
        match self {
            CrossDomainMessageGasLimits::Deposit => SettingId::CrossDomainDepositGasLimit,
            CrossDomainMessageGasLimits::Escrow => SettingId::CrossDomainEscrowGasLimit,
            CrossDomainMessageGasLimits::Reward => SettingId::CrossDomainRewardGasLimit,
            CrossDomainMessageGasLimits::Withdrawal => SettingId::CrossDomainWithdrawalGasLimit,
            CrossDomainMessageGasLimits::Relay => SettingId::CrossDomainRelayGasLimit,
            CrossDomainMessageGasLimits::CloseFeePeriod => SettingId::CrossDomainCloseGasLimit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WORD_LEN;
    use std::collections::HashSet;

    #[test]
    fn test_names_fit_a_word_and_are_unique() {
        let mut seen = HashSet::new();
        for id in SettingId::ALL {
            let name = id.name();
            assert!(name.len() <= WORD_LEN, "{} does not fit 32 bytes", name);
            assert!(seen.insert(name), "duplicate name {}", name);
        }
    }

    #[test]
    fn test_lookup_by_name() {
        for id in SettingId::ALL {
            assert_eq!(SettingId::from_name(id.name()), Some(id));
            assert_eq!(id.to_string().parse::<SettingId>(), Ok(id));
        }
        assert_eq!(
            "noSuchSetting".parse::<SettingId>(),
            Err(UnknownSetting("noSuchSetting".to_string()))
        );
    }

    #[test]
    fn test_bounds_match_declared_kind() {
        for id in SettingId::ALL {
            let spec = id.spec();
            match spec.bound {
                Bound::Unbounded => {}
                Bound::Range { .. } | Bound::ZeroOrRange { .. } | Bound::NonZero | Bound::NonZeroAtMost { .. } => {
                    assert_eq!(spec.kind, ValueKind::UInt, "{}", id)
                }
                Bound::SignedRange { .. } => assert_eq!(spec.kind, ValueKind::Int, "{}", id),
                Bound::NonZeroAddress => assert_eq!(spec.kind, ValueKind::Address, "{}", id),
            }
        }
    }

    #[test]
    fn test_cross_rules_are_attached() {
        let ruled: Vec<_> = SettingId::ALL.iter().filter(|id| id.spec().rule.is_some()).collect();
        assert_eq!(
            ruled,
            vec![&SettingId::LiquidationRatio, &SettingId::WrapperMintFeeRate, &SettingId::WrapperBurnFeeRate]
        );
    }

    #[test]
    fn test_signed_caps_are_symmetric() {
        let spec = SettingId::WrapperMintFeeRate.spec();
        assert_eq!(spec.bound, Bound::signed_cap(MAX_WRAPPER_MINT_FEE_RATE));
        let spec = SettingId::WrapperBurnFeeRate.spec();
        assert_eq!(spec.bound, Bound::signed_cap(MAX_WRAPPER_BURN_FEE_RATE));
    }

    #[test]
    fn test_percent_scaling() {
        assert_eq!(Scaling::PercentToUnit.apply(U256::new(50)), Some(UNIT / U256::new(2)));
        assert_eq!(Scaling::Identity.apply(U256::new(50)), Some(U256::new(50)));
        assert_eq!(Scaling::Identity.apply(U256::MAX), Some(U256::MAX));
    }

    #[test]
    fn test_percent_scaling_overflow() {
        assert_eq!(Scaling::PercentToUnit.apply(U256::MAX), None);
        assert_eq!(Scaling::PercentToUnit.apply(U256::MAX / UNIT), Some(U256::MAX / UNIT * UNIT / U256::new(100)));
    }

    #[test]
    fn test_gas_limit_kinds_map_to_distinct_settings() {
        let kinds = [
            CrossDomainMessageGasLimits::Deposit,
            CrossDomainMessageGasLimits::Escrow,
            CrossDomainMessageGasLimits::Reward,
            CrossDomainMessageGasLimits::Withdrawal,
            CrossDomainMessageGasLimits::Relay,
            CrossDomainMessageGasLimits::CloseFeePeriod,
        ];
        let settings: HashSet<_> = kinds.iter().map(|k| k.setting()).collect();
        assert_eq!(settings.len(), kinds.len());
        for setting in settings {
            assert_eq!(setting.spec().event, "CrossDomainMessageGasLimitChanged");
        }
    }

    #[test]
    fn test_setting_id_serializes_by_name() {
        let json = serde_json::to_string(&SettingId::IssuanceRatio).unwrap();
        assert_eq!(json, r#""issuanceRatio""#);
        assert_eq!(serde_json::from_str::<SettingId>(&json).unwrap(), SettingId::IssuanceRatio);
        assert!(serde_json::from_str::<SettingId>(r#""IssuanceRatio""#).is_err());
    }
}
