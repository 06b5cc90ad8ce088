// System settings - Validate, cross-check, commit and notify
//
// Principle: A value is persisted if and only if it passed its bound and its
// cross-parameter rule. Rejections leave the store untouched.

use super::catalog::{CrossDomainMessageGasLimits, SettingId, SettingSpec};
use super::error::{RejectReason, SettingsError};
use super::invariants::{self, CrossRule};
use super::keys::{self, SETTINGS_MODULE};
use crate::storage::{DatabaseError, FlexibleStorage};
use crate::types::{
    Address, CurrencyKey, Differentiator, DifferentiatorKind, SettingValue, StorageKey, I256, U256,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

// =============================================================================
// UPDATE AND CHANGE RECORD
// =============================================================================

/// A requested change of one setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingUpdate {
    pub setting: SettingId,
    pub differentiator: Option<Differentiator>,
    pub value: SettingValue,
}

impl SettingUpdate {
    pub fn new(setting: SettingId, value: impl Into<SettingValue>) -> Self {
        Self { setting, differentiator: None, value: value.into() }
    }

    pub fn for_currency(setting: SettingId, currency: CurrencyKey, value: impl Into<SettingValue>) -> Self {
        Self {
            setting,
            differentiator: Some(Differentiator::Currency(currency)),
            value: value.into(),
        }
    }

    pub fn for_address(setting: SettingId, address: Address, value: impl Into<SettingValue>) -> Self {
        Self {
            setting,
            differentiator: Some(Differentiator::Address(address)),
            value: value.into(),
        }
    }
}

/// Notification emitted once per successful write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub setting: SettingId,
    pub differentiator: Option<Differentiator>,
    /// Value as accepted from the caller (before any storage scaling)
    pub value: SettingValue,
}

impl ChangeRecord {
    /// Protocol event name of this change
    pub fn event_name(&self) -> &'static str {
        self.setting.spec().event
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.differentiator {
            Some(d) => write!(f, "{}({}, {})", self.event_name(), d, self.value),
            None => write!(f, "{}({})", self.event_name(), self.value),
        }
    }
}

// =============================================================================
// SYSTEM SETTINGS SERVICE
// =============================================================================

/// Governed settings on top of an injected store.
///
/// Every mutating call takes `&mut self`: the read-validate-write sequence of
/// one update can never interleave with another. Share across threads behind
/// a single `Mutex`.
pub struct SystemSettings<S: FlexibleStorage> {
    storage: S,
    module: String,
    events: Vec<ChangeRecord>,
}

impl<S: FlexibleStorage> SystemSettings<S> {
    pub fn new(storage: S) -> Self {
        Self::with_module(storage, SETTINGS_MODULE)
    }

    pub fn with_module(storage: S, module: impl Into<String>) -> Self {
        Self {
            storage,
            module: module.into(),
            events: Vec::new(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Change records emitted so far
    pub fn events(&self) -> &[ChangeRecord] {
        &self.events
    }

    /// Take the accumulated change records
    pub fn drain_events(&mut self) -> Vec<ChangeRecord> {
        std::mem::take(&mut self.events)
    }

    /// Stored value of a setting (zero value if never written)
    pub fn get(&self, setting: SettingId, differentiator: Option<&Differentiator>) -> Result<SettingValue, SettingsError> {
        let spec = setting.spec();
        let key = self.key_for(setting, &spec, differentiator)?;
        Ok(self.storage.get_value(&self.module, &key, spec.kind)?)
    }

    /// Run one update through resolve -> bound -> invariant -> write -> notify
    pub fn apply(&mut self, update: SettingUpdate) -> Result<ChangeRecord, SettingsError> {
        let SettingUpdate { setting, differentiator, value } = update;
        let spec = setting.spec();

        let key = match self.key_for(setting, &spec, differentiator.as_ref()) {
            Ok(key) => key,
            Err(e) => return Err(self.log_rejection(e)),
        };

        // A store failure while reading related values aborts without a write
        if let Err(reason) = self.validate(&spec, differentiator.as_ref(), &value)? {
            return Err(self.log_rejection(SettingsError::rejected(setting, reason)));
        }

        let stored = match value {
            SettingValue::UInt(v) => match spec.scaling.apply(v) {
                Some(scaled) => SettingValue::UInt(scaled),
                None => {
                    return Err(self.log_rejection(SettingsError::rejected(setting, RejectReason::ArithmeticOverflow)));
                }
            },
            other => other,
        };
        self.storage.set_value(&self.module, &key, stored)?;

        let record = ChangeRecord { setting, differentiator, value };
        info!("Setting updated: {}", record);
        self.events.push(record.clone());
        Ok(record)
    }

    /// Apply updates in order. Stops at the first failure; earlier updates
    /// stay committed.
    pub fn apply_all(&mut self, updates: Vec<SettingUpdate>) -> Result<Vec<ChangeRecord>, SettingsError> {
        let mut records = Vec::with_capacity(updates.len());
        for (index, update) in updates.into_iter().enumerate() {
            match self.apply(update) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(SettingsError::BatchAborted { index, source: Box::new(e) });
                }
            }
        }
        Ok(records)
    }

    // =========================================================================
    // PIPELINE STEPS
    // =========================================================================

    fn key_for(
        &self,
        setting: SettingId,
        spec: &SettingSpec,
        differentiator: Option<&Differentiator>,
    ) -> Result<StorageKey, SettingsError> {
        let reason = match (spec.differentiator, differentiator) {
            (DifferentiatorKind::None, None) => None,
            (DifferentiatorKind::None, Some(d)) => Some(RejectReason::UnexpectedDifferentiator(d.kind())),
            (expected, None) => Some(RejectReason::MissingDifferentiator(expected)),
            (expected, Some(d)) if d.kind() != expected => Some(RejectReason::DifferentiatorMismatch {
                expected,
                found: d.kind(),
            }),
            _ => None,
        };
        if let Some(reason) = reason {
            return Err(SettingsError::rejected(setting, reason));
        }

        let key = keys::resolve(spec.name, differentiator);
        debug!("Resolved {} to key {}", spec.name, key);
        Ok(key)
    }

    fn validate(
        &self,
        spec: &SettingSpec,
        differentiator: Option<&Differentiator>,
        value: &SettingValue,
    ) -> Result<Result<(), RejectReason>, DatabaseError> {
        if value.kind() != spec.kind {
            return Ok(Err(RejectReason::KindMismatch { expected: spec.kind, found: value.kind() }));
        }

        if let Err(reason) = spec.bound.check(value) {
            return Ok(Err(reason));
        }

        let verdict = match (spec.rule, value) {
            (None, _) => Ok(()),
            (Some(CrossRule::LiquidationRatio), SettingValue::UInt(ratio)) => {
                let penalty = self.current_uint(SettingId::LiquidationPenalty)?;
                let issuance = self.current_uint(SettingId::IssuanceRatio)?;
                debug!("Liquidation ratio check: penalty={} issuance={}", penalty, issuance);
                invariants::check_liquidation_ratio(*ratio, penalty, issuance)
            }
            (Some(CrossRule::WrapperMintSignGuard), SettingValue::Int(rate)) => {
                let burn = self.current_int(SettingId::WrapperBurnFeeRate, differentiator)?;
                invariants::check_wrapper_mint_fee_rate(*rate, burn)
            }
            (Some(CrossRule::WrapperBurnSignGuard), SettingValue::Int(rate)) => {
                let mint = self.current_int(SettingId::WrapperMintFeeRate, differentiator)?;
                invariants::check_wrapper_burn_fee_rate(*rate, mint)
            }
            // Kinds were checked above; a rule never pairs with another kind
            (Some(_), _) => Ok(()),
        };
        Ok(verdict)
    }

    fn current_uint(&self, setting: SettingId) -> Result<U256, DatabaseError> {
        let key = keys::resolve(setting.name(), None);
        self.storage.get_uint(&self.module, &key)
    }

    fn current_int(&self, setting: SettingId, differentiator: Option<&Differentiator>) -> Result<I256, DatabaseError> {
        let key = keys::resolve(setting.name(), differentiator);
        self.storage.get_int(&self.module, &key)
    }

    fn log_rejection(&self, error: SettingsError) -> SettingsError {
        if let Some(rejection) = error.rejection() {
            warn!("Rejected update of {}: {}", rejection.setting, rejection.reason);
        }
        error
    }

    // =========================================================================
    // TYPED UPDATE SURFACE
    // =========================================================================

    pub fn set_cross_domain_message_gas_limit(
        &mut self,
        kind: CrossDomainMessageGasLimits,
        limit: U256,
    ) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(kind.setting(), limit))
    }

    pub fn set_trading_rewards_enabled(&mut self, enabled: bool) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::TradingRewardsEnabled, enabled))
    }

    pub fn set_waiting_period_secs(&mut self, secs: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::WaitingPeriodSecs, secs))
    }

    pub fn set_price_deviation_threshold_factor(&mut self, factor: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::PriceDeviationThresholdFactor, factor))
    }

    pub fn set_issuance_ratio(&mut self, ratio: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::IssuanceRatio, ratio))
    }

    pub fn set_fee_period_duration(&mut self, duration: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::FeePeriodDuration, duration))
    }

    /// `percent` is a whole percentage (0-50); stored as a fixed-point fraction
    pub fn set_target_threshold(&mut self, percent: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::TargetThreshold, percent))
    }

    pub fn set_liquidation_delay(&mut self, delay: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::LiquidationDelay, delay))
    }

    /// Checked against the stored liquidation penalty and issuance ratio
    pub fn set_liquidation_ratio(&mut self, ratio: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::LiquidationRatio, ratio))
    }

    pub fn set_liquidation_penalty(&mut self, penalty: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::LiquidationPenalty, penalty))
    }

    pub fn set_rate_stale_period(&mut self, period: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::RateStalePeriod, period))
    }

    /// Per-currency exchange fee rates.
    ///
    /// Mismatched array lengths reject the whole batch before any write.
    /// Otherwise elements are validated and committed one at a time: if
    /// element `i` is rejected, elements `0..i` remain committed and the
    /// error reports `index == i`.
    pub fn set_exchange_fee_rates(
        &mut self,
        currencies: &[CurrencyKey],
        rates: &[U256],
    ) -> Result<Vec<ChangeRecord>, SettingsError> {
        if currencies.len() != rates.len() {
            return Err(self.log_rejection(SettingsError::rejected(
                SettingId::ExchangeFeeRate,
                RejectReason::LengthMismatch { keys: currencies.len(), values: rates.len() },
            )));
        }

        let updates = currencies
            .iter()
            .zip(rates)
            .map(|(currency, rate)| SettingUpdate::for_currency(SettingId::ExchangeFeeRate, *currency, *rate))
            .collect();
        self.apply_all(updates)
    }

    pub fn set_minimum_stake_time(&mut self, time: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::MinimumStakeTime, time))
    }

    pub fn set_debt_snapshot_stale_time(&mut self, time: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::DebtSnapshotStaleTime, time))
    }

    pub fn set_aggregator_warning_flags(&mut self, flags: Address) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::AggregatorWarningFlags, flags))
    }

    pub fn set_ether_wrapper_max_eth(&mut self, max_eth: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::EtherWrapperMaxEth, max_eth))
    }

    pub fn set_ether_wrapper_mint_fee_rate(&mut self, rate: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::EtherWrapperMintFeeRate, rate))
    }

    pub fn set_ether_wrapper_burn_fee_rate(&mut self, rate: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::EtherWrapperBurnFeeRate, rate))
    }

    pub fn set_wrapper_max_token_amount(&mut self, wrapper: Address, max: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_address(SettingId::WrapperMaxTokenAmount, wrapper, max))
    }

    /// Checked against the wrapper's stored burn fee rate
    pub fn set_wrapper_mint_fee_rate(&mut self, wrapper: Address, rate: I256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_address(SettingId::WrapperMintFeeRate, wrapper, rate))
    }

    /// Checked against the wrapper's stored mint fee rate
    pub fn set_wrapper_burn_fee_rate(&mut self, wrapper: Address, rate: I256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_address(SettingId::WrapperBurnFeeRate, wrapper, rate))
    }

    pub fn set_interaction_delay(&mut self, collateral: Address, delay: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_address(SettingId::InteractionDelay, collateral, delay))
    }

    pub fn set_collapse_fee_rate(&mut self, collateral: Address, rate: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_address(SettingId::CollapseFeeRate, collateral, rate))
    }

    pub fn set_atomic_max_volume_per_block(&mut self, volume: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::AtomicMaxVolumePerBlock, volume))
    }

    pub fn set_atomic_twap_window(&mut self, window: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::AtomicTwapWindow, window))
    }

    pub fn set_atomic_equivalent_for_dex_pricing(
        &mut self,
        currency: CurrencyKey,
        equivalent: Address,
    ) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_currency(SettingId::AtomicEquivalentForDexPricing, currency, equivalent))
    }

    pub fn set_atomic_exchange_fee_rate(&mut self, currency: CurrencyKey, rate: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_currency(SettingId::AtomicExchangeFeeRate, currency, rate))
    }

    pub fn set_atomic_price_buffer(&mut self, currency: CurrencyKey, buffer: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_currency(SettingId::AtomicPriceBuffer, currency, buffer))
    }

    /// `0` disables the window for the currency
    pub fn set_atomic_volatility_consideration_window(
        &mut self,
        currency: CurrencyKey,
        window: U256,
    ) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_currency(SettingId::AtomicVolatilityConsiderationWindow, currency, window))
    }

    pub fn set_atomic_volatility_update_threshold(
        &mut self,
        currency: CurrencyKey,
        threshold: U256,
    ) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_currency(SettingId::AtomicVolatilityUpdateThreshold, currency, threshold))
    }

    pub fn set_pure_chainlink_price_for_atomic_swaps_enabled(
        &mut self,
        currency: CurrencyKey,
        enabled: bool,
    ) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_currency(SettingId::PureChainlinkPriceForAtomicSwapsEnabled, currency, enabled))
    }

    pub fn set_cross_chain_synth_transfer_enabled(
        &mut self,
        currency: CurrencyKey,
        value: U256,
    ) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::for_currency(SettingId::CrossChainSynthTransferEnabled, currency, value))
    }

    pub fn set_exchange_dynamic_fee_threshold(&mut self, threshold: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::ExchangeDynamicFeeThreshold, threshold))
    }

    pub fn set_exchange_dynamic_fee_weight_decay(&mut self, decay: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::ExchangeDynamicFeeWeightDecay, decay))
    }

    pub fn set_exchange_dynamic_fee_rounds(&mut self, rounds: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::ExchangeDynamicFeeRounds, rounds))
    }

    pub fn set_exchange_max_dynamic_fee(&mut self, max_fee: U256) -> Result<ChangeRecord, SettingsError> {
        self.apply(SettingUpdate::new(SettingId::ExchangeMaxDynamicFee, max_fee))
    }
}
