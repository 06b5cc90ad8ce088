// Settings errors - One rejection taxonomy, plus storage failures
use super::catalog::SettingId;
use crate::storage::DatabaseError;
use crate::types::{DifferentiatorKind, ValueKind, I256, U256};

/// Why a candidate value was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("value {value} outside [{min}, {max}]")]
    OutOfRange { value: U256, min: U256, max: U256 },

    #[error("value {value} outside [{min}, {max}]")]
    SignedOutOfRange { value: I256, min: I256, max: I256 },

    #[error("value cannot be 0")]
    ZeroValue,

    #[error("valid address must be given")]
    ZeroAddress,

    #[error("array lengths dont match ({keys} keys, {values} values)")]
    LengthMismatch { keys: usize, values: usize },

    #[error("liquidation ratio {ratio} > MAX_LIQUIDATION_RATIO / (1 + penalty) = {max}")]
    AbovePenaltyCap { ratio: U256, max: U256 },

    #[error("liquidation ratio {ratio} < issuance ratio buffer {min}")]
    BelowIssuanceBuffer { ratio: U256, min: U256 },

    #[error("-rate {rebate} > wrapperBurnFeeRate {burn_rate}")]
    MintRebateExceedsBurnFee { rebate: I256, burn_rate: I256 },

    #[error("-rate {rebate} > wrapperMintFeeRate {mint_rate}")]
    BurnRebateExceedsMintFee { rebate: I256, mint_rate: I256 },

    #[error("expected a {expected} value, got {found}")]
    KindMismatch { expected: ValueKind, found: ValueKind },

    #[error("a {0} differentiator is required")]
    MissingDifferentiator(DifferentiatorKind),

    #[error("no differentiator expected, got a {0} one")]
    UnexpectedDifferentiator(DifferentiatorKind),

    #[error("expected a {expected} differentiator, got {found}")]
    DifferentiatorMismatch { expected: DifferentiatorKind, found: DifferentiatorKind },

    #[error("fixed-point arithmetic overflow")]
    ArithmeticOverflow,
}

/// A refused update: the setting and the rule it failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{setting}: {reason}")]
pub struct RejectedUpdate {
    pub setting: SettingId,
    pub reason: RejectReason,
}

/// Errors surfaced by the settings service
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Rejected update of {0}")]
    Rejected(RejectedUpdate),

    /// A sequential batch stopped at `index`; elements before it stay committed
    #[error("Batch aborted at element {index}: {source}")]
    BatchAborted {
        index: usize,
        #[source]
        source: Box<SettingsError>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
}

impl SettingsError {
    pub fn rejected(setting: SettingId, reason: RejectReason) -> Self {
        SettingsError::Rejected(RejectedUpdate { setting, reason })
    }

    /// The rejection behind this error, looking through batch aborts
    pub fn rejection(&self) -> Option<&RejectedUpdate> {
        match self {
            SettingsError::Rejected(r) => Some(r),
            SettingsError::BatchAborted { source, .. } => source.rejection(),
            SettingsError::Storage(_) => None,
        }
    }

    /// Shorthand for `rejection().map(|r| &r.reason)`
    pub fn reason(&self) -> Option<&RejectReason> {
        self.rejection().map(|r| &r.reason)
    }
}
