// Batch Commit Tests
// Exchange fee batches and sequential update lists stop at the first refusal

use super::{create_address, pct, spct};
use crate::settings::{RejectReason, SettingId, SettingUpdate, SettingsError, SystemSettings};
use crate::storage::MemoryStorage;
use crate::types::{CurrencyKey, Differentiator, SettingValue, U256};

fn settings() -> SystemSettings<MemoryStorage> {
    SystemSettings::new(MemoryStorage::new())
}

fn keys(symbols: &[&str]) -> Vec<CurrencyKey> {
    symbols.iter().map(|s| CurrencyKey::new(s).unwrap()).collect()
}

fn fee_rate(s: &SystemSettings<MemoryStorage>, currency: CurrencyKey) -> SettingValue {
    s.get(SettingId::ExchangeFeeRate, Some(&Differentiator::Currency(currency)))
        .unwrap()
}

// =============================================================================
// EXCHANGE FEE BATCH
// =============================================================================

pub mod exchange_fee_batch {
    use super::*;

    #[test]
    fn test_partial_commit_reports_failing_index() {
        let mut s = settings();
        let currencies = keys(&["sUSD", "sETH"]);

        let err = s.set_exchange_fee_rates(&currencies, &[pct(5), pct(11)]).unwrap_err();

        match &err {
            SettingsError::BatchAborted { index, .. } => assert_eq!(*index, 1),
            other => panic!("expected a batch abort, got {:?}", other),
        }
        assert!(matches!(err.reason(), Some(RejectReason::OutOfRange { .. })));
        let rejected = err.rejection().unwrap();
        assert_eq!(rejected.setting, SettingId::ExchangeFeeRate);

        assert_eq!(fee_rate(&s, currencies[0]), SettingValue::UInt(pct(5)), "element 0 stays committed");
        assert_eq!(fee_rate(&s, currencies[1]), SettingValue::UInt(U256::ZERO));
        assert_eq!(s.events().len(), 1, "one record per committed element");
    }

    #[test]
    fn test_length_mismatch_writes_nothing() {
        let mut s = settings();
        let currencies = keys(&["sUSD", "sETH", "sBTC"]);

        let err = s.set_exchange_fee_rates(&currencies, &[pct(1), pct(2)]).unwrap_err();

        assert_eq!(err.reason(), Some(&RejectReason::LengthMismatch { keys: 3, values: 2 }));
        assert_eq!(s.storage().write_count(), 0);
        assert!(s.events().is_empty());
    }

    #[test]
    fn test_full_batch_emits_in_order() {
        let mut s = settings();
        let currencies = keys(&["sUSD", "sETH", "sBTC"]);

        let records = s
            .set_exchange_fee_rates(&currencies, &[pct(1), pct(2), pct(3)])
            .unwrap();

        let announced: Vec<_> = records.iter().map(|r| r.differentiator).collect();
        let expected: Vec<_> = currencies.iter().map(|c| Some(Differentiator::Currency(*c))).collect();
        assert_eq!(announced, expected);
        assert_eq!(s.events(), records.as_slice());
    }

    #[test]
    fn test_empty_batch_is_a_no_op() {
        let mut s = settings();
        assert!(s.set_exchange_fee_rates(&[], &[]).unwrap().is_empty());
        assert_eq!(s.storage().write_count(), 0);
    }

    #[test]
    fn test_first_element_failure_commits_nothing() {
        let mut s = settings();
        let currencies = keys(&["sUSD", "sETH"]);

        let err = s.set_exchange_fee_rates(&currencies, &[pct(11), pct(1)]).unwrap_err();

        assert!(matches!(err, SettingsError::BatchAborted { index: 0, .. }));
        assert_eq!(s.storage().write_count(), 0);
    }
}

// =============================================================================
// SEQUENTIAL UPDATE LISTS
// =============================================================================

pub mod update_lists {
    use super::*;

    #[test]
    fn test_earlier_updates_feed_later_rules() {
        let mut s = settings();
        let wrapper = create_address(5);

        // The burn fee written first covers the mint rebate that follows
        let records = s
            .apply_all(vec![
                SettingUpdate::for_address(SettingId::WrapperBurnFeeRate, wrapper, spct(6)),
                SettingUpdate::for_address(SettingId::WrapperMintFeeRate, wrapper, spct(-5)),
            ])
            .unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_stops_at_first_refusal() {
        let mut s = settings();

        let err = s
            .apply_all(vec![
                SettingUpdate::new(SettingId::IssuanceRatio, pct(20)),
                SettingUpdate::new(SettingId::IssuanceRatio, true),
                SettingUpdate::new(SettingId::LiquidationPenalty, pct(10)),
            ])
            .unwrap_err();

        assert!(matches!(err, SettingsError::BatchAborted { index: 1, .. }));
        assert!(matches!(err.reason(), Some(RejectReason::KindMismatch { .. })));
        assert_eq!(s.get(SettingId::IssuanceRatio, None).unwrap(), SettingValue::UInt(pct(20)));
        assert_eq!(
            s.get(SettingId::LiquidationPenalty, None).unwrap(),
            SettingValue::UInt(U256::ZERO),
            "updates after the refusal never run"
        );
    }
}
