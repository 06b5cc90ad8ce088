// Settings - Governed protocol parameters
// Principle: Every accepted value is in range and consistent with its neighbours

pub mod bounds;
pub mod catalog;
pub mod decimal;
pub mod error;
pub mod invariants;
pub mod keys;
pub mod system;

pub use catalog::{CrossDomainMessageGasLimits, Scaling, SettingId, SettingSpec, UnknownSetting};
pub use error::{RejectReason, RejectedUpdate, SettingsError};
pub use keys::{resolve, SETTINGS_MODULE};
pub use system::{ChangeRecord, SettingUpdate, SystemSettings};
