// Key resolver - (setting name, differentiator) -> storage key
use crate::types::{pad_word, Differentiator, StorageKey, WORD_LEN};

/// Module (contract) name all system settings are scoped under
pub const SETTINGS_MODULE: &str = "SystemSettings";

/// Resolve the storage key of a setting.
///
/// Undifferentiated settings live under their padded name. Differentiated
/// settings hash the padded name followed by the differentiator's canonical
/// bytes, so variants never collide with each other or with the base key.
pub fn resolve(name: &str, differentiator: Option<&Differentiator>) -> StorageKey {
    let word = name_word(name);
    match differentiator {
        None => StorageKey::from_bytes(word),
        Some(d) => {
            let mut hasher = blake3::Hasher::new();
            hasher.update(&word);
            hasher.update(d.canonical_bytes());
            StorageKey::from_bytes(*hasher.finalize().as_bytes())
        }
    }
}

/// Padded 32-byte form of a setting name.
///
/// Catalogue names are compile-time constants no longer than 32 bytes (see the
/// catalogue tests); a longer name is truncated.
fn name_word(name: &str) -> [u8; WORD_LEN] {
    pad_word(name).unwrap_or_else(|| {
        let mut word = [0u8; WORD_LEN];
        word.copy_from_slice(&name.as_bytes()[..WORD_LEN]);
        word
    })
}
