//! Key-Value State - Sink Persistence per Field
//!
//! Model state mengikuti platform hook: key pendek, value kecil,
//! overwrite per key (last write wins). Runner hanya memakai `put`;
//! accessor lain melayani test dan tooling.

use std::collections::HashMap;

use thiserror::Error;

/// Batas panjang key dalam bytes
pub const MAX_KEY_LEN: usize = 32;
/// Batas panjang value dalam bytes
pub const MAX_VALUE_LEN: usize = 256;

/// Error operasi state store.
///
/// Runner men-trace lalu mengabaikan error ini: satu invocation tidak
/// pernah gagal karena sink (lihat `hook::run`).
#[derive(Debug, Error)]
pub enum StateError {
    #[error("key too long: {len} bytes (max {MAX_KEY_LEN})")]
    KeyTooLong { len: usize },
    #[error("value too long: {len} bytes (max {MAX_VALUE_LEN})")]
    ValueTooLong { len: usize },
    #[error("slot table full ({slots} slots)")]
    StoreFull { slots: usize },
    #[error("unknown state file version {found} (expected {expected})")]
    BadVersion { found: u32, expected: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Sink persistence: satu `put` per field yang diteruskan.
pub trait StateStore {
    /// Simpan `value` di bawah `key`, overwrite jika sudah ada.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StateError>;

    /// Baca kembali value untuk `key` (test dan tooling).
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Jumlah key tersimpan.
    fn len(&self) -> usize;

    /// Apakah store kosong.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Semua key tersimpan, urutan tidak dijamin.
    fn keys(&self) -> Vec<String>;
}

/// Validasi batas key/value, sama untuk semua implementasi.
#[inline(always)]
pub(crate) fn check_limits(key: &str, value: &[u8]) -> Result<(), StateError> {
    if key.len() > MAX_KEY_LEN {
        return Err(StateError::KeyTooLong { len: key.len() });
    }
    if value.len() > MAX_VALUE_LEN {
        return Err(StateError::ValueTooLong { len: value.len() });
    }
    Ok(())
}

/// State store in-memory untuk test, demo, dan invocation sekali-pakai.
#[derive(Debug, Default)]
pub struct MemoryState {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryState {
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StateError> {
        check_limits(key, value)?;
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}
