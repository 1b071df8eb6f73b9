//! Parameter Tables - Dua Namespace dengan Kapasitas Baca Tetap
//!
//! Dua sumber named parameter per event:
//! - Config (hp_*): di-set saat instalasi, dibaca untuk trace saja
//! - Event (tp_*): ikut event pemicu, dipersist dengan key = nama
//!
//! Setiap read dibatasi kapasitas buffer caller. Nilai yang lebih
//! panjang dari kapasitas di-truncate oleh host, bukan ditolak.

use super::layout::BLOB_READ_CAPACITY;

/// Namespace sumber parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// Parameter instalasi (trace only)
    Config,
    /// Parameter event (dipersist)
    Event,
}

/// Deskriptor satu named parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Nama parameter, juga key persistence untuk namespace Event
    pub name: &'static str,
    /// Namespace asal
    pub source: ParamSource,
    /// Kapasitas baca maksimum dalam bytes
    pub capacity: usize,
    /// Panjang wajib: jika `Some(n)`, nilai hanya diteruskan
    /// saat panjang observed tepat n bytes
    pub expected_len: Option<usize>,
}

/// Parameter konfigurasi - tidak pernah menyentuh state.
pub const CONFIG_PARAMS: [ParamSpec; 3] = [
    ParamSpec {
        name: "hp_admin",
        source: ParamSource::Config,
        capacity: 32,
        expected_len: None,
    },
    ParamSpec {
        name: "hp_limit",
        source: ParamSource::Config,
        capacity: 32,
        expected_len: None,
    },
    ParamSpec {
        name: "hp_note",
        source: ParamSource::Config,
        capacity: 64,
        expected_len: None,
    },
];

/// Parameter event - dipersist verbatim di bawah nama parameter.
pub const EVENT_PARAMS: [ParamSpec; 3] = [
    ParamSpec {
        name: "tp_sender",
        source: ParamSource::Event,
        // Account id: hanya valid pada tepat 20 bytes
        capacity: 20,
        expected_len: Some(20),
    },
    ParamSpec {
        name: "tp_count",
        source: ParamSource::Event,
        capacity: 32,
        expected_len: None,
    },
    ParamSpec {
        name: "tp_label",
        source: ParamSource::Event,
        capacity: 96,
        expected_len: None,
    },
];

/// Kapasitas baca terbesar di semua sumber (param dan blob).
/// Satu scratch buffer sebesar ini melayani semua read per invocation.
pub const MAX_READ_CAPACITY: usize = BLOB_READ_CAPACITY;
