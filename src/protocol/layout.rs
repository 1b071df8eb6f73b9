//! Blob Layout - Fixed Offsets dengan Length-Gated Presence
//!
//! Layout:
//! ┌─────────────────────────────────────────────────────┐
//! │ 0       length prefix (1 byte, tidak disimpan)      │
//! ├─────────────────────────────────────────────────────┤
//! │ 1..5    tag (4 bytes)                               │
//! │ 5..6    version (1 byte)                            │
//! │ 6..26   account (20 bytes)                          │
//! │ 26..34  limit (8 bytes, raw)                        │
//! │ 34..L   note (sisa blob, variable)                  │
//! └─────────────────────────────────────────────────────┘
//!
//! Field hadir jika dan hanya jika blob cukup panjang untuk memuatnya
//! penuh. Threshold naik strictly: blob yang memuat field ke-N pasti
//! memuat field 1..N-1 juga. Isi byte tidak pernah diinspeksi.

/// Panjang field: ukuran tetap atau sisa blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLen {
    /// Ukuran tetap dalam bytes
    Fixed(usize),
    /// Semua byte dari offset sampai akhir blob
    Tail,
}

/// Satu baris tabel layout: dari mana field diiris dan kapan hadir.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Nama logis field
    pub name: &'static str,
    /// Key untuk persistence sink
    pub state_key: &'static str,
    /// Offset byte pertama dalam blob
    pub offset: usize,
    /// Panjang field
    pub len: FieldLen,
    /// Panjang blob minimum agar field dianggap hadir
    pub min_blob_len: usize,
}

impl FieldSpec {
    /// Apakah field hadir pada blob sepanjang `blob_len`?
    #[inline(always)]
    pub fn is_present(&self, blob_len: usize) -> bool {
        blob_len >= self.min_blob_len
    }

    /// Akhir (exclusive) irisan field untuk blob sepanjang `blob_len`.
    #[inline(always)]
    pub fn end(&self, blob_len: usize) -> usize {
        match self.len {
            FieldLen::Fixed(n) => self.offset + n,
            FieldLen::Tail => blob_len,
        }
    }
}

/// Length prefix di byte 0 (artefak encoding VarString dari event)
pub const PREFIX_LEN: usize = 1;

pub const TAG_OFFSET: usize = 1;
pub const TAG_LEN: usize = 4;
pub const VERSION_OFFSET: usize = 5;
pub const VERSION_LEN: usize = 1;
pub const ACCOUNT_OFFSET: usize = 6;
pub const ACCOUNT_LEN: usize = 20;
pub const LIMIT_OFFSET: usize = 26;
pub const LIMIT_LEN: usize = 8;
pub const NOTE_OFFSET: usize = 34;
/// Kapasitas baca untuk note (bagian tail)
pub const NOTE_CAPACITY: usize = 64;

/// Kapasitas baca blob dari host: prefix + semua field fixed + note
pub const BLOB_READ_CAPACITY: usize =
    PREFIX_LEN + TAG_LEN + VERSION_LEN + ACCOUNT_LEN + LIMIT_LEN + NOTE_CAPACITY;

/// Tabel layout blob - satu entry per field, urutan offset naik.
///
/// Decoder berjalan sekali melewati tabel ini. Menambah field baru =
/// menambah satu baris, tanpa menyentuh logika decode.
pub const BLOB_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        name: "tag",
        state_key: "blob_tag",
        offset: TAG_OFFSET,
        len: FieldLen::Fixed(TAG_LEN),
        min_blob_len: TAG_OFFSET + TAG_LEN,
    },
    FieldSpec {
        name: "version",
        state_key: "blob_version",
        offset: VERSION_OFFSET,
        len: FieldLen::Fixed(VERSION_LEN),
        min_blob_len: VERSION_OFFSET + VERSION_LEN,
    },
    FieldSpec {
        name: "account",
        state_key: "blob_account",
        offset: ACCOUNT_OFFSET,
        len: FieldLen::Fixed(ACCOUNT_LEN),
        min_blob_len: ACCOUNT_OFFSET + ACCOUNT_LEN,
    },
    FieldSpec {
        name: "limit",
        state_key: "blob_limit",
        offset: LIMIT_OFFSET,
        len: FieldLen::Fixed(LIMIT_LEN),
        min_blob_len: LIMIT_OFFSET + LIMIT_LEN,
    },
    FieldSpec {
        name: "note",
        state_key: "blob_note",
        // Tail butuh minimal 1 byte: blob yang berhenti tepat di
        // NOTE_OFFSET tidak punya note
        offset: NOTE_OFFSET,
        len: FieldLen::Tail,
        min_blob_len: NOTE_OFFSET + 1,
    },
];

/// Jumlah field yang dihasilkan blob sepanjang `len` bytes.
#[inline(always)]
pub fn decoded_field_count(len: usize) -> usize {
    BLOB_FIELDS.iter().filter(|f| f.is_present(len)).count()
}
