//! Protocol Layer: Length-Gated Blob Decoding
//!
//! Prinsip desain:
//! - Deklaratif: layout blob dan kapasitas parameter dalam tabel const
//! - Length-gated: kehadiran field ditentukan panjang blob, bukan isinya
//! - Zero-copy: ekstraksi meminjam langsung dari buffer blob
//! - No failure: blob pendek menghasilkan lebih sedikit field, bukan error

mod decoder;
mod layout;
mod params;

pub use decoder::{decode, BlobDecoder, Extraction};
pub use layout::{
    decoded_field_count, FieldLen, FieldSpec, BLOB_FIELDS, BLOB_READ_CAPACITY, NOTE_CAPACITY,
    PREFIX_LEN,
};
pub use params::{ParamSource, ParamSpec, CONFIG_PARAMS, EVENT_PARAMS, MAX_READ_CAPACITY};
