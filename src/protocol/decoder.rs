//! Blob Decoder - Length-Gated Zero-Copy Extraction
//!
//! Decode berbasis panjang saja: field diekstrak jika dan hanya jika
//! blob cukup panjang untuk memuatnya penuh (lihat tabel di `layout`).
//! Tidak ada kondisi error. Blob pendek atau kosong menghasilkan lebih
//! sedikit field, bukan kegagalan.

use super::layout::{FieldSpec, BLOB_FIELDS};

/// Satu hasil ekstraksi: nama field + irisan byte dari blob.
///
/// Irisan meminjam dari buffer blob (zero-copy). Sink menyalin
/// sendiri saat persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction<'a> {
    /// Nama logis field
    pub name: &'static str,
    /// Key persistence
    pub state_key: &'static str,
    /// Byte field, exact, tanpa transformasi
    pub bytes: &'a [u8],
}

/// Iterator satu arah melewati tabel layout.
///
/// Menghasilkan field dalam urutan tabel dan berhenti pada field
/// pertama yang tidak hadir (threshold naik strictly, jadi sisanya
/// pasti tidak hadir juga).
pub struct BlobDecoder<'a> {
    blob: &'a [u8],
    idx: usize,
}

impl<'a> BlobDecoder<'a> {
    /// Membuat decoder untuk satu blob. Semua panjang valid, termasuk 0.
    #[inline(always)]
    pub fn new(blob: &'a [u8]) -> Self {
        Self { blob, idx: 0 }
    }

    /// Blob yang sedang didecode
    #[inline(always)]
    pub fn blob_len(&self) -> usize {
        self.blob.len()
    }
}

impl<'a> Iterator for BlobDecoder<'a> {
    type Item = Extraction<'a>;

    #[inline(always)]
    fn next(&mut self) -> Option<Extraction<'a>> {
        let spec: &FieldSpec = BLOB_FIELDS.get(self.idx)?;

        if !spec.is_present(self.blob.len()) {
            self.idx = BLOB_FIELDS.len();
            return None;
        }

        self.idx += 1;
        let end = spec.end(self.blob.len());
        Some(Extraction {
            name: spec.name,
            state_key: spec.state_key,
            bytes: &self.blob[spec.offset..end],
        })
    }
}

/// Decode blob menjadi urutan ekstraksi.
#[inline(always)]
pub fn decode(blob: &[u8]) -> BlobDecoder<'_> {
    BlobDecoder::new(blob)
}
