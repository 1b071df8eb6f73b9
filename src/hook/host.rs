//! Host Boundary - Sumber Parameter dan Blob per Event
//!
//! Kontrak baca: caller menyediakan buffer, kapasitas = panjang
//! buffer. Nilai yang lebih panjang di-truncate ke kapasitas, jadi
//! runner hanya melihat byte yang benar-benar diterima.

use std::collections::HashMap;

/// Lingkungan eksekusi yang memanggil hook sekali per event.
///
/// Semua read mengembalikan `None` saat sumber tidak ada (outcome
/// normal, bukan error) atau `Some(n)` dengan n byte tertulis ke
/// `out`, n <= out.len(). `Some(0)` berarti ditemukan dengan panjang
/// nol, berbeda dari tidak ada.
pub trait Host {
    /// Baca parameter konfigurasi (di-set saat instalasi).
    fn read_config_param(&self, name: &str, out: &mut [u8]) -> Option<usize>;

    /// Baca parameter dari event pemicu.
    fn read_event_param(&self, name: &str, out: &mut [u8]) -> Option<usize>;

    /// Baca blob dari record event pemicu.
    fn read_event_blob(&self, out: &mut [u8]) -> Option<usize>;
}

/// Tulis `value` ke `out`, truncate ke kapasitas buffer.
#[inline(always)]
fn bounded_copy(value: &[u8], out: &mut [u8]) -> usize {
    let n = value.len().min(out.len());
    out[..n].copy_from_slice(&value[..n]);
    n
}

/// Bungkus payload menjadi blob bergaya VarString: 1 byte length
/// prefix + payload. Prefix menampung panjang payload (cap 255);
/// decoder tidak pernah membaca nilainya.
pub fn var_string_blob(payload: &[u8]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(1 + payload.len());
    blob.push(payload.len().min(255) as u8);
    blob.extend_from_slice(payload);
    blob
}

/// Host simulasi in-memory untuk test, CLI, dan demo.
#[derive(Debug, Default)]
pub struct SimHost {
    config_params: HashMap<String, Vec<u8>>,
    event_params: HashMap<String, Vec<u8>>,
    blob: Option<Vec<u8>>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parameter konfigurasi.
    pub fn set_config_param(&mut self, name: &str, value: &[u8]) {
        self.config_params.insert(name.to_string(), value.to_vec());
    }

    /// Set parameter event.
    pub fn set_event_param(&mut self, name: &str, value: &[u8]) {
        self.event_params.insert(name.to_string(), value.to_vec());
    }

    /// Set blob event, termasuk length prefix di byte 0.
    pub fn set_blob(&mut self, blob: &[u8]) {
        self.blob = Some(blob.to_vec());
    }
}

impl Host for SimHost {
    fn read_config_param(&self, name: &str, out: &mut [u8]) -> Option<usize> {
        self.config_params.get(name).map(|v| bounded_copy(v, out))
    }

    fn read_event_param(&self, name: &str, out: &mut [u8]) -> Option<usize> {
        self.event_params.get(name).map(|v| bounded_copy(v, out))
    }

    fn read_event_blob(&self, out: &mut [u8]) -> Option<usize> {
        self.blob.as_ref().map(|v| bounded_copy(v, out))
    }
}
