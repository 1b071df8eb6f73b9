//! Sponge - Length-Gated Blob Decoder dengan Durable KV State
//!
//! Satu unit kerja per event:
//! - Parameter konfigurasi (hp_*): dibaca bounded, trace only
//! - Parameter event (tp_*): dibaca bounded, dipersist dengan policy panjang
//! - Blob: diiris menurut tabel layout, tiap field hadir dipersist
//! - Selalu accept: tidak ada input yang membuat invocation gagal
//!
//! Arsitektur:
//! - protocol: tabel layout + decoder zero-copy + tabel parameter
//! - core: StateStore (MemoryState / mmap-backed MmapState)
//! - hook: boundary Host + runner

pub mod core;
pub mod hook;
pub mod protocol;
