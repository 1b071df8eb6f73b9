//! Core module: Key-Value State dengan Mmap backing
//!
//! Prinsip desain:
//! - Overwrite per key: setiap put menimpa value lama, last write wins
//! - Bounded: key max 32 bytes, value max 256 bytes, geometri slot tetap
//! - Durable: MmapState bertahan melewati reopen, MemoryState untuk test

mod mmap_state;
mod state;

pub use mmap_state::{MmapState, DEFAULT_SLOTS};
pub use state::{MemoryState, StateError, StateStore, MAX_KEY_LEN, MAX_VALUE_LEN};
