//! Memory-Mapped Key-Value State untuk Persistence
//!
//! State di-mmap langsung ke virtual memory:
//! - Open-addressing: slot table power-of-2 dengan linear probing
//! - Fixed slots: key max 32 bytes, value max 256 bytes per slot
//! - Persistence: isi bertahan melewati reopen, format native-endian
//!
//! Tidak ada delete. Working set hook hanya beberapa key yang ditulis
//! ulang setiap invocation, jadi slot kosong valid sebagai terminator
//! probe.

use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;

use memmap2::{MmapMut, MmapOptions};

use super::state::{check_limits, StateError, StateStore, MAX_KEY_LEN, MAX_VALUE_LEN};

/// Header untuk state file - menyimpan metadata
#[repr(C, align(64))]
struct StateHeader {
    magic: u64,      // Magic number untuk validasi
    version: u32,    // Versi format
    slot_count: u32, // Jumlah slot (power of 2)
    used: u32,       // Jumlah slot terisi
}

/// Satu slot: key + value dengan panjang eksplisit
#[repr(C)]
struct Slot {
    key_len: u8, // 0 = slot kosong
    key: [u8; MAX_KEY_LEN],
    val_len: u16,
    val: [u8; MAX_VALUE_LEN],
}

impl Slot {
    // Panjang di-clamp ke kapasitas slot: file korup tidak boleh
    // membuat slice keluar batas
    #[inline(always)]
    fn key_bytes(&self) -> &[u8] {
        &self.key[..(self.key_len as usize).min(MAX_KEY_LEN)]
    }

    #[inline(always)]
    fn value_bytes(&self) -> &[u8] {
        &self.val[..(self.val_len as usize).min(MAX_VALUE_LEN)]
    }
}

const MAGIC: u64 = 0x53504F4E47454B56; // "SPONGEKV" in hex
const VERSION: u32 = 1;
const HEADER_SIZE: usize = std::mem::size_of::<StateHeader>();
const SLOT_SIZE: usize = std::mem::size_of::<Slot>();

/// Jumlah slot default untuk state file baru
pub const DEFAULT_SLOTS: usize = 1024;

/// FNV-1a 64-bit untuk index slot
#[inline(always)]
fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Mmap-backed key-value state
pub struct MmapState {
    mmap: MmapMut,
    slot_count: usize,
}

impl MmapState {
    /// Membuat atau membuka state file
    ///
    /// File valid yang sudah ada menentukan geometrinya sendiri;
    /// `slots` hanya dipakai saat membuat file baru (atau menimpa
    /// file dengan magic salah).
    ///
    /// # Arguments
    /// * `path` - Path ke state file
    /// * `slots` - Jumlah slot untuk file baru (harus power of 2)
    ///
    /// # Panics
    /// Panic jika `slots` bukan power of 2.
    pub fn open<P: AsRef<Path>>(path: P, slots: usize) -> Result<Self, StateError> {
        assert!(slots.is_power_of_two(), "Slot count must be power of 2");

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let existing = file.metadata()?.len() as usize;

        let mut slot_count = slots;
        let mut reinit = true;

        if existing >= HEADER_SIZE {
            // Baca header file lama sebelum mmap untuk menentukan geometri
            let mut probe = [0u8; 16];
            (&file).read_exact(&mut probe)?;

            let magic = u64::from_ne_bytes([
                probe[0], probe[1], probe[2], probe[3], probe[4], probe[5], probe[6], probe[7],
            ]);

            if magic == MAGIC {
                let version = u32::from_ne_bytes([probe[8], probe[9], probe[10], probe[11]]);
                if version != VERSION {
                    return Err(StateError::BadVersion {
                        found: version,
                        expected: VERSION,
                    });
                }

                let stored = u32::from_ne_bytes([probe[12], probe[13], probe[14], probe[15]]) as usize;
                if stored.is_power_of_two() {
                    slot_count = stored;
                    reinit = false;
                }
            }
        }

        let total_size = HEADER_SIZE + slot_count * SLOT_SIZE;

        if existing < total_size {
            file.set_len(total_size as u64)?;
        }

        // SAFETY: File sudah dibuka dengan read/write permission
        let mut mmap = unsafe { MmapOptions::new().len(total_size).map_mut(&file)? };

        if reinit {
            // File baru atau magic salah: mulai dari tabel kosong
            mmap.fill(0);

            let header = unsafe { &mut *(mmap.as_mut_ptr() as *mut StateHeader) };
            header.magic = MAGIC;
            header.version = VERSION;
            header.slot_count = slot_count as u32;
            header.used = 0;
        }

        Ok(Self { mmap, slot_count })
    }

    /// Flush isi mmap ke disk
    pub fn flush(&self) -> Result<(), StateError> {
        self.mmap.flush()?;
        Ok(())
    }

    /// Jumlah slot dalam tabel
    #[inline(always)]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    #[inline(always)]
    fn header(&self) -> &StateHeader {
        // SAFETY: Header berada di awal mmap region
        unsafe { &*(self.mmap.as_ptr() as *const StateHeader) }
    }

    #[inline(always)]
    fn header_mut(&mut self) -> &mut StateHeader {
        // SAFETY: Header berada di awal mmap region
        unsafe { &mut *(self.mmap.as_mut_ptr() as *mut StateHeader) }
    }

    #[inline(always)]
    fn slot(&self, idx: usize) -> &Slot {
        debug_assert!(idx < self.slot_count);
        // SAFETY: idx < slot_count, region mencakup seluruh tabel slot
        unsafe { &*(self.mmap.as_ptr().add(HEADER_SIZE + idx * SLOT_SIZE) as *const Slot) }
    }

    #[inline(always)]
    fn slot_mut(&mut self, idx: usize) -> &mut Slot {
        debug_assert!(idx < self.slot_count);
        // SAFETY: idx < slot_count, region mencakup seluruh tabel slot
        unsafe { &mut *(self.mmap.as_mut_ptr().add(HEADER_SIZE + idx * SLOT_SIZE) as *mut Slot) }
    }
}

impl StateStore for MmapState {
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StateError> {
        check_limits(key, value)?;

        let key_bytes = key.as_bytes();
        let mask = self.slot_count - 1;
        let mut idx = (fnv1a(key_bytes) as usize) & mask;

        for _ in 0..self.slot_count {
            if self.slot(idx).key_len == 0 {
                // Slot kosong: klaim untuk key baru
                self.header_mut().used += 1;

                let slot = self.slot_mut(idx);
                slot.key_len = key_bytes.len() as u8;
                slot.key[..key_bytes.len()].copy_from_slice(key_bytes);
                slot.val_len = value.len() as u16;
                slot.val[..value.len()].copy_from_slice(value);
                return Ok(());
            }

            if self.slot(idx).key_bytes() == key_bytes {
                // Key sudah ada: overwrite value. Sisa val lama tidak
                // perlu di-zero, val_len yang menentukan.
                let slot = self.slot_mut(idx);
                slot.val_len = value.len() as u16;
                slot.val[..value.len()].copy_from_slice(value);
                return Ok(());
            }

            idx = (idx + 1) & mask;
        }

        Err(StateError::StoreFull {
            slots: self.slot_count,
        })
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        if key.len() > MAX_KEY_LEN {
            return None;
        }

        let key_bytes = key.as_bytes();
        let mask = self.slot_count - 1;
        let mut idx = (fnv1a(key_bytes) as usize) & mask;

        for _ in 0..self.slot_count {
            let slot = self.slot(idx);
            if slot.key_len == 0 {
                // Tanpa delete, slot kosong menghentikan probe
                return None;
            }
            if slot.key_bytes() == key_bytes {
                return Some(slot.value_bytes().to_vec());
            }
            idx = (idx + 1) & mask;
        }

        None
    }

    fn len(&self) -> usize {
        self.header().used as usize
    }

    fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len());
        for idx in 0..self.slot_count {
            let slot = self.slot(idx);
            if slot.key_len > 0 {
                keys.push(String::from_utf8_lossy(slot.key_bytes()).into_owned());
            }
        }
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_layout_sizes() {
        // Header satu cache line, slot = 1 + 32 + padding + 2 + 256
        assert_eq!(HEADER_SIZE, 64);
        assert_eq!(SLOT_SIZE, 292);
    }

    #[test]
    fn test_put_get_basic() {
        let path = "test_state_basic.dat";

        {
            let mut state = MmapState::open(path, 64).unwrap();
            state.put("blob_tag", b"CONF").unwrap();

            assert_eq!(state.get("blob_tag").unwrap(), b"CONF");
            assert_eq!(state.len(), 1);
        }

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_persistence_across_reopen() {
        let path = "test_state_persist.dat";

        // Tulis lalu drop (munmap)
        {
            let mut state = MmapState::open(path, 64).unwrap();
            state.put("tp_count", b"42").unwrap();
            state.put("blob_note", b"hello").unwrap();
        }

        // Buka ulang dan verifikasi
        {
            let state = MmapState::open(path, 64).unwrap();
            assert_eq!(state.get("tp_count").unwrap(), b"42");
            assert_eq!(state.get("blob_note").unwrap(), b"hello");
            assert_eq!(state.len(), 2);
        }

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_reopen_honors_stored_geometry() {
        let path = "test_state_geometry.dat";

        {
            let mut state = MmapState::open(path, 16).unwrap();
            state.put("tp_label", b"x").unwrap();
        }

        // Argumen slots berbeda tidak mengubah geometri file lama
        {
            let state = MmapState::open(path, 4096).unwrap();
            assert_eq!(state.slot_count(), 16);
            assert_eq!(state.get("tp_label").unwrap(), b"x");
        }

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_overwrite_last_wins() {
        let path = "test_state_overwrite.dat";

        {
            let mut state = MmapState::open(path, 64).unwrap();
            state.put("tp_count", b"first").unwrap();
            state.put("tp_count", b"second").unwrap();

            assert_eq!(state.get("tp_count").unwrap(), b"second");
            assert_eq!(state.len(), 1);
        }

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_store_full() {
        let path = "test_state_full.dat";

        {
            let mut state = MmapState::open(path, 4).unwrap();
            state.put("k1", b"v").unwrap();
            state.put("k2", b"v").unwrap();
            state.put("k3", b"v").unwrap();
            state.put("k4", b"v").unwrap();

            assert!(matches!(
                state.put("k5", b"v"),
                Err(StateError::StoreFull { slots: 4 })
            ));

            // Isi lama tetap utuh
            assert_eq!(state.len(), 4);
            assert_eq!(state.get("k1").unwrap(), b"v");
        }

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_single_slot_forces_collision() {
        let path = "test_state_single.dat";

        {
            let mut state = MmapState::open(path, 1).unwrap();
            state.put("a", b"1").unwrap();
            state.put("a", b"2").unwrap(); // overwrite, slot sama

            assert_eq!(state.get("a").unwrap(), b"2");
            assert!(matches!(
                state.put("b", b"3"),
                Err(StateError::StoreFull { slots: 1 })
            ));
        }

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_magic_mismatch_reinits() {
        let path = "test_state_reinit.dat";

        // File berisi garbage sepanjang satu header lebih
        fs::write(path, vec![0xAB; 512]).unwrap();

        {
            let mut state = MmapState::open(path, 64).unwrap();
            assert!(state.is_empty());

            state.put("tp_count", b"1").unwrap();
            assert_eq!(state.get("tp_count").unwrap(), b"1");
        }

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_bad_version_rejected() {
        let path = "test_state_badver.dat";

        let mut header = vec![0u8; HEADER_SIZE];
        header[..8].copy_from_slice(&MAGIC.to_ne_bytes());
        header[8..12].copy_from_slice(&99u32.to_ne_bytes());
        header[12..16].copy_from_slice(&64u32.to_ne_bytes());
        fs::write(path, &header).unwrap();

        assert!(matches!(
            MmapState::open(path, 64),
            Err(StateError::BadVersion { found: 99, .. })
        ));

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_empty_value_roundtrip() {
        let path = "test_state_empty.dat";

        {
            let mut state = MmapState::open(path, 64).unwrap();
            state.put("tp_label", b"").unwrap();

            assert_eq!(state.get("tp_label").unwrap(), b"");
            assert!(state.get("missing").is_none());
        }

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_keys_listing() {
        let path = "test_state_keys.dat";

        {
            let mut state = MmapState::open(path, 64).unwrap();
            state.put("tp_count", b"x").unwrap();
            state.put("blob_tag", b"x").unwrap();

            assert_eq!(state.keys(), ["blob_tag", "tp_count"]);
        }

        fs::remove_file(path).ok();
    }
}
