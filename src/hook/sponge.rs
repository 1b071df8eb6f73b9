//! Sponge Runner - Params + Blob -> State
//!
//! Satu invocation per event, urutan langkah tetap:
//! 1. Parameter konfigurasi (hp_*): dibaca, trace only
//! 2. Parameter event (tp_*): dipersist dengan policy panjang
//! 3. Blob: decode length-gated, persist per field
//! 4. Accept - selalu, apapun isi event
//!
//! Tidak ada jalur gagal. Sumber yang absen dilewati, error store
//! di-trace lalu diabaikan. Trace channel fire-and-forget, bukan
//! bagian kontrak fungsional.

use tracing::trace;

use crate::core::StateStore;
use crate::protocol::{decode, BLOB_READ_CAPACITY, CONFIG_PARAMS, EVENT_PARAMS, MAX_READ_CAPACITY};

use super::host::Host;

/// Pesan accept, sama untuk setiap invocation
pub const ACCEPT_MESSAGE: &str = "param_sponge_blob: ok";

/// Kode accept, selalu 0
pub const ACCEPT_CODE: i64 = 0;

/// Sinyal penyelesaian satu invocation: selalu sukses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    /// Pesan sukses tetap
    pub message: &'static str,
    /// Kode accept
    pub code: i64,
    /// Jumlah field yang dipersist pada invocation ini
    pub stored: usize,
}

/// Persist satu field; error store di-trace dan diabaikan.
fn put_traced<S: StateStore>(state: &mut S, key: &str, value: &[u8]) -> bool {
    match state.put(key, value) {
        Ok(()) => true,
        Err(e) => {
            trace!(key, error = %e, "state put failed, ignored");
            false
        }
    }
}

/// Jalankan satu invocation: baca parameter dan blob dari `host`,
/// teruskan hasilnya ke `state`. Tidak pernah gagal.
#[tracing::instrument(name = "sponge", skip_all)]
pub fn run<H: Host, S: StateStore>(host: &H, state: &mut S) -> Receipt {
    trace!("start");

    // Satu scratch buffer melayani semua read
    let mut scratch = [0u8; MAX_READ_CAPACITY];
    let mut stored = 0usize;

    // Parameter konfigurasi: tidak menyentuh state
    for spec in &CONFIG_PARAMS {
        match host.read_config_param(spec.name, &mut scratch[..spec.capacity]) {
            Some(len) => trace!(param = spec.name, len, "config param found"),
            None => trace!(param = spec.name, "config param not set"),
        }
    }

    // Parameter event: persist verbatim di bawah nama parameter
    for spec in &EVENT_PARAMS {
        match host.read_event_param(spec.name, &mut scratch[..spec.capacity]) {
            Some(len) => {
                trace!(param = spec.name, len, "event param found");

                if let Some(expected) = spec.expected_len {
                    if len != expected {
                        trace!(param = spec.name, len, expected, "event param len mismatch, ignored");
                        continue;
                    }
                }

                if put_traced(state, spec.name, &scratch[..len]) {
                    stored += 1;
                }
            }
            None => trace!(param = spec.name, "event param not set"),
        }
    }

    // Blob: tiap field yang hadir dipersist di bawah state key-nya
    match host.read_event_blob(&mut scratch[..BLOB_READ_CAPACITY]) {
        Some(len) => {
            trace!(len, "blob present");

            for field in decode(&scratch[..len]) {
                trace!(field = field.name, len = field.bytes.len(), "blob field");
                if put_traced(state, field.state_key, field.bytes) {
                    stored += 1;
                }
            }
        }
        None => trace!("no blob present"),
    }

    trace!(stored, "accept");

    Receipt {
        message: ACCEPT_MESSAGE,
        code: ACCEPT_CODE,
        stored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MemoryState, StateError};
    use crate::hook::host::{var_string_blob, SimHost};

    /// Store yang selalu menolak put - untuk menguji jalur ignore
    struct FailStore;

    impl StateStore for FailStore {
        fn put(&mut self, _key: &str, _value: &[u8]) -> Result<(), StateError> {
            Err(StateError::StoreFull { slots: 0 })
        }

        fn get(&self, _key: &str) -> Option<Vec<u8>> {
            None
        }

        fn len(&self) -> usize {
            0
        }

        fn keys(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_empty_event_still_accepts() {
        let host = SimHost::new();
        let mut state = MemoryState::new();

        let receipt = run(&host, &mut state);

        assert_eq!(receipt.message, ACCEPT_MESSAGE);
        assert_eq!(receipt.code, ACCEPT_CODE);
        assert_eq!(receipt.stored, 0);
        assert!(state.is_empty());
    }

    #[test]
    fn test_config_params_never_persisted() {
        let mut host = SimHost::new();
        host.set_config_param("hp_admin", b"ops-team");
        host.set_config_param("hp_limit", b"1000");
        host.set_config_param("hp_note", b"install note");

        let mut state = MemoryState::new();
        let receipt = run(&host, &mut state);

        assert_eq!(receipt.stored, 0);
        assert!(state.is_empty());
    }

    #[test]
    fn test_event_params_persisted_verbatim() {
        let mut host = SimHost::new();
        host.set_event_param("tp_count", b"42");
        host.set_event_param("tp_label", b"payment batch 7");

        let mut state = MemoryState::new();
        let receipt = run(&host, &mut state);

        assert_eq!(receipt.stored, 2);
        assert_eq!(state.get("tp_count").unwrap(), b"42");
        assert_eq!(state.get("tp_label").unwrap(), b"payment batch 7");
    }

    #[test]
    fn test_sender_requires_exact_twenty_bytes() {
        // 19 bytes: dibuang
        let mut host = SimHost::new();
        host.set_event_param("tp_sender", &[0xAA; 19]);

        let mut state = MemoryState::new();
        let receipt = run(&host, &mut state);

        assert_eq!(receipt.message, ACCEPT_MESSAGE);
        assert!(state.get("tp_sender").is_none());

        // 20 bytes: diteruskan
        host.set_event_param("tp_sender", &[0xBB; 20]);
        let receipt = run(&host, &mut state);

        assert_eq!(receipt.stored, 1);
        assert_eq!(state.get("tp_sender").unwrap(), [0xBB; 20]);
    }

    #[test]
    fn test_oversized_sender_truncated_then_forwarded() {
        // 25 bytes di host, kapasitas baca 20: observed len = 20, lolos policy
        let mut host = SimHost::new();
        let value: Vec<u8> = (0..25).collect();
        host.set_event_param("tp_sender", &value);

        let mut state = MemoryState::new();
        run(&host, &mut state);

        assert_eq!(state.get("tp_sender").unwrap(), &value[..20]);
    }

    #[test]
    fn test_zero_length_event_param_persisted() {
        let mut host = SimHost::new();
        host.set_event_param("tp_label", b"");

        let mut state = MemoryState::new();
        let receipt = run(&host, &mut state);

        assert_eq!(receipt.stored, 1);
        assert_eq!(state.get("tp_label").unwrap(), b"");
    }

    #[test]
    fn test_blob_fields_persisted() {
        let mut payload = Vec::new();
        payload.extend_from_slice(b"CONF");
        payload.push(0x01);
        payload.extend_from_slice(&[0u8; 20]);
        payload.extend_from_slice(&[0, 1, 2, 3, 4, 5, 6, 7]);
        payload.extend_from_slice(b"hi");

        let mut host = SimHost::new();
        host.set_blob(&var_string_blob(&payload));

        let mut state = MemoryState::new();
        let receipt = run(&host, &mut state);

        assert_eq!(receipt.stored, 5);
        assert_eq!(state.get("blob_tag").unwrap(), b"CONF");
        assert_eq!(state.get("blob_version").unwrap(), [0x01]);
        assert_eq!(state.get("blob_account").unwrap(), [0u8; 20]);
        assert_eq!(state.get("blob_limit").unwrap(), [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(state.get("blob_note").unwrap(), b"hi");
    }

    #[test]
    fn test_absent_blob_leaves_no_blob_keys() {
        let mut host = SimHost::new();
        host.set_event_param("tp_count", b"1");

        let mut state = MemoryState::new();
        let receipt = run(&host, &mut state);

        assert_eq!(receipt.message, ACCEPT_MESSAGE);
        assert_eq!(state.keys(), ["tp_count"]);
    }

    #[test]
    fn test_store_errors_ignored() {
        let mut host = SimHost::new();
        host.set_event_param("tp_count", b"42");
        host.set_blob(&var_string_blob(b"CONFx"));

        let mut state = FailStore;
        let receipt = run(&host, &mut state);

        // Put gagal semua, invocation tetap accept
        assert_eq!(receipt.message, ACCEPT_MESSAGE);
        assert_eq!(receipt.code, ACCEPT_CODE);
        assert_eq!(receipt.stored, 0);
    }

    #[test]
    fn test_garbage_everything_still_accepts() {
        let mut host = SimHost::new();
        host.set_config_param("hp_admin", &[0xFF; 200]);
        host.set_event_param("tp_sender", &[0x00; 3]);
        host.set_event_param("tp_count", &[0xEE; 300]);
        host.set_blob(&[0xDD; 400]);

        let mut state = MemoryState::new();
        let receipt = run(&host, &mut state);

        assert_eq!(receipt.message, ACCEPT_MESSAGE);
        // tp_count truncated ke 32, blob truncated ke 98 (note = 64 bytes)
        assert_eq!(state.get("tp_count").unwrap().len(), 32);
        assert_eq!(state.get("blob_note").unwrap().len(), 64);
        assert!(state.get("tp_sender").is_none());
    }
}
