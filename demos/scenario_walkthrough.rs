//! Scenario Walkthrough - Empat Event End-to-End
//!
//! Menjalankan empat event berbeda terhadap state in-memory dan
//! menampilkan field yang dipersist per event:
//! 1. Blob penuh: lima field hadir
//! 2. Blob terpotong: tiga field pertama saja
//! 3. Tanpa blob: hanya parameter event
//! 4. Sender salah panjang: dibuang, invocation tetap accept
//!
//! Usage:
//!   cargo run --release --example scenario_walkthrough

use sponge::core::{MemoryState, StateStore};
use sponge::hook::{run, var_string_blob, Receipt, SimHost};

fn print_outcome(title: &str, receipt: Receipt, state: &MemoryState) {
    println!("📦 {}", title);
    println!(
        "   Receipt: {:?} code={} stored={}",
        receipt.message, receipt.code, receipt.stored
    );
    if state.is_empty() {
        println!("   State: (empty)");
    } else {
        for key in state.keys() {
            let value = state.get(&key).unwrap_or_default();
            println!("   {:<13} {}", key, hex::encode(&value));
        }
    }
    println!();
}

/// Payload penuh: tag + version + account + limit + note "hi"
fn full_payload() -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(b"CONF");
    payload.push(0x01);
    payload.extend_from_slice(&[0u8; 20]);
    payload.extend_from_slice(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
    payload.extend_from_slice(b"hi");
    payload
}

fn scenario_full_blob() {
    let mut host = SimHost::new();
    host.set_event_param("tp_sender", &[0xAA; 20]);
    host.set_event_param("tp_count", b"42");
    host.set_event_param("tp_label", b"walkthrough");
    host.set_blob(&var_string_blob(&full_payload()));

    let mut state = MemoryState::new();
    let receipt = run(&host, &mut state);
    print_outcome("Scenario 1: full blob (36 bytes, 5 fields)", receipt, &state);
}

fn scenario_truncated_blob() {
    // 29 byte payload -> blob 30 bytes: limit belum lengkap
    let mut payload = full_payload();
    payload.truncate(29);

    let mut host = SimHost::new();
    host.set_blob(&var_string_blob(&payload));

    let mut state = MemoryState::new();
    let receipt = run(&host, &mut state);
    print_outcome("Scenario 2: truncated blob (30 bytes, 3 fields)", receipt, &state);
}

fn scenario_no_blob() {
    let mut host = SimHost::new();
    host.set_event_param("tp_count", b"7");
    host.set_event_param("tp_label", b"no blob here");

    let mut state = MemoryState::new();
    let receipt = run(&host, &mut state);
    print_outcome("Scenario 3: no blob, params only", receipt, &state);
}

fn scenario_short_sender() {
    let mut host = SimHost::new();
    host.set_event_param("tp_sender", &[0xBB; 19]);
    host.set_event_param("tp_count", b"1");

    let mut state = MemoryState::new();
    let receipt = run(&host, &mut state);
    print_outcome("Scenario 4: sender 19 bytes, discarded", receipt, &state);
}

fn main() {
    println!("🧽 Sponge Scenario Walkthrough");
    println!("==============================\n");

    scenario_full_blob();
    scenario_truncated_blob();
    scenario_no_blob();
    scenario_short_sender();

    println!("✅ All scenarios accepted");
}
