//! Sponge - Length-Gated Blob Decoder PoC
//!
//! Arsitektur:
//! - Length-Gated: kehadiran field ditentukan panjang blob
//! - Zero-Copy: ekstraksi meminjam dari buffer blob
//! - Durable State: mmap-backed key-value store
//! - Always Accept: tidak ada jalur gagal per invocation

use std::time::Instant;

use sponge::core::{MemoryState, MmapState, StateStore};
use sponge::hook::{run, var_string_blob, SimHost};
use sponge::protocol::{decode, decoded_field_count, BLOB_READ_CAPACITY};

fn main() {
    println!("🧽 Sponge - Param & Blob Decoder PoC v0.1");
    println!("=========================================\n");

    demo_decode();
    benchmark_decode();
    benchmark_state();

    println!("\n✅ All demos complete!");
    println!("\nTo run one invocation: cargo run --release --bin sponge_run -- --help");
}

/// Sample payload: tag + version + account + limit + note pendek
fn sample_payload() -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(b"CONF");
    payload.push(0x01);
    payload.extend_from_slice(&[0u8; 20]);
    payload.extend_from_slice(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
    payload.extend_from_slice(b"hi");
    payload
}

fn demo_decode() {
    println!("📦 Blob Decode Walkthrough");
    println!("--------------------------");

    let blob = var_string_blob(&sample_payload());

    println!(
        "  Blob: {} bytes -> {} fields",
        blob.len(),
        decoded_field_count(blob.len())
    );
    for field in decode(&blob) {
        println!(
            "    {:<8} -> {:<13} {:>2} bytes: {}",
            field.name,
            field.state_key,
            field.bytes.len(),
            hex::encode(field.bytes)
        );
    }

    // Full invocation terhadap state in-memory
    let mut host = SimHost::new();
    host.set_config_param("hp_admin", b"ops");
    host.set_event_param("tp_sender", &[0xAA; 20]);
    host.set_event_param("tp_count", b"42");
    host.set_event_param("tp_label", b"demo");
    host.set_blob(&blob);

    let mut state = MemoryState::new();
    let receipt = run(&host, &mut state);

    println!(
        "  Receipt: {:?} code={} stored={}",
        receipt.message, receipt.code, receipt.stored
    );
    for key in state.keys() {
        let value = state.get(&key).unwrap_or_default();
        println!("    {:<13} {} bytes", key, value.len());
    }
    println!();
}

fn benchmark_decode() {
    println!("📊 Decode Benchmark (Length-Gated)");
    println!("----------------------------------");

    const ITERATIONS: usize = 1_000_000;

    // Blob penuh: semua field hadir, note pada kapasitas maksimum
    let blob = vec![0x5Au8; BLOB_READ_CAPACITY];

    let start = Instant::now();
    let mut total_fields = 0usize;
    for _ in 0..ITERATIONS {
        total_fields += decode(&blob).count();
    }
    let duration = start.elapsed();

    let ns = duration.as_nanos() as f64 / ITERATIONS as f64;

    println!("  Blob size: {} bytes", blob.len());
    println!("  Operations: {}", ITERATIONS);
    println!("  Fields extracted: {}", total_fields);
    println!("  Decode latency: {:.2} ns/op ({:.3} μs/op)", ns, ns / 1000.0);
    println!(
        "  Throughput:   {:.2} M decodes/sec\n",
        ITERATIONS as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}

fn benchmark_state() {
    println!("📊 State Store Benchmark (Mmap KV)");
    println!("----------------------------------");

    const ITERATIONS: usize = 100_000;

    // Working set hook: 8 key yang ditulis ulang terus
    const KEYS: [&str; 8] = [
        "tp_sender",
        "tp_count",
        "tp_label",
        "blob_tag",
        "blob_version",
        "blob_account",
        "blob_limit",
        "blob_note",
    ];

    let path = "sponge_bench_state.dat";
    let value = [0x42u8; 32];

    match MmapState::open(path, 1024) {
        Ok(mut state) => {
            let start = Instant::now();
            for i in 0..ITERATIONS {
                state.put(KEYS[i & 7], &value).ok();
            }
            let duration = start.elapsed();

            let ns = duration.as_nanos() as f64 / ITERATIONS as f64;

            println!("  Value size: {} bytes", value.len());
            println!("  Operations: {}", ITERATIONS);
            println!("  Put latency: {:.2} ns/op ({:.3} μs/op)", ns, ns / 1000.0);
            println!(
                "  Throughput:  {:.2} M puts/sec",
                ITERATIONS as f64 / duration.as_secs_f64() / 1_000_000.0
            );
            println!("  Keys stored: {}", state.len());
        }
        Err(e) => println!("  ⚠️ Skipped: {}", e),
    }

    std::fs::remove_file(path).ok();
}
