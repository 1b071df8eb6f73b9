//! Sponge State Binary - Inspektur State File
//!
//! Membuka kembali state file mmap dan menampilkan key + value dalam
//! hex, atau satu key saja. Read-only secara niat: tidak pernah
//! membuat file baru.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin sponge_state -- --state sponge_state.dat
//! cargo run --release --bin sponge_state -- --key blob_tag
//! ```
//!
//! # Options
//!
//! - `--state PATH` - State file path (default: sponge_state.dat)
//! - `--key NAME` - Print a single key, exit 1 when missing

use std::path::Path;

use sponge::core::{MmapState, StateStore, DEFAULT_SLOTS};

struct StateConfig {
    state_path: String,
    key: Option<String>,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            state_path: "sponge_state.dat".to_string(),
            key: None,
        }
    }
}

fn parse_args() -> StateConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = StateConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--state" | "-s" => {
                if i + 1 < args.len() {
                    config.state_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--key" | "-k" => {
                if i + 1 < args.len() {
                    config.key = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Sponge State - inspect a state file\n");
                println!("Usage: sponge_state [OPTIONS]\n");
                println!("Options:");
                println!("  -s, --state <PATH>  State file path (default: sponge_state.dat)");
                println!("  -k, --key <NAME>    Print a single key, exit 1 when missing");
                println!("  -h, --help          Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn main() {
    let config = parse_args();

    // Open akan membuat file kosong, jadi cek dulu
    if !Path::new(&config.state_path).exists() {
        eprintln!("❌ State file not found: {}", config.state_path);
        std::process::exit(1);
    }

    let state = match MmapState::open(&config.state_path, DEFAULT_SLOTS) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Cannot open {}: {}", config.state_path, e);
            std::process::exit(1);
        }
    };

    println!(
        "💾 {} ({} keys, {} slots)",
        config.state_path,
        state.len(),
        state.slot_count()
    );

    match &config.key {
        Some(key) => match state.get(key) {
            Some(value) => {
                println!("  {:<13} {} ({} bytes)", key, hex::encode(&value), value.len());
            }
            None => {
                println!("  {} (not found)", key);
                std::process::exit(1);
            }
        },
        None => {
            for key in state.keys() {
                if let Some(value) = state.get(&key) {
                    println!("  {:<13} {} ({} bytes)", key, hex::encode(&value), value.len());
                }
            }
        }
    }
}
