//! Sponge Run Binary - Satu Invocation dari Command Line
//!
//! Merakit event simulasi dari argumen (parameter + blob dalam hex),
//! menjalankan satu invocation, dan mem-persist hasilnya ke state
//! file mmap atau state in-memory.
//!
//! Usage:
//!   cargo run --release --bin sponge_run [OPTIONS]

use sponge::core::{MemoryState, MmapState, StateError, StateStore, DEFAULT_SLOTS};
use sponge::hook::{run, SimHost};

/// Run configuration
struct RunConfig {
    state_path: String,
    in_memory: bool,
    blob_hex: Option<String>,
    config_params: Vec<(String, String)>,
    event_params: Vec<(String, String)>,
    trace: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            state_path: "sponge_state.dat".to_string(),
            in_memory: false,
            blob_hex: None,
            config_params: Vec::new(),
            event_params: Vec::new(),
            trace: false,
        }
    }
}

/// Pecah argumen "name=hex" menjadi pasangan
fn parse_kv(arg: &str) -> Option<(String, String)> {
    let (name, value) = arg.split_once('=')?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

fn parse_args() -> RunConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RunConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--state" | "-s" => {
                if i + 1 < args.len() {
                    config.state_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--mem" => {
                config.in_memory = true;
            }
            "--blob" | "-b" => {
                if i + 1 < args.len() {
                    config.blob_hex = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    match parse_kv(&args[i + 1]) {
                        Some(kv) => config.config_params.push(kv),
                        None => eprintln!("⚠️ Ignoring malformed --config {}", args[i + 1]),
                    }
                    i += 1;
                }
            }
            "--param" | "-p" => {
                if i + 1 < args.len() {
                    match parse_kv(&args[i + 1]) {
                        Some(kv) => config.event_params.push(kv),
                        None => eprintln!("⚠️ Ignoring malformed --param {}", args[i + 1]),
                    }
                    i += 1;
                }
            }
            "--trace" | "-t" => {
                config.trace = true;
            }
            "--help" | "-h" => {
                println!("Sponge Run - execute one hook invocation\n");
                println!("Usage: sponge_run [OPTIONS]\n");
                println!("Options:");
                println!("  -b, --blob <HEX>         Event blob in hex, length prefix included");
                println!("  -p, --param <NAME=HEX>   Event parameter, repeatable");
                println!("      --config <NAME=HEX>  Configuration parameter, repeatable");
                println!("  -s, --state <PATH>       State file path (default: sponge_state.dat)");
                println!("      --mem                Use in-memory state, discarded on exit");
                println!("  -t, --trace              Print per-step trace lines");
                println!("  -h, --help               Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_state(state: &impl StateStore) {
    for key in state.keys() {
        if let Some(value) = state.get(&key) {
            println!("    {:<13} {}", key, hex::encode(&value));
        }
    }
}

fn run_invocation(config: RunConfig) -> Result<(), StateError> {
    println!("🧽 Sponge Run");
    println!("=============\n");

    let mut host = SimHost::new();

    for (name, hex_value) in &config.config_params {
        match hex::decode(hex_value) {
            Ok(bytes) => {
                println!("  config {} = {} bytes", name, bytes.len());
                host.set_config_param(name, &bytes);
            }
            Err(e) => eprintln!("⚠️ config {}: invalid hex ({}), skipped", name, e),
        }
    }

    for (name, hex_value) in &config.event_params {
        match hex::decode(hex_value) {
            Ok(bytes) => {
                println!("  param  {} = {} bytes", name, bytes.len());
                host.set_event_param(name, &bytes);
            }
            Err(e) => eprintln!("⚠️ param {}: invalid hex ({}), skipped", name, e),
        }
    }

    match &config.blob_hex {
        Some(blob_hex) => match hex::decode(blob_hex) {
            Ok(bytes) => {
                println!("  blob   = {} bytes", bytes.len());
                host.set_blob(&bytes);
            }
            Err(e) => eprintln!("⚠️ blob: invalid hex ({}), skipped", e),
        },
        None => println!("  blob   = (absent)"),
    }

    let receipt = if config.in_memory {
        let mut state = MemoryState::new();
        let receipt = run(&host, &mut state);

        println!("\n💾 State: (in-memory, {} keys)", state.len());
        print_state(&state);
        receipt
    } else {
        let mut state = MmapState::open(&config.state_path, DEFAULT_SLOTS)?;
        let receipt = run(&host, &mut state);
        state.flush()?;

        println!("\n💾 State: {} ({} keys total)", config.state_path, state.len());
        print_state(&state);
        receipt
    };

    println!(
        "\n✅ {} (code {}, {} fields stored)",
        receipt.message, receipt.code, receipt.stored
    );

    Ok(())
}

fn main() {
    let config = parse_args();

    if config.trace {
        // Trace channel opsional: default semua event crate ini
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sponge=trace")),
            )
            .init();
    }

    if let Err(e) = run_invocation(config) {
        eprintln!("❌ Run error: {}", e);
        std::process::exit(1);
    }
}
