//! Default configuration dumping tool
//!
//! This binary writes the default stripping configuration to a file, as a
//! starting point for projects that renamed their shaders or need extra
//! exemptions.

use std::env;
use std::fs;
use std::process;
use swell_build::config::StripConfig;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 && args.len() != 3 {
        eprintln!("Usage: {} <output_file> [--json]", args[0]);
        eprintln!("Writes the default stripping configuration");
        eprintln!("  output_file: Path to the output file");
        eprintln!("  --json:      Optional flag to emit JSON instead of YAML");
        process::exit(1);
    }

    let output_file = &args[1];
    let json = args.get(2).is_some_and(|arg| arg == "--json");

    let config = StripConfig::default();

    let serialized = if json {
        match serde_json::to_string_pretty(&config) {
            Ok(serialized) => serialized,
            Err(e) => {
                eprintln!("Error serializing config to JSON: {e}");
                process::exit(1);
            }
        }
    } else {
        match serde_norway::to_string(&config) {
            Ok(serialized) => serialized,
            Err(e) => {
                eprintln!("Error serializing config to YAML: {e}");
                process::exit(1);
            }
        }
    };

    if let Err(e) = fs::write(output_file, serialized) {
        eprintln!("Error writing output file '{output_file}': {e}");
        process::exit(1);
    }
    println!("Wrote default stripping configuration to '{output_file}'");
}
