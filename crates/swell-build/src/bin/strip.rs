//! Offline variant stripping tool
//!
//! This binary replays the build-time stripping pass over a captured build
//! dump. It loads a YAML dump of one shader's variants plus the scene's
//! material listing, runs the same filtering a real build applies, and
//! prints the retained variants to stdout.

use std::env;
use std::path::Path;
use std::process;
use swell_build::config::StripConfig;
use swell_build::strip_dump_file;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 && args.len() != 3 {
        eprintln!("Usage: {} <dump.yaml> [config.yaml]", args[0]);
        eprintln!("Replays variant stripping over a build dump and prints the retained variants");
        eprintln!("  dump.yaml:   Path to the YAML build dump");
        eprintln!("  config.yaml: Optional stripping configuration (defaults cover the shipped shaders)");
        process::exit(1);
    }

    let subscriber = tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let dump_path = &args[1];

    if !Path::new(dump_path).exists() {
        eprintln!("Error: Dump file '{dump_path}' does not exist");
        process::exit(1);
    }

    let config = match args.get(2) {
        Some(config_path) => {
            if !Path::new(config_path).exists() {
                eprintln!("Error: Config file '{config_path}' does not exist");
                process::exit(1);
            }
            match StripConfig::from_file(config_path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error loading config '{config_path}': {e}");
                    process::exit(1);
                }
            }
        }
        None => StripConfig::default(),
    };

    match strip_dump_file(dump_path, config) {
        Ok(run) => {
            for variant in &run.retained {
                println!("{variant}");
            }
            println!("{}: {}", run.shader, run.report);
        }
        Err(e) => {
            eprintln!("Error stripping dump '{dump_path}': {e}");
            process::exit(1);
        }
    }
}
