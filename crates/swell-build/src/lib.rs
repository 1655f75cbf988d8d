//! Swell build tooling
//!
//! This crate optimizes player builds by stripping shader variants of the
//! underwater effect shader: permutations relying on keywords that no ocean
//! material in the built scenes enables can never be selected at runtime,
//! so shipping and compiling them only costs build time and size. The
//! stripping core is a pure function over variant and material data; the
//! [`processor`] module wires it into a host build's callbacks, and the
//! bundled binaries replay captured build dumps offline.

pub mod config;
pub mod dump;
pub mod processor;
pub mod stripping;

/// Result of replaying a stripping pass over one captured dump
#[derive(Debug, Clone)]
pub struct StripRun {
    /// The dumped shader's name
    pub shader: String,
    /// Variants the build would keep, in their original order
    pub retained: Vec<stripping::Variant>,
    /// Counts for the replayed pass
    pub report: stripping::StripReport,
}

/// Replays the stripping pass over a parsed build dump
///
/// Scene materials are collected first, then the dumped shader runs through
/// the same processing a real build applies: family shaders are counted and
/// the configured target shader is filtered.
///
/// # Arguments
/// * `dump` - Parsed capture of one shader's build input
/// * `config` - Stripping configuration to replay under
///
/// # Returns
/// The retained variants and pass counts, or the configuration's
/// validation error
pub fn strip_build_dump(
    dump: dump::BuildDump,
    config: config::StripConfig,
) -> Result<StripRun, config::ConfigValidationError> {
    let mut processor = processor::StripProcessor::new(config)?;
    processor.observe_scene(&dump.scene);
    let retained = processor.process_shader(&dump.shader, dump.variants);
    let report = processor.report();
    processor.log_report();

    Ok(StripRun {
        shader: dump.shader,
        retained,
        report,
    })
}

/// Replays the stripping pass over a build dump file
///
/// Loads a YAML build dump and runs it through [`strip_build_dump`].
///
/// # Arguments
/// * `dump_path` - Path to the YAML dump file
/// * `config` - Stripping configuration to replay under
///
/// # Returns
/// The retained variants and pass counts
pub fn strip_dump_file<P: AsRef<std::path::Path>>(
    dump_path: P,
    config: config::StripConfig,
) -> Result<StripRun, Box<dyn std::error::Error>> {
    let dump = dump::BuildDump::from_file(dump_path)?;
    Ok(strip_build_dump(dump, config)?)
}
