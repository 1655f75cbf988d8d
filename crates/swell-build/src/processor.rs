//! Build pass orchestration
//!
//! This module drives stripping across a whole player build: scene
//! materials are collected first, every shader in the renderer's family is
//! counted, and the configured target shader has its variant list filtered.
//! Shader callbacks arrive per shader and may run concurrently, so the
//! build-wide tally uses atomic counters.

use crate::config::{ConfigValidationError, StripConfig};
use crate::stripping::{
    MaterialKeywords, SceneMaterial, StripReport, Variant, collect_reference_materials,
    strip_variants,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build-wide variant counters
///
/// Shared by reference across per-shader calls. The counters are
/// independent monotone sums, so relaxed ordering is enough.
#[derive(Debug, Default)]
pub struct StripTally {
    considered: AtomicUsize,
    stripped: AtomicUsize,
}

impl StripTally {
    /// Adds one shader's counts to the running totals
    pub fn record(&self, report: &StripReport) {
        self.considered.fetch_add(report.considered, Ordering::Relaxed);
        self.stripped.fetch_add(report.stripped, Ordering::Relaxed);
    }

    /// Returns the totals accumulated so far
    pub fn snapshot(&self) -> StripReport {
        StripReport {
            considered: self.considered.load(Ordering::Relaxed),
            stripped: self.stripped.load(Ordering::Relaxed),
        }
    }
}

/// Stateful driver for one build's stripping pass
///
/// A build host wires this into its callbacks in three phases: scene
/// processing feeds [`observe_scene`](Self::observe_scene), shader
/// compilation feeds [`process_shader`](Self::process_shader), and the end
/// of the build reads [`report`](Self::report). Scene observation must
/// finish before shader processing starts; shader calls themselves only
/// need `&self` and may run in parallel.
#[derive(Debug)]
pub struct StripProcessor {
    config: StripConfig,
    materials: Vec<MaterialKeywords>,
    tally: StripTally,
}

impl StripProcessor {
    /// Creates a processor for the given configuration
    ///
    /// # Returns
    /// A processor with no reference materials yet, or the configuration's
    /// validation error
    pub fn new(config: StripConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            materials: Vec::new(),
            tally: StripTally::default(),
        })
    }

    /// Returns the active configuration
    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    /// Collects reference materials from one scene's material list
    ///
    /// Only materials bound to the configured surface shader count; builds
    /// span several scenes, so results accumulate across calls.
    ///
    /// # Returns
    /// The number of materials collected from this scene
    pub fn observe_scene(&mut self, entries: &[SceneMaterial]) -> usize {
        let mut collected =
            collect_reference_materials(entries.iter().cloned(), &self.config.surface_shader);
        let count = collected.len();
        self.materials.append(&mut collected);

        tracing::debug!(
            "Collected {} reference material(s) for {}",
            count,
            self.config.surface_shader
        );
        count
    }

    /// Returns the reference materials collected so far
    pub fn reference_materials(&self) -> &[MaterialKeywords] {
        &self.materials
    }

    /// Handles one shader's compiled variant list
    ///
    /// Shaders outside the configured family pass through untouched and
    /// uncounted. Family shaders are counted; the target shader is
    /// additionally filtered against the collected reference materials.
    ///
    /// # Arguments
    /// * `shader_name` - Fully qualified shader name
    /// * `variants` - The shader's compiled variants, consumed
    ///
    /// # Returns
    /// The variants the build should keep, in their original order
    pub fn process_shader(&self, shader_name: &str, variants: Vec<Variant>) -> Vec<Variant> {
        if !shader_name.starts_with(&self.config.family_prefix) {
            return variants;
        }

        if shader_name != self.config.target_shader {
            self.tally.record(&StripReport {
                considered: variants.len(),
                stripped: 0,
            });
            return variants;
        }

        // There should always be at least one variant.
        if variants.is_empty() {
            return variants;
        }

        let outcome = strip_variants(variants, &self.materials, &self.config.exemptions);
        self.tally.record(&outcome.report);

        tracing::debug!(
            "{} shader variants stripped of {} from {}",
            outcome.report.stripped,
            outcome.report.considered,
            shader_name
        );
        if !outcome.unused_keywords.is_empty() {
            tracing::debug!(
                "Unused keywords for {}: {}",
                shader_name,
                outcome
                    .unused_keywords
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        outcome.variants
    }

    /// Returns the build-wide totals accumulated so far
    pub fn report(&self) -> StripReport {
        self.tally.snapshot()
    }

    /// Logs the build-wide totals
    ///
    /// Called once at the end of a build.
    pub fn log_report(&self) {
        let report = self.report();
        tracing::info!(
            "Stripped {} shader variants of {} from {}",
            report.stripped,
            report.considered,
            self.config.family_prefix
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stripping::Keyword;
    use std::sync::Arc;

    fn scene_with_ocean_material(keyword: &str) -> Vec<SceneMaterial> {
        vec![
            SceneMaterial::new("Swell/Ocean", MaterialKeywords::new("Ocean").with_keyword(keyword)),
            SceneMaterial::new("Standard", MaterialKeywords::new("Rock")),
        ]
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = StripConfig::default();
        config.target_shader.clear();

        assert!(StripProcessor::new(config).is_err());
    }

    #[test]
    fn test_observe_scene_collects_only_surface_materials() {
        let mut processor = StripProcessor::new(StripConfig::default()).unwrap();

        let count = processor.observe_scene(&scene_with_ocean_material("_FOAM_ON"));

        assert_eq!(count, 1);
        assert_eq!(processor.config().surface_shader, "Swell/Ocean");
        assert_eq!(processor.reference_materials().len(), 1);
        assert_eq!(processor.reference_materials()[0].name(), "Ocean");
    }

    #[test]
    fn test_observe_scene_accumulates_across_scenes() {
        let mut processor = StripProcessor::new(StripConfig::default()).unwrap();

        processor.observe_scene(&scene_with_ocean_material("_FOAM_ON"));
        processor.observe_scene(&scene_with_ocean_material("_CAUSTICS_ON"));

        assert_eq!(processor.reference_materials().len(), 2);
    }

    #[test]
    fn test_shaders_outside_the_family_pass_through_uncounted() {
        let processor = StripProcessor::new(StripConfig::default()).unwrap();
        let variants = vec![Variant::new([Keyword::user("_ANYTHING")])];

        let retained = processor.process_shader("Standard", variants);

        assert_eq!(retained.len(), 1);
        assert_eq!(processor.report(), StripReport { considered: 0, stripped: 0 });
    }

    #[test]
    fn test_family_shaders_are_counted_but_not_stripped() {
        let processor = StripProcessor::new(StripConfig::default()).unwrap();
        let variants = vec![
            Variant::new([Keyword::user("_NEVER_ENABLED")]),
            Variant::empty(),
        ];

        let retained = processor.process_shader("Swell/Ocean", variants);

        assert_eq!(retained.len(), 2);
        assert_eq!(processor.report(), StripReport { considered: 2, stripped: 0 });
    }

    #[test]
    fn test_target_shader_is_stripped_against_scene_materials() {
        let mut processor = StripProcessor::new(StripConfig::default()).unwrap();
        processor.observe_scene(&scene_with_ocean_material("_CAUSTICS_ON"));

        let variants = vec![
            Variant::empty(),
            Variant::new([Keyword::user("_CAUSTICS_ON")]),
            Variant::new([Keyword::user("_SUBSURFACE_ON")]),
        ];
        let retained = processor.process_shader("Swell/Underwater/Post Process", variants);

        assert_eq!(retained.len(), 2);
        assert!(retained[0].is_empty());
        assert!(retained[1].uses("_CAUSTICS_ON"));
        assert_eq!(processor.report(), StripReport { considered: 3, stripped: 1 });
    }

    #[test]
    fn test_target_shader_keeps_exempt_keywords_without_materials() {
        let processor = StripProcessor::new(StripConfig::default()).unwrap();

        let variants = vec![
            Variant::new([Keyword::user("_MENISCUS")]),
            Variant::new([Keyword::user("_FULL_SCREEN_EFFECT")]),
        ];
        let retained = processor.process_shader("Swell/Underwater/Post Process", variants);

        assert_eq!(retained.len(), 2);
        assert_eq!(processor.report().stripped, 0);
    }

    #[test]
    fn test_empty_variant_list_for_target_is_ignored() {
        let processor = StripProcessor::new(StripConfig::default()).unwrap();

        let retained = processor.process_shader("Swell/Underwater/Post Process", Vec::new());

        assert!(retained.is_empty());
        assert_eq!(processor.report(), StripReport { considered: 0, stripped: 0 });
    }

    #[test]
    fn test_totals_accumulate_across_shaders() {
        let mut processor = StripProcessor::new(StripConfig::default()).unwrap();
        processor.observe_scene(&scene_with_ocean_material("A"));

        processor.process_shader("Swell/Ocean", vec![Variant::empty(), Variant::empty()]);
        processor.process_shader(
            "Swell/Underwater/Post Process",
            vec![Variant::new([Keyword::user("A")]), Variant::new([Keyword::user("B")])],
        );

        assert_eq!(processor.report(), StripReport { considered: 4, stripped: 1 });
    }

    #[test]
    fn test_tally_is_safe_under_concurrent_recording() {
        let tally = Arc::new(StripTally::default());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let tally = Arc::clone(&tally);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    tally.record(&StripReport { considered: 2, stripped: 1 });
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tally.snapshot(), StripReport { considered: 16000, stripped: 8000 });
    }

    #[test]
    fn test_parallel_shader_processing_shares_one_processor() {
        let mut processor = StripProcessor::new(StripConfig::default()).unwrap();
        processor.observe_scene(&scene_with_ocean_material("A"));
        let processor = Arc::new(processor);

        let mut handles = Vec::new();
        for i in 0..4 {
            let processor = Arc::clone(&processor);
            handles.push(std::thread::spawn(move || {
                let name = if i % 2 == 0 { "Swell/Underwater/Post Process" } else { "Swell/Ocean" };
                let variants = vec![Variant::new([Keyword::user("A")]), Variant::new([Keyword::user("B")])];
                processor.process_shader(name, variants)
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Two target calls strip one variant each; two family calls only count.
        assert_eq!(processor.report(), StripReport { considered: 8, stripped: 2 });
    }
}
