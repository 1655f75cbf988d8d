//! Reference materials: the ground truth of keyword usage
//!
//! The filter never guesses which features a build exercises; it asks the
//! materials. Anything that can answer "is this keyword enabled on you?" can
//! act as a reference material, and the host's material representation plugs
//! in through the [`ReferenceMaterial`] trait. [`MaterialKeywords`] is the
//! concrete form used by the developer tooling, where scene dumps list each
//! material's enabled keywords explicitly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Read-only view of a material's keyword state.
///
/// A set of these is the ground truth of what the current build actually
/// uses: a keyword enabled on at least one reference material is in use, no
/// matter what the variant list looks like.
pub trait ReferenceMaterial {
    /// Returns true if the material has `keyword` enabled.
    fn is_keyword_enabled(&self, keyword: &str) -> bool;
}

impl<M: ReferenceMaterial + ?Sized> ReferenceMaterial for &M {
    fn is_keyword_enabled(&self, keyword: &str) -> bool {
        (**self).is_keyword_enabled(keyword)
    }
}

impl<M: ReferenceMaterial + ?Sized> ReferenceMaterial for Box<M> {
    fn is_keyword_enabled(&self, keyword: &str) -> bool {
        (**self).is_keyword_enabled(keyword)
    }
}

/// A named material with its set of enabled keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialKeywords {
    /// Material name, for diagnostics only.
    name: String,
    /// Keywords enabled on this material.
    #[serde(default)]
    enabled: BTreeSet<String>,
}

impl MaterialKeywords {
    /// Creates a material with no keywords enabled.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: BTreeSet::new(),
        }
    }

    /// Enables a keyword, builder style.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.enabled.insert(keyword.into());
        self
    }

    /// Enables a keyword in place.
    pub fn enable(&mut self, keyword: impl Into<String>) {
        self.enabled.insert(keyword.into());
    }

    /// Returns the material name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the enabled keywords in sorted order.
    pub fn enabled_keywords(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }
}

impl ReferenceMaterial for MaterialKeywords {
    fn is_keyword_enabled(&self, keyword: &str) -> bool {
        self.enabled.contains(keyword)
    }
}

/// One entry of a scene's material listing: which shader the material uses,
/// plus its keyword state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneMaterial {
    /// Full name of the shader this material is bound to.
    pub shader: String,
    /// The material itself.
    pub material: MaterialKeywords,
}

impl SceneMaterial {
    /// Creates a scene entry binding `material` to `shader`.
    pub fn new(shader: impl Into<String>, material: MaterialKeywords) -> Self {
        Self {
            shader: shader.into(),
            material,
        }
    }
}

/// Selects the materials bound to `surface_shader` out of a scene listing.
///
/// Scenes contain materials for every shader in the project; only the ones
/// on the ocean surface shader say anything about which rendering features
/// the build exercises. Shader names compare exactly.
pub fn collect_reference_materials(
    entries: impl IntoIterator<Item = SceneMaterial>,
    surface_shader: &str,
) -> Vec<MaterialKeywords> {
    entries
        .into_iter()
        .filter(|entry| entry.shader == surface_shader)
        .map(|entry| entry.material)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_answers_keyword_queries() {
        let material = MaterialKeywords::new("OceanSurface")
            .with_keyword("_CAUSTICS_ON")
            .with_keyword("_FOAM_ON");

        assert!(material.is_keyword_enabled("_CAUSTICS_ON"));
        assert!(material.is_keyword_enabled("_FOAM_ON"));
        assert!(!material.is_keyword_enabled("_SUBSURFACE_ON"));
    }

    #[test]
    fn test_queries_through_references_and_boxes() {
        let material = MaterialKeywords::new("OceanSurface").with_keyword("_FOAM_ON");

        let by_ref: &MaterialKeywords = &material;
        assert!(by_ref.is_keyword_enabled("_FOAM_ON"));

        let boxed: Box<dyn ReferenceMaterial> = Box::new(material);
        assert!(boxed.is_keyword_enabled("_FOAM_ON"));
        assert!(!boxed.is_keyword_enabled("_CAUSTICS_ON"));
    }

    #[test]
    fn test_collect_keeps_only_surface_materials() {
        let entries = vec![
            SceneMaterial::new("Swell/Ocean", MaterialKeywords::new("OceanDeep").with_keyword("_CAUSTICS_ON")),
            SceneMaterial::new("Swell/Underwater/Post Process", MaterialKeywords::new("UnderwaterFx")),
            SceneMaterial::new("Standard", MaterialKeywords::new("Rocks").with_keyword("_NORMALMAP")),
            SceneMaterial::new("Swell/Ocean", MaterialKeywords::new("OceanShallow")),
        ];

        let materials = collect_reference_materials(entries, "Swell/Ocean");
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].name(), "OceanDeep");
        assert_eq!(materials[1].name(), "OceanShallow");
    }

    #[test]
    fn test_collect_matches_shader_names_exactly() {
        // Prefix relatives of the surface shader are different shaders.
        let entries = vec![SceneMaterial::new(
            "Swell/OceanFoamOverlay",
            MaterialKeywords::new("Overlay"),
        )];

        assert!(collect_reference_materials(entries, "Swell/Ocean").is_empty());
    }

    #[test]
    fn test_material_yaml_parsing() {
        let yaml = r#"
shader: Swell/Ocean
material:
  name: OceanSurface
  enabled:
    - _CAUSTICS_ON
    - _SHADOWS_ON
"#;

        let entry: SceneMaterial = serde_norway::from_str(yaml).unwrap();
        assert_eq!(entry.shader, "Swell/Ocean");
        assert_eq!(entry.material.name(), "OceanSurface");
        assert!(entry.material.is_keyword_enabled("_SHADOWS_ON"));
    }

    #[test]
    fn test_material_yaml_keywords_default_to_empty() {
        let yaml = "name: Bare\n";
        let material: MaterialKeywords = serde_norway::from_str(yaml).unwrap();
        assert_eq!(material.enabled_keywords().count(), 0);
    }
}
