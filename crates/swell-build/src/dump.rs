//! Build dump parsing
//!
//! The developer tooling replays a stripping pass offline from a YAML
//! capture of what a build saw: one shader's compiled variant list plus the
//! material listing of the built scenes. This module parses that document.

use crate::stripping::{SceneMaterial, Variant};
use serde::Deserialize;

/// Offline capture of one shader's build input as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct BuildDump {
    /// Fully qualified name of the dumped shader
    pub shader: String,
    /// The shader's compiled variants, in compiler order
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Material listing captured from the built scenes
    #[serde(default)]
    pub scene: Vec<SceneMaterial>,
}

impl BuildDump {
    /// Parses a build dump from YAML content
    ///
    /// # Arguments
    /// * `yaml_content` - YAML string containing the dump
    pub fn from_yaml(yaml_content: &str) -> Result<Self, serde_norway::Error> {
        serde_norway::from_str(yaml_content)
    }

    /// Parses a build dump from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the YAML dump file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stripping::KeywordKind;

    #[test]
    fn test_dump_parsing() {
        let yaml = r#"
shader: Swell/Underwater/Post Process
variants:
  - []
  - - name: _CAUSTICS_ON
      kind: user
  - - name: _CAUSTICS_ON
      kind: user
    - name: STEREO_INSTANCING_ON
      kind: builtin
scene:
  - shader: Swell/Ocean
    material:
      name: Ocean
      enabled:
        - _CAUSTICS_ON
  - shader: Standard
    material:
      name: Rocks
"#;

        let dump = BuildDump::from_yaml(yaml).unwrap();
        assert_eq!(dump.shader, "Swell/Underwater/Post Process");
        assert_eq!(dump.variants.len(), 3);
        assert!(dump.variants[0].is_empty());
        assert!(dump.variants[1].uses("_CAUSTICS_ON"));
        assert_eq!(dump.variants[2].keywords()[1].kind(), KeywordKind::BuiltIn);
        assert_eq!(dump.scene.len(), 2);
        assert_eq!(dump.scene[0].shader, "Swell/Ocean");
    }

    #[test]
    fn test_dump_sections_default_to_empty() {
        let dump = BuildDump::from_yaml("shader: Swell/Ocean\n").unwrap();
        assert_eq!(dump.shader, "Swell/Ocean");
        assert!(dump.variants.is_empty());
        assert!(dump.scene.is_empty());
    }

    #[test]
    fn test_dump_requires_a_shader_name() {
        assert!(BuildDump::from_yaml("variants: []\n").is_err());
    }
}
