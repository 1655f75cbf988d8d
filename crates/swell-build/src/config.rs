//! Stripping pass configuration
//!
//! This module provides the configuration consumed by the stripping pass:
//! which shader gets stripped, which shader's materials serve as the usage
//! reference, and which keywords are off limits. The defaults describe the
//! shipped ocean renderer; hosts with renamed shaders load their own file.

use crate::stripping::ExemptionRule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a variant stripping pass
///
/// Missing fields fall back to the defaults, so a partial YAML document only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Fully qualified name of the shader whose variants get stripped
    pub target_shader: String,
    /// Fully qualified name of the surface shader whose scene materials are
    /// collected as the keyword usage reference
    pub surface_shader: String,
    /// Name prefix identifying shaders that belong to this renderer, used
    /// for build accounting
    pub family_prefix: String,
    /// Keywords containing any of these fragments are never stripped
    pub exemptions: Vec<ExemptionRule>,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            target_shader: "Swell/Underwater/Post Process".to_string(),
            surface_shader: "Swell/Ocean".to_string(),
            family_prefix: "Swell".to_string(),
            exemptions: vec![
                ExemptionRule::new("_MENISCUS"),
                ExemptionRule::new("_FULL_SCREEN_EFFECT"),
                ExemptionRule::new("_DEBUG_VIEW_OCEAN_MASK"),
            ],
        }
    }
}

impl StripConfig {
    /// Parses a stripping configuration from YAML content
    ///
    /// # Arguments
    /// * `yaml_content` - YAML string containing the configuration
    pub fn from_yaml(yaml_content: &str) -> Result<Self, serde_norway::Error> {
        serde_norway::from_str(yaml_content)
    }

    /// Parses a stripping configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the YAML configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&content)?)
    }

    /// Returns true if any exemption rule matches `keyword`
    pub fn is_exempt(&self, keyword: &str) -> bool {
        self.exemptions.iter().any(|rule| rule.matches(keyword))
    }

    /// Validates the configuration for correctness
    ///
    /// Checks for empty shader names and exemption fragments, and that both
    /// shaders sit inside the configured family.
    ///
    /// # Returns
    /// Ok(()) if valid, or a specific validation error
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.target_shader.is_empty() {
            return Err(ConfigValidationError::EmptyTargetShader);
        }

        if self.surface_shader.is_empty() {
            return Err(ConfigValidationError::EmptySurfaceShader);
        }

        if self.family_prefix.is_empty() {
            return Err(ConfigValidationError::EmptyFamilyPrefix);
        }

        // An empty fragment would exempt every keyword and silently turn
        // the whole pass into a no-op.
        for (i, rule) in self.exemptions.iter().enumerate() {
            if rule.fragment().is_empty() {
                return Err(ConfigValidationError::EmptyExemption(i));
            }
        }

        if !self.target_shader.starts_with(&self.family_prefix) {
            return Err(ConfigValidationError::TargetOutsideFamily(
                self.target_shader.clone(),
                self.family_prefix.clone(),
            ));
        }

        if !self.surface_shader.starts_with(&self.family_prefix) {
            return Err(ConfigValidationError::SurfaceOutsideFamily(
                self.surface_shader.clone(),
                self.family_prefix.clone(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation
///
/// These errors indicate a configuration that would make the stripping pass
/// either a silent no-op or blind to its own shaders.
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    /// Target shader name is empty
    EmptyTargetShader,
    /// Surface shader name is empty
    EmptySurfaceShader,
    /// Family prefix is empty
    EmptyFamilyPrefix,
    /// An exemption rule has an empty fragment (rule index)
    EmptyExemption(usize),
    /// Target shader does not start with the family prefix (shader, prefix)
    TargetOutsideFamily(String, String),
    /// Surface shader does not start with the family prefix (shader, prefix)
    SurfaceOutsideFamily(String, String),
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTargetShader => write!(f, "Target shader name cannot be empty"),
            Self::EmptySurfaceShader => write!(f, "Surface shader name cannot be empty"),
            Self::EmptyFamilyPrefix => write!(f, "Family prefix cannot be empty"),
            Self::EmptyExemption(index) => {
                write!(f, "Exemption rule {index} has an empty fragment")
            }
            Self::TargetOutsideFamily(shader, prefix) => {
                write!(f, "Target shader '{shader}' is outside the '{prefix}' shader family")
            }
            Self::SurfaceOutsideFamily(shader, prefix) => {
                write!(f, "Surface shader '{shader}' is outside the '{prefix}' shader family")
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}
