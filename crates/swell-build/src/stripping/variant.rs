//! Shader keyword and variant data model
//!
//! This module defines the in-memory shape of a compiled shader as the host
//! toolchain hands it over: a sequence of variants, each of which is the set
//! of keywords that were enabled when that permutation was compiled. The
//! types are serde-enabled so variant dumps can be loaded from YAML by the
//! developer tooling.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Who controls a shader keyword.
///
/// Only keywords driven by material settings are ever candidates for
/// stripping; everything the platform or runtime toggles on its own must
/// survive every build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    /// Controlled by the platform/runtime (quality tiers, instancing, fog).
    BuiltIn,
    /// Controlled by material settings; the only strippable classification.
    UserDefined,
    /// Reported by the toolchain but not recognized here. Treated like
    /// [`KeywordKind::BuiltIn`]: a keyword we cannot account for is a
    /// keyword we must not strip.
    Unknown,
}

impl KeywordKind {
    /// Returns true if keywords of this kind may be considered for stripping.
    pub fn is_strippable(&self) -> bool {
        matches!(self, KeywordKind::UserDefined)
    }

    /// Returns the canonical lowercase name used in dumps and configs.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordKind::BuiltIn => "builtin",
            KeywordKind::UserDefined => "user",
            KeywordKind::Unknown => "unknown",
        }
    }

    /// Maps a classification name to a kind.
    ///
    /// Anything other than the two recognized names folds into
    /// [`KeywordKind::Unknown`]; toolchains grow new classifications faster
    /// than this crate does, and an unrecognized one must stay un-stripped.
    pub fn from_name(name: &str) -> Self {
        match name {
            "builtin" => KeywordKind::BuiltIn,
            "user" => KeywordKind::UserDefined,
            _ => KeywordKind::Unknown,
        }
    }
}

impl FromStr for KeywordKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KeywordKind::from_name(s))
    }
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for KeywordKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for KeywordKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(KeywordKind::from_name(&name))
    }
}

/// A named compile-time toggle with its classification.
///
/// The classification is fixed at construction; a keyword never changes
/// sides after the toolchain has reported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword {
    /// Keyword name as it appears in shader source and on materials.
    name: String,
    /// Classification reported by the toolchain.
    kind: KeywordKind,
}

impl Keyword {
    /// Creates a keyword with an explicit classification.
    pub fn new(name: impl Into<String>, kind: KeywordKind) -> Self {
        Self { name: name.into(), kind }
    }

    /// Creates a platform-controlled keyword.
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new(name, KeywordKind::BuiltIn)
    }

    /// Creates a material-controlled keyword.
    pub fn user(name: impl Into<String>) -> Self {
        Self::new(name, KeywordKind::UserDefined)
    }

    /// Returns the keyword name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the classification.
    pub fn kind(&self) -> KeywordKind {
        self.kind
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One compiled permutation of a shader: the set of keywords that were
/// enabled when it was built.
///
/// Keywords are stored in insertion order for stable iteration but behave
/// as a set: a duplicated name is dropped at construction, first occurrence
/// winning. A shader owns an ordered sequence of `Variant`s; that order is
/// whatever the compiler emitted and carries no meaning beyond stability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Variant {
    keywords: Vec<Keyword>,
}

impl Variant {
    /// Builds a variant from its enabled keywords, dropping duplicate names.
    pub fn new(keywords: impl IntoIterator<Item = Keyword>) -> Self {
        let mut unique: Vec<Keyword> = Vec::new();
        for keyword in keywords {
            if !unique.iter().any(|existing| existing.name == keyword.name) {
                unique.push(keyword);
            }
        }
        Self { keywords: unique }
    }

    /// The permutation with no keywords enabled; every shader has one.
    pub fn empty() -> Self {
        Self { keywords: Vec::new() }
    }

    /// Returns the enabled keywords in insertion order.
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Returns true if this permutation was compiled with `name` enabled.
    pub fn uses(&self, name: &str) -> bool {
        self.keywords.iter().any(|keyword| keyword.name == name)
    }

    /// Number of enabled keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns true if no keywords are enabled.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, keyword) in self.keywords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", keyword.name)?;
        }
        write!(f, "}}")
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let keywords = Vec::<Keyword>::deserialize(deserializer)?;
        Ok(Variant::new(keywords))
    }
}
