//! Variant stripping core
//!
//! A compiled shader ships one permutation per keyword combination, but a
//! build only ever selects permutations whose keywords can actually occur.
//! This module computes, from the reference materials, which user-controlled
//! keywords never occur, and drops every variant that depends on one. The
//! filter is a pure function over its inputs; counting and logging happen in
//! the layers above.

use super::{KeywordKind, ReferenceMaterial, Variant};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Marks keywords that must never be stripped, by substring match on the
/// keyword name.
///
/// Some keywords are toggled by context other than material settings (a
/// screen-space effect enabling itself when the camera goes underwater, for
/// example), so material usage says nothing about them. A rule with fragment
/// `_MENISCUS` exempts `_MENISCUS`, `SWELL_MENISCUS_HQ`, and anything else
/// containing the fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExemptionRule {
    fragment: String,
}

impl ExemptionRule {
    /// Creates a rule exempting every keyword whose name contains `fragment`.
    pub fn new(fragment: impl Into<String>) -> Self {
        Self { fragment: fragment.into() }
    }

    /// Returns the fragment this rule matches on.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Returns true if `keyword` contains this rule's fragment.
    ///
    /// An empty fragment matches every keyword, which disables stripping
    /// wholesale; [`StripConfig::validate`](crate::config::StripConfig::validate)
    /// rejects empty fragments for that reason.
    pub fn matches(&self, keyword: &str) -> bool {
        keyword.contains(&self.fragment)
    }
}

impl fmt::Display for ExemptionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*{}*", self.fragment)
    }
}

/// Counts from one or more stripping passes.
///
/// These are observational: they describe what the filter did, and feed the
/// build-wide tally, but nothing reads them back to influence filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StripReport {
    /// Variants examined.
    pub considered: usize,
    /// Variants removed.
    pub stripped: usize,
}

impl StripReport {
    /// Variants that survived.
    pub fn retained(&self) -> usize {
        self.considered.saturating_sub(self.stripped)
    }
}

impl fmt::Display for StripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stripped {} of {} variants", self.stripped, self.considered)
    }
}

/// Result of one stripping pass over a shader's variant list.
#[derive(Debug, Clone)]
pub struct StripOutcome {
    /// The retained variants, in their original relative order.
    pub variants: Vec<Variant>,
    /// The keywords found unused, sorted for stable diagnostics.
    pub unused_keywords: BTreeSet<String>,
    /// Counts for this pass.
    pub report: StripReport,
}

/// Computes the keywords that appear in `variants` but can never be enabled
/// in the current build.
///
/// A keyword is unused exactly when all of the following hold: its
/// classification is user-controlled, no exemption rule matches it, and no
/// reference material has it enabled. Materials are consulted once per
/// distinct keyword name, not once per variant occurrence, so the cost is
/// bounded by distinct keywords × materials.
///
/// # Arguments
/// * `variants` - The shader's compiled permutations
/// * `materials` - Reference materials consulted for keyword usage
/// * `exemptions` - Rules marking keywords as never strippable
///
/// # Returns
/// The unused keyword names, always a subset of the keywords appearing
/// across `variants`.
pub fn unused_keywords<M: ReferenceMaterial>(
    variants: &[Variant],
    materials: &[M],
    exemptions: &[ExemptionRule],
) -> BTreeSet<String> {
    // Each variant carries only its own keyword list, so the union across
    // variants is the only view of the shader's full keyword surface.
    let mut kinds: HashMap<&str, KeywordKind> = HashMap::new();
    for variant in variants {
        for keyword in variant.keywords() {
            let kind = kinds.entry(keyword.name()).or_insert(keyword.kind());
            // Conflicting classifications for one name: the non-strippable
            // side wins, so a disagreement can only keep more variants.
            if kind.is_strippable() && !keyword.kind().is_strippable() {
                *kind = keyword.kind();
            }
        }
    }

    let mut unused = BTreeSet::new();
    for (name, kind) in kinds {
        if !kind.is_strippable() {
            continue;
        }
        if exemptions.iter().any(|rule| rule.matches(name)) {
            continue;
        }
        if materials.iter().any(|material| material.is_keyword_enabled(name)) {
            continue;
        }
        unused.insert(name.to_string());
    }
    unused
}

/// Removes every variant that uses at least one unused keyword.
///
/// A variant with even one unused keyword is dropped whole: that permutation
/// can never be selected at runtime if one of its defining toggles never
/// occurs. Partial stripping of a variant's keyword set is never performed,
/// and retained variants keep their relative input order.
///
/// An empty `variants` list is a legitimate no-op, and an empty `materials`
/// slice means every non-exempt user keyword is unused (maximally aggressive
/// stripping). This function cannot fail.
///
/// # Arguments
/// * `variants` - The shader's compiled permutations, consumed
/// * `materials` - Reference materials consulted for keyword usage
/// * `exemptions` - Rules marking keywords as never strippable
///
/// # Returns
/// The retained variants plus the unused keyword set and the pass counts.
pub fn strip_variants<M: ReferenceMaterial>(
    variants: Vec<Variant>,
    materials: &[M],
    exemptions: &[ExemptionRule],
) -> StripOutcome {
    if variants.is_empty() {
        return StripOutcome {
            variants,
            unused_keywords: BTreeSet::new(),
            report: StripReport::default(),
        };
    }

    let unused = unused_keywords(&variants, materials, exemptions);
    let considered = variants.len();

    let retained: Vec<Variant> = variants
        .into_iter()
        .filter(|variant| !variant.keywords().iter().any(|keyword| unused.contains(keyword.name())))
        .collect();

    let report = StripReport {
        considered,
        stripped: considered - retained.len(),
    };

    StripOutcome {
        variants: retained,
        unused_keywords: unused,
        report,
    }
}
