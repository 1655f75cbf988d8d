//! Settings field predicates
//!
//! Settings surfaces gray out fields that currently have no effect: foam
//! parameters when foam is off, a shadow strength slider when shadows are
//! disabled. Rather than scattering that logic through UI code, each
//! dependency is one declarative rule in a [`PredicateTable`]: a pure
//! predicate over the value of a named sibling field. The table never
//! reads fields itself; callers supply a resolver for their own settings
//! representation.

use std::collections::HashMap;
use thiserror::Error;

/// A settings field value, as seen by predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// A toggle.
    Bool(bool),
    /// An integer quantity.
    Int(i64),
    /// A continuous quantity.
    Float(f64),
    /// The selected index of an enumerated choice.
    Choice(usize),
    /// Whether an object reference is set.
    Reference(bool),
}

/// One dependency rule: enables a field based on a sibling field's value.
///
/// The default reading is "disabled when the source is zero": a false
/// toggle, a zero quantity, the first choice, a missing reference. The
/// threshold moves with [`disable_if`](Self::disable_if) and flips with
/// [`inverted`](Self::inverted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPredicate {
    source_field: String,
    inverted: bool,
    disable_if: i64,
}

impl FieldPredicate {
    /// Creates a rule driven by the value of `source_field`.
    pub fn new(source_field: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            inverted: false,
            disable_if: 0,
        }
    }

    /// Flips the rule: disable when the source would have enabled.
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Sets the source value that disables the field.
    pub fn disable_if(mut self, value: i64) -> Self {
        self.disable_if = value;
        self
    }

    /// Returns the name of the field this rule reads.
    pub fn source_field(&self) -> &str {
        &self.source_field
    }

    /// Evaluates the rule against the source field's value.
    ///
    /// Quantities compare exactly against the disable value; booleans
    /// treat a nonzero disable value as "disable when true"; references
    /// enable only while set.
    pub fn enabled_for(&self, value: &FieldValue) -> bool {
        let enabled = match value {
            FieldValue::Bool(flag) => *flag ^ (self.disable_if != 0),
            FieldValue::Int(quantity) => *quantity != self.disable_if,
            FieldValue::Float(quantity) => *quantity != self.disable_if as f64,
            FieldValue::Choice(index) => *index as i64 != self.disable_if,
            FieldValue::Reference(present) => *present,
        };
        if self.inverted { !enabled } else { enabled }
    }
}

/// Errors from building a predicate table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredicateError {
    /// A field cannot be predicated on its own value.
    #[error("field '{0}' cannot predicate itself")]
    SelfReferential(String),
}

/// Declarative table of field dependency rules.
///
/// At most one rule per field; inserting a second rule for the same field
/// replaces the first. Fields without a rule are always enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateTable {
    rules: HashMap<String, FieldPredicate>,
}

impl PredicateTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule for `field`.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        predicate: FieldPredicate,
    ) -> Result<(), PredicateError> {
        let field = field.into();
        if field == predicate.source_field {
            return Err(PredicateError::SelfReferential(field));
        }

        self.rules.insert(field, predicate);
        Ok(())
    }

    /// Returns the rule registered for `field`, if any.
    pub fn rule(&self, field: &str) -> Option<&FieldPredicate> {
        self.rules.get(field)
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decides whether `field` is currently enabled.
    ///
    /// `resolve` maps a field name to its current value in the caller's
    /// settings. A field with no rule is enabled, and so is a field whose
    /// rule reads a source `resolve` does not know.
    pub fn field_enabled(
        &self,
        field: &str,
        resolve: impl Fn(&str) -> Option<FieldValue>,
    ) -> bool {
        let Some(predicate) = self.rules.get(field) else {
            return true;
        };
        match resolve(&predicate.source_field) {
            Some(value) => predicate.enabled_for(&value),
            None => true,
        }
    }
}
