//! Rule normalization and storage.

use crate::{RuleDeclaration, RuleRecord};
use indexmap::IndexMap;
use tracing::debug;

/// Ordered rules per field.
///
/// Insertion order is evaluation order, and therefore also the order of the
/// error messages recorded for a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: IndexMap<String, Vec<RuleRecord>>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `declaration` and appends the resulting records for `field`.
    ///
    /// Repeated calls for the same field append; nothing is replaced.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rules_core::{RuleDeclaration, RuleSet};
    /// use serde_json::json;
    ///
    /// let mut rules = RuleSet::new();
    /// rules.add("title", "not:empty");
    /// rules.add(
    ///     "title",
    ///     RuleDeclaration::from_value(json!({"length": {"max": 7}})).unwrap(),
    /// );
    ///
    /// let records = rules.get("title").unwrap();
    /// assert_eq!(records.len(), 2);
    /// assert!(records[0].negated);
    /// assert_eq!(records[1].handler, "length");
    /// ```
    pub fn add(&mut self, field: &str, declaration: impl Into<RuleDeclaration>) {
        let mut records = Vec::new();
        normalize(field, declaration.into(), &mut records);
        debug!("Adding {} rule(s) for field '{}'", records.len(), field);
        self.fields
            .entry(field.to_string())
            .or_default()
            .extend(records);
    }

    /// Adds every `(field, declaration)` pair in order.
    pub fn extend<I, F, D>(&mut self, declarations: I)
    where
        I: IntoIterator<Item = (F, D)>,
        F: AsRef<str>,
        D: Into<RuleDeclaration>,
    {
        for (field, declaration) in declarations {
            self.add(field.as_ref(), declaration);
        }
    }

    /// Records declared for a field.
    pub fn get(&self, field: &str) -> Option<&[RuleRecord]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleRecord])> {
        self.fields
            .iter()
            .map(|(field, records)| (field.as_str(), records.as_slice()))
    }

    /// Iterates every record in evaluation order.
    pub fn records(&self) -> impl Iterator<Item = &RuleRecord> {
        self.fields.values().flatten()
    }

    /// Number of fields with rules.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no rules are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes every rule.
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

/// Flattens one declaration into canonical records.
pub fn normalize(field: &str, declaration: RuleDeclaration, out: &mut Vec<RuleRecord>) {
    match declaration {
        RuleDeclaration::Name(name) => {
            out.push(RuleRecord::new(field, &name, Default::default()));
        }
        RuleDeclaration::List(items) => {
            for item in items {
                normalize(field, item, out);
            }
        }
        RuleDeclaration::Map(entries) => {
            for (name, spec) in entries {
                out.push(RuleRecord::new(field, &name, spec.into_options()));
            }
        }
    }
}
