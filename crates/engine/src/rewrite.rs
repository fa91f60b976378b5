//! Serialized-aware value rewriting
//!
//! [`ValueRewriter`] applies a [`RuleSet`] to a column value. Plain text gets the rules
//! applied directly. Text that looks serialized is decoded, every string leaf in the
//! tree is rewritten (recursing into leaves that are themselves serialized), and the
//! tree is re-encoded with fresh length prefixes.
//!
//! Keys of arrays and objects are never rewritten. Values that cannot be decoded are
//! left exactly as they were and recorded in the [`IssueLog`].

use tracing::debug;
use wpmigrate_core::detect::trim;
use wpmigrate_core::{decode, encode, is_serialized, Object, Value, FALSE_ENCODING, MAX_NESTING_DEPTH};

use crate::issues::{IssueKind, IssueLog, Location};
use crate::rules::RuleSet;

/// Applies a rule set to text and decoded values
#[derive(Debug, Clone, Copy)]
pub struct ValueRewriter<'a> {
    rules: &'a RuleSet,
}

impl<'a> ValueRewriter<'a> {
    /// Create a rewriter over `rules`
    pub fn new(rules: &'a RuleSet) -> Self {
        ValueRewriter { rules }
    }

    /// Rewrite a text value (a column, or a string leaf inside decoded data).
    ///
    /// Returns the new bytes when anything changed, `None` otherwise. Serialized input
    /// that fails to decode is recorded against `at` and reported as unchanged.
    pub fn rewrite_text(
        &self,
        text: &[u8],
        at: &Location<'_>,
        issues: &mut IssueLog,
    ) -> Option<Vec<u8>> {
        self.text(text, at, issues, 0)
    }

    /// Rewrite every string leaf of a decoded tree in place.
    ///
    /// Returns true when at least one leaf changed. Containers are not re-encoded
    /// here; the caller encodes the whole tree once.
    pub fn rewrite(&self, value: &mut Value, at: &Location<'_>, issues: &mut IssueLog) -> bool {
        self.value(value, at, issues, 0)
    }

    fn text(
        &self,
        text: &[u8],
        at: &Location<'_>,
        issues: &mut IssueLog,
        depth: usize,
    ) -> Option<Vec<u8>> {
        if is_serialized(text) {
            self.serialized(text, at, issues, depth)
        } else {
            self.rules.apply(text)
        }
    }

    fn serialized(
        &self,
        text: &[u8],
        at: &Location<'_>,
        issues: &mut IssueLog,
        depth: usize,
    ) -> Option<Vec<u8>> {
        if depth >= MAX_NESTING_DEPTH {
            too_deep(at, issues, text);
            return None;
        }

        let mut value = match decode(trim(text)) {
            Ok(value) => value,
            Err(e) if e.is_unsupported() => {
                issues.record_value(IssueKind::UnknownShape, at, e.to_string(), text);
                return None;
            }
            Err(e) => {
                issues.record_value(IssueKind::Decode, at, e.to_string(), text);
                return None;
            }
        };

        match value {
            Value::Bool(false) if text != FALSE_ENCODING => {
                issues.record_value(
                    IssueKind::AmbiguousScalar,
                    at,
                    "decodes to false but is not the canonical false encoding",
                    text,
                );
                return None;
            }
            // Scalars hold nothing to rewrite
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) => return None,
            Value::String(_) | Value::Array(_) | Value::Object(_) => {}
        }
        // Container levels and nested-serialization hops share one depth budget
        if depth + value.nesting() > MAX_NESTING_DEPTH {
            too_deep(at, issues, text);
            return None;
        }

        if !self.value(&mut value, at, issues, depth + 1) {
            return None;
        }
        debug!(
            target: "wpmigrate::rewrite",
            table = at.table,
            row = at.row_id,
            column = at.column,
            kind = value.type_name(),
            "Rewrote serialized value"
        );
        Some(encode(&value))
    }

    fn value(
        &self,
        value: &mut Value,
        at: &Location<'_>,
        issues: &mut IssueLog,
        depth: usize,
    ) -> bool {
        match value {
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) => false,
            Value::String(bytes) => match self.text(bytes, at, issues, depth) {
                Some(rewritten) => {
                    *bytes = rewritten;
                    true
                }
                None => false,
            },
            Value::Array(pairs) | Value::Object(Object { properties: pairs, .. }) => {
                let mut changed = false;
                for (_, child) in pairs.iter_mut() {
                    changed |= self.value(child, at, issues, depth + 1);
                }
                changed
            }
        }
    }
}

fn too_deep(at: &Location<'_>, issues: &mut IssueLog, text: &[u8]) {
    issues.record_value(
        IssueKind::Decode,
        at,
        format!("nested serialization exceeds {} levels", MAX_NESTING_DEPTH),
        text,
    );
}
