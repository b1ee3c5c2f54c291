//! Explicit form schemas and collected validation failures.
//!
//! Each entry form is a fixed, ordered list of field specs. Validation walks
//! the schema and collects every violation before reporting, so a rejected
//! submission names all failing fields, not just the first. The same schema
//! is served to clients for rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Date,
    Integer,
    Decimal,
    MultiSelect,
    Text,
}

/// One field of an entry form. Read-only fields are derived by the
/// calculator and shown pre-filled; they are never accepted from a client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub read_only: bool,
    pub min: Option<f64>,
}

const fn editable(name: &'static str, kind: FieldKind, min: Option<f64>) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        read_only: false,
        min,
    }
}

const fn derived(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        read_only: true,
        min: None,
    }
}

/// The daily record form, in display order.
pub const RECORD_FORM_SCHEMA: &[FieldSpec] = &[
    editable("date", FieldKind::Date, None),
    derived("day_age", FieldKind::Integer),
    derived("week_age", FieldKind::Integer),
    derived("previous_population", FieldKind::Integer),
    editable("feed_grams", FieldKind::Decimal, Some(0.0)),
    editable("dead_count", FieldKind::Integer, Some(0.0)),
    derived("current_population", FieldKind::Integer),
    editable("medications", FieldKind::MultiSelect, None),
    editable("vaccinations", FieldKind::MultiSelect, None),
];

/// The egg-production form, in display order.
pub const LAYING_FORM_SCHEMA: &[FieldSpec] = &[
    editable("date", FieldKind::Date, None),
    derived("previous_population", FieldKind::Integer),
    editable("dead_count", FieldKind::Integer, Some(0.0)),
    editable("culled_count", FieldKind::Integer, Some(0.0)),
    derived("current_population", FieldKind::Integer),
    editable("feed_sacks", FieldKind::Decimal, Some(0.0)),
    derived("feed_grams", FieldKind::Decimal),
    editable("egg_trays", FieldKind::Integer, Some(0.0)),
    editable("extra_eggs", FieldKind::Integer, Some(0.0)),
    derived("eggs_collected", FieldKind::Integer),
    derived("production_rate", FieldKind::Decimal),
];

/// A single failed check on a submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Every violation found in one submission, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed for {} field(s)", .violations.len())]
pub struct ValidationFailures {
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, code: &str, message: String) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            code: code.to_string(),
            message,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Ok(()) when nothing failed, otherwise the collected failures.
    pub fn into_result(self) -> Result<(), ValidationFailures> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Check a numeric field against its spec's minimum. Returns the value
    /// only when it passes.
    pub fn check_min(&mut self, spec: &FieldSpec, value: f64) -> Option<f64> {
        if let Some(min) = spec.min {
            if value < min {
                self.push(
                    spec.name,
                    "out_of_range",
                    format!("{} must be at least {}", spec.name, min),
                );
                return None;
            }
        }
        Some(value)
    }

    /// Check that an integer field really is integral and non-negative
    /// within its spec. Returns the integral value only when it passes.
    pub fn check_integer(&mut self, spec: &FieldSpec, value: f64) -> Option<u32> {
        if value.fract() != 0.0 {
            self.push(
                spec.name,
                "not_integral",
                format!("{} must be a whole number", spec.name),
            );
            return None;
        }
        let value = self.check_min(spec, value)?;
        if value > u32::MAX as f64 {
            self.push(
                spec.name,
                "out_of_range",
                format!("{} is too large", spec.name),
            );
            return None;
        }
        Some(value as u32)
    }
}

/// Look up a field spec by name. Schemas are small fixed lists, so a linear
/// scan is fine.
pub fn field(schema: &'static [FieldSpec], name: &str) -> &'static FieldSpec {
    schema
        .iter()
        .find(|spec| spec.name == name)
        .unwrap_or_else(|| panic!("unknown schema field: {name}"))
}
