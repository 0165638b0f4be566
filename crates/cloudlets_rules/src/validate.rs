//! Client-side validation primitives.
//!
//! Request and rule types implement [`Validate`]; violations are aggregated
//! into a [`ValidationErrors`] collection rather than failing fast, so a
//! caller sees every problem in one pass. The helper rules reproduce the
//! upstream API's message catalogue ("cannot be blank", "must be no greater
//! than 100", ...) because callers match on those texts.
//!
//! Following the upstream semantics, bound and membership rules skip
//! blank/zero values; pair them with [`not_blank`] or [`nonzero`] to make a
//! field required.

use std::fmt;

/// Validates a value's structural constraints without I/O or mutation.
pub trait Validate {
    /// Checks the value, collecting every violation before returning.
    ///
    /// # Errors
    ///
    /// Returns the aggregated violations when any constraint is broken.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path of the offending field, e.g. `Matches[2].MatchValue`.
    pub field: String,
    /// Human-readable message, upstream wording preserved.
    pub message: String,
}

/// An ordered collection of field-level violations.
///
/// Violations keep insertion order (field declaration order), which makes the
/// rendered text deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Returns true when no violation has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The recorded violations, in insertion order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Records a violation for `field` if `violation` holds one.
    pub fn check(&mut self, field: &str, violation: Option<String>) {
        if let Some(message) = violation {
            self.violations.push(Violation {
                field: field.to_string(),
                message,
            });
        }
    }

    /// Merges a nested validation result, prefixing each child path with
    /// `field`.
    pub fn merge(&mut self, field: &str, nested: Result<(), Self>) {
        if let Err(child) = nested {
            for violation in child.violations {
                let path = if violation.field.is_empty() {
                    field.to_string()
                } else {
                    format!("{field}.{}", violation.field)
                };
                self.violations.push(Violation {
                    field: path,
                    message: violation.message,
                });
            }
        }
    }

    /// Merges a nested validation result without prefixing the child paths.
    pub fn extend(&mut self, nested: Result<(), Self>) {
        if let Err(child) = nested {
            self.violations.extend(child.violations);
        }
    }

    /// Converts the collection into a result: `Ok(())` when empty.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one violation was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// `cannot be blank` when the string is missing or empty.
#[must_use]
pub fn not_blank(value: Option<&str>) -> Option<String> {
    if value.is_some_and(|v| !v.is_empty()) {
        None
    } else {
        Some("cannot be blank".to_string())
    }
}

/// `cannot be blank` when the integer is zero.
#[must_use]
pub fn nonzero(value: i64) -> Option<String> {
    (value == 0).then(|| "cannot be blank".to_string())
}

/// Length bound on an optional string; blank values are skipped.
#[must_use]
pub fn length(value: Option<&str>, min: usize, max: usize) -> Option<String> {
    let value = value.unwrap_or_default();
    if value.is_empty() {
        return None;
    }
    let chars = value.chars().count();
    if chars >= min && chars <= max {
        return None;
    }
    let message = if min == max {
        format!("the length must be exactly {min}")
    } else if min == 0 {
        format!("the length must be no more than {max}")
    } else {
        format!("the length must be between {min} and {max}")
    };
    Some(message)
}

/// Lower bound; zero values are skipped.
#[must_use]
pub fn at_least(value: i64, bound: i64) -> Option<String> {
    (value != 0 && value < bound).then(|| format!("must be no less than {bound}"))
}

/// Upper bound; zero values are skipped.
#[must_use]
pub fn at_most(value: i64, bound: i64) -> Option<String> {
    (value != 0 && value > bound).then(|| format!("must be no greater than {bound}"))
}

/// Lower bound on a float; zero values are skipped.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn at_least_f64(value: f64, bound: f64) -> Option<String> {
    (value != 0.0 && value < bound).then(|| format!("must be no less than {bound}"))
}

/// Upper bound on a float; zero values are skipped.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn at_most_f64(value: f64, bound: f64) -> Option<String> {
    (value != 0.0 && value > bound).then(|| format!("must be no greater than {bound}"))
}

/// `is required` when the optional value is absent.
#[must_use]
pub fn not_nil<T>(value: Option<&T>) -> Option<String> {
    value.is_none().then(|| "is required".to_string())
}

/// Length bound on a collection; empty collections are skipped.
#[must_use]
pub fn length_of(len: usize, min: usize, max: usize) -> Option<String> {
    if len == 0 || (len >= min && len <= max) {
        return None;
    }
    let message = if min == 0 {
        format!("the length must be no more than {max}")
    } else {
        format!("the length must be between {min} and {max}")
    };
    Some(message)
}
