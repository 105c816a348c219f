//! Attribute specifications and the validation pipeline.
//!
//! An [`ArgSpec`] is the immutable rule for one attribute: its exact kind,
//! optional inclusive bounds, optional choice set and default. Checks run in
//! a fixed order and stop at the first failure:
//!
//! 1. an omitted value resolves to the default
//! 2. kind must match exactly
//! 3. the quantity (length if sized, else the value) must be within bounds
//! 4. the value must be one of the choices
//!
//! Bounds come before choices, so a value that violates both always reports
//! the bounds error.

use crate::error::{Breach, Error, Range, Result};
use crate::value::{AttrValue, Number, ValueKind};

/// Specification for a single validated attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    name: String,
    kind: ValueKind,
    choices: Option<Vec<AttrValue>>,
    lower_bound: Option<Number>,
    upper_bound: Option<Number>,
    default: AttrValue,
}

impl ArgSpec {
    /// Create a spec with no bounds, no choices and a `Null` default.
    ///
    /// Nothing about the spec itself is validated: bounds, choices and the
    /// default are trusted as given.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            choices: None,
            lower_bound: None,
            upper_bound: None,
            default: AttrValue::Null,
        }
    }

    /// Restrict values to the given set.
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Set the inclusive lower bound.
    pub fn lower_bound(mut self, bound: impl Into<Number>) -> Self {
        self.lower_bound = Some(bound.into());
        self
    }

    /// Set the inclusive upper bound.
    pub fn upper_bound(mut self, bound: impl Into<Number>) -> Self {
        self.upper_bound = Some(bound.into());
        self
    }

    /// Set both inclusive bounds.
    pub fn bounds(self, lower: impl Into<Number>, upper: impl Into<Number>) -> Self {
        self.lower_bound(lower).upper_bound(upper)
    }

    /// Set the value returned for instances that were never assigned.
    pub fn default(mut self, value: impl Into<AttrValue>) -> Self {
        self.default = value.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn choice_set(&self) -> Option<&[AttrValue]> {
        self.choices.as_deref()
    }

    pub fn lower(&self) -> Option<Number> {
        self.lower_bound
    }

    pub fn upper(&self) -> Option<Number> {
        self.upper_bound
    }

    pub fn default_value(&self) -> &AttrValue {
        &self.default
    }

    /// Run the full pipeline and return the value to store.
    ///
    /// `None` means "no explicit value", which resolves to the default. The
    /// default goes through the same checks as any other value.
    pub fn validate(&self, value: Option<AttrValue>) -> Result<AttrValue> {
        let value = value.unwrap_or_else(|| self.default.clone());
        self.check_kind(&value)?;
        if let Some(quantity) = value.quantity() {
            self.check_bounds(quantity)?;
        }
        self.check_choice(&value)?;
        Ok(value)
    }

    fn check_kind(&self, value: &AttrValue) -> Result<()> {
        let actual = value.kind();
        if actual != self.kind {
            return Err(Error::TypeMismatch {
                name: self.name.clone(),
                expected: self.kind,
                actual,
            });
        }
        Ok(())
    }

    /// Check a quantity against whichever bounds are configured.
    pub fn check_bounds(&self, quantity: Number) -> Result<()> {
        let violated = match (self.lower_bound, self.upper_bound) {
            (Some(lo), Some(hi)) if quantity < lo || quantity > hi => Some(Range::Between(lo, hi)),
            (None, Some(hi)) if quantity > hi => Some(Range::AtMost(hi)),
            (Some(lo), None) if quantity < lo => Some(Range::AtLeast(lo)),
            _ => None,
        };
        match violated {
            Some(range) => Err(Error::OutOfBounds {
                name: self.name.clone(),
                breach: Breach { quantity, range },
            }),
            None => Ok(()),
        }
    }

    fn check_choice(&self, value: &AttrValue) -> Result<()> {
        let Some(choices) = &self.choices else {
            return Ok(());
        };
        if choices.contains(value) {
            return Ok(());
        }
        Err(Error::NotAChoice {
            name: self.name.clone(),
            choices: choices.clone(),
            value: value.clone(),
        })
    }
}
