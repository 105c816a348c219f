use crate::value::{join_repr, AttrValue, Number, ValueKind};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Expected type {expected} for {name} and got {actual}.")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("{name} is out of bounds. {breach}")]
    OutOfBounds { name: String, breach: Breach },

    #[error("Expected {name} to be in [{}] and got '{value}'.", join_repr(.choices))]
    NotAChoice {
        name: String,
        choices: Vec<AttrValue>,
        value: AttrValue,
    },

    #[error("{type_name} has no attribute '{slot}'")]
    UnknownSlot { type_name: String, slot: String },

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Name of the attribute a validation failure refers to.
    pub fn attr_name(&self) -> Option<&str> {
        match self {
            Error::TypeMismatch { name, .. }
            | Error::OutOfBounds { name, .. }
            | Error::NotAChoice { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether this is one of the three rejections of an assigned value.
    pub fn is_validation(&self) -> bool {
        self.attr_name().is_some()
    }
}

/// The inclusive range a quantity fell outside of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Range {
    Between(Number, Number),
    AtMost(Number),
    AtLeast(Number),
}

/// A quantity together with the range it violated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breach {
    pub quantity: Number,
    pub range: Range,
}

impl fmt::Display for Breach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.quantity;
        match self.range {
            Range::Between(lo, hi) => write!(
                f,
                "Must be between [{lo}-{hi}] ({q}<{lo} or {q}>{hi})."
            ),
            Range::AtMost(hi) => write!(f, "Must be at most {hi} ({q}>{hi})."),
            Range::AtLeast(lo) => write!(f, "Must be at least {lo} ({q}<{lo})."),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_both_types() {
        let err = Error::TypeMismatch {
            name: "age".into(),
            expected: ValueKind::Int,
            actual: ValueKind::Str,
        };
        assert_eq!(err.to_string(), "Expected type int for age and got str.");
    }

    #[test]
    fn out_of_bounds_messages() {
        let between = Error::OutOfBounds {
            name: "age".into(),
            breach: Breach {
                quantity: Number::Int(150),
                range: Range::Between(Number::Int(0), Number::Int(120)),
            },
        };
        assert_eq!(
            between.to_string(),
            "age is out of bounds. Must be between [0-120] (150<0 or 150>120)."
        );

        let at_most = Error::OutOfBounds {
            name: "n".into(),
            breach: Breach {
                quantity: Number::Int(11),
                range: Range::AtMost(Number::Int(10)),
            },
        };
        assert_eq!(
            at_most.to_string(),
            "n is out of bounds. Must be at most 10 (11>10)."
        );

        let at_least = Error::OutOfBounds {
            name: "n".into(),
            breach: Breach {
                quantity: Number::Float(-0.5),
                range: Range::AtLeast(Number::Int(0)),
            },
        };
        assert_eq!(
            at_least.to_string(),
            "n is out of bounds. Must be at least 0 (-0.5<0)."
        );
    }

    #[test]
    fn not_a_choice_lists_choices() {
        let err = Error::NotAChoice {
            name: "tag".into(),
            choices: vec!["a".into(), "b".into(), "c".into()],
            value: "z".into(),
        };
        assert_eq!(
            err.to_string(),
            "Expected tag to be in [\"a\", \"b\", \"c\"] and got 'z'."
        );
    }

    #[test]
    fn attr_name_only_for_validation_errors() {
        let err = Error::UnknownSlot {
            type_name: "Person".into(),
            slot: "height".into(),
        };
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Person has no attribute 'height'");
    }
}
