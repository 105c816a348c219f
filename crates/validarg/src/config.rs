//! # Declaring slot tables in TOML
//!
//! Besides building a [`SlotTable`] in code, a type's attributes can be
//! declared in a TOML document and loaded with [`TableConfig`]:
//!
//! ```toml
//! name = "Person"
//!
//! [[slots]]
//! name = "age"
//! kind = "int"
//! lower_bound = 0
//! upper_bound = 120
//! default = 0
//!
//! [[slots]]
//! name = "tag"
//! kind = "str"
//! choices = ["a", "b", "c"]
//! default = "a"
//! ```
//!
//! ## Slot keys
//!
//! | Key | Required | Description |
//! |-----|----------|-------------|
//! | `name` | yes | Slot name |
//! | `label` | no | Name used in error messages (defaults to `name`) |
//! | `kind` | yes | `null`, `bool`, `int`, `float`, `str` or `list` |
//! | `choices` | no | Allowed values |
//! | `lower_bound` / `upper_bound` | no | Inclusive bounds |
//! | `default` | no | Value for unset instances (null when absent) |
//!
//! Rules are taken as written; only the document's shape is checked.

use crate::arg::ValidArg;
use crate::error::Result;
use crate::slots::SlotTable;
use crate::spec::ArgSpec;
use crate::value::{AttrValue, Number, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One `[[slots]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub kind: ValueKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<AttrValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<AttrValue>,
}

impl SlotConfig {
    pub fn to_spec(&self) -> ArgSpec {
        let label = self.label.as_deref().unwrap_or(&self.name);
        let mut spec = ArgSpec::new(label, self.kind);
        if let Some(choices) = &self.choices {
            spec = spec.choices(choices.iter().cloned());
        }
        if let Some(lower) = self.lower_bound {
            spec = spec.lower_bound(lower);
        }
        if let Some(upper) = self.upper_bound {
            spec = spec.upper_bound(upper);
        }
        if let Some(default) = &self.default {
            spec = spec.default(default.clone());
        }
        spec
    }
}

/// A whole type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    pub name: String,

    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

impl TableConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Build a fresh slot table; every call yields validators with empty
    /// stores.
    pub fn build(&self) -> SlotTable {
        self.slots
            .iter()
            .fold(SlotTable::new(&self.name), |table, slot| {
                table.bind(&slot.name, ValidArg::from_spec(slot.to_spec()))
            })
    }
}
