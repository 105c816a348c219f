//! Test fixtures: a small host type wired up the way library users do it.

use crate::arg::ValidArg;
use crate::error::Result;
use crate::lifeline::{HasLifeline, Lifeline};
use crate::slots::SlotTable;
use crate::value::ValueKind;
use once_cell::sync::Lazy;

/// Attributes of [`Person`], declared once and shared by every instance.
pub static PERSON: Lazy<SlotTable> = Lazy::new(|| {
    SlotTable::new("Person")
        .bind(
            "age",
            ValidArg::new("age", ValueKind::Int).bounds(0, 120).default(0),
        )
        .bind(
            "tag",
            ValidArg::new("tag", ValueKind::Str)
                .choices(["a", "b", "c"])
                .default("a"),
        )
        .bind(
            "name",
            ValidArg::new("name", ValueKind::Str).bounds(1, 10),
        )
});

/// A host type with three validated attributes.
///
/// Two persons compare equal when their attribute values match, yet each
/// keeps its own storage.
#[derive(Debug, Default, Clone)]
pub struct Person {
    lifeline: Lifeline,
}

impl HasLifeline for Person {
    fn lifeline(&self) -> &Lifeline {
        &self.lifeline
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        PERSON.snapshot(self) == PERSON.snapshot(other)
    }
}

impl Person {
    pub fn new() -> Self {
        Self::default()
    }

    fn arg(slot: &str) -> &'static ValidArg {
        match PERSON.slot(slot) {
            Some(arg) => arg,
            None => unreachable!("Person declares {slot}"),
        }
    }

    pub fn age(&self) -> Option<i64> {
        Self::arg("age").get(self).as_int()
    }

    pub fn set_age(&self, age: i64) -> Result<()> {
        Self::arg("age").assign(self, age)
    }

    pub fn tag(&self) -> String {
        Self::arg("tag")
            .get(self)
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    pub fn set_tag(&self, tag: &str) -> Result<()> {
        Self::arg("tag").assign(self, tag)
    }

    pub fn name(&self) -> Option<String> {
        Self::arg("name").get(self).as_str().map(str::to_string)
    }

    pub fn set_name(&self, name: &str) -> Result<()> {
        Self::arg("name").assign(self, name)
    }

    /// Stored entries across all of `Person`'s attributes.
    pub fn stored_total() -> usize {
        PERSON.slots().map(|(_, arg)| arg.stored_count()).sum()
    }
}
