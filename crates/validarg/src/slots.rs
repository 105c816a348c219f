//! Name-based binding of validated attributes to a host type.
//!
//! A [`SlotTable`] plays the role of a type definition: it lists the
//! attributes the type has, in declaration order, and dispatches reads and
//! writes by attribute name to the bound [`ValidArg`].

use crate::arg::ValidArg;
use crate::error::{Error, Result};
use crate::lifeline::HasLifeline;
use crate::value::AttrValue;

/// The validated attributes of one host type.
#[derive(Debug)]
pub struct SlotTable {
    type_name: String,
    slots: Vec<(String, ValidArg)>,
}

impl SlotTable {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            slots: Vec::new(),
        }
    }

    /// Bind a validator to a slot. Rebinding a slot replaces the validator
    /// in place, dropping everything the old one stored.
    pub fn bind(mut self, slot: impl Into<String>, arg: ValidArg) -> Self {
        let slot = slot.into();
        match self.slots.iter_mut().find(|(name, _)| *name == slot) {
            Some(existing) => existing.1 = arg,
            None => self.slots.push((slot, arg)),
        }
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn slot(&self, name: &str) -> Option<&ValidArg> {
        self.slots
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, arg)| arg)
    }

    /// Slot names and validators in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &ValidArg)> {
        self.slots.iter().map(|(name, arg)| (name.as_str(), arg))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn require(&self, name: &str) -> Result<&ValidArg> {
        self.slot(name).ok_or_else(|| Error::UnknownSlot {
            type_name: self.type_name.clone(),
            slot: name.to_string(),
        })
    }

    /// Read a slot on an instance.
    pub fn get<L>(&self, instance: &L, slot: &str) -> Result<AttrValue>
    where
        L: HasLifeline + ?Sized,
    {
        Ok(self.require(slot)?.get(instance))
    }

    /// Validate and store a value in a slot. `None` assigns the default.
    pub fn set<L>(&self, instance: &L, slot: &str, value: Option<AttrValue>) -> Result<()>
    where
        L: HasLifeline + ?Sized,
    {
        self.require(slot)?.set(instance, value)
    }

    /// Current value of every slot, in declaration order.
    pub fn snapshot<L>(&self, instance: &L) -> Vec<(String, AttrValue)>
    where
        L: HasLifeline + ?Sized,
    {
        self.slots
            .iter()
            .map(|(name, arg)| (name.clone(), arg.get(instance)))
            .collect()
    }

    /// Initialise an instance: every slot named in `values` gets that value,
    /// every other slot is assigned its default.
    ///
    /// Unknown names are rejected before anything is assigned. Otherwise
    /// slots are assigned in declaration order and the first failure stops
    /// the run; slots assigned before it keep their new values.
    pub fn init<L, I, K>(&self, instance: &L, values: I) -> Result<()>
    where
        L: HasLifeline + ?Sized,
        I: IntoIterator<Item = (K, AttrValue)>,
        K: Into<String>,
    {
        let mut given: Vec<(String, AttrValue)> = Vec::new();
        for (name, value) in values {
            let name = name.into();
            self.require(&name)?;
            given.retain(|(existing, _)| *existing != name);
            given.push((name, value));
        }

        for (name, arg) in &self.slots {
            let value = given
                .iter()
                .position(|(given_name, _)| given_name == name)
                .map(|idx| given.swap_remove(idx).1);
            arg.set(instance, value)?;
        }
        Ok(())
    }
}
