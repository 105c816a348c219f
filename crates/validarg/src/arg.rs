//! The validated attribute.
//!
//! A [`ValidArg`] is declared once per attribute of a host type, usually in a
//! `static`, and shared by every instance of that type. Reads fall back to
//! the default until an instance has been assigned; writes are validated
//! against the [`ArgSpec`] and stored per instance.
//!
//! ```
//! use once_cell::sync::Lazy;
//! use validarg::{HasLifeline, Lifeline, ValidArg, ValueKind};
//!
//! static AGE: Lazy<ValidArg> =
//!     Lazy::new(|| ValidArg::new("age", ValueKind::Int).bounds(0, 120).default(0));
//!
//! struct Person {
//!     lifeline: Lifeline,
//! }
//!
//! impl HasLifeline for Person {
//!     fn lifeline(&self) -> &Lifeline {
//!         &self.lifeline
//!     }
//! }
//!
//! let person = Person { lifeline: Lifeline::new() };
//! assert_eq!(AGE.get(&person).as_int(), Some(0));
//!
//! AGE.assign(&person, 30).unwrap();
//! assert_eq!(AGE.get(&person).as_int(), Some(30));
//! assert!(AGE.assign(&person, 150).is_err());
//!
//! drop(person);
//! assert_eq!(AGE.stored_count(), 0);
//! ```

use crate::error::Result;
use crate::lifeline::HasLifeline;
use crate::spec::ArgSpec;
use crate::store::InstanceStore;
use crate::value::{AttrValue, Number, ValueKind};
use std::fmt;
use tracing::debug;

/// Result of reading an attribute through [`ValidArg::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    /// Read on the type itself: the rule, for introspection.
    Spec(&'a ArgSpec),
    /// Read on an instance: its stored value or the default.
    Value(AttrValue),
}

impl Lookup<'_> {
    pub fn into_value(self) -> Option<AttrValue> {
        match self {
            Lookup::Value(value) => Some(value),
            Lookup::Spec(_) => None,
        }
    }
}

/// A shared attribute validator with per-instance storage.
pub struct ValidArg {
    spec: ArgSpec,
    store: InstanceStore,
}

impl ValidArg {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::from_spec(ArgSpec::new(name, kind))
    }

    pub fn from_spec(spec: ArgSpec) -> Self {
        Self {
            spec,
            store: InstanceStore::new(),
        }
    }

    fn map_spec(self, f: impl FnOnce(ArgSpec) -> ArgSpec) -> Self {
        Self {
            spec: f(self.spec),
            store: self.store,
        }
    }

    /// Restrict values to the given set.
    pub fn choices<I, V>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        self.map_spec(|spec| spec.choices(choices))
    }

    pub fn lower_bound(self, bound: impl Into<Number>) -> Self {
        self.map_spec(|spec| spec.lower_bound(bound))
    }

    pub fn upper_bound(self, bound: impl Into<Number>) -> Self {
        self.map_spec(|spec| spec.upper_bound(bound))
    }

    pub fn bounds(self, lower: impl Into<Number>, upper: impl Into<Number>) -> Self {
        self.map_spec(|spec| spec.bounds(lower, upper))
    }

    pub fn default(self, value: impl Into<AttrValue>) -> Self {
        self.map_spec(|spec| spec.default(value))
    }

    pub fn spec(&self) -> &ArgSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Read the attribute.
    ///
    /// With no instance the spec itself is returned. Otherwise the
    /// instance's stored value, or the default (unvalidated) if it was never
    /// assigned. Never fails.
    pub fn lookup<L>(&self, instance: Option<&L>) -> Lookup<'_>
    where
        L: HasLifeline + ?Sized,
    {
        match instance {
            None => Lookup::Spec(&self.spec),
            Some(instance) => Lookup::Value(self.get(instance)),
        }
    }

    /// Read the attribute on an instance.
    pub fn get<L>(&self, instance: &L) -> AttrValue
    where
        L: HasLifeline + ?Sized,
    {
        self.store
            .get(instance.lifeline().id())
            .unwrap_or_else(|| self.spec.default_value().clone())
    }

    /// Validate and store a value for an instance.
    ///
    /// `None` assigns the default, which is validated like any other value.
    /// On failure nothing is stored and any earlier value stays in place.
    pub fn set<L>(&self, instance: &L, value: Option<AttrValue>) -> Result<()>
    where
        L: HasLifeline + ?Sized,
    {
        let lifeline = instance.lifeline();
        let value = self.spec.validate(value).inspect_err(|err| {
            debug!(attr = self.name(), instance = %lifeline.id(), error = %err, "rejected assignment");
        })?;

        if self.store.insert(lifeline, value) {
            let store = self.store.downgrade();
            let liveness = store.clone();
            let attr = self.spec.name().to_string();
            lifeline.on_drop_while(
                move || liveness.is_live(),
                move |dead| {
                    store.evict(&attr, dead);
                },
            );
        }
        debug!(attr = self.name(), instance = %lifeline.id(), "assigned");
        Ok(())
    }

    /// Shorthand for `set(instance, Some(value.into()))`.
    pub fn assign<L>(&self, instance: &L, value: impl Into<AttrValue>) -> Result<()>
    where
        L: HasLifeline + ?Sized,
    {
        self.set(instance, Some(value.into()))
    }

    /// Shorthand for `set(instance, None)`: assign the default.
    pub fn reset<L>(&self, instance: &L) -> Result<()>
    where
        L: HasLifeline + ?Sized,
    {
        self.set(instance, None)
    }

    /// Whether the instance has been explicitly assigned.
    pub fn is_set<L>(&self, instance: &L) -> bool
    where
        L: HasLifeline + ?Sized,
    {
        self.store.contains(instance.lifeline().id())
    }

    /// Number of live instances holding a value.
    pub fn stored_count(&self) -> usize {
        self.store.len()
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }
}

impl From<ArgSpec> for ValidArg {
    fn from(spec: ArgSpec) -> Self {
        Self::from_spec(spec)
    }
}

impl fmt::Debug for ValidArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidArg")
            .field("spec", &self.spec)
            .field("stored", &self.store.len())
            .finish()
    }
}
