//! # validarg
//!
//! Validated attributes shared across every instance of a host type.
//!
//! A [`ValidArg`] holds one immutable rule (exact [`ValueKind`], optional
//! inclusive bounds, optional choices, a default) and a per-instance store of
//! the values that passed it. Host types embed a [`Lifeline`]; the store keys
//! entries by the lifeline's identity, keeps only a weak reference back to it,
//! and drops the entry when the lifeline is dropped.
//!
//! ## Validation order
//!
//! 1. An omitted value (`None`) becomes the default.
//! 2. The value's kind must equal the declared kind exactly.
//! 3. The quantity must lie within the bounds. The quantity is the length of
//!    strings and lists, and the value itself for numbers.
//! 4. The value must be one of the choices, if any are declared.
//!
//! ## Modules
//!
//! - [`value`]: [`AttrValue`], [`ValueKind`], [`Number`]
//! - [`spec`]: the rule and its checks
//! - [`arg`]: the validator with its store
//! - [`lifeline`]: instance identity and drop notification
//! - [`slots`]: name-based dispatch for a whole type
//! - [`config`]: TOML declarations of slot tables

pub mod arg;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures;
pub mod lifeline;
pub mod slots;
pub mod spec;
pub mod store;
pub mod value;

pub use arg::{Lookup, ValidArg};
pub use config::{SlotConfig, TableConfig};
pub use error::{Breach, Error, Range, Result};
pub use lifeline::{HasLifeline, InstanceId, Lifeline, WeakLifeline};
pub use slots::SlotTable;
pub use spec::ArgSpec;
pub use store::InstanceStore;
pub use value::{AttrValue, Number, ValueKind};
