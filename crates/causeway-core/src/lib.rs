//! Metamodel core for the Causeway framework.
//!
//! Domain types are introspected into [`spec::ObjectSpecification`]s, each a
//! [`facet::FacetHolder`] composed of pluggable [`facet::Facet`]s. The
//! [`interaction`] module asks every advisor facet of a holder whether a
//! member is visible, usable or valid, and folds the answers into a single
//! [`interaction::InteractionResult`].
//!
//! This crate performs no I/O. Layout loading lives in `causeway-layout`,
//! object mementos in `causeway-memento`.

pub mod error;
pub mod events;
pub mod facet;
pub mod facets;
pub mod identifier;
pub mod interaction;
pub mod introspect;
pub mod object;
pub mod services;
pub mod session;
pub mod spec;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
