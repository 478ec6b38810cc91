//! Layouts for Causeway object specifications.
//!
//! A [`Grid`] describes how an object's members are arranged on screen. Grids
//! come from a [`GridService`] (usually [`FileGridService`]), are normalised
//! against the specification so that every member appears exactly where it
//! may, and are cached per layout prefix by the [`GridFacet`] of each type.

pub mod error;
pub mod facet;
pub mod grid;
pub mod normalize;
pub mod service;
pub mod xml;

pub use error::{Error, Result};
pub use facet::{GridFacet, GridFacetFactory, LayoutPrefixFacet, grid_for};
pub use grid::{
  ActionLayout, Col, CollectionLayout, DomainObjectLayout, FieldSet, Grid,
  PropertyLayout, Row,
};
pub use service::{FileGridService, GridService};
pub use xml::{Schemas, XmlSchema, XmlService};

#[cfg(test)]
mod tests;
