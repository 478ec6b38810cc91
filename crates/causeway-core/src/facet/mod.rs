//! Facets: the pluggable units of metadata attached to types and members.
//!
//! A [`FacetHolder`] keeps at most one effective facet per [`FacetType`];
//! which one wins is decided by [`Precedence`]. Several distinct facet types
//! may expose the same capability (e.g. hiding), and the interaction engine
//! consults all of them.

mod registry;

use std::{any::Any, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

pub use registry::{FacetAddOutcome, FacetRegistry};

use crate::{
  identifier::Identifier,
  interaction::{
    DisablingInteractionAdvisor, HidingInteractionAdvisor,
    ValidatingInteractionAdvisor,
  },
};

// ─── Precedence ──────────────────────────────────────────────────────────────

/// Rank deciding which of two facets of the same type is effective.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Precedence {
  /// Installed when nothing else applies.
  Fallback,
  /// Derived from naming conventions or member kind.
  Inferred,
  #[default]
  Default,
  /// Contributed by a domain-event subscription.
  Event,
  /// Explicit, more specific metadata.
  High,
}

// ─── FacetType ───────────────────────────────────────────────────────────────

/// Capability identity of a facet. Many facet structs may share one type, in
/// which case they compete for the same slot of a holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FacetType(&'static str);

impl FacetType {
  pub const fn new(name: &'static str) -> Self { Self(name) }

  pub const fn name(self) -> &'static str { self.0 }
}

impl fmt::Display for FacetType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.0)
  }
}

// ─── Facet ───────────────────────────────────────────────────────────────────

pub trait Facet: Any + fmt::Debug + Send + Sync {
  fn facet_type(&self) -> FacetType;

  fn precedence(&self) -> Precedence { Precedence::Default }

  fn as_hiding_advisor(&self) -> Option<&dyn HidingInteractionAdvisor> {
    None
  }

  fn as_disabling_advisor(&self) -> Option<&dyn DisablingInteractionAdvisor> {
    None
  }

  fn as_validating_advisor(
    &self,
  ) -> Option<&dyn ValidatingInteractionAdvisor> {
    None
  }
}

/// Downcast a type-erased facet to its concrete struct.
pub fn downcast<T: Facet>(facet: &dyn Facet) -> Option<&T> {
  let any: &dyn Any = facet;
  any.downcast_ref::<T>()
}

// ─── FacetHolder ─────────────────────────────────────────────────────────────

/// Any introspected element: a type, a member, or an action parameter.
pub trait FacetHolder {
  fn identifier(&self) -> &Identifier;

  fn facet_registry(&self) -> &FacetRegistry;

  fn get_facet(&self, facet_type: FacetType) -> Option<&Arc<dyn Facet>> {
    self.facet_registry().get_facet(facet_type)
  }

  fn get_facet_as<T: Facet>(&self, facet_type: FacetType) -> Option<&T>
  where
    Self: Sized,
  {
    self.facet_registry().get_facet_as(facet_type)
  }

  fn contains_facet(&self, facet_type: FacetType) -> bool {
    self.facet_registry().contains(facet_type)
  }
}
