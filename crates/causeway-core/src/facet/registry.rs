//! Single-slot-per-type facet storage with precedence-based replacement.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::{Facet, FacetType, downcast};
use crate::interaction::{
  DisablingInteractionAdvisor, HidingInteractionAdvisor,
  ValidatingInteractionAdvisor,
};

/// What [`FacetRegistry::add_facet`] did with the offered facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetAddOutcome {
  /// The slot was empty.
  Added,
  /// The slot held a facet of lower or equal precedence.
  Replaced,
  /// The slot held a facet of higher precedence (or the very same facet).
  Retained,
}

/// The facets of one holder, keyed by [`FacetType`] and kept in registration
/// order. A replaced facet keeps the position of the one it replaced.
#[derive(Debug, Clone, Default)]
pub struct FacetRegistry {
  slots: IndexMap<FacetType, Arc<dyn Facet>>,
}

impl FacetRegistry {
  pub fn new() -> Self { Self::default() }

  /// Insert `facet`, replacing the current occupant of its slot iff the new
  /// facet's precedence is not lower.
  pub fn add_facet(&mut self, facet: Arc<dyn Facet>) -> FacetAddOutcome {
    let facet_type = facet.facet_type();
    let existing = self
      .slots
      .get(&facet_type)
      .map(|current| (current.precedence(), Arc::ptr_eq(current, &facet)));

    match existing {
      None => {
        self.slots.insert(facet_type, facet);
        FacetAddOutcome::Added
      }
      Some((_, true)) => FacetAddOutcome::Retained,
      Some((current, false)) if facet.precedence() < current => {
        debug!(
          %facet_type,
          kept = %current,
          offered = %facet.precedence(),
          "facet retained"
        );
        FacetAddOutcome::Retained
      }
      Some((current, false)) => {
        debug!(
          %facet_type,
          replaced = %current,
          by = %facet.precedence(),
          "facet replaced"
        );
        self.slots.insert(facet_type, facet);
        FacetAddOutcome::Replaced
      }
    }
  }

  pub fn get_facet(&self, facet_type: FacetType) -> Option<&Arc<dyn Facet>> {
    self.slots.get(&facet_type)
  }

  /// The effective facet of `facet_type`, if it is a `T`.
  pub fn get_facet_as<T: Facet>(&self, facet_type: FacetType) -> Option<&T> {
    self
      .slots
      .get(&facet_type)
      .and_then(|facet| downcast::<T>(facet.as_ref()))
  }

  pub fn contains(&self, facet_type: FacetType) -> bool {
    self.slots.contains_key(&facet_type)
  }

  pub fn len(&self) -> usize { self.slots.len() }

  pub fn is_empty(&self) -> bool { self.slots.is_empty() }

  /// All effective facets in registration order.
  pub fn facets(&self) -> impl Iterator<Item = &Arc<dyn Facet>> {
    self.slots.values()
  }

  /// Every effective facet exposing the capability selected by `pick`,
  /// paired with the facet that provides it.
  pub fn stream_facets<'a, A>(
    &'a self,
    pick: impl Fn(&'a dyn Facet) -> Option<&'a A> + 'a,
  ) -> impl Iterator<Item = (&'a Arc<dyn Facet>, &'a A)> + 'a
  where
    A: ?Sized + 'a,
  {
    self
      .slots
      .values()
      .filter_map(move |facet| pick(facet.as_ref()).map(|cap| (facet, cap)))
  }

  pub fn hiding_advisors(
    &self,
  ) -> impl Iterator<Item = (&Arc<dyn Facet>, &dyn HidingInteractionAdvisor)>
  {
    self.stream_facets(|facet| facet.as_hiding_advisor())
  }

  pub fn disabling_advisors(
    &self,
  ) -> impl Iterator<Item = (&Arc<dyn Facet>, &dyn DisablingInteractionAdvisor)>
  {
    self.stream_facets(|facet| facet.as_disabling_advisor())
  }

  pub fn validating_advisors(
    &self,
  ) -> impl Iterator<Item = (&Arc<dyn Facet>, &dyn ValidatingInteractionAdvisor)>
  {
    self.stream_facets(|facet| facet.as_validating_advisor())
  }
}
