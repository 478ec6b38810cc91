//! Facets backed by domain-supplied supporting callbacks, the counterparts of
//! `hideXxx`, `disableXxx` and `validateXxx` methods on a domain type.

use std::{fmt, sync::Arc};

use crate::{
  facet::{Facet, FacetType},
  interaction::{
    DisablingInteractionAdvisor, HidingInteractionAdvisor, UsabilityContext,
    ValidatingInteractionAdvisor, ValidityContext, VisibilityContext,
  },
  object::ManagedObject,
};

type HideFn = Arc<dyn Fn(&ManagedObject) -> bool + Send + Sync>;
type DisableFn = Arc<dyn Fn(&ManagedObject) -> Option<String> + Send + Sync>;
type ValidateFn = Arc<dyn Fn(&ValidityContext) -> Option<String> + Send + Sync>;

// ─── Hide ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct HideForContextFacet {
  hide: HideFn,
}

impl HideForContextFacet {
  pub const TYPE: FacetType = FacetType::new("hide_for_context");

  pub fn new(
    hide: impl Fn(&ManagedObject) -> bool + Send + Sync + 'static,
  ) -> Self {
    Self { hide: Arc::new(hide) }
  }
}

impl fmt::Debug for HideForContextFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HideForContextFacet").finish_non_exhaustive()
  }
}

impl Facet for HideForContextFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }

  fn as_hiding_advisor(&self) -> Option<&dyn HidingInteractionAdvisor> {
    Some(self)
  }
}

impl HidingInteractionAdvisor for HideForContextFacet {
  fn hides(&self, context: &VisibilityContext) -> Option<String> {
    (self.hide)(&context.head.target).then(|| "Hidden".to_string())
  }
}

// ─── Disable ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DisableForContextFacet {
  disable: DisableFn,
}

impl DisableForContextFacet {
  pub const TYPE: FacetType = FacetType::new("disable_for_context");

  pub fn new(
    disable: impl Fn(&ManagedObject) -> Option<String> + Send + Sync + 'static,
  ) -> Self {
    Self {
      disable: Arc::new(disable),
    }
  }
}

impl fmt::Debug for DisableForContextFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DisableForContextFacet").finish_non_exhaustive()
  }
}

impl Facet for DisableForContextFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }

  fn as_disabling_advisor(&self) -> Option<&dyn DisablingInteractionAdvisor> {
    Some(self)
  }
}

impl DisablingInteractionAdvisor for DisableForContextFacet {
  fn disables(&self, context: &UsabilityContext) -> Option<String> {
    (self.disable)(&context.head.target)
  }
}

// ─── Validate ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ValidateForContextFacet {
  validate: ValidateFn,
}

impl ValidateForContextFacet {
  pub const TYPE: FacetType = FacetType::new("validate_for_context");

  pub fn new(
    validate: impl Fn(&ValidityContext) -> Option<String> + Send + Sync + 'static,
  ) -> Self {
    Self {
      validate: Arc::new(validate),
    }
  }
}

impl fmt::Debug for ValidateForContextFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ValidateForContextFacet").finish_non_exhaustive()
  }
}

impl Facet for ValidateForContextFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }

  fn as_validating_advisor(
    &self,
  ) -> Option<&dyn ValidatingInteractionAdvisor> {
    Some(self)
  }
}

impl ValidatingInteractionAdvisor for ValidateForContextFacet {
  fn invalidates(&self, context: &ValidityContext) -> Option<String> {
    (self.validate)(context)
  }
}
