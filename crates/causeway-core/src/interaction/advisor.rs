//! Advisor capabilities. A facet exposes one by overriding the matching
//! `as_*_advisor` accessor of [`Facet`](crate::facet::Facet).
//!
//! Each method returns the veto reason, or `None` to allow.

use super::{UsabilityContext, ValidityContext, VisibilityContext};

pub trait HidingInteractionAdvisor {
  fn hides(&self, context: &VisibilityContext) -> Option<String>;
}

pub trait DisablingInteractionAdvisor {
  fn disables(&self, context: &UsabilityContext) -> Option<String>;
}

pub trait ValidatingInteractionAdvisor {
  fn invalidates(&self, context: &ValidityContext) -> Option<String>;
}
