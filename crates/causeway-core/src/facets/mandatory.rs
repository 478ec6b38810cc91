use serde::{Deserialize, Serialize};

use crate::{
  facet::{Facet, FacetType, Precedence},
  interaction::{ValidatingInteractionAdvisor, ValidityContext},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semantics {
  Required,
  Optional,
}

/// Rejects a missing value for a required property or parameter. Blank
/// strings count as missing.
#[derive(Debug, Clone)]
pub struct MandatoryFacet {
  semantics:  Semantics,
  precedence: Precedence,
}

impl MandatoryFacet {
  pub const TYPE: FacetType = FacetType::new("mandatory");

  pub fn new(semantics: Semantics) -> Self {
    Self {
      semantics,
      precedence: Precedence::Default,
    }
  }

  /// Properties and parameters are required unless annotated otherwise.
  pub fn inferred() -> Self {
    Self {
      semantics:  Semantics::Required,
      precedence: Precedence::Inferred,
    }
  }

  pub fn semantics(&self) -> Semantics { self.semantics }

  pub fn is_required(&self) -> bool { self.semantics == Semantics::Required }
}

impl Facet for MandatoryFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }

  fn precedence(&self) -> Precedence { self.precedence }

  fn as_validating_advisor(
    &self,
  ) -> Option<&dyn ValidatingInteractionAdvisor> {
    Some(self)
  }
}

impl ValidatingInteractionAdvisor for MandatoryFacet {
  fn invalidates(&self, context: &ValidityContext) -> Option<String> {
    if !self.is_required() || !context.proposal.is_single_value() {
      return None;
    }
    let missing = match context.proposed_value() {
      None => true,
      Some(value) => value
        .pojo_as::<String>()
        .is_some_and(|text| text.trim().is_empty()),
    };
    missing.then(|| "Mandatory".to_string())
  }
}
