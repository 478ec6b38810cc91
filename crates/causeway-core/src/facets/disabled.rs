use crate::{
  facet::{Facet, FacetType, Precedence},
  interaction::{DisablingInteractionAdvisor, UsabilityContext, Where},
};

#[derive(Debug, Clone)]
pub struct DisabledFacet {
  where_:     Where,
  reason:     Option<String>,
  precedence: Precedence,
}

impl DisabledFacet {
  pub const TYPE: FacetType = FacetType::new("disabled");

  pub fn new(where_: Where, reason: Option<String>) -> Self {
    Self {
      where_,
      reason,
      precedence: Precedence::Default,
    }
  }

  pub fn with_precedence(mut self, precedence: Precedence) -> Self {
    self.precedence = precedence;
    self
  }

  pub fn reason(&self) -> &str {
    self.reason.as_deref().unwrap_or("Always disabled")
  }
}

impl Facet for DisabledFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }

  fn precedence(&self) -> Precedence { self.precedence }

  fn as_disabling_advisor(&self) -> Option<&dyn DisablingInteractionAdvisor> {
    Some(self)
  }
}

impl DisablingInteractionAdvisor for DisabledFacet {
  fn disables(&self, context: &UsabilityContext) -> Option<String> {
    self
      .where_
      .includes(context.where_)
      .then(|| self.reason().to_string())
  }
}
