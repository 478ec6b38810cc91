use crate::{
  facet::{Facet, FacetType, Precedence},
  interaction::{HidingInteractionAdvisor, VisibilityContext, Where},
};

/// Hides a feature wherever its [`Where`] scope includes the rendering
/// location.
#[derive(Debug, Clone)]
pub struct HiddenFacet {
  where_:     Where,
  precedence: Precedence,
}

impl HiddenFacet {
  pub const TYPE: FacetType = FacetType::new("hidden");

  pub fn new(where_: Where) -> Self {
    Self {
      where_,
      precedence: Precedence::Default,
    }
  }

  pub fn with_precedence(mut self, precedence: Precedence) -> Self {
    self.precedence = precedence;
    self
  }

  pub fn where_(&self) -> Where { self.where_ }
}

impl Facet for HiddenFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }

  fn precedence(&self) -> Precedence { self.precedence }

  fn as_hiding_advisor(&self) -> Option<&dyn HidingInteractionAdvisor> {
    Some(self)
  }
}

impl HidingInteractionAdvisor for HiddenFacet {
  fn hides(&self, context: &VisibilityContext) -> Option<String> {
    self.where_.includes(context.where_).then(|| "Hidden".to_string())
  }
}
