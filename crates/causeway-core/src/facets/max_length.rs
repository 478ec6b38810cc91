use crate::{
  facet::{Facet, FacetType},
  interaction::{ValidatingInteractionAdvisor, ValidityContext},
};

/// Rejects proposed strings longer than `max` characters.
#[derive(Debug, Clone)]
pub struct MaxLengthFacet {
  max: usize,
}

impl MaxLengthFacet {
  pub const TYPE: FacetType = FacetType::new("max_length");

  pub fn new(max: usize) -> Self { Self { max } }

  pub fn max(&self) -> usize { self.max }
}

impl Facet for MaxLengthFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }

  fn as_validating_advisor(
    &self,
  ) -> Option<&dyn ValidatingInteractionAdvisor> {
    Some(self)
  }
}

impl ValidatingInteractionAdvisor for MaxLengthFacet {
  fn invalidates(&self, context: &ValidityContext) -> Option<String> {
    let text = context.proposed_value()?.pojo_as::<String>()?;
    (text.chars().count() > self.max).then(|| {
      format!(
        "Proposed value '{text}' exceeds the maximum length of {}",
        self.max
      )
    })
  }
}
