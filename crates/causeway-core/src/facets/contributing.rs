use serde::{Deserialize, Serialize};

use crate::facet::{Facet, FacetType, Precedence};

/// How a mixin contributes to its holder type.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Contributing {
  #[default]
  Unspecified,
  AsAction,
  AsProperty,
  AsCollection,
}

#[derive(Debug, Clone)]
pub struct ContributingFacet {
  contributing: Contributing,
  precedence:   Precedence,
}

impl ContributingFacet {
  pub const TYPE: FacetType = FacetType::new("contributing");

  pub fn new(contributing: Contributing, precedence: Precedence) -> Self {
    Self {
      contributing,
      precedence,
    }
  }

  pub fn contributing(&self) -> Contributing { self.contributing }
}

impl Facet for ContributingFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }

  fn precedence(&self) -> Precedence { self.precedence }
}
