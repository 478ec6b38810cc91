//! Declarative descriptions of domain types, the input of introspection.
//!
//! Descriptors deserialize from model files. Behaviour that cannot be
//! written down (constructors, action bodies, supporting callbacks) is
//! attached programmatically through the `#[serde(skip)]` fields.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  facet::Facet,
  facets::{Contributing, MixinConstructorFn},
  identifier::{FeatureType, LogicalType},
  interaction::Where,
  object::{ManagedObject, Pojo},
  services::ServiceRegistry,
  spec::BeanSort,
};

/// Metadata attached to a type, member or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Annotation {
  Hidden(Where),
  Disabled {
    #[serde(default, rename = "where")]
    where_: Where,
    #[serde(default)]
    reason: Option<String>,
  },
  Mandatory,
  Optional,
  MaxLength(usize),
  Contributed(Contributing),
  DomainEvent,
}

// ─── Type ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
  pub logical_type: LogicalType,
  /// Every supertype, transitively.
  #[serde(default)]
  pub supertypes:   Vec<LogicalType>,
  #[serde(default)]
  pub nature:       BeanSort,
  /// Main method of a mixin, if not the default.
  #[serde(default)]
  pub mixin_method: Option<String>,
  #[serde(default)]
  pub annotations:  Vec<Annotation>,
  #[serde(default)]
  pub constructors: Vec<ConstructorDescriptor>,
  #[serde(default)]
  pub members:      Vec<MemberDescriptor>,
  #[serde(skip)]
  pub facets:       Vec<Arc<dyn Facet>>,
}

impl TypeDescriptor {
  pub fn new(logical_type: impl Into<LogicalType>) -> Self {
    Self {
      logical_type: logical_type.into(),
      supertypes:   Vec::new(),
      nature:       BeanSort::default(),
      mixin_method: None,
      annotations:  Vec::new(),
      constructors: Vec::new(),
      members:      Vec::new(),
      facets:       Vec::new(),
    }
  }

  pub fn nature(mut self, nature: BeanSort) -> Self {
    self.nature = nature;
    self
  }

  pub fn supertype(mut self, logical_type: impl Into<LogicalType>) -> Self {
    self.supertypes.push(logical_type.into());
    self
  }

  pub fn mixin_method(mut self, name: impl Into<String>) -> Self {
    self.mixin_method = Some(name.into());
    self
  }

  pub fn annotate(mut self, annotation: Annotation) -> Self {
    self.annotations.push(annotation);
    self
  }

  pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
    self.constructors.push(constructor);
    self
  }

  pub fn member(mut self, member: MemberDescriptor) -> Self {
    self.members.push(member);
    self
  }

  pub fn facet(mut self, facet: impl Facet) -> Self {
    self.facets.push(Arc::new(facet));
    self
  }
}

// ─── Constructor ─────────────────────────────────────────────────────────────

/// A public constructor, described by its parameter types.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ConstructorDescriptor {
  pub parameter_types: Vec<LogicalType>,
  #[serde(skip)]
  pub factory:         Option<MixinConstructorFn>,
}

impl ConstructorDescriptor {
  pub fn new(parameter_types: Vec<LogicalType>) -> Self {
    Self {
      parameter_types,
      factory: None,
    }
  }

  pub fn with_factory(
    mut self,
    factory: impl Fn(&ManagedObject, &ServiceRegistry) -> Result<Pojo>
    + Send
    + Sync
    + 'static,
  ) -> Self {
    self.factory = Some(Arc::new(factory));
    self
  }
}

impl fmt::Debug for ConstructorDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConstructorDescriptor")
      .field("parameter_types", &self.parameter_types)
      .field("factory", &self.factory.is_some())
      .finish()
  }
}

// ─── Member ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDescriptor {
  pub name:           String,
  pub feature:        FeatureType,
  /// The type declaring the method, when it is a supertype of the owner.
  #[serde(default)]
  pub declaring_type: Option<LogicalType>,
  #[serde(default)]
  pub annotations:    Vec<Annotation>,
  #[serde(default)]
  pub parameters:     Vec<ParameterDescriptor>,
  #[serde(skip)]
  pub facets:         Vec<Arc<dyn Facet>>,
}

impl MemberDescriptor {
  pub fn new(feature: FeatureType, name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      feature,
      declaring_type: None,
      annotations: Vec::new(),
      parameters: Vec::new(),
      facets: Vec::new(),
    }
  }

  pub fn property(name: impl Into<String>) -> Self {
    Self::new(FeatureType::Property, name)
  }

  pub fn collection(name: impl Into<String>) -> Self {
    Self::new(FeatureType::Collection, name)
  }

  pub fn action(name: impl Into<String>) -> Self {
    Self::new(FeatureType::Action, name)
  }

  pub fn declared_by(mut self, logical_type: impl Into<LogicalType>) -> Self {
    self.declaring_type = Some(logical_type.into());
    self
  }

  pub fn annotate(mut self, annotation: Annotation) -> Self {
    self.annotations.push(annotation);
    self
  }

  pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
    self.parameters.push(parameter);
    self
  }

  pub fn facet(mut self, facet: impl Facet) -> Self {
    self.facets.push(Arc::new(facet));
    self
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDescriptor {
  pub name:        String,
  #[serde(default)]
  pub annotations: Vec<Annotation>,
  #[serde(skip)]
  pub facets:      Vec<Arc<dyn Facet>>,
}

impl ParameterDescriptor {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:        name.into(),
      annotations: Vec::new(),
      facets:      Vec::new(),
    }
  }

  pub fn annotate(mut self, annotation: Annotation) -> Self {
    self.annotations.push(annotation);
    self
  }

  pub fn facet(mut self, facet: impl Facet) -> Self {
    self.facets.push(Arc::new(facet));
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn descriptors_parse_from_json() {
    let json = r#"{
      "logical_type": "demo.Customer",
      "nature": "entity",
      "annotations": [{ "kind": "hidden", "value": "all_tables" }],
      "members": [
        {
          "name": "name",
          "feature": "property",
          "annotations": [
            { "kind": "max_length", "value": 40 },
            { "kind": "disabled", "value": { "reason": "read only" } }
          ]
        },
        { "name": "notes", "feature": "property",
          "annotations": [{ "kind": "optional" }] }
      ]
    }"#;
    let descriptor: TypeDescriptor = serde_json::from_str(json).unwrap();
    assert_eq!(descriptor.nature, BeanSort::Entity);
    assert_eq!(descriptor.annotations, vec![Annotation::Hidden(
      Where::AllTables
    )]);
    assert_eq!(descriptor.members[0].annotations, vec![
      Annotation::MaxLength(40),
      Annotation::Disabled {
        where_: Where::NotSpecified,
        reason: Some("read only".into()),
      },
    ]);
    assert_eq!(descriptor.members[1].annotations, vec![Annotation::Optional]);
  }
}
