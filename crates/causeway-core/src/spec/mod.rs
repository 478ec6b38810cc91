//! Object specifications: the metamodel's view of a domain type.

mod loader;
mod member;
mod validation;

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use loader::SpecificationLoader;
pub use member::{ObjectActionParameter, ObjectMember};
pub use validation::{ValidationFailure, ValidationFailures};

use crate::{
  facet::{Facet, FacetAddOutcome, FacetHolder, FacetRegistry},
  facets::{MixinFacet, PropertyAccessorFacet},
  identifier::{FeatureType, Identifier, LogicalType},
  interaction::{
    InteractionEvent, InteractionInitiatedBy, InteractionResult,
    InteractionResultSet, Proposal, ValidityContext, VisibilityContext, Where,
    is_valid_result, is_valid_result_set, is_visible_result,
  },
  object::ManagedObject,
};

/// What kind of bean a type is.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BeanSort {
  Entity,
  ViewModel,
  Value,
  Mixin,
  Manager,
  Collection,
  #[default]
  Unknown,
}

// ─── ObjectSpecification ─────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ObjectSpecification {
  identifier: Identifier,
  bean_sort:  BeanSort,
  supertypes: Vec<LogicalType>,
  facets:     FacetRegistry,
  members:    IndexMap<String, ObjectMember>,
}

impl ObjectSpecification {
  pub fn builder(logical_type: LogicalType) -> SpecificationBuilder {
    SpecificationBuilder {
      spec: Self {
        identifier: Identifier::object(logical_type),
        bean_sort:  BeanSort::default(),
        supertypes: Vec::new(),
        facets:     FacetRegistry::new(),
        members:    IndexMap::new(),
      },
    }
  }

  pub fn logical_type(&self) -> &LogicalType { &self.identifier.logical_type }

  pub fn bean_sort(&self) -> BeanSort { self.bean_sort }

  /// Every supertype, transitively.
  pub fn supertypes(&self) -> &[LogicalType] { &self.supertypes }

  /// Whether instances of this type are also instances of `logical_type`.
  pub fn is_subtype_of(&self, logical_type: &LogicalType) -> bool {
    self.logical_type() == logical_type || self.supertypes.contains(logical_type)
  }

  pub fn is_assignable_from(&self, other: &ObjectSpecification) -> bool {
    other.is_subtype_of(self.logical_type())
  }

  pub fn is_mixin(&self) -> bool { self.contains_facet(MixinFacet::TYPE) }

  pub fn mixin_facet(&self) -> Option<&MixinFacet> {
    self.get_facet_as(MixinFacet::TYPE)
  }

  pub fn member(&self, name: &str) -> Option<&ObjectMember> {
    self.members.get(name)
  }

  pub fn members(&self) -> impl Iterator<Item = &ObjectMember> {
    self.members.values()
  }

  pub fn members_of(
    &self,
    feature_type: FeatureType,
  ) -> impl Iterator<Item = &ObjectMember> {
    self
      .members
      .values()
      .filter(move |member| member.feature_type() == feature_type)
  }

  /// Whether the object as a whole may be seen.
  pub fn is_visible(
    &self,
    target: &ManagedObject,
    initiated_by: InteractionInitiatedBy,
    where_: Where,
  ) -> InteractionResult {
    let context =
      VisibilityContext::object(target.clone(), initiated_by, where_);
    if initiated_by.is_framework() {
      return InteractionResult::new(InteractionEvent::from_head(&context.head));
    }
    is_visible_result(self, &context)
  }

  /// Validity of the object as a whole: the object-level advisors first,
  /// then the current value of every readable property.
  pub fn validate_object(
    &self,
    target: &ManagedObject,
    initiated_by: InteractionInitiatedBy,
  ) -> InteractionResultSet {
    let mut results = InteractionResultSet::new();
    results.add(is_valid_result(
      self,
      &ValidityContext::object(target.clone(), initiated_by),
    ));

    for property in self.members_of(FeatureType::Property) {
      let Some(accessor) = property
        .get_facet_as::<PropertyAccessorFacet>(PropertyAccessorFacet::TYPE)
      else {
        continue;
      };
      let context = ValidityContext::new(
        target.clone(),
        property.identifier().clone(),
        Proposal::PropertyModify {
          proposed: accessor.get(target),
        },
        initiated_by,
      );
      is_valid_result_set(property, &context, &mut results);
    }
    results
  }
}

impl FacetHolder for ObjectSpecification {
  fn identifier(&self) -> &Identifier { &self.identifier }

  fn facet_registry(&self) -> &FacetRegistry { &self.facets }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Mutable form of an [`ObjectSpecification`], used while introspecting.
#[derive(Debug)]
pub struct SpecificationBuilder {
  spec: ObjectSpecification,
}

impl SpecificationBuilder {
  pub fn bean_sort(mut self, bean_sort: BeanSort) -> Self {
    self.spec.bean_sort = bean_sort;
    self
  }

  pub fn supertype(mut self, logical_type: LogicalType) -> Self {
    self.add_supertype(logical_type);
    self
  }

  pub fn facet(mut self, facet: impl Facet) -> Self {
    self.add_facet(Arc::new(facet));
    self
  }

  pub fn member(mut self, member: ObjectMember) -> Self {
    self.add_member(member);
    self
  }

  pub fn add_supertype(&mut self, logical_type: LogicalType) {
    if !self.spec.supertypes.contains(&logical_type) {
      self.spec.supertypes.push(logical_type);
    }
  }

  pub fn add_facet(&mut self, facet: Arc<dyn Facet>) -> FacetAddOutcome {
    self.spec.facets.add_facet(facet)
  }

  /// Add `member`, replacing any earlier member of the same name.
  pub fn add_member(&mut self, member: ObjectMember) {
    self.spec.members.insert(member.name().to_string(), member);
  }

  pub fn logical_type(&self) -> &LogicalType { self.spec.logical_type() }

  pub fn get_member(&self, name: &str) -> Option<&ObjectMember> {
    self.spec.member(name)
  }

  pub fn build(self) -> ObjectSpecification { self.spec }
}

impl FacetHolder for SpecificationBuilder {
  fn identifier(&self) -> &Identifier { &self.spec.identifier }

  fn facet_registry(&self) -> &FacetRegistry { &self.spec.facets }
}
