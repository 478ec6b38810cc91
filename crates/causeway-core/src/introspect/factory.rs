//! The facet factory seam of the introspection pipeline.

use std::sync::Arc;

use crate::{
  facet::{Facet, FacetAddOutcome},
  introspect::{MemberDescriptor, ParameterDescriptor, TypeDescriptor},
  services::ServiceRegistry,
  spec::{
    ObjectActionParameter, ObjectMember, SpecificationBuilder,
    ValidationFailures,
  },
};

/// One step of the programming model. Each hook is called once per type,
/// member or parameter; the default does nothing.
pub trait FacetFactory: Send + Sync {
  fn name(&self) -> &'static str;

  fn process_type(&self, _processing: &mut TypeProcessing<'_>) {}

  fn process_member(&self, _processing: &mut MemberProcessing<'_>) {}

  fn process_parameter(&self, _processing: &mut ParameterProcessing<'_>) {}

  /// Runs once every member of the type has been introspected.
  fn post_process(&self, _processing: &mut TypeProcessing<'_>) {}
}

pub struct TypeProcessing<'a> {
  pub descriptor: &'a TypeDescriptor,
  pub spec:       &'a mut SpecificationBuilder,
  pub failures:   &'a ValidationFailures,
  pub services:   &'a ServiceRegistry,
}

impl TypeProcessing<'_> {
  pub fn add_facet(&mut self, facet: impl Facet) -> FacetAddOutcome {
    self.spec.add_facet(Arc::new(facet))
  }
}

pub struct MemberProcessing<'a> {
  pub owner:      &'a TypeDescriptor,
  pub descriptor: &'a MemberDescriptor,
  pub member:     &'a mut ObjectMember,
  pub failures:   &'a ValidationFailures,
  pub services:   &'a ServiceRegistry,
}

impl MemberProcessing<'_> {
  pub fn add_facet(&mut self, facet: impl Facet) -> FacetAddOutcome {
    self.member.add_facet(Arc::new(facet))
  }
}

pub struct ParameterProcessing<'a> {
  pub action:     &'a MemberDescriptor,
  pub descriptor: &'a ParameterDescriptor,
  pub parameter:  &'a mut ObjectActionParameter,
  pub failures:   &'a ValidationFailures,
  pub services:   &'a ServiceRegistry,
}

impl ParameterProcessing<'_> {
  pub fn add_facet(&mut self, facet: impl Facet) -> FacetAddOutcome {
    self.parameter.add_facet(Arc::new(facet))
  }
}
