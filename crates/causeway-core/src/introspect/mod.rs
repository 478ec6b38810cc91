//! Introspection: turning type descriptors into object specifications.
//!
//! The pipeline runs the factories of a [`ProgrammingModel`] in three
//! passes. Type-level facets come first, so a mixin's facet exists (with its
//! contribution still unspecified) before any member is looked at. Members
//! and their parameters follow. The last pass runs once every member of a
//! type is known and lets factories complete facets that depend on them.
//!
//! Facets attached to a descriptor programmatically are added after the
//! factory-produced ones of the same holder.

mod descriptor;
mod factories;
mod factory;

use std::{collections::HashSet, sync::Arc};

use tracing::{debug, info};

pub use descriptor::{
  Annotation, ConstructorDescriptor, MemberDescriptor, ParameterDescriptor,
  TypeDescriptor,
};
pub use factories::{
  ContributingFacetFactory, DisabledFacetFactory, DomainEventFacetFactory,
  HiddenFacetFactory, MandatoryFacetFactory, MaxLengthFacetFactory,
  MixinFacetFactory,
};
pub use factory::{
  FacetFactory, MemberProcessing, ParameterProcessing, TypeProcessing,
};

use crate::{
  facet::FacetHolder,
  facets::MixinFacet,
  identifier::{FeatureType, Identifier, LogicalType},
  services::ServiceRegistry,
  spec::{
    ObjectActionParameter, ObjectMember, ObjectSpecification,
    SpecificationBuilder, SpecificationLoader, ValidationFailures,
  },
};

// ─── ProgrammingModel ────────────────────────────────────────────────────────

/// The ordered set of facet factories applied to every type.
pub struct ProgrammingModel {
  factories: Vec<Box<dyn FacetFactory>>,
}

impl ProgrammingModel {
  /// A model without any factory.
  pub fn empty() -> Self {
    Self {
      factories: Vec::new(),
    }
  }

  pub fn with_factory(mut self, factory: impl FacetFactory + 'static) -> Self {
    self.add_factory(factory);
    self
  }

  pub fn add_factory(&mut self, factory: impl FacetFactory + 'static) {
    self.factories.push(Box::new(factory));
  }

  pub fn factory_names(&self) -> Vec<&'static str> {
    self.factories.iter().map(|factory| factory.name()).collect()
  }
}

impl Default for ProgrammingModel {
  fn default() -> Self {
    Self::empty()
      .with_factory(MixinFacetFactory)
      .with_factory(HiddenFacetFactory)
      .with_factory(DisabledFacetFactory)
      .with_factory(MandatoryFacetFactory)
      .with_factory(MaxLengthFacetFactory)
      .with_factory(ContributingFacetFactory)
      .with_factory(DomainEventFacetFactory)
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

impl SpecificationLoader {
  /// Introspect `descriptors` and register the resulting specifications.
  /// Problems are recorded as validation failures; the returned
  /// specifications are usable regardless.
  pub fn introspect(
    &self,
    model: &ProgrammingModel,
    descriptors: &[TypeDescriptor],
    services: &ServiceRegistry,
  ) -> Vec<Arc<ObjectSpecification>> {
    let failures = self.validation_failures();

    // types
    let mut builders: Vec<SpecificationBuilder> = descriptors
      .iter()
      .map(|descriptor| {
        let mut builder =
          ObjectSpecification::builder(descriptor.logical_type.clone())
            .bean_sort(descriptor.nature);
        for supertype in flatten_supertypes(self, descriptors, descriptor) {
          builder.add_supertype(supertype);
        }
        let mut processing = TypeProcessing {
          descriptor,
          spec: &mut builder,
          failures,
          services,
        };
        for factory in &model.factories {
          factory.process_type(&mut processing);
        }
        for facet in &descriptor.facets {
          builder.add_facet(Arc::clone(facet));
        }
        builder
      })
      .collect();

    // members
    for (descriptor, builder) in descriptors.iter().zip(&mut builders) {
      for member in &descriptor.members {
        let introspected = introspect_member(
          model, descriptor, member, services, builder, failures,
        );
        if let Some(member) = introspected {
          builder.add_member(member);
        }
      }
    }

    // post-processing
    for (descriptor, builder) in descriptors.iter().zip(&mut builders) {
      let mut processing = TypeProcessing {
        descriptor,
        spec: builder,
        failures,
        services,
      };
      for factory in &model.factories {
        factory.post_process(&mut processing);
      }
    }

    check_mixin_holders(self, &builders, failures);

    let specs: Vec<_> = builders
      .into_iter()
      .map(|builder| self.register(builder.build()))
      .collect();
    info!(
      specifications = specs.len(),
      registered = self.specifications().len(),
      failures = failures.len(),
      valid = failures.is_empty(),
      "introspection complete"
    );
    specs
  }
}

/// Every supertype of `descriptor`, depth first. Parents are looked up
/// among `descriptors`, then among specifications already registered.
fn flatten_supertypes(
  loader: &SpecificationLoader,
  descriptors: &[TypeDescriptor],
  descriptor: &TypeDescriptor,
) -> Vec<LogicalType> {
  let mut flattened: Vec<LogicalType> = Vec::new();
  let mut pending: Vec<LogicalType> =
    descriptor.supertypes.iter().rev().cloned().collect();
  while let Some(supertype) = pending.pop() {
    if supertype == descriptor.logical_type || flattened.contains(&supertype) {
      continue;
    }
    if let Some(parent) = descriptors
      .iter()
      .find(|candidate| candidate.logical_type == supertype)
    {
      pending.extend(parent.supertypes.iter().rev().cloned());
    } else if let Some(parent) = loader.try_specification_for(&supertype) {
      pending.extend(parent.supertypes().iter().rev().cloned());
    }
    flattened.push(supertype);
  }
  flattened
}

fn introspect_member(
  model: &ProgrammingModel,
  owner: &TypeDescriptor,
  descriptor: &MemberDescriptor,
  services: &ServiceRegistry,
  builder: &SpecificationBuilder,
  failures: &ValidationFailures,
) -> Option<ObjectMember> {
  let identifier = Identifier::member(
    owner.logical_type.clone(),
    descriptor.feature,
    descriptor.name.clone(),
  );
  if !descriptor.feature.is_member() {
    failures.raise(
      identifier,
      format!(
        "'{}' is not a property, collection or action",
        descriptor.feature
      ),
    );
    return None;
  }
  if builder.get_member(&descriptor.name).is_some() {
    failures.raise(identifier, "member is declared more than once");
    return None;
  }
  if !descriptor.parameters.is_empty()
    && descriptor.feature != FeatureType::Action
  {
    failures.raise(identifier.clone(), "only actions may declare parameters");
  }

  let mut member = ObjectMember::new(identifier);
  for (index, parameter) in descriptor.parameters.iter().enumerate() {
    let mut param =
      ObjectActionParameter::new(member.identifier(), index, &parameter.name);
    let mut processing = ParameterProcessing {
      action: descriptor,
      descriptor: parameter,
      parameter: &mut param,
      failures,
      services,
    };
    for factory in &model.factories {
      factory.process_parameter(&mut processing);
    }
    for facet in &parameter.facets {
      param.add_facet(Arc::clone(facet));
    }
    member.add_parameter(param);
  }

  let mut processing = MemberProcessing {
    owner,
    descriptor,
    member: &mut member,
    failures,
    services,
  };
  for factory in &model.factories {
    factory.process_member(&mut processing);
  }
  for facet in &descriptor.facets {
    member.add_facet(Arc::clone(facet));
  }
  debug!(
    member = %member.identifier(),
    facets = member.facet_registry().len(),
    "member introspected"
  );
  Some(member)
}

/// A mixin whose holder type is not part of the metamodel can never
/// contribute anything.
fn check_mixin_holders(
  loader: &SpecificationLoader,
  builders: &[SpecificationBuilder],
  failures: &ValidationFailures,
) {
  let known: HashSet<&LogicalType> =
    builders.iter().map(SpecificationBuilder::logical_type).collect();
  for builder in builders {
    let Some(mixin) = builder.get_facet_as::<MixinFacet>(MixinFacet::TYPE)
    else {
      continue;
    };
    let holder = mixin.holder_type();
    if !known.contains(holder) && !loader.contains(holder) {
      failures.raise(
        Identifier::object(builder.logical_type().clone()),
        format!("mixin holder type {holder} is not a known type"),
      );
    }
  }
}
