//! The built-in facet factories.

use tracing::debug;

use super::{
  Annotation, FacetFactory, MemberProcessing, ParameterProcessing,
  TypeProcessing,
};
use crate::{
  events::{DomainEventKind, EventBus},
  facet::{FacetHolder, Precedence},
  facets::{
    ContributingFacet, DisabledFacet, DomainEventFacet, HiddenFacet,
    MandatoryFacet, MaxLengthFacet, MixinFacet, Semantics,
  },
  identifier::FeatureType,
  interaction::Where,
  spec::BeanSort,
};

/// An unscoped `hidden`/`disabled` applies everywhere.
fn scope(where_: Where) -> Where {
  match where_ {
    Where::NotSpecified => Where::Everywhere,
    other => other,
  }
}

// ─── Mixin ───────────────────────────────────────────────────────────────────

/// Recognises mixin types and, once their members are known, resolves what
/// they contribute.
pub struct MixinFacetFactory;

impl FacetFactory for MixinFacetFactory {
  fn name(&self) -> &'static str { "mixin" }

  fn process_type(&self, processing: &mut TypeProcessing<'_>) {
    if processing.descriptor.nature != BeanSort::Mixin {
      return;
    }
    if let Some(facet) =
      MixinFacet::create(processing.descriptor, processing.failures)
    {
      processing.add_facet(facet);
    }
  }

  fn post_process(&self, processing: &mut TypeProcessing<'_>) {
    let spec = &*processing.spec;
    let Some(mixin) = spec.get_facet_as::<MixinFacet>(MixinFacet::TYPE) else {
      return;
    };

    let main = processing
      .descriptor
      .members
      .iter()
      .find(|member| mixin.is_candidate_for_main(member))
      .and_then(|member| spec.get_member(&member.name));

    match main {
      Some(main) => mixin.init_mixin_sort_from(main),
      None => processing.failures.raise(
        spec.identifier().clone(),
        format!("mixin has no main method '{}'", mixin.main_method()),
      ),
    }
  }
}

// ─── Hidden / Disabled ───────────────────────────────────────────────────────

pub struct HiddenFacetFactory;

impl HiddenFacetFactory {
  fn facet(annotations: &[Annotation]) -> Option<HiddenFacet> {
    annotations.iter().find_map(|annotation| match annotation {
      Annotation::Hidden(where_) => Some(HiddenFacet::new(scope(*where_))),
      _ => None,
    })
  }
}

impl FacetFactory for HiddenFacetFactory {
  fn name(&self) -> &'static str { "hidden" }

  fn process_type(&self, processing: &mut TypeProcessing<'_>) {
    if let Some(facet) = Self::facet(&processing.descriptor.annotations) {
      processing.add_facet(facet);
    }
  }

  fn process_member(&self, processing: &mut MemberProcessing<'_>) {
    if let Some(facet) = Self::facet(&processing.descriptor.annotations) {
      processing.add_facet(facet);
    }
  }

  fn process_parameter(&self, processing: &mut ParameterProcessing<'_>) {
    if let Some(facet) = Self::facet(&processing.descriptor.annotations) {
      processing.add_facet(facet);
    }
  }
}

pub struct DisabledFacetFactory;

impl DisabledFacetFactory {
  fn facet(annotations: &[Annotation]) -> Option<DisabledFacet> {
    annotations.iter().find_map(|annotation| match annotation {
      Annotation::Disabled { where_, reason } => {
        Some(DisabledFacet::new(scope(*where_), reason.clone()))
      }
      _ => None,
    })
  }
}

impl FacetFactory for DisabledFacetFactory {
  fn name(&self) -> &'static str { "disabled" }

  fn process_member(&self, processing: &mut MemberProcessing<'_>) {
    if let Some(facet) = Self::facet(&processing.descriptor.annotations) {
      processing.add_facet(facet);
    }
  }

  fn process_parameter(&self, processing: &mut ParameterProcessing<'_>) {
    if let Some(facet) = Self::facet(&processing.descriptor.annotations) {
      processing.add_facet(facet);
    }
  }
}

// ─── Mandatory ───────────────────────────────────────────────────────────────

/// Properties and parameters are required unless annotated `optional`.
pub struct MandatoryFacetFactory;

impl MandatoryFacetFactory {
  fn explicit(annotations: &[Annotation]) -> Option<MandatoryFacet> {
    annotations.iter().find_map(|annotation| match annotation {
      Annotation::Mandatory => Some(MandatoryFacet::new(Semantics::Required)),
      Annotation::Optional => Some(MandatoryFacet::new(Semantics::Optional)),
      _ => None,
    })
  }
}

impl FacetFactory for MandatoryFacetFactory {
  fn name(&self) -> &'static str { "mandatory" }

  fn process_member(&self, processing: &mut MemberProcessing<'_>) {
    if processing.descriptor.feature != FeatureType::Property {
      return;
    }
    processing.add_facet(MandatoryFacet::inferred());
    if let Some(facet) = Self::explicit(&processing.descriptor.annotations) {
      processing.add_facet(facet);
    }
  }

  fn process_parameter(&self, processing: &mut ParameterProcessing<'_>) {
    processing.add_facet(MandatoryFacet::inferred());
    if let Some(facet) = Self::explicit(&processing.descriptor.annotations) {
      processing.add_facet(facet);
    }
  }
}

// ─── Max length ──────────────────────────────────────────────────────────────

pub struct MaxLengthFacetFactory;

impl MaxLengthFacetFactory {
  fn facet(annotations: &[Annotation]) -> Option<MaxLengthFacet> {
    annotations.iter().find_map(|annotation| match annotation {
      Annotation::MaxLength(max) => Some(MaxLengthFacet::new(*max)),
      _ => None,
    })
  }
}

impl FacetFactory for MaxLengthFacetFactory {
  fn name(&self) -> &'static str { "max_length" }

  fn process_member(&self, processing: &mut MemberProcessing<'_>) {
    if let Some(facet) = Self::facet(&processing.descriptor.annotations) {
      processing.add_facet(facet);
    }
  }

  fn process_parameter(&self, processing: &mut ParameterProcessing<'_>) {
    if let Some(facet) = Self::facet(&processing.descriptor.annotations) {
      processing.add_facet(facet);
    }
  }
}

// ─── Contributing ────────────────────────────────────────────────────────────

pub struct ContributingFacetFactory;

impl FacetFactory for ContributingFacetFactory {
  fn name(&self) -> &'static str { "contributing" }

  fn process_member(&self, processing: &mut MemberProcessing<'_>) {
    let explicit =
      processing
        .descriptor
        .annotations
        .iter()
        .find_map(|annotation| match annotation {
          Annotation::Contributed(contributing) => Some(*contributing),
          _ => None,
        });
    if let Some(contributing) = explicit {
      processing.add_facet(ContributingFacet::new(
        contributing,
        Precedence::Default,
      ));
    }
  }
}

// ─── Domain events ───────────────────────────────────────────────────────────

/// Members annotated `domain_event` publish their interactions on the
/// registered [`EventBus`].
pub struct DomainEventFacetFactory;

impl FacetFactory for DomainEventFacetFactory {
  fn name(&self) -> &'static str { "domain_event" }

  fn process_member(&self, processing: &mut MemberProcessing<'_>) {
    if !processing
      .descriptor
      .annotations
      .contains(&Annotation::DomainEvent)
    {
      return;
    }
    let kind = match processing.descriptor.feature {
      FeatureType::Property => DomainEventKind::Property,
      FeatureType::Collection => DomainEventKind::Collection,
      _ => DomainEventKind::Action,
    };
    match processing.services.lookup::<EventBus>() {
      Some(bus) => {
        debug!(member = %processing.member.identifier(), %kind, "domain events enabled");
        processing.add_facet(DomainEventFacet::new(kind, bus));
      }
      None => processing.failures.raise(
        processing.member.identifier().clone(),
        "domain events requested but no event bus is registered",
      ),
    }
  }
}
