use std::sync::Arc;

use crate::{
  Error, Result,
  events::{DomainEvent, DomainEventKind, EventBus, EventPhase},
  facet::{Facet, FacetType, Precedence},
  identifier::Identifier,
  interaction::{
    DisablingInteractionAdvisor, HidingInteractionAdvisor, InteractionHead,
    ParameterPosition, Proposal, UsabilityContext, ValidatingInteractionAdvisor,
    ValidityContext, VisibilityContext,
  },
  object::ManagedObject,
};

/// Publishes a member's interactions on the event bus so that subscribers
/// can hide, disable or invalidate it, veto its execution, or replace its
/// result.
#[derive(Debug, Clone)]
pub struct DomainEventFacet {
  kind: DomainEventKind,
  bus:  Arc<EventBus>,
}

impl DomainEventFacet {
  pub const TYPE: FacetType = FacetType::new("domain_event");

  pub fn new(kind: DomainEventKind, bus: Arc<EventBus>) -> Self {
    Self { kind, bus }
  }

  pub fn kind(&self) -> DomainEventKind { self.kind }

  /// `parameter` carries the argument list of an action-parameter check.
  fn post(
    &self,
    phase: EventPhase,
    head: &InteractionHead,
    parameter: Option<&ParameterPosition>,
  ) -> DomainEvent {
    let arguments = parameter
      .map(|parameter| parameter.args.clone())
      .unwrap_or_default();
    self.post_event(
      DomainEvent::new(
        self.kind,
        phase,
        head.identifier.clone(),
        head.target.clone(),
      )
      .with_arguments(arguments),
    )
  }

  fn post_event(&self, mut event: DomainEvent) -> DomainEvent {
    self.bus.post(&mut event);
    event
  }

  /// Announce that the member is about to run. A subscriber veto aborts the
  /// execution.
  pub fn post_executing(
    &self,
    target: &ManagedObject,
    identifier: &Identifier,
    args: &[ManagedObject],
  ) -> Result<()> {
    let event = self.post_event(
      DomainEvent::new(
        self.kind,
        EventPhase::Executing,
        identifier.clone(),
        target.clone(),
      )
      .with_arguments(args.to_vec()),
    );
    match event.into_veto() {
      Some(reason) => Err(Error::ExecutionVetoed {
        identifier: identifier.to_string(),
        reason,
      }),
      None => Ok(()),
    }
  }

  /// Announce that the member has run. Subscribers see `result` and may
  /// replace it.
  pub fn post_executed(
    &self,
    target: &ManagedObject,
    identifier: &Identifier,
    args: &[ManagedObject],
    result: Option<ManagedObject>,
  ) -> Option<ManagedObject> {
    let mut event = DomainEvent::new(
      self.kind,
      EventPhase::Executed,
      identifier.clone(),
      target.clone(),
    )
    .with_arguments(args.to_vec());
    event.set_return_value(result);
    self.post_event(event).into_return_value()
  }
}

impl Facet for DomainEventFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }

  fn precedence(&self) -> Precedence { Precedence::Event }

  fn as_hiding_advisor(&self) -> Option<&dyn HidingInteractionAdvisor> {
    Some(self)
  }

  fn as_disabling_advisor(&self) -> Option<&dyn DisablingInteractionAdvisor> {
    Some(self)
  }

  fn as_validating_advisor(
    &self,
  ) -> Option<&dyn ValidatingInteractionAdvisor> {
    Some(self)
  }
}

impl HidingInteractionAdvisor for DomainEventFacet {
  fn hides(&self, context: &VisibilityContext) -> Option<String> {
    self
      .post(EventPhase::Hide, &context.head, context.parameter.as_ref())
      .into_veto()
  }
}

impl DisablingInteractionAdvisor for DomainEventFacet {
  fn disables(&self, context: &UsabilityContext) -> Option<String> {
    self
      .post(EventPhase::Disable, &context.head, context.parameter.as_ref())
      .into_veto()
  }
}

impl ValidatingInteractionAdvisor for DomainEventFacet {
  fn invalidates(&self, context: &ValidityContext) -> Option<String> {
    let arguments = match &context.proposal {
      Proposal::ActionArgument(parameter) => parameter.args.clone(),
      Proposal::ActionInvocation { args } => args.clone(),
      _ => Vec::new(),
    };
    let event = DomainEvent::new(
      self.kind,
      EventPhase::Validate,
      context.head.identifier.clone(),
      context.head.target.clone(),
    )
    .with_arguments(arguments)
    .with_proposed(context.proposed_value().cloned());
    self.post_event(event).into_veto()
  }
}
