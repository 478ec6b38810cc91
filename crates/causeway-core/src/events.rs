//! Domain events published around member interactions.
//!
//! Every action, property and collection interaction goes through the
//! phases of [`EventPhase`]. Subscribers on the [`EventBus`] may veto during
//! the first four phases, and may replace the return value of an action in
//! the `Executed` phase.

use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, trace};

use crate::{identifier::Identifier, object::ManagedObject};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventPhase {
  Hide,
  Disable,
  Validate,
  Executing,
  Executed,
}

impl EventPhase {
  /// Whether a subscriber veto has any effect in this phase.
  pub fn is_vetoable(self) -> bool { !matches!(self, Self::Executed) }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DomainEventKind {
  Action,
  Property,
  Collection,
}

// ─── DomainEvent ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DomainEvent {
  kind:         DomainEventKind,
  phase:        EventPhase,
  identifier:   Identifier,
  source:       ManagedObject,
  arguments:    Vec<ManagedObject>,
  proposed:     Option<ManagedObject>,
  veto:         Option<String>,
  return_value: Option<ManagedObject>,
}

impl DomainEvent {
  pub fn new(
    kind: DomainEventKind,
    phase: EventPhase,
    identifier: Identifier,
    source: ManagedObject,
  ) -> Self {
    Self {
      kind,
      phase,
      identifier,
      source,
      arguments: Vec::new(),
      proposed: None,
      veto: None,
      return_value: None,
    }
  }

  pub fn with_arguments(mut self, arguments: Vec<ManagedObject>) -> Self {
    self.arguments = arguments;
    self
  }

  pub fn with_proposed(mut self, proposed: Option<ManagedObject>) -> Self {
    self.proposed = proposed;
    self
  }

  pub fn kind(&self) -> DomainEventKind { self.kind }

  pub fn phase(&self) -> EventPhase { self.phase }

  pub fn identifier(&self) -> &Identifier { &self.identifier }

  pub fn source(&self) -> &ManagedObject { &self.source }

  pub fn arguments(&self) -> &[ManagedObject] { &self.arguments }

  pub fn proposed(&self) -> Option<&ManagedObject> { self.proposed.as_ref() }

  /// Veto the interaction. Only the first veto of a vetoable phase is kept.
  pub fn veto(&mut self, reason: impl Into<String>) {
    let reason = reason.into();
    if !self.phase.is_vetoable() {
      trace!(identifier = %self.identifier, phase = %self.phase, "veto ignored");
      return;
    }
    if self.veto.is_none() {
      self.veto = Some(reason);
    }
  }

  pub fn is_vetoed(&self) -> bool { self.veto.is_some() }

  pub fn veto_reason(&self) -> Option<&str> { self.veto.as_deref() }

  pub fn into_veto(self) -> Option<String> { self.veto }

  pub fn return_value(&self) -> Option<&ManagedObject> {
    self.return_value.as_ref()
  }

  /// Replace what the action returns. Has no effect before `Executed`.
  pub fn set_return_value(&mut self, value: Option<ManagedObject>) {
    if self.phase == EventPhase::Executed {
      self.return_value = value;
    }
  }

  pub fn into_return_value(self) -> Option<ManagedObject> { self.return_value }
}

// ─── Bus ─────────────────────────────────────────────────────────────────────

pub type Subscriber = Arc<dyn Fn(&mut DomainEvent) + Send + Sync>;

/// Synchronous, ordered publication of domain events.
#[derive(Default)]
pub struct EventBus {
  subscribers: RwLock<Vec<Subscriber>>,
}

impl EventBus {
  pub fn new() -> Self { Self::default() }

  pub fn subscribe(
    &self,
    subscriber: impl Fn(&mut DomainEvent) + Send + Sync + 'static,
  ) {
    self.subscribers.write().push(Arc::new(subscriber));
  }

  pub fn subscriber_count(&self) -> usize { self.subscribers.read().len() }

  /// Deliver `event` to every subscriber in subscription order.
  pub fn post(&self, event: &mut DomainEvent) {
    // subscribers may subscribe further handlers while being called
    let subscribers = self.subscribers.read().clone();
    for subscriber in &subscribers {
      subscriber(event);
    }
    debug!(
      identifier = %event.identifier,
      phase = %event.phase,
      subscribers = subscribers.len(),
      vetoed = event.is_vetoed(),
      "domain event posted"
    );
  }
}

impl fmt::Debug for EventBus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EventBus")
      .field("subscribers", &self.subscriber_count())
      .finish()
  }
}
