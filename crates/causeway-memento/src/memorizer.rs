//! Chain of handlers turning managed objects into mementos and back.
//!
//! Handlers are consulted in registration order; the first whose
//! [`Handler::is_handling`] accepts the specification serves the request.
//! [`MemorizeOther`] always ends the chain and fails every request.

use std::sync::Arc;

use causeway_core::{object::ManagedObject, spec::ObjectSpecification};
use tracing::debug;

use crate::{Error, ObjectMemento, ObjectMementoService, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
  Serialize,
  Deserialize,
}

// ─── Request / response ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum MemorizerRequest<'a> {
  Serialize(&'a ManagedObject),
  Deserialize {
    spec:    Arc<ObjectSpecification>,
    memento: &'a ObjectMemento,
  },
}

impl MemorizerRequest<'_> {
  pub fn direction(&self) -> Direction {
    match self {
      Self::Serialize(_) => Direction::Serialize,
      Self::Deserialize { .. } => Direction::Deserialize,
    }
  }

  pub fn specification(&self) -> &ObjectSpecification {
    match self {
      Self::Serialize(object) => object.specification(),
      Self::Deserialize { spec, .. } => spec,
    }
  }
}

#[derive(Debug, Clone)]
pub enum MemorizerResponse {
  Memento(ObjectMemento),
  Object(ManagedObject),
}

// ─── Handlers ────────────────────────────────────────────────────────────────

pub trait Handler: Send + Sync {
  fn name(&self) -> &'static str;

  fn is_handling(&self, spec: &ObjectSpecification) -> bool;

  fn serialize(&self, object: &ManagedObject) -> Result<ObjectMemento>;

  fn deserialize(
    &self,
    spec: &Arc<ObjectSpecification>,
    memento: &ObjectMemento,
  ) -> Result<ManagedObject>;
}

/// Delegates to the [`ObjectMementoService`] for entities, view models and
/// serializable values.
pub struct MementoServiceHandler {
  service: Arc<ObjectMementoService>,
}

impl MementoServiceHandler {
  pub fn new(service: Arc<ObjectMementoService>) -> Self { Self { service } }
}

impl Handler for MementoServiceHandler {
  fn name(&self) -> &'static str { "memento_service" }

  fn is_handling(&self, spec: &ObjectSpecification) -> bool {
    self.service.is_handling(spec)
  }

  fn serialize(&self, object: &ManagedObject) -> Result<ObjectMemento> {
    self.service.memento_for_object(object)
  }

  /// Refuses a memento whose type is neither `spec` nor one of its
  /// subtypes.
  fn deserialize(
    &self,
    spec: &Arc<ObjectSpecification>,
    memento: &ObjectMemento,
  ) -> Result<ManagedObject> {
    let actual = memento.logical_type();
    let assignable = actual == spec.logical_type()
      || self
        .service
        .loader()
        .try_specification_for(actual)
        .is_some_and(|found| found.is_subtype_of(spec.logical_type()));
    if !assignable {
      return Err(
        causeway_core::Error::WrongSpecification {
          expected: spec.logical_type().to_string(),
          actual:   actual.to_string(),
        }
        .into(),
      );
    }
    self.service.reconstruct_object(memento)
  }
}

/// The terminal handler: accepts everything and fails.
pub struct MemorizeOther;

impl MemorizeOther {
  fn fail(spec: &ObjectSpecification, direction: Direction) -> Error {
    Error::NoMemorizer {
      logical_type: spec.logical_type().to_string(),
      direction,
    }
  }
}

impl Handler for MemorizeOther {
  fn name(&self) -> &'static str { "other" }

  fn is_handling(&self, _spec: &ObjectSpecification) -> bool { true }

  fn serialize(&self, object: &ManagedObject) -> Result<ObjectMemento> {
    Err(Self::fail(object.specification(), Direction::Serialize))
  }

  fn deserialize(
    &self,
    spec: &Arc<ObjectSpecification>,
    _memento: &ObjectMemento,
  ) -> Result<ManagedObject> {
    Err(Self::fail(spec, Direction::Deserialize))
  }
}

// ─── Chain ───────────────────────────────────────────────────────────────────

pub struct ObjectMemorizer {
  handlers: Vec<Box<dyn Handler>>,
}

impl ObjectMemorizer {
  /// A chain of `handlers`, terminated by [`MemorizeOther`].
  pub fn new(handlers: Vec<Box<dyn Handler>>) -> Self { Self { handlers } }

  /// The standard chain: the memento service, then the catch-all.
  pub fn with_memento_service(service: Arc<ObjectMementoService>) -> Self {
    Self::new(vec![Box::new(MementoServiceHandler::new(service))])
  }

  /// Handler names in dispatch order, the catch-all included.
  pub fn handler_names(&self) -> Vec<&'static str> {
    self
      .handlers
      .iter()
      .map(|handler| handler.name())
      .chain([MemorizeOther.name()])
      .collect()
  }

  fn handler_for(&self, spec: &ObjectSpecification) -> &dyn Handler {
    self
      .handlers
      .iter()
      .map(|handler| &**handler)
      .find(|handler| handler.is_handling(spec))
      .unwrap_or(&MemorizeOther)
  }

  pub fn handle(
    &self,
    request: MemorizerRequest<'_>,
  ) -> Result<MemorizerResponse> {
    let handler = self.handler_for(request.specification());
    debug!(
      handler = handler.name(),
      direction = %request.direction(),
      logical_type = %request.specification().logical_type(),
      "memorizer dispatch"
    );
    match request {
      MemorizerRequest::Serialize(object) => {
        handler.serialize(object).map(MemorizerResponse::Memento)
      }
      MemorizerRequest::Deserialize { spec, memento } => handler
        .deserialize(&spec, memento)
        .map(MemorizerResponse::Object),
    }
  }

  pub fn serialize(&self, object: &ManagedObject) -> Result<ObjectMemento> {
    self.handler_for(object.specification()).serialize(object)
  }

  pub fn deserialize(
    &self,
    spec: &Arc<ObjectSpecification>,
    memento: &ObjectMemento,
  ) -> Result<ManagedObject> {
    self.handler_for(spec).deserialize(spec, memento)
  }
}
