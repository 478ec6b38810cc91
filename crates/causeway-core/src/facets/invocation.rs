use std::{fmt, sync::Arc};

use crate::{
  Result,
  facet::{Facet, FacetType},
  object::ManagedObject,
};

pub type InvokeFn = Arc<
  dyn Fn(&ManagedObject, &[ManagedObject]) -> Result<Option<ManagedObject>>
    + Send
    + Sync,
>;

/// The body of an action: given the target and arguments, produce the
/// (optional) result.
#[derive(Clone)]
pub struct ActionInvocationFacet {
  invoke: InvokeFn,
}

impl ActionInvocationFacet {
  pub const TYPE: FacetType = FacetType::new("action_invocation");

  pub fn new(
    invoke: impl Fn(&ManagedObject, &[ManagedObject]) -> Result<Option<ManagedObject>>
    + Send
    + Sync
    + 'static,
  ) -> Self {
    Self {
      invoke: Arc::new(invoke),
    }
  }

  pub fn invoke(
    &self,
    target: &ManagedObject,
    args: &[ManagedObject],
  ) -> Result<Option<ManagedObject>> {
    (self.invoke)(target, args)
  }
}

impl fmt::Debug for ActionInvocationFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ActionInvocationFacet").finish_non_exhaustive()
  }
}

impl Facet for ActionInvocationFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }
}

// ─── Property access ─────────────────────────────────────────────────────────

pub type AccessorFn =
  Arc<dyn Fn(&ManagedObject) -> Option<ManagedObject> + Send + Sync>;

/// Reads the current value of a property.
#[derive(Clone)]
pub struct PropertyAccessorFacet {
  get: AccessorFn,
}

impl PropertyAccessorFacet {
  pub const TYPE: FacetType = FacetType::new("property_accessor");

  pub fn new(
    get: impl Fn(&ManagedObject) -> Option<ManagedObject> + Send + Sync + 'static,
  ) -> Self {
    Self { get: Arc::new(get) }
  }

  pub fn get(&self, target: &ManagedObject) -> Option<ManagedObject> {
    (self.get)(target)
  }
}

impl fmt::Debug for PropertyAccessorFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PropertyAccessorFacet").finish_non_exhaustive()
  }
}

impl Facet for PropertyAccessorFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }
}
