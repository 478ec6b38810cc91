//! Registry of domain services, looked up by Rust type.

use std::{
  any::{Any, TypeId, type_name},
  collections::HashMap,
  fmt,
  sync::Arc,
};

use crate::{Error, Result};

#[derive(Clone, Default)]
pub struct ServiceRegistry {
  services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ServiceRegistry {
  pub fn new() -> Self { Self::default() }

  /// Register `service`, replacing any earlier service of the same type.
  pub fn register<T: Any + Send + Sync>(&mut self, service: Arc<T>) {
    self.services.insert(TypeId::of::<T>(), service);
  }

  pub fn with<T: Any + Send + Sync>(mut self, service: Arc<T>) -> Self {
    self.register(service);
    self
  }

  pub fn lookup<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    let service = self.services.get(&TypeId::of::<T>())?;
    Arc::clone(service).downcast::<T>().ok()
  }

  pub fn require<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
    self
      .lookup::<T>()
      .ok_or(Error::ServiceNotFound(type_name::<T>()))
  }

  pub fn len(&self) -> usize { self.services.len() }

  pub fn is_empty(&self) -> bool { self.services.is_empty() }
}

impl fmt::Debug for ServiceRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServiceRegistry")
      .field("services", &self.services.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug)]
  struct Clock(u64);

  #[test]
  fn lookup_by_type() {
    let services = ServiceRegistry::new().with(Arc::new(Clock(3)));
    assert_eq!(services.lookup::<Clock>().map(|clock| clock.0), Some(3));
    assert!(services.lookup::<String>().is_none());
    assert!(matches!(
      services.require::<String>(),
      Err(Error::ServiceNotFound(_))
    ));
  }
}
