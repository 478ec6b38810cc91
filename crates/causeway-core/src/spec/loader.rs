use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use super::{ObjectSpecification, ValidationFailures};
use crate::{
  Error, Result,
  identifier::{Identifier, LogicalType},
};

/// All specifications of the metamodel, keyed by logical type, together with
/// the validation failures found while building them.
#[derive(Debug, Default)]
pub struct SpecificationLoader {
  specs:    RwLock<IndexMap<LogicalType, Arc<ObjectSpecification>>>,
  failures: ValidationFailures,
}

impl SpecificationLoader {
  pub fn new() -> Self { Self::default() }

  /// Register `spec`. A second specification for the same logical type is
  /// a validation failure; the first one stays in place.
  pub fn register(&self, spec: ObjectSpecification) -> Arc<ObjectSpecification> {
    let logical_type = spec.logical_type().clone();
    let mut specs = self.specs.write();
    if let Some(existing) = specs.get(&logical_type) {
      self.failures.raise(
        Identifier::object(logical_type),
        "logical type is declared more than once",
      );
      return Arc::clone(existing);
    }
    debug!(%logical_type, bean_sort = %spec.bean_sort(), "specification registered");
    let spec = Arc::new(spec);
    specs.insert(logical_type, Arc::clone(&spec));
    spec
  }

  pub fn try_specification_for(
    &self,
    logical_type: &LogicalType,
  ) -> Option<Arc<ObjectSpecification>> {
    self.specs.read().get(logical_type).cloned()
  }

  pub fn specification_for(
    &self,
    logical_type: &LogicalType,
  ) -> Result<Arc<ObjectSpecification>> {
    self
      .try_specification_for(logical_type)
      .ok_or_else(|| Error::UnknownLogicalType(logical_type.to_string()))
  }

  pub fn contains(&self, logical_type: &LogicalType) -> bool {
    self.specs.read().contains_key(logical_type)
  }

  /// Every registered specification, in registration order.
  pub fn specifications(&self) -> Vec<Arc<ObjectSpecification>> {
    self.specs.read().values().cloned().collect()
  }

  /// The mixins contributing to `spec`, in registration order.
  pub fn mixins_for(
    &self,
    spec: &ObjectSpecification,
  ) -> Vec<Arc<ObjectSpecification>> {
    self
      .specs
      .read()
      .values()
      .filter(|candidate| {
        candidate
          .mixin_facet()
          .is_some_and(|mixin| mixin.is_mixin_for(spec))
      })
      .cloned()
      .collect()
  }

  pub fn validation_failures(&self) -> &ValidationFailures { &self.failures }

  pub fn is_valid(&self) -> bool { self.failures.is_empty() }

  /// A human-readable summary of every validation failure, one per line.
  pub fn validation_report(&self) -> String {
    let messages = self.failures.messages();
    if messages.is_empty() {
      let count = self.specs.read().len();
      return format!("metamodel is valid ({count} specifications)");
    }

    let mut report = format!("{} validation failure(s):", messages.len());
    for message in messages {
      report.push_str("\n  - ");
      report.push_str(&message);
    }
    report
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn report_summarises_without_side_effects() {
    let loader = SpecificationLoader::new();
    loader.register(
      ObjectSpecification::builder(LogicalType::new("demo.Order")).build(),
    );
    assert_eq!(
      loader.validation_report(),
      "metamodel is valid (1 specifications)"
    );

    loader.register(
      ObjectSpecification::builder(LogicalType::new("demo.Order")).build(),
    );
    let report = loader.validation_report();
    assert_eq!(report, loader.validation_report());
    assert!(report.starts_with("1 validation failure(s):"), "{report}");
    assert!(report.contains("declared more than once"), "{report}");
    assert_eq!(loader.specifications().len(), 1);
  }
}
