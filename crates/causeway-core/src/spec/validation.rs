use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::warn;

use crate::identifier::Identifier;

/// One problem found while building the metamodel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
  pub origin:  Identifier,
  pub message: String,
}

impl fmt::Display for ValidationFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.origin, self.message)
  }
}

/// Accumulates validation failures during introspection so that all of them
/// can be reported together once the metamodel is built.
#[derive(Debug, Default)]
pub struct ValidationFailures {
  failures: Mutex<Vec<ValidationFailure>>,
}

impl ValidationFailures {
  pub fn new() -> Self { Self::default() }

  pub fn raise(&self, origin: Identifier, message: impl Into<String>) {
    let failure = ValidationFailure {
      origin,
      message: message.into(),
    };
    warn!(origin = %failure.origin, message = %failure.message, "validation failure");
    self.failures.lock().push(failure);
  }

  pub fn len(&self) -> usize { self.failures.lock().len() }

  pub fn is_empty(&self) -> bool { self.failures.lock().is_empty() }

  /// The failures raised so far, in the order they were raised.
  pub fn snapshot(&self) -> Vec<ValidationFailure> {
    self.failures.lock().clone()
  }

  pub fn messages(&self) -> Vec<String> {
    self
      .failures
      .lock()
      .iter()
      .map(ToString::to_string)
      .collect()
  }
}
