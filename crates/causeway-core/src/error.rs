//! Error types for `causeway-core`.
//!
//! Consent vetoes are not errors; they travel as
//! [`InteractionResult`](crate::interaction::InteractionResult)s. Metamodel
//! validation problems are not errors either; they accumulate in
//! [`ValidationFailures`](crate::spec::ValidationFailures). What remains here
//! are wiring bugs and codec failures that abort the current request.

use thiserror::Error;

use crate::object::Bookmark;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unrecoverable: {0}")]
  Unrecoverable(String),

  #[error(
    "facet of {expected} invoked against an object of {actual}; the \
     specifications do not match"
  )]
  WrongSpecification { expected: String, actual: String },

  #[error("no specification registered for logical type {0:?}")]
  UnknownLogicalType(String),

  #[error("cannot instantiate mixin {mixin}: {reason}")]
  MixinInstantiation { mixin: String, reason: String },

  #[error("service not registered: {0}")]
  ServiceNotFound(&'static str),

  #[error("pojo is not a {expected}")]
  PojoType { expected: &'static str },

  #[error("invalid bookmark {0:?}")]
  InvalidBookmark(String),

  #[error("no object found for bookmark {0}")]
  ObjectNotFound(Bookmark),

  #[error("execution of {identifier} vetoed: {reason}")]
  ExecutionVetoed { identifier: String, reason: String },

  #[error("read of {identifier} vetoed: {reason}")]
  AccessVetoed { identifier: String, reason: String },

  #[error("{identifier} has no invocation facet")]
  NotInvocable { identifier: String },

  #[error("cannot (de)serialize {type_name}: {source}")]
  Serialization {
    type_name: String,
    #[source]
    source:    serde_json::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
