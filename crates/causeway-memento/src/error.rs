//! Error type for `causeway-memento`.

use thiserror::Error;

use crate::memorizer::Direction;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] causeway_core::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("malformed memento token: {0}")]
  Token(#[from] base64::DecodeError),

  /// Raised by the catch-all handler at the end of the memorizer chain.
  #[error(
    "none of the registered object memorizers knows how to {direction} an \
     object of {logical_type}"
  )]
  NoMemorizer {
    logical_type: String,
    direction:    Direction,
  },

  #[error("{0} is neither an entity, a view model nor a serializable value")]
  NotRecreatable(String),

  #[error("{0} has no serializable codec")]
  NotSerializable(String),

  #[error(
    "memento of {0} references a live object and cannot leave the process"
  )]
  InProcessOnly(String),

  #[error("memento of {0} is a collection; reconstruct it element-wise")]
  UnexpectedCollection(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
