//! Serializable surrogates for managed objects.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as TOKEN};
use causeway_core::{identifier::LogicalType, object::Bookmark};
use serde::{Deserialize, Serialize};

use crate::{Error, RecreateStrategy, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMementoForScalar {
  pub logical_type: LogicalType,
  pub strategy:     RecreateStrategy,
}

/// A list of mementos sharing one element type. The collection itself is a
/// memento, so list identity and element identity both survive the trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMementoCollection {
  pub logical_type: LogicalType,
  pub elements:     Vec<ObjectMemento>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectMemento {
  /// "No object" of the given type.
  Empty { logical_type: LogicalType },
  Scalar(ObjectMementoForScalar),
  Collection(ObjectMementoCollection),
}

impl ObjectMemento {
  pub fn empty(logical_type: LogicalType) -> Self {
    Self::Empty { logical_type }
  }

  pub fn scalar(logical_type: LogicalType, strategy: RecreateStrategy) -> Self {
    Self::Scalar(ObjectMementoForScalar {
      logical_type,
      strategy,
    })
  }

  /// Wrap `elements` as one collection memento.
  pub fn pack(elements: Vec<ObjectMemento>, logical_type: LogicalType) -> Self {
    Self::Collection(ObjectMementoCollection {
      logical_type,
      elements,
    })
  }

  /// The elements of a collection memento; `None` for anything else.
  pub fn unpack(&self) -> Option<&[ObjectMemento]> {
    match self {
      Self::Collection(collection) => Some(&collection.elements),
      Self::Empty { .. } | Self::Scalar(_) => None,
    }
  }

  /// For a collection, the element type.
  pub fn logical_type(&self) -> &LogicalType {
    match self {
      Self::Empty { logical_type } => logical_type,
      Self::Scalar(scalar) => &scalar.logical_type,
      Self::Collection(collection) => &collection.logical_type,
    }
  }

  pub fn bookmark(&self) -> Option<&Bookmark> {
    match self {
      Self::Scalar(ObjectMementoForScalar {
        strategy: RecreateStrategy::Lookup(bookmark),
        ..
      }) => Some(bookmark),
      _ => None,
    }
  }

  /// Whether this memento (or any element of it) holds a live object.
  pub fn is_in_process_only(&self) -> bool {
    match self {
      Self::Empty { .. } => false,
      Self::Scalar(scalar) => scalar.strategy.is_in_process_only(),
      Self::Collection(collection) => {
        collection.elements.iter().any(Self::is_in_process_only)
      }
    }
  }

  /// A URL-safe string form for embedding in pages and links.
  pub fn to_token(&self) -> Result<String> {
    if self.is_in_process_only() {
      return Err(Error::InProcessOnly(self.logical_type().to_string()));
    }
    Ok(TOKEN.encode(serde_json::to_vec(self)?))
  }

  pub fn from_token(token: &str) -> Result<Self> {
    let bytes = TOKEN.decode(token)?;
    Ok(serde_json::from_slice(&bytes)?)
  }
}
