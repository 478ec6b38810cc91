//! How a scalar memento brings its object back.

use std::{fmt, sync::Arc};

use causeway_core::{
  facet::FacetHolder,
  facets::{EntityFacet, SerializableFacet, ViewModelFacet},
  identifier::LogicalType,
  object::{Bookmark, ManagedObject, Pojo},
  spec::SpecificationLoader,
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecreateStrategy {
  /// Entities and view models, recreated from their bookmark.
  Lookup(Bookmark),
  /// Values, recreated from their serialized form.
  Serializable(RecreatableSerializable),
  /// Anything else; holds the live object and never leaves the process.
  #[serde(skip)]
  Pojo(PojoHandle),
}

impl RecreateStrategy {
  pub fn recreate(
    &self,
    logical_type: &LogicalType,
    loader: &SpecificationLoader,
  ) -> Result<ManagedObject> {
    match self {
      Self::Lookup(bookmark) => recreate_from_bookmark(bookmark, loader),
      Self::Serializable(serializable) => serializable.recreate_object(loader),
      Self::Pojo(handle) => {
        let spec = loader.specification_for(logical_type)?;
        Ok(ManagedObject::new(spec, Arc::clone(&handle.0)))
      }
    }
  }

  pub fn is_in_process_only(&self) -> bool { matches!(self, Self::Pojo(_)) }
}

fn recreate_from_bookmark(
  bookmark: &Bookmark,
  loader: &SpecificationLoader,
) -> Result<ManagedObject> {
  let spec = loader.specification_for(&bookmark.logical_type)?;

  if let Some(entity) = spec.get_facet_as::<EntityFacet>(EntityFacet::TYPE) {
    let pojo = entity.fetch(&bookmark.id)?.ok_or_else(|| {
      causeway_core::Error::ObjectNotFound(bookmark.clone())
    })?;
    return Ok(ManagedObject::new(spec, pojo));
  }
  if let Some(view_model) =
    spec.get_facet_as::<ViewModelFacet>(ViewModelFacet::TYPE)
  {
    let pojo = view_model.recreate(&bookmark.id)?;
    return Ok(ManagedObject::new(spec, pojo));
  }
  Err(Error::NotRecreatable(bookmark.logical_type.to_string()))
}

// ─── Serializable ────────────────────────────────────────────────────────────

/// A value's logical type together with its serialized bytes. Two of these
/// are equal iff both parts are, whether or not the payloads would
/// deserialize to equal objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecreatableSerializable {
  pub logical_type: LogicalType,
  #[serde(with = "payload")]
  pub payload:      Vec<u8>,
}

impl RecreatableSerializable {
  pub fn new(logical_type: LogicalType, payload: Vec<u8>) -> Self {
    Self {
      logical_type,
      payload,
    }
  }

  /// Look up the value's specification and decode the payload with its
  /// codec.
  pub fn recreate_object(
    &self,
    loader: &SpecificationLoader,
  ) -> Result<ManagedObject> {
    let spec = loader.specification_for(&self.logical_type)?;
    let codec = spec
      .get_facet_as::<SerializableFacet>(SerializableFacet::TYPE)
      .ok_or_else(|| Error::NotSerializable(self.logical_type.to_string()))?;
    let pojo = codec.decode(&self.payload)?;
    Ok(ManagedObject::new(spec, pojo))
  }
}

mod payload {
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(
    bytes: &[u8],
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&B64.encode(bytes))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Vec<u8>, D::Error> {
    let text = String::deserialize(deserializer)?;
    B64.decode(text).map_err(D::Error::custom)
  }
}

// ─── Pojo ────────────────────────────────────────────────────────────────────

/// A live object held by reference. Equal iff it is the very same instance.
#[derive(Clone)]
pub struct PojoHandle(pub Pojo);

impl PartialEq for PojoHandle {
  fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl Eq for PojoHandle {}

impl fmt::Debug for PojoHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("PojoHandle").finish_non_exhaustive()
  }
}
