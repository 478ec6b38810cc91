//! Managed objects: domain pojos paired with their specification.

use std::{any::Any, fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
  Error, Result,
  facet::FacetHolder,
  facets::{EntityFacet, SerializableFacet, ViewModelFacet},
  identifier::LogicalType,
  spec::ObjectSpecification,
};

/// A type-erased domain object.
pub type Pojo = Arc<dyn Any + Send + Sync>;

// ─── Bookmark ────────────────────────────────────────────────────────────────

/// Stable identity of an entity or view model: `<logical type>:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bookmark {
  pub logical_type: LogicalType,
  pub id:           String,
}

impl Bookmark {
  pub fn new(logical_type: LogicalType, id: impl Into<String>) -> Self {
    Self {
      logical_type,
      id: id.into(),
    }
  }
}

impl fmt::Display for Bookmark {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.logical_type, self.id)
  }
}

impl FromStr for Bookmark {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.split_once(':') {
      Some((logical_type, id)) if !logical_type.is_empty() && !id.is_empty() => {
        Ok(Self::new(LogicalType::new(logical_type), id))
      }
      _ => Err(Error::InvalidBookmark(s.to_string())),
    }
  }
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// What makes two managed objects "the same" for equality purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdentity {
  Empty,
  Bookmark(Bookmark),
  /// Serialized bytes of a value type.
  Encoded(Vec<u8>),
  /// Address of the pojo; only meaningful within one process.
  Instance(usize),
}

// ─── ManagedObject ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ManagedObject {
  spec: Arc<ObjectSpecification>,
  pojo: Option<Pojo>,
}

impl ManagedObject {
  pub fn new(spec: Arc<ObjectSpecification>, pojo: Pojo) -> Self {
    Self {
      spec,
      pojo: Some(pojo),
    }
  }

  pub fn of<T: Any + Send + Sync>(
    spec: Arc<ObjectSpecification>,
    value: T,
  ) -> Self {
    Self::new(spec, Arc::new(value))
  }

  /// A placeholder for "no object" of the given type.
  pub fn empty(spec: Arc<ObjectSpecification>) -> Self { Self { spec, pojo: None } }

  pub fn specification(&self) -> &Arc<ObjectSpecification> { &self.spec }

  pub fn logical_type(&self) -> &LogicalType { self.spec.logical_type() }

  pub fn is_empty(&self) -> bool { self.pojo.is_none() }

  pub fn pojo(&self) -> Option<&Pojo> { self.pojo.as_ref() }

  pub fn pojo_as<T: Any>(&self) -> Option<&T> {
    self.pojo.as_deref()?.downcast_ref::<T>()
  }

  pub fn require_pojo_as<T: Any>(&self) -> Result<&T> {
    self.pojo_as::<T>().ok_or(Error::PojoType {
      expected: std::any::type_name::<T>(),
    })
  }

  /// The bookmark of an entity or view model; `None` for anything else.
  pub fn bookmark(&self) -> Result<Option<Bookmark>> {
    let Some(pojo) = &self.pojo else { return Ok(None) };
    let logical_type = self.logical_type().clone();

    if let Some(entity) = self.spec.get_facet_as::<EntityFacet>(EntityFacet::TYPE)
    {
      return Ok(entity.identify(pojo).map(|id| Bookmark::new(logical_type, id)));
    }
    if let Some(view_model) =
      self.spec.get_facet_as::<ViewModelFacet>(ViewModelFacet::TYPE)
    {
      let memento = view_model.memento(pojo)?;
      return Ok(Some(Bookmark::new(logical_type, memento)));
    }
    Ok(None)
  }

  pub fn identity(&self) -> ObjectIdentity {
    let Some(pojo) = &self.pojo else {
      return ObjectIdentity::Empty;
    };
    match self.bookmark() {
      Ok(Some(bookmark)) => return ObjectIdentity::Bookmark(bookmark),
      Ok(None) => {}
      Err(err) => warn!(
        logical_type = %self.logical_type(),
        %err,
        "no bookmark; comparing by instance"
      ),
    }
    if let Some(codec) =
      self.spec.get_facet_as::<SerializableFacet>(SerializableFacet::TYPE)
    {
      match codec.encode(pojo) {
        Ok(bytes) => return ObjectIdentity::Encoded(bytes),
        Err(err) => warn!(
          logical_type = %self.logical_type(),
          %err,
          "cannot encode value; comparing by instance"
        ),
      }
    }
    ObjectIdentity::Instance(Arc::as_ptr(pojo) as *const () as usize)
  }
}

impl PartialEq for ManagedObject {
  fn eq(&self, other: &Self) -> bool {
    self.logical_type() == other.logical_type()
      && self.identity() == other.identity()
  }
}

impl fmt::Debug for ManagedObject {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ManagedObject")
      .field("logical_type", self.logical_type())
      .field("empty", &self.is_empty())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bookmark_parses_its_display_form() {
    let bookmark = Bookmark::new(LogicalType::new("demo.Customer"), "42");
    let parsed: Bookmark = bookmark.to_string().parse().unwrap();
    assert_eq!(parsed, bookmark);
  }

  #[test]
  fn bookmark_rejects_missing_id() {
    assert!("demo.Customer".parse::<Bookmark>().is_err());
    assert!("demo.Customer:".parse::<Bookmark>().is_err());
    assert!(":42".parse::<Bookmark>().is_err());
  }

  #[test]
  fn pojo_downcasts_to_its_concrete_type() {
    let spec = Arc::new(
      ObjectSpecification::builder(LogicalType::new("demo.Name")).build(),
    );
    let object = ManagedObject::of(spec.clone(), String::from("Ada"));
    assert_eq!(object.pojo_as::<String>().map(String::as_str), Some("Ada"));
    assert!(object.pojo_as::<u32>().is_none());
    assert!(object.require_pojo_as::<u32>().is_err());
    assert!(ManagedObject::empty(spec).pojo_as::<String>().is_none());
  }

  #[test]
  fn plain_objects_compare_by_instance() {
    let spec = Arc::new(
      ObjectSpecification::builder(LogicalType::new("demo.Thing")).build(),
    );
    let a = ManagedObject::of(spec.clone(), 1_u8);
    let b = ManagedObject::of(spec, 1_u8);
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
  }

  #[test]
  fn failing_view_model_memento_falls_back_to_instance() {
    let spec = Arc::new(
      ObjectSpecification::builder(LogicalType::new("demo.Board"))
        .facet(ViewModelFacet::new(
          |_| Err(Error::Unrecoverable("board is detached".into())),
          |_| Err(Error::Unrecoverable("board is detached".into())),
        ))
        .build(),
    );
    let board = ManagedObject::of(spec, 7_u8);
    assert!(board.bookmark().is_err());
    assert!(matches!(board.identity(), ObjectIdentity::Instance(_)));
    assert_eq!(board, board.clone());
  }
}
