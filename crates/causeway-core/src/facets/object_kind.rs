//! Facets describing how instances of a type are identified and recreated:
//! entities by id lookup, view models by a self-describing memento, values by
//! their serialized form.

use std::{
  any::{Any, type_name},
  fmt,
  sync::Arc,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
  Error, Result,
  facet::{Facet, FacetType},
  object::Pojo,
};

fn serialization_error<T>(source: serde_json::Error) -> Error {
  Error::Serialization {
    type_name: type_name::<T>().to_string(),
    source,
  }
}

fn downcast_pojo<T: Any>(pojo: &Pojo) -> Result<&T> {
  pojo.downcast_ref::<T>().ok_or(Error::PojoType {
    expected: type_name::<T>(),
  })
}

// ─── Entity ──────────────────────────────────────────────────────────────────

/// Persistence-side lookup of entities by id.
pub trait EntityResolver: Send + Sync {
  /// The id of a persistent instance; `None` if it is not (yet) persistent.
  fn identify(&self, pojo: &Pojo) -> Option<String>;

  fn fetch(&self, id: &str) -> Result<Option<Pojo>>;
}

#[derive(Clone)]
pub struct EntityFacet {
  resolver: Arc<dyn EntityResolver>,
}

impl EntityFacet {
  pub const TYPE: FacetType = FacetType::new("entity");

  pub fn new(resolver: Arc<dyn EntityResolver>) -> Self { Self { resolver } }

  pub fn identify(&self, pojo: &Pojo) -> Option<String> {
    self.resolver.identify(pojo)
  }

  pub fn fetch(&self, id: &str) -> Result<Option<Pojo>> {
    self.resolver.fetch(id)
  }
}

impl fmt::Debug for EntityFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EntityFacet").finish_non_exhaustive()
  }
}

impl Facet for EntityFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }
}

// ─── View model ──────────────────────────────────────────────────────────────

type MementoFn = Arc<dyn Fn(&Pojo) -> Result<String> + Send + Sync>;
type RecreateFn = Arc<dyn Fn(&str) -> Result<Pojo> + Send + Sync>;

/// A view model carries its whole state in a string memento.
#[derive(Clone)]
pub struct ViewModelFacet {
  memento:  MementoFn,
  recreate: RecreateFn,
}

impl ViewModelFacet {
  pub const TYPE: FacetType = FacetType::new("view_model");

  pub fn new(
    memento: impl Fn(&Pojo) -> Result<String> + Send + Sync + 'static,
    recreate: impl Fn(&str) -> Result<Pojo> + Send + Sync + 'static,
  ) -> Self {
    Self {
      memento:  Arc::new(memento),
      recreate: Arc::new(recreate),
    }
  }

  /// JSON memento of a serde-enabled view model.
  pub fn json<T>() -> Self
  where
    T: Serialize + DeserializeOwned + Any + Send + Sync,
  {
    Self::new(
      |pojo| {
        serde_json::to_string(downcast_pojo::<T>(pojo)?)
          .map_err(serialization_error::<T>)
      },
      |memento| {
        let value: T =
          serde_json::from_str(memento).map_err(serialization_error::<T>)?;
        Ok(Arc::new(value) as Pojo)
      },
    )
  }

  pub fn memento(&self, pojo: &Pojo) -> Result<String> { (self.memento)(pojo) }

  pub fn recreate(&self, memento: &str) -> Result<Pojo> {
    (self.recreate)(memento)
  }
}

impl fmt::Debug for ViewModelFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ViewModelFacet").finish_non_exhaustive()
  }
}

impl Facet for ViewModelFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }
}

// ─── Serializable ────────────────────────────────────────────────────────────

type EncodeFn = Arc<dyn Fn(&Pojo) -> Result<Vec<u8>> + Send + Sync>;
type DecodeFn = Arc<dyn Fn(&[u8]) -> Result<Pojo> + Send + Sync>;

/// Byte codec for value types that travel inside mementos.
#[derive(Clone)]
pub struct SerializableFacet {
  type_name: &'static str,
  encode:    EncodeFn,
  decode:    DecodeFn,
}

impl SerializableFacet {
  pub const TYPE: FacetType = FacetType::new("serializable");

  pub fn of<T>() -> Self
  where
    T: Serialize + DeserializeOwned + Any + Send + Sync,
  {
    Self {
      type_name: type_name::<T>(),
      encode:    Arc::new(|pojo: &Pojo| {
        serde_json::to_vec(downcast_pojo::<T>(pojo)?)
          .map_err(serialization_error::<T>)
      }),
      decode:    Arc::new(|bytes: &[u8]| {
        let value: T =
          serde_json::from_slice(bytes).map_err(serialization_error::<T>)?;
        Ok(Arc::new(value) as Pojo)
      }),
    }
  }

  pub fn type_name(&self) -> &'static str { self.type_name }

  pub fn encode(&self, pojo: &Pojo) -> Result<Vec<u8>> { (self.encode)(pojo) }

  pub fn decode(&self, bytes: &[u8]) -> Result<Pojo> { (self.decode)(bytes) }
}

impl fmt::Debug for SerializableFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SerializableFacet")
      .field("type_name", &self.type_name)
      .finish_non_exhaustive()
  }
}

impl Facet for SerializableFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  use super::*;

  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  struct Money {
    amount:   i64,
    currency: String,
  }

  #[test]
  fn serializable_codec_round_trips_the_value() {
    let facet = SerializableFacet::of::<Money>();
    let pojo: Pojo = Arc::new(Money {
      amount:   1250,
      currency: "EUR".into(),
    });
    let bytes = facet.encode(&pojo).unwrap();
    let back = facet.decode(&bytes).unwrap();
    assert_eq!(
      back.downcast_ref::<Money>(),
      pojo.downcast_ref::<Money>()
    );
  }

  #[test]
  fn serializable_codec_rejects_foreign_pojos() {
    let facet = SerializableFacet::of::<Money>();
    let pojo: Pojo = Arc::new(42_u32);
    assert!(matches!(facet.encode(&pojo), Err(Error::PojoType { .. })));
  }

  #[test]
  fn view_model_memento_is_json() {
    let facet = ViewModelFacet::json::<Money>();
    let pojo: Pojo = Arc::new(Money {
      amount:   5,
      currency: "GBP".into(),
    });
    let memento = facet.memento(&pojo).unwrap();
    assert!(memento.contains("GBP"));
    let back = facet.recreate(&memento).unwrap();
    assert_eq!(back.downcast_ref::<Money>().unwrap().amount, 5);
  }
}
