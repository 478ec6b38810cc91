//! Facets exposing layouts on object specifications.

use std::{collections::HashMap, fmt, sync::Arc};

use causeway_core::{
  facet::{Facet, FacetHolder, FacetType},
  identifier::LogicalType,
  introspect::{FacetFactory, TypeProcessing},
  object::{ManagedObject, Pojo},
  spec::ObjectSpecification,
};
use parking_lot::RwLock;
use tracing::debug;

use crate::{
  error::{Error, Result},
  grid::Grid,
  service::GridService,
};

// ─── LayoutPrefixFacet ───────────────────────────────────────────────────────

type PrefixFn = Arc<dyn Fn(&Pojo) -> Option<String> + Send + Sync>;

/// Lets an object pick one of several alternative layouts of its type.
#[derive(Clone)]
pub struct LayoutPrefixFacet {
  prefix: PrefixFn,
}

impl LayoutPrefixFacet {
  pub const TYPE: FacetType = FacetType::new("layout_prefix");

  pub fn new(
    prefix: impl Fn(&Pojo) -> Option<String> + Send + Sync + 'static,
  ) -> Self {
    Self {
      prefix: Arc::new(prefix),
    }
  }

  /// `None` for an empty object.
  pub fn layout_prefix(&self, object: &ManagedObject) -> Option<String> {
    object.pojo().and_then(|pojo| (self.prefix)(pojo))
  }
}

impl fmt::Debug for LayoutPrefixFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LayoutPrefixFacet").finish_non_exhaustive()
  }
}

impl Facet for LayoutPrefixFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }
}

// ─── GridFacet ───────────────────────────────────────────────────────────────

/// The normalised grid of one type, cached per layout prefix.
pub struct GridFacet {
  owner:   LogicalType,
  service: Arc<dyn GridService>,
  cache:   RwLock<HashMap<String, Arc<Grid>>>,
}

impl GridFacet {
  pub const TYPE: FacetType = FacetType::new("grid");

  pub fn new(owner: LogicalType, service: Arc<dyn GridService>) -> Self {
    Self {
      owner,
      service,
      cache: RwLock::new(HashMap::new()),
    }
  }

  pub fn owner(&self) -> &LogicalType { &self.owner }

  /// The grid for `object`, under the prefix its [`LayoutPrefixFacet`]
  /// chooses, or the unprefixed grid.
  pub fn get_grid(&self, object: &ManagedObject) -> Result<Arc<Grid>> {
    self.guard(object.specification())?;
    let prefix = object
      .specification()
      .get_facet_as::<LayoutPrefixFacet>(LayoutPrefixFacet::TYPE)
      .and_then(|facet| facet.layout_prefix(object))
      .unwrap_or_default();
    self.grid(object.specification(), &prefix)
  }

  /// The grid for `spec` under an explicit prefix.
  pub fn grid(
    &self,
    spec: &ObjectSpecification,
    layout_prefix: &str,
  ) -> Result<Arc<Grid>> {
    self.guard(spec)?;

    if self.service.supports_reloading() {
      return self.load(spec, layout_prefix).map(Arc::new);
    }
    if let Some(grid) = self.cache.read().get(layout_prefix) {
      debug!(logical_type = %self.owner, layout_prefix, "grid cache hit");
      return Ok(Arc::clone(grid));
    }

    let grid = Arc::new(self.load(spec, layout_prefix)?);
    let mut cache = self.cache.write();
    let cached = cache.entry(layout_prefix.to_string()).or_insert(grid);
    Ok(Arc::clone(cached))
  }

  fn load(&self, spec: &ObjectSpecification, layout_prefix: &str) -> Result<Grid> {
    let grid = match self.service.load(spec, layout_prefix)? {
      Some(grid) => grid,
      None => self.service.default_grid_for(spec),
    };
    Ok(self.service.normalize(grid, spec))
  }

  fn guard(&self, spec: &ObjectSpecification) -> Result<()> {
    if spec.logical_type() != &self.owner {
      return Err(
        causeway_core::Error::WrongSpecification {
          expected: self.owner.to_string(),
          actual:   spec.logical_type().to_string(),
        }
        .into(),
      );
    }
    Ok(())
  }
}

impl fmt::Debug for GridFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GridFacet")
      .field("owner", &self.owner)
      .field("cached", &self.cache.read().len())
      .finish()
  }
}

impl Facet for GridFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }
}

/// The grid of `object`, through the [`GridFacet`] of its specification.
pub fn grid_for(object: &ManagedObject) -> Result<Arc<Grid>> {
  object
    .specification()
    .get_facet_as::<GridFacet>(GridFacet::TYPE)
    .ok_or_else(|| Error::NoGridFacet(object.logical_type().to_string()))?
    .get_grid(object)
}

// ─── Factory ─────────────────────────────────────────────────────────────────

/// Installs a [`GridFacet`] backed by one shared service on every type.
pub struct GridFacetFactory {
  service: Arc<dyn GridService>,
}

impl GridFacetFactory {
  pub fn new(service: Arc<dyn GridService>) -> Self { Self { service } }
}

impl FacetFactory for GridFacetFactory {
  fn name(&self) -> &'static str { "grid" }

  fn process_type(&self, processing: &mut TypeProcessing<'_>) {
    let owner = processing.descriptor.logical_type.clone();
    processing.add_facet(GridFacet::new(owner, Arc::clone(&self.service)));
  }
}
