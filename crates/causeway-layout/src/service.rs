//! Sources of layout XML.

use std::{
  fs,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use causeway_core::spec::ObjectSpecification;
use tracing::debug;

use crate::{
  error::{Error, Result},
  grid::Grid,
  normalize,
  xml::XmlService,
};

/// Supplies grids for specifications. Only [`GridService::load`] must be
/// provided; defaults and normalisation come from [`normalize`].
pub trait GridService: Send + Sync {
  /// When true, grids are re-read on every request instead of cached.
  fn supports_reloading(&self) -> bool { false }

  /// The grid stored for `spec` under `layout_prefix`, if any. An empty
  /// prefix selects the unprefixed layout.
  fn load(
    &self,
    spec: &ObjectSpecification,
    layout_prefix: &str,
  ) -> Result<Option<Grid>>;

  fn default_grid_for(&self, spec: &ObjectSpecification) -> Grid {
    normalize::default_grid(spec)
  }

  fn normalize(&self, grid: Grid, spec: &ObjectSpecification) -> Grid {
    normalize::normalize(grid, spec)
  }
}

// ─── FileGridService ─────────────────────────────────────────────────────────

/// Reads `<SimpleName>[.<prefix>].layout.xml` from a directory. A prefixed
/// lookup falls back to the unprefixed file.
#[derive(Debug, Clone)]
pub struct FileGridService {
  dir:       PathBuf,
  reloading: bool,
}

impl FileGridService {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self {
      dir:       dir.into(),
      reloading: false,
    }
  }

  pub fn with_reloading(mut self, reloading: bool) -> Self {
    self.reloading = reloading;
    self
  }

  pub fn dir(&self) -> &Path { &self.dir }

  /// Candidate file names for `spec`, most specific first.
  pub fn file_names(
    spec: &ObjectSpecification,
    layout_prefix: &str,
  ) -> Vec<String> {
    let simple_name = spec.logical_type().simple_name();
    let mut names = Vec::with_capacity(2);
    if !layout_prefix.is_empty() {
      names.push(format!("{simple_name}.{layout_prefix}.layout.xml"));
    }
    names.push(format!("{simple_name}.layout.xml"));
    names
  }
}

impl GridService for FileGridService {
  fn supports_reloading(&self) -> bool { self.reloading }

  fn load(
    &self,
    spec: &ObjectSpecification,
    layout_prefix: &str,
  ) -> Result<Option<Grid>> {
    for name in Self::file_names(spec, layout_prefix) {
      let path = self.dir.join(&name);
      let xml = match fs::read_to_string(&path) {
        Ok(xml) => xml,
        Err(err) if err.kind() == ErrorKind::NotFound => continue,
        Err(source) => return Err(Error::Io { path, source }),
      };
      debug!(path = %path.display(), "layout loaded");
      return XmlService.from_xml(&xml).map(Some);
    }
    Ok(None)
  }
}
