//! Support code for the `causeway` binary: configuration, model files and
//! the metamodel they describe.

use std::{
  fmt::Write as _,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context as _, Result};
use causeway_core::{
  events::EventBus,
  facet::FacetHolder,
  identifier::LogicalType,
  introspect::{ProgrammingModel, TypeDescriptor},
  services::ServiceRegistry,
  spec::SpecificationLoader,
};
use causeway_layout::{
  FileGridService, Grid, GridFacet, GridFacetFactory, Schemas, XmlService,
};
use serde::Deserialize;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Settings read from `causeway.toml` and `CAUSEWAY_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
  /// Directory holding `<SimpleName>[.<prefix>].layout.xml` files.
  #[serde(default = "default_layout_dir")]
  pub layout_dir:     PathBuf,
  #[serde(default)]
  pub reload_layouts: bool,
  #[serde(default)]
  pub schemas:        Schemas,
}

fn default_layout_dir() -> PathBuf { PathBuf::from("layouts") }

impl Default for CliConfig {
  fn default() -> Self {
    Self {
      layout_dir:     default_layout_dir(),
      reload_layouts: false,
      schemas:        Schemas::default(),
    }
  }
}

impl CliConfig {
  /// Read `path` if it exists, then apply the environment on top.
  pub fn load(path: &Path) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CAUSEWAY"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise CliConfig")
  }
}

// ─── Model ───────────────────────────────────────────────────────────────────

/// Parse a JSON array of type descriptors.
pub fn load_model(path: &Path) -> Result<Vec<TypeDescriptor>> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading model file {}", path.display()))?;
  serde_json::from_str(&raw)
    .with_context(|| format!("parsing model file {}", path.display()))
}

/// Introspect `descriptors` with the default programming model plus grid
/// facets backed by the configured layout directory.
pub fn build_metamodel(
  descriptors: &[TypeDescriptor],
  config: &CliConfig,
) -> SpecificationLoader {
  let grids = FileGridService::new(&config.layout_dir)
    .with_reloading(config.reload_layouts);
  let model = ProgrammingModel::default()
    .with_factory(GridFacetFactory::new(Arc::new(grids)));
  let services = ServiceRegistry::new().with(Arc::new(EventBus::new()));

  let loader = SpecificationLoader::new();
  loader.introspect(&model, descriptors, &services);
  loader
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// The normalised grid of `logical_type`, as XML.
pub fn render_layout(
  loader: &SpecificationLoader,
  logical_type: &str,
  layout_prefix: Option<&str>,
) -> Result<String> {
  let spec = loader.specification_for(&LogicalType::new(logical_type))?;
  let facet = spec
    .get_facet_as::<GridFacet>(GridFacet::TYPE)
    .with_context(|| format!("{logical_type} has no grid facet"))?;
  let grid = facet.grid(&spec, layout_prefix.unwrap_or_default())?;
  Ok(XmlService.to_xml(grid.as_ref())?)
}

/// Every schema of the grid format, each preceded by its namespace.
pub fn render_xsd(schemas: Schemas) -> String {
  let mut out = String::new();
  for (namespace, xsd) in XmlService.to_xsd::<Grid>(schemas) {
    let _ = writeln!(out, "<!-- {namespace} -->\n{xsd}");
  }
  out
}
