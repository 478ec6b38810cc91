//! Grid loading, caching and normalisation against real specifications.

use std::{
  fs,
  sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  },
};

use causeway_core::{
  facet::FacetHolder,
  identifier::{Identifier, LogicalType},
  introspect::{MemberDescriptor, ProgrammingModel, TypeDescriptor},
  object::ManagedObject,
  services::ServiceRegistry,
  spec::{ObjectMember, ObjectSpecification, SpecificationLoader},
};
use parking_lot::Mutex;

use crate::{
  Error, FileGridService, Grid, GridFacet, GridFacetFactory, GridService,
  LayoutPrefixFacet, XmlService, grid_for,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Customer {
  compact: bool,
}

/// Records every load and never finds a file.
#[derive(Default)]
struct CountingGridService {
  reloading: bool,
  loads:     AtomicUsize,
  prefixes:  Mutex<Vec<String>>,
}

impl GridService for CountingGridService {
  fn supports_reloading(&self) -> bool { self.reloading }

  fn load(
    &self,
    _spec: &ObjectSpecification,
    layout_prefix: &str,
  ) -> crate::Result<Option<Grid>> {
    self.loads.fetch_add(1, Ordering::SeqCst);
    self.prefixes.lock().push(layout_prefix.to_string());
    Ok(None)
  }
}

fn customer_lt() -> LogicalType { LogicalType::new("demo.Customer") }

fn customer_spec(service: Arc<dyn GridService>) -> Arc<ObjectSpecification> {
  let lt = customer_lt();
  Arc::new(
    ObjectSpecification::builder(lt.clone())
      .member(ObjectMember::new(Identifier::property(lt.clone(), "name")))
      .member(ObjectMember::new(Identifier::property(lt.clone(), "email")))
      .member(ObjectMember::new(Identifier::collection(lt.clone(), "orders")))
      .facet(GridFacet::new(lt, service))
      .facet(LayoutPrefixFacet::new(|pojo| {
        let customer = pojo.downcast_ref::<Customer>()?;
        customer.compact.then(|| "compact".to_string())
      }))
      .build(),
  )
}

fn grid_facet(spec: &ObjectSpecification) -> &GridFacet {
  spec.get_facet_as::<GridFacet>(GridFacet::TYPE).unwrap()
}

fn customer(spec: &Arc<ObjectSpecification>, compact: bool) -> ManagedObject {
  ManagedObject::of(Arc::clone(spec), Customer { compact })
}

const DETAILS_LAYOUT: &str = r#"
<grid>
  <row>
    <col span="12">
      <fieldSet name="Details">
        <property id="name"/>
        <property id="retired"/>
      </fieldSet>
    </col>
  </row>
</grid>
"#;

const COMPACT_LAYOUT: &str = r#"
<grid>
  <row>
    <col span="12">
      <fieldSet name="Compact">
        <property id="email"/>
      </fieldSet>
    </col>
  </row>
</grid>
"#;

// ─── Caching ─────────────────────────────────────────────────────────────────

#[test]
fn grid_is_cached_per_prefix() {
  let service = Arc::new(CountingGridService::default());
  let spec = customer_spec(service.clone());
  let facet = grid_facet(&spec);

  let first = facet.get_grid(&customer(&spec, false)).unwrap();
  let second = facet.get_grid(&customer(&spec, false)).unwrap();
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(service.loads.load(Ordering::SeqCst), 1);

  let compact = facet.get_grid(&customer(&spec, true)).unwrap();
  assert!(!Arc::ptr_eq(&first, &compact));
  assert_eq!(service.loads.load(Ordering::SeqCst), 2);
  assert_eq!(*service.prefixes.lock(), ["", "compact"]);
}

#[test]
fn reloading_service_bypasses_the_cache() {
  let service = Arc::new(CountingGridService {
    reloading: true,
    ..CountingGridService::default()
  });
  let spec = customer_spec(service.clone());
  let object = customer(&spec, false);

  let first = grid_for(&object).unwrap();
  let second = grid_for(&object).unwrap();
  assert!(!Arc::ptr_eq(&first, &second));
  assert_eq!(first, second);
  assert_eq!(service.loads.load(Ordering::SeqCst), 2);
}

#[test]
fn empty_object_uses_the_unprefixed_grid() {
  let service = Arc::new(CountingGridService::default());
  let spec = customer_spec(service.clone());
  grid_for(&ManagedObject::empty(Arc::clone(&spec))).unwrap();
  assert_eq!(*service.prefixes.lock(), [""]);
}

// ─── Guards ──────────────────────────────────────────────────────────────────

#[test]
fn wrong_specification_names_both_types() {
  let service: Arc<dyn GridService> = Arc::new(CountingGridService::default());
  let facet = GridFacet::new(LogicalType::new("demo.Order"), service.clone());
  let spec = customer_spec(service);

  let err = facet.get_grid(&customer(&spec, false)).unwrap_err();
  assert!(matches!(
    err,
    Error::Core(causeway_core::Error::WrongSpecification { .. })
  ));
  let message = err.to_string();
  assert!(message.contains("demo.Order"), "{message}");
  assert!(message.contains("demo.Customer"), "{message}");
}

#[test]
fn object_without_grid_facet() {
  let spec = Arc::new(ObjectSpecification::builder(customer_lt()).build());
  assert!(matches!(
    grid_for(&ManagedObject::empty(spec)),
    Err(Error::NoGridFacet(name)) if name == "demo.Customer"
  ));
}

// ─── File service ────────────────────────────────────────────────────────────

#[test]
fn file_service_prefers_the_prefixed_layout() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("Customer.layout.xml"), DETAILS_LAYOUT).unwrap();
  fs::write(dir.path().join("Customer.compact.layout.xml"), COMPACT_LAYOUT)
    .unwrap();

  let service = FileGridService::new(dir.path());
  let spec = customer_spec(Arc::new(service.clone()));

  let compact = service.load(&spec, "compact").unwrap().unwrap();
  assert_eq!(compact.field_sets()[0].name.as_deref(), Some("Compact"));

  let fallback = service.load(&spec, "wide").unwrap().unwrap();
  assert_eq!(fallback.field_sets()[0].name.as_deref(), Some("Details"));

  let order = ObjectSpecification::builder(LogicalType::new("demo.Order")).build();
  assert!(service.load(&order, "").unwrap().is_none());
}

#[test]
fn loaded_grid_is_normalised() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("Customer.layout.xml"), DETAILS_LAYOUT).unwrap();

  let spec = customer_spec(Arc::new(FileGridService::new(dir.path())));
  let grid = grid_for(&customer(&spec, false)).unwrap();

  assert_eq!(grid.property_ids(), ["name", "email"]);
  assert_eq!(grid.collection_ids(), ["orders"]);

  let xml = XmlService.to_xml(grid.as_ref()).unwrap();
  assert!(!xml.contains("retired"));
  assert_eq!(XmlService.from_xml::<Grid>(&xml).unwrap(), *grid);
}

#[test]
fn malformed_layout_is_reported() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("Customer.layout.xml"), "<grid><row>").unwrap();

  let spec = customer_spec(Arc::new(FileGridService::new(dir.path())));
  assert!(matches!(
    grid_for(&customer(&spec, false)),
    Err(Error::Xml { .. })
  ));
}

// ─── Introspection ───────────────────────────────────────────────────────────

#[test]
fn factory_installs_grid_facets() {
  let service: Arc<dyn GridService> = Arc::new(CountingGridService::default());
  let loader = SpecificationLoader::new();
  let specs = loader.introspect(
    &ProgrammingModel::default().with_factory(GridFacetFactory::new(service)),
    &[TypeDescriptor::new("demo.Customer")
      .member(MemberDescriptor::property("name"))],
    &ServiceRegistry::new(),
  );

  let grid = grid_for(&ManagedObject::empty(Arc::clone(&specs[0]))).unwrap();
  assert_eq!(grid.property_ids(), ["name"]);
}
