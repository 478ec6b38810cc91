use std::sync::Arc;

use causeway_core::{
  facet::FacetHolder,
  facets::{EntityFacet, SerializableFacet, ViewModelFacet},
  identifier::LogicalType,
  object::ManagedObject,
  spec::{ObjectSpecification, SpecificationLoader},
};
use tracing::debug;

use crate::{
  Error, ObjectMemento, RecreatableSerializable, RecreateStrategy, Result,
  recreate::PojoHandle,
};

/// Creates mementos for managed objects and reconstructs objects from them.
#[derive(Debug, Clone)]
pub struct ObjectMementoService {
  loader: Arc<SpecificationLoader>,
}

impl ObjectMementoService {
  pub fn new(loader: Arc<SpecificationLoader>) -> Self { Self { loader } }

  pub fn loader(&self) -> &Arc<SpecificationLoader> { &self.loader }

  /// Whether instances of `spec` can be recreated outside this process:
  /// entities, view models and serializable values.
  pub fn is_handling(&self, spec: &ObjectSpecification) -> bool {
    spec.contains_facet(EntityFacet::TYPE)
      || spec.contains_facet(ViewModelFacet::TYPE)
      || spec.contains_facet(SerializableFacet::TYPE)
  }

  pub fn memento_for_object(
    &self,
    object: &ManagedObject,
  ) -> Result<ObjectMemento> {
    let logical_type = object.logical_type().clone();
    let Some(pojo) = object.pojo() else {
      return Ok(ObjectMemento::empty(logical_type));
    };

    let strategy = if let Some(bookmark) = object.bookmark()? {
      RecreateStrategy::Lookup(bookmark)
    } else if let Some(codec) = object
      .specification()
      .get_facet_as::<SerializableFacet>(SerializableFacet::TYPE)
    {
      RecreateStrategy::Serializable(RecreatableSerializable::new(
        logical_type.clone(),
        codec.encode(pojo)?,
      ))
    } else {
      RecreateStrategy::Pojo(PojoHandle(Arc::clone(pojo)))
    };
    debug!(%logical_type, ?strategy, "memento created");
    Ok(ObjectMemento::scalar(logical_type, strategy))
  }

  /// One collection memento over `objects`, all of `element_type`.
  pub fn memento_for_pojos(
    &self,
    objects: &[ManagedObject],
    element_type: LogicalType,
  ) -> Result<ObjectMemento> {
    let elements = objects
      .iter()
      .map(|object| self.memento_for_object(object))
      .collect::<Result<Vec<_>>>()?;
    Ok(ObjectMemento::pack(elements, element_type))
  }

  pub fn reconstruct_object(
    &self,
    memento: &ObjectMemento,
  ) -> Result<ManagedObject> {
    match memento {
      ObjectMemento::Empty { logical_type } => {
        let spec = self.loader.specification_for(logical_type)?;
        Ok(ManagedObject::empty(spec))
      }
      ObjectMemento::Scalar(scalar) => {
        scalar.strategy.recreate(&scalar.logical_type, &self.loader)
      }
      ObjectMemento::Collection(collection) => Err(
        Error::UnexpectedCollection(collection.logical_type.to_string()),
      ),
    }
  }

  /// The elements of a collection memento, in order.
  pub fn reconstruct_objects(
    &self,
    memento: &ObjectMemento,
  ) -> Result<Vec<ManagedObject>> {
    memento
      .unpack()
      .unwrap_or_default()
      .iter()
      .map(|element| self.reconstruct_object(element))
      .collect()
  }
}
