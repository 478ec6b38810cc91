//! Object mementos for Causeway.
//!
//! An [`ObjectMemento`] is a serializable surrogate for a managed object. It
//! records the object's logical type and a [`RecreateStrategy`] that can
//! bring the object back later, possibly in another process. The
//! [`ObjectMemorizer`] picks the strategy through a chain of handlers.

mod memento;
mod recreate;
mod service;

pub mod error;
pub mod memorizer;

pub use error::{Error, Result};
pub use memento::{
  ObjectMemento, ObjectMementoCollection, ObjectMementoForScalar,
};
pub use memorizer::{
  Handler, MemorizeOther, MementoServiceHandler, MemorizerRequest,
  MemorizerResponse, ObjectMemorizer,
};
pub use recreate::{PojoHandle, RecreatableSerializable, RecreateStrategy};
pub use service::ObjectMementoService;
