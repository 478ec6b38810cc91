//! Built-in facets.
//!
//! Advisor facets (hidden, disabled, mandatory, max length, the
//! supporting-method facets and domain events) take part in consent
//! evaluation. The rest describe what kind of object a type is and how to
//! identify, serialize, instantiate or invoke it.

mod contributing;
mod disabled;
mod domain_event;
mod hidden;
mod invocation;
mod mandatory;
mod max_length;
mod member_support;
mod mixin;
mod object_kind;

pub use contributing::{Contributing, ContributingFacet};
pub use disabled::DisabledFacet;
pub use domain_event::DomainEventFacet;
pub use hidden::HiddenFacet;
pub use invocation::{
  AccessorFn, ActionInvocationFacet, InvokeFn, PropertyAccessorFacet,
};
pub use mandatory::{MandatoryFacet, Semantics};
pub use max_length::MaxLengthFacet;
pub use member_support::{
  DisableForContextFacet, HideForContextFacet, ValidateForContextFacet,
};
pub use mixin::{
  DEFAULT_MAIN_METHOD, MixinConstructorFn, MixinFacet, ensure_mixin_type,
};
pub use object_kind::{
  EntityFacet, EntityResolver, SerializableFacet, ViewModelFacet,
};
