//! Mixins: types that contribute an action, property or collection to a
//! holder type without inheritance.
//!
//! A mixin is recognised by its single public one-argument constructor, whose
//! parameter type is the holder. Its contribution kind is only known once its
//! main method has been introspected, so [`MixinFacet`] starts out
//! [`Contributing::Unspecified`] and is resolved exactly once by
//! [`MixinFacet::init_mixin_sort_from`].

use std::{fmt, sync::Arc, sync::OnceLock};

use tracing::debug;

use super::{Contributing, ContributingFacet};
use crate::{
  Error, Result,
  facet::{Facet, FacetHolder, FacetType},
  identifier::{Identifier, LogicalType},
  introspect::{MemberDescriptor, TypeDescriptor},
  object::{ManagedObject, Pojo},
  services::ServiceRegistry,
  spec::{ObjectMember, ObjectSpecification, ValidationFailures},
};

/// Name of the main method when the mixin does not configure one.
pub const DEFAULT_MAIN_METHOD: &str = "act";

/// Builds a mixin instance around its mixee, pulling collaborators from the
/// service registry.
pub type MixinConstructorFn =
  Arc<dyn Fn(&ManagedObject, &ServiceRegistry) -> Result<Pojo> + Send + Sync>;

/// Check that `candidate` has exactly one public one-argument constructor.
/// Any other count is recorded as a validation failure against the type.
pub fn ensure_mixin_type(
  candidate: &TypeDescriptor,
  failures: &ValidationFailures,
) -> bool {
  let logical_type = &candidate.logical_type;
  let one_arg = candidate
    .constructors
    .iter()
    .filter(|constructor| constructor.parameter_types.len() == 1)
    .count();

  match one_arg {
    1 => true,
    0 => {
      failures.raise(
        Identifier::object(logical_type.clone()),
        "mixin is missing public 1-arg constructor",
      );
      false
    }
    n => {
      failures.raise(
        Identifier::object(logical_type.clone()),
        format!("mixin needs a single public 1-arg constructor but has {n}"),
      );
      false
    }
  }
}

pub struct MixinFacet {
  mixin_type:       LogicalType,
  mixin_supertypes: Vec<LogicalType>,
  holder_type:      LogicalType,
  main_method:      String,
  constructor:      Option<MixinConstructorFn>,
  contributing:     OnceLock<Contributing>,
}

impl MixinFacet {
  pub const TYPE: FacetType = FacetType::new("mixin");

  /// The facet for `candidate`, or `None` (with a recorded failure) if it
  /// does not have the shape of a mixin.
  pub fn create(
    candidate: &TypeDescriptor,
    failures: &ValidationFailures,
  ) -> Option<Self> {
    if !ensure_mixin_type(candidate, failures) {
      return None;
    }
    let constructor = candidate
      .constructors
      .iter()
      .find(|constructor| constructor.parameter_types.len() == 1)?;
    let holder_type = constructor.parameter_types.first()?.clone();

    Some(Self {
      mixin_type: candidate.logical_type.clone(),
      mixin_supertypes: candidate.supertypes.clone(),
      holder_type,
      main_method: candidate
        .mixin_method
        .clone()
        .unwrap_or_else(|| DEFAULT_MAIN_METHOD.to_string()),
      constructor: constructor.factory.clone(),
      contributing: OnceLock::new(),
    })
  }

  pub fn mixin_type(&self) -> &LogicalType { &self.mixin_type }

  pub fn holder_type(&self) -> &LogicalType { &self.holder_type }

  pub fn main_method(&self) -> &str { &self.main_method }

  /// `Unspecified` until [`init_mixin_sort_from`](Self::init_mixin_sort_from)
  /// has run.
  pub fn contributing(&self) -> Contributing {
    self.contributing.get().copied().unwrap_or_default()
  }

  /// The member name contributed to the holder: the suffix of the mixin's
  /// simple name after its last `_` (`Customer_placeOrder` → `placeOrder`).
  pub fn member_name(&self) -> &str {
    let simple = self.mixin_type.simple_name();
    match simple.rsplit_once('_') {
      Some((_, suffix)) if !suffix.is_empty() => suffix,
      _ => simple,
    }
  }

  pub fn is_mixin_for(&self, candidate: &ObjectSpecification) -> bool {
    candidate.is_subtype_of(&self.holder_type)
  }

  /// Construct a mixin instance around `mixee`.
  ///
  /// Every failure here is a wiring bug: a correctly built metamodel never
  /// offers a mixee of the wrong type or a mixin without a constructor.
  pub fn instantiate(
    &self,
    mixee: Option<&ManagedObject>,
    services: &ServiceRegistry,
  ) -> Result<Pojo> {
    let fail = |reason: String| Error::MixinInstantiation {
      mixin: self.mixin_type.to_string(),
      reason,
    };

    let mixee = mixee
      .filter(|mixee| !mixee.is_empty())
      .ok_or_else(|| fail("mixee is required".to_string()))?;
    let constructor = self
      .constructor
      .as_ref()
      .ok_or_else(|| fail("no constructor registered".to_string()))?;
    if !mixee.specification().is_subtype_of(&self.holder_type) {
      return Err(fail(format!(
        "mixee of type {} is not assignable to {}",
        mixee.logical_type(),
        self.holder_type
      )));
    }

    constructor(mixee, services)
  }

  /// Whether `method` is this mixin's main method. Methods declared on a
  /// supertype of the mixin qualify, since dispatch always reaches the most
  /// derived override.
  pub fn is_candidate_for_main(&self, method: &MemberDescriptor) -> bool {
    let declaring = method.declaring_type.as_ref().unwrap_or(&self.mixin_type);
    method.name == self.main_method
      && (declaring == &self.mixin_type
        || self.mixin_supertypes.contains(declaring))
  }

  /// Copy the contribution kind of the introspected main method onto this
  /// facet, defaulting to [`Contributing::AsAction`].
  pub fn init_mixin_sort_from(&self, main_method: &ObjectMember) {
    let contributing = main_method
      .get_facet_as::<ContributingFacet>(ContributingFacet::TYPE)
      .map(ContributingFacet::contributing)
      .filter(|contributing| *contributing != Contributing::Unspecified)
      .unwrap_or(Contributing::AsAction);

    if self.contributing.set(contributing).is_ok() {
      debug!(mixin = %self.mixin_type, %contributing, "mixin sort resolved");
    } else {
      debug!(mixin = %self.mixin_type, "mixin sort already resolved");
    }
  }
}

impl fmt::Debug for MixinFacet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MixinFacet")
      .field("mixin_type", &self.mixin_type)
      .field("holder_type", &self.holder_type)
      .field("main_method", &self.main_method)
      .field("contributing", &self.contributing())
      .finish_non_exhaustive()
  }
}

impl Facet for MixinFacet {
  fn facet_type(&self) -> FacetType { Self::TYPE }
}
