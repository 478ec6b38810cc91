//! Typed descriptions of one visibility, usability, validity or access check.

use super::{InteractionContextType, InteractionInitiatedBy, Where};
use crate::{
  identifier::{FeatureType, Identifier},
  object::ManagedObject,
};

// ─── Head ────────────────────────────────────────────────────────────────────

/// The part every context shares: what is checked, on which object, and who
/// is asking.
#[derive(Debug, Clone)]
pub struct InteractionHead {
  pub interaction_type: InteractionContextType,
  pub target:           ManagedObject,
  pub identifier:       Identifier,
  pub initiated_by:     InteractionInitiatedBy,
}

impl InteractionHead {
  pub fn new(
    interaction_type: InteractionContextType,
    target: ManagedObject,
    identifier: Identifier,
    initiated_by: InteractionInitiatedBy,
  ) -> Self {
    Self {
      interaction_type,
      target,
      identifier,
      initiated_by,
    }
  }
}

/// The full argument list of an action together with the parameter being
/// checked.
#[derive(Debug, Clone)]
pub struct ParameterPosition {
  pub args:     Vec<ManagedObject>,
  pub position: usize,
}

impl ParameterPosition {
  pub fn new(args: Vec<ManagedObject>, position: usize) -> Self {
    Self { args, position }
  }

  /// The argument at `position`; `None` if out of range or not yet supplied.
  pub fn argument(&self) -> Option<&ManagedObject> {
    self.args.get(self.position).filter(|arg| !arg.is_empty())
  }
}

// ─── Visibility ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct VisibilityContext {
  pub head:      InteractionHead,
  pub where_:    Where,
  pub parameter: Option<ParameterPosition>,
}

impl VisibilityContext {
  pub fn object(
    target: ManagedObject,
    initiated_by: InteractionInitiatedBy,
    where_: Where,
  ) -> Self {
    let identifier = Identifier::object(target.logical_type().clone());
    Self::member(target, identifier, initiated_by, where_)
  }

  /// Visibility of the feature named by `identifier`; the interaction type
  /// follows its feature type.
  pub fn member(
    target: ManagedObject,
    identifier: Identifier,
    initiated_by: InteractionInitiatedBy,
    where_: Where,
  ) -> Self {
    use InteractionContextType as T;
    let interaction_type = match identifier.feature_type {
      FeatureType::Object => T::ObjectVisibility,
      FeatureType::Property => T::PropertyVisible,
      FeatureType::Collection => T::CollectionVisible,
      FeatureType::Action => T::ActionVisible,
      FeatureType::ActionParameter => T::ActionParameterVisible,
    };
    Self {
      head: InteractionHead::new(
        interaction_type,
        target,
        identifier,
        initiated_by,
      ),
      where_,
      parameter: None,
    }
  }

  pub fn action_parameter(
    target: ManagedObject,
    identifier: Identifier,
    parameter: ParameterPosition,
    initiated_by: InteractionInitiatedBy,
    where_: Where,
  ) -> Self {
    Self {
      head: InteractionHead::new(
        InteractionContextType::ActionParameterVisible,
        target,
        identifier,
        initiated_by,
      ),
      where_,
      parameter: Some(parameter),
    }
  }
}

// ─── Usability ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct UsabilityContext {
  pub head:      InteractionHead,
  pub where_:    Where,
  pub parameter: Option<ParameterPosition>,
}

impl UsabilityContext {
  pub fn member(
    target: ManagedObject,
    identifier: Identifier,
    initiated_by: InteractionInitiatedBy,
    where_: Where,
  ) -> Self {
    use InteractionContextType as T;
    let interaction_type = match identifier.feature_type {
      FeatureType::Property | FeatureType::Object => T::PropertyUsable,
      FeatureType::Collection => T::CollectionUsable,
      FeatureType::Action => T::ActionUsable,
      FeatureType::ActionParameter => T::ActionParameterUsable,
    };
    Self {
      head: InteractionHead::new(
        interaction_type,
        target,
        identifier,
        initiated_by,
      ),
      where_,
      parameter: None,
    }
  }

  pub fn action_parameter(
    target: ManagedObject,
    identifier: Identifier,
    parameter: ParameterPosition,
    initiated_by: InteractionInitiatedBy,
    where_: Where,
  ) -> Self {
    Self {
      head: InteractionHead::new(
        InteractionContextType::ActionParameterUsable,
        target,
        identifier,
        initiated_by,
      ),
      where_,
      parameter: Some(parameter),
    }
  }
}

// ─── Validity ────────────────────────────────────────────────────────────────

/// What is being proposed; determines the interaction type of a
/// [`ValidityContext`].
#[derive(Debug, Clone)]
pub enum Proposal {
  /// The object as a whole, e.g. before it is saved.
  Object,
  /// A new property value; `None` clears the property.
  PropertyModify { proposed: Option<ManagedObject> },
  CollectionAddTo { proposed: ManagedObject },
  CollectionRemoveFrom { proposed: ManagedObject },
  /// One argument of an action, checked in the context of all others.
  ActionArgument(ParameterPosition),
  /// The complete argument list, checked just before invocation.
  ActionInvocation { args: Vec<ManagedObject> },
}

impl Proposal {
  pub fn interaction_type(&self) -> InteractionContextType {
    use InteractionContextType as T;
    match self {
      Self::Object => T::ObjectValidate,
      Self::PropertyModify { .. } => T::PropertyModify,
      Self::CollectionAddTo { .. } => T::CollectionAddTo,
      Self::CollectionRemoveFrom { .. } => T::CollectionRemoveFrom,
      Self::ActionArgument(_) => T::ActionProposedArgument,
      Self::ActionInvocation { .. } => T::ActionInvoke,
    }
  }

  /// The single value under scrutiny, if the proposal has one and it is not
  /// empty.
  pub fn proposed_value(&self) -> Option<&ManagedObject> {
    match self {
      Self::PropertyModify { proposed } => {
        proposed.as_ref().filter(|value| !value.is_empty())
      }
      Self::CollectionAddTo { proposed }
      | Self::CollectionRemoveFrom { proposed } => Some(proposed),
      Self::ActionArgument(parameter) => parameter.argument(),
      Self::Object | Self::ActionInvocation { .. } => None,
    }
  }

  /// Whether the proposal concerns a single value that may be absent.
  pub fn is_single_value(&self) -> bool {
    matches!(self, Self::PropertyModify { .. } | Self::ActionArgument(_))
  }
}

#[derive(Debug, Clone)]
pub struct ValidityContext {
  pub head:     InteractionHead,
  pub proposal: Proposal,
}

impl ValidityContext {
  pub fn new(
    target: ManagedObject,
    identifier: Identifier,
    proposal: Proposal,
    initiated_by: InteractionInitiatedBy,
  ) -> Self {
    Self {
      head: InteractionHead::new(
        proposal.interaction_type(),
        target,
        identifier,
        initiated_by,
      ),
      proposal,
    }
  }

  pub fn object(
    target: ManagedObject,
    initiated_by: InteractionInitiatedBy,
  ) -> Self {
    let identifier = Identifier::object(target.logical_type().clone());
    Self::new(target, identifier, Proposal::Object, initiated_by)
  }

  pub fn proposed_value(&self) -> Option<&ManagedObject> {
    self.proposal.proposed_value()
  }
}

// ─── Access ──────────────────────────────────────────────────────────────────

/// A read of a property or collection value.
#[derive(Debug, Clone)]
pub struct AccessContext {
  pub head: InteractionHead,
}

impl AccessContext {
  pub fn member(
    target: ManagedObject,
    identifier: Identifier,
    initiated_by: InteractionInitiatedBy,
  ) -> Self {
    let interaction_type = match identifier.feature_type {
      FeatureType::Collection => InteractionContextType::CollectionRead,
      _ => InteractionContextType::PropertyRead,
    };
    Self {
      head: InteractionHead::new(
        interaction_type,
        target,
        identifier,
        initiated_by,
      ),
    }
  }

  /// A member may be read wherever it may be seen at all.
  pub fn as_visibility(&self) -> VisibilityContext {
    VisibilityContext::member(
      self.head.target.clone(),
      self.head.identifier.clone(),
      self.head.initiated_by,
      Where::Anywhere,
    )
  }
}

// ─── Any context ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum InteractionContext {
  Visibility(VisibilityContext),
  Usability(UsabilityContext),
  Validity(ValidityContext),
  Access(AccessContext),
}

impl InteractionContext {
  pub fn head(&self) -> &InteractionHead {
    match self {
      Self::Visibility(ctx) => &ctx.head,
      Self::Usability(ctx) => &ctx.head,
      Self::Validity(ctx) => &ctx.head,
      Self::Access(ctx) => &ctx.head,
    }
  }

  pub fn interaction_type(&self) -> InteractionContextType {
    self.head().interaction_type
  }
}

impl From<VisibilityContext> for InteractionContext {
  fn from(ctx: VisibilityContext) -> Self { Self::Visibility(ctx) }
}

impl From<UsabilityContext> for InteractionContext {
  fn from(ctx: UsabilityContext) -> Self { Self::Usability(ctx) }
}

impl From<ValidityContext> for InteractionContext {
  fn from(ctx: ValidityContext) -> Self { Self::Validity(ctx) }
}

impl From<AccessContext> for InteractionContext {
  fn from(ctx: AccessContext) -> Self { Self::Access(ctx) }
}
