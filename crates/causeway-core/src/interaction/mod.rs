//! Interaction contexts and consent evaluation.
//!
//! Every check a viewer performs ("may this user see / use / change this
//! member right now?") is described by a typed context, handed to every
//! advisor facet of the holder, and answered with an [`InteractionResult`].
//! A veto is ordinary data carrying a human-readable reason.

mod advisor;
mod context;
mod evaluate;
mod result;

use serde::{Deserialize, Serialize};

pub use advisor::{
  DisablingInteractionAdvisor, HidingInteractionAdvisor,
  ValidatingInteractionAdvisor,
};
pub use context::{
  AccessContext, InteractionContext, InteractionHead, ParameterPosition,
  Proposal, UsabilityContext, ValidityContext, VisibilityContext,
};
pub use evaluate::{
  evaluate, is_usable_result, is_valid_result, is_valid_result_set,
  is_visible_result,
};
pub use result::{
  Consent, InteractionEvent, InteractionResult, InteractionResultSet, Veto,
};

// ─── Initiator ───────────────────────────────────────────────────────────────

/// Who asked. Framework-initiated interactions bypass visibility and
/// usability checks.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InteractionInitiatedBy {
  User,
  Framework,
}

impl InteractionInitiatedBy {
  pub fn is_user(self) -> bool { matches!(self, Self::User) }

  pub fn is_framework(self) -> bool { matches!(self, Self::Framework) }
}

// ─── Where ───────────────────────────────────────────────────────────────────

/// The rendering location a visibility or usability check applies to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Where {
  Everywhere,
  Anywhere,
  ObjectForms,
  ReferencesParent,
  ParentedTables,
  StandaloneTables,
  AllTables,
  AllExceptStandaloneTables,
  Nowhere,
  #[default]
  NotSpecified,
}

impl Where {
  /// Whether metadata scoped to `self` applies when rendering at `context`.
  pub fn includes(self, context: Where) -> bool {
    match self {
      Self::Everywhere | Self::Anywhere => true,
      Self::ObjectForms
      | Self::ReferencesParent
      | Self::ParentedTables
      | Self::StandaloneTables => self == context,
      Self::AllTables => matches!(
        context,
        Self::ParentedTables | Self::StandaloneTables | Self::AllTables
      ),
      Self::AllExceptStandaloneTables => context != Self::StandaloneTables,
      Self::Nowhere | Self::NotSpecified => false,
    }
  }

  pub fn is_always(self) -> bool {
    matches!(self, Self::Everywhere | Self::Anywhere)
  }

  pub fn in_table(self) -> bool {
    matches!(
      self,
      Self::ParentedTables | Self::StandaloneTables | Self::AllTables
    )
  }
}

// ─── Context type ────────────────────────────────────────────────────────────

/// Discriminates what a context interrogates.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InteractionContextType {
  ObjectVisibility,
  ObjectValidate,
  PropertyVisible,
  PropertyUsable,
  PropertyRead,
  PropertyModify,
  CollectionVisible,
  CollectionUsable,
  CollectionRead,
  CollectionAddTo,
  CollectionRemoveFrom,
  ActionVisible,
  ActionUsable,
  ActionParameterVisible,
  ActionParameterUsable,
  ActionProposedArgument,
  ActionInvoke,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn anywhere_includes_every_location() {
    for location in [
      Where::ObjectForms,
      Where::ParentedTables,
      Where::StandaloneTables,
      Where::ReferencesParent,
    ] {
      assert!(Where::Anywhere.includes(location));
      assert!(Where::Everywhere.includes(location));
      assert!(!Where::Nowhere.includes(location));
    }
  }

  #[test]
  fn table_scopes() {
    assert!(Where::AllTables.includes(Where::ParentedTables));
    assert!(Where::AllTables.includes(Where::StandaloneTables));
    assert!(!Where::AllTables.includes(Where::ObjectForms));

    assert!(Where::AllExceptStandaloneTables.includes(Where::ObjectForms));
    assert!(Where::AllExceptStandaloneTables.includes(Where::ParentedTables));
    assert!(!Where::AllExceptStandaloneTables.includes(Where::StandaloneTables));

    assert!(Where::ObjectForms.includes(Where::ObjectForms));
    assert!(!Where::ObjectForms.includes(Where::ParentedTables));
  }
}
