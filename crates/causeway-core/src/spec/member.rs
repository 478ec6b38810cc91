//! Properties, collections and actions of a specification, and the
//! parameters of actions.

use std::sync::Arc;

use tracing::debug;

use crate::{
  Error, Result,
  facet::{Facet, FacetAddOutcome, FacetHolder, FacetRegistry},
  facets::{ActionInvocationFacet, DomainEventFacet, PropertyAccessorFacet},
  identifier::{FeatureType, Identifier},
  interaction::{
    AccessContext, InteractionContext, InteractionEvent, InteractionHead,
    InteractionInitiatedBy, InteractionResult, InteractionResultSet,
    ParameterPosition, Proposal, UsabilityContext, ValidityContext,
    VisibilityContext, Where, evaluate, is_usable_result, is_valid_result,
    is_valid_result_set, is_visible_result,
  },
  object::ManagedObject,
};

/// Framework-initiated visibility and usability checks are always allowed.
fn bypassed(head: &InteractionHead) -> Option<InteractionResult> {
  head
    .initiated_by
    .is_framework()
    .then(|| InteractionResult::new(InteractionEvent::from_head(head)))
}

// ─── ObjectMember ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ObjectMember {
  identifier: Identifier,
  facets:     FacetRegistry,
  parameters: Vec<ObjectActionParameter>,
}

impl ObjectMember {
  pub fn new(identifier: Identifier) -> Self {
    Self {
      identifier,
      facets: FacetRegistry::new(),
      parameters: Vec::new(),
    }
  }

  pub fn with_facet(mut self, facet: impl Facet) -> Self {
    self.add_facet(Arc::new(facet));
    self
  }

  pub fn with_parameter(mut self, parameter: ObjectActionParameter) -> Self {
    self.parameters.push(parameter);
    self
  }

  pub fn add_facet(&mut self, facet: Arc<dyn Facet>) -> FacetAddOutcome {
    self.facets.add_facet(facet)
  }

  pub fn add_parameter(&mut self, parameter: ObjectActionParameter) {
    self.parameters.push(parameter);
  }

  pub fn name(&self) -> &str { self.identifier.member_name().unwrap_or_default() }

  pub fn feature_type(&self) -> FeatureType { self.identifier.feature_type }

  pub fn parameters(&self) -> &[ObjectActionParameter] { &self.parameters }

  pub fn parameter(&self, index: usize) -> Option<&ObjectActionParameter> {
    self.parameters.get(index)
  }

  pub fn is_visible(
    &self,
    target: &ManagedObject,
    initiated_by: InteractionInitiatedBy,
    where_: Where,
  ) -> InteractionResult {
    let context = VisibilityContext::member(
      target.clone(),
      self.identifier.clone(),
      initiated_by,
      where_,
    );
    bypassed(&context.head)
      .unwrap_or_else(|| is_visible_result(self, &context))
  }

  pub fn is_usable(
    &self,
    target: &ManagedObject,
    initiated_by: InteractionInitiatedBy,
    where_: Where,
  ) -> InteractionResult {
    let context = UsabilityContext::member(
      target.clone(),
      self.identifier.clone(),
      initiated_by,
      where_,
    );
    bypassed(&context.head).unwrap_or_else(|| is_usable_result(self, &context))
  }

  /// Validity of any proposal against this member. Never bypassed.
  pub fn is_valid(
    &self,
    target: &ManagedObject,
    proposal: Proposal,
    initiated_by: InteractionInitiatedBy,
  ) -> InteractionResult {
    let context = ValidityContext::new(
      target.clone(),
      self.identifier.clone(),
      proposal,
      initiated_by,
    );
    is_valid_result(self, &context)
  }

  /// Validity of a new value for this property; `None` clears it.
  pub fn is_associated_value_valid(
    &self,
    target: &ManagedObject,
    proposed: Option<ManagedObject>,
    initiated_by: InteractionInitiatedBy,
  ) -> InteractionResult {
    self.is_valid(target, Proposal::PropertyModify { proposed }, initiated_by)
  }

  /// Whether the value of this property or collection may be read.
  pub fn is_accessible(
    &self,
    target: &ManagedObject,
    initiated_by: InteractionInitiatedBy,
  ) -> InteractionResult {
    let context = AccessContext::member(
      target.clone(),
      self.identifier.clone(),
      initiated_by,
    );
    bypassed(&context.head).unwrap_or_else(|| {
      evaluate(self, &InteractionContext::Access(context))
    })
  }

  /// The current value of this property, if it has an accessor.
  pub fn get(&self, target: &ManagedObject) -> Option<ManagedObject> {
    self
      .get_facet_as::<PropertyAccessorFacet>(PropertyAccessorFacet::TYPE)?
      .get(target)
  }

  /// [`get`](Self::get), after checking that the read is allowed.
  pub fn read(
    &self,
    target: &ManagedObject,
    initiated_by: InteractionInitiatedBy,
  ) -> Result<Option<ManagedObject>> {
    let access = self.is_accessible(target, initiated_by);
    if let Some(reason) = access.reason() {
      return Err(Error::AccessVetoed {
        identifier: self.identifier.to_string(),
        reason:     reason.to_string(),
      });
    }
    Ok(self.get(target))
  }

  /// Validate every argument in turn, then the argument list as a whole.
  pub fn validate_arguments(
    &self,
    target: &ManagedObject,
    args: &[ManagedObject],
    initiated_by: InteractionInitiatedBy,
  ) -> InteractionResultSet {
    let mut results = InteractionResultSet::new();
    for parameter in &self.parameters {
      results.add(parameter.is_valid(target, args, initiated_by));
    }
    let context = ValidityContext::new(
      target.clone(),
      self.identifier.clone(),
      Proposal::ActionInvocation {
        args: args.to_vec(),
      },
      initiated_by,
    );
    is_valid_result_set(self, &context, &mut results);
    results
  }

  /// Check consent, then run the action and publish its domain events.
  pub fn execute(
    &self,
    target: &ManagedObject,
    args: &[ManagedObject],
    initiated_by: InteractionInitiatedBy,
  ) -> Result<Option<ManagedObject>> {
    let vetoed = |reason: &str| Error::ExecutionVetoed {
      identifier: self.identifier.to_string(),
      reason:     reason.to_string(),
    };

    let visible = self.is_visible(target, initiated_by, Where::Anywhere);
    if let Some(reason) = visible.reason() {
      return Err(vetoed(reason));
    }
    let usable = self.is_usable(target, initiated_by, Where::Anywhere);
    if let Some(reason) = usable.reason() {
      return Err(vetoed(reason));
    }
    let valid = self.validate_arguments(target, args, initiated_by);
    if let Some(reason) = valid.first_vetoed().and_then(InteractionResult::reason)
    {
      return Err(vetoed(reason));
    }

    let invocation = self
      .get_facet_as::<ActionInvocationFacet>(ActionInvocationFacet::TYPE)
      .ok_or_else(|| Error::NotInvocable {
        identifier: self.identifier.to_string(),
      })?;
    let events =
      self.get_facet_as::<DomainEventFacet>(DomainEventFacet::TYPE);

    if let Some(events) = events {
      events.post_executing(target, &self.identifier, args)?;
    }
    debug!(identifier = %self.identifier, args = args.len(), "executing");
    let result = invocation.invoke(target, args)?;

    Ok(match events {
      Some(events) => {
        events.post_executed(target, &self.identifier, args, result)
      }
      None => result,
    })
  }
}

impl FacetHolder for ObjectMember {
  fn identifier(&self) -> &Identifier { &self.identifier }

  fn facet_registry(&self) -> &FacetRegistry { &self.facets }
}

// ─── ObjectActionParameter ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ObjectActionParameter {
  identifier: Identifier,
  name:       String,
  facets:     FacetRegistry,
}

impl ObjectActionParameter {
  pub fn new(action: &Identifier, index: usize, name: impl Into<String>) -> Self {
    Self {
      identifier: Identifier::parameter(action, index),
      name:       name.into(),
      facets:     FacetRegistry::new(),
    }
  }

  pub fn with_facet(mut self, facet: impl Facet) -> Self {
    self.add_facet(Arc::new(facet));
    self
  }

  pub fn add_facet(&mut self, facet: Arc<dyn Facet>) -> FacetAddOutcome {
    self.facets.add_facet(facet)
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn index(&self) -> usize {
    self.identifier.parameter_index.unwrap_or_default()
  }

  pub fn is_visible(
    &self,
    target: &ManagedObject,
    args: &[ManagedObject],
    initiated_by: InteractionInitiatedBy,
  ) -> InteractionResult {
    let context = VisibilityContext::action_parameter(
      target.clone(),
      self.identifier.clone(),
      ParameterPosition::new(args.to_vec(), self.index()),
      initiated_by,
      Where::ObjectForms,
    );
    bypassed(&context.head)
      .unwrap_or_else(|| is_visible_result(self, &context))
  }

  pub fn is_usable(
    &self,
    target: &ManagedObject,
    args: &[ManagedObject],
    initiated_by: InteractionInitiatedBy,
  ) -> InteractionResult {
    let context = UsabilityContext::action_parameter(
      target.clone(),
      self.identifier.clone(),
      ParameterPosition::new(args.to_vec(), self.index()),
      initiated_by,
      Where::ObjectForms,
    );
    bypassed(&context.head).unwrap_or_else(|| is_usable_result(self, &context))
  }

  /// Validity of this parameter's argument, with all other arguments
  /// available to the advisors.
  pub fn is_valid(
    &self,
    target: &ManagedObject,
    args: &[ManagedObject],
    initiated_by: InteractionInitiatedBy,
  ) -> InteractionResult {
    let context = ValidityContext::new(
      target.clone(),
      self.identifier.clone(),
      Proposal::ActionArgument(ParameterPosition::new(
        args.to_vec(),
        self.index(),
      )),
      initiated_by,
    );
    is_valid_result(self, &context)
  }
}

impl FacetHolder for ObjectActionParameter {
  fn identifier(&self) -> &Identifier { &self.identifier }

  fn facet_registry(&self) -> &FacetRegistry { &self.facets }
}
