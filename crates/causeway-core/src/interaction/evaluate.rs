//! The consent engine: fold every advisor of a holder into one result.
//!
//! Advisors are visited in the holder's facet registration order. All of
//! them are consulted; the first to veto is the one reported.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{
  InteractionContext, InteractionEvent, InteractionHead, InteractionResult,
  InteractionResultSet, UsabilityContext, ValidityContext, VisibilityContext,
};
use crate::facet::{Facet, FacetHolder};

pub fn is_visible_result<H>(
  holder: &H,
  context: &VisibilityContext,
) -> InteractionResult
where
  H: FacetHolder + ?Sized,
{
  fold(
    &context.head,
    "hide",
    holder.facet_registry().hiding_advisors(),
    |advisor| advisor.hides(context),
  )
}

pub fn is_usable_result<H>(
  holder: &H,
  context: &UsabilityContext,
) -> InteractionResult
where
  H: FacetHolder + ?Sized,
{
  fold(
    &context.head,
    "disable",
    holder.facet_registry().disabling_advisors(),
    |advisor| advisor.disables(context),
  )
}

pub fn is_valid_result<H>(
  holder: &H,
  context: &ValidityContext,
) -> InteractionResult
where
  H: FacetHolder + ?Sized,
{
  fold(
    &context.head,
    "validate",
    holder.facet_registry().validating_advisors(),
    |advisor| advisor.invalidates(context),
  )
}

/// Append the validity of one more context to a compound check.
pub fn is_valid_result_set<H>(
  holder: &H,
  context: &ValidityContext,
  results: &mut InteractionResultSet,
) where
  H: FacetHolder + ?Sized,
{
  results.add(is_valid_result(holder, context));
}

/// Evaluate any context against the advisors of its family. Reads are
/// checked as visibility anywhere.
pub fn evaluate<H>(holder: &H, context: &InteractionContext) -> InteractionResult
where
  H: FacetHolder + ?Sized,
{
  match context {
    InteractionContext::Visibility(ctx) => is_visible_result(holder, ctx),
    InteractionContext::Usability(ctx) => is_usable_result(holder, ctx),
    InteractionContext::Validity(ctx) => is_valid_result(holder, ctx),
    InteractionContext::Access(ctx) => {
      let visibility = ctx.as_visibility();
      fold(
        &ctx.head,
        "access",
        holder.facet_registry().hiding_advisors(),
        |advisor| advisor.hides(&visibility),
      )
    }
  }
}

fn fold<'a, A>(
  head: &InteractionHead,
  family: &'static str,
  advisors: impl Iterator<Item = (&'a Arc<dyn Facet>, &'a A)>,
  mut consult: impl FnMut(&A) -> Option<String>,
) -> InteractionResult
where
  A: ?Sized + 'a,
{
  let mut result = InteractionResult::new(InteractionEvent::from_head(head));
  for (facet, advisor) in advisors {
    let reason = consult(advisor);
    trace!(
      identifier = %head.identifier,
      facet_type = %facet.facet_type(),
      family,
      vetoed = reason.is_some(),
      "advisor consulted"
    );
    result.advise(reason, facet);
  }
  if let Some(reason) = result.reason() {
    debug!(identifier = %head.identifier, family, %reason, "vetoed");
  }
  result
}
