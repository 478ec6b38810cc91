//! Outcomes of consent evaluation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use super::{InteractionContextType, InteractionHead, InteractionInitiatedBy};
use crate::{
  facet::Facet,
  identifier::{Identifier, LogicalType},
};

// ─── Event ───────────────────────────────────────────────────────────────────

/// The interaction a result answers, kept for downstream publication.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionEvent {
  pub interaction_type: InteractionContextType,
  pub identifier:       Identifier,
  pub target_type:      LogicalType,
  pub initiated_by:     InteractionInitiatedBy,
  pub occurred_at:      DateTime<Utc>,
}

impl InteractionEvent {
  pub fn from_head(head: &InteractionHead) -> Self {
    Self {
      interaction_type: head.interaction_type,
      identifier:       head.identifier.clone(),
      target_type:      head.target.logical_type().clone(),
      initiated_by:     head.initiated_by,
      occurred_at:      Utc::now(),
    }
  }
}

// ─── Consent ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consent {
  Allow,
  Veto(String),
}

impl Consent {
  pub fn is_allowed(&self) -> bool { matches!(self, Self::Allow) }

  pub fn is_vetoed(&self) -> bool { matches!(self, Self::Veto(_)) }

  pub fn reason(&self) -> Option<&str> {
    match self {
      Self::Allow => None,
      Self::Veto(reason) => Some(reason),
    }
  }
}

// ─── InteractionResult ───────────────────────────────────────────────────────

/// A recorded veto and the advisor that produced it.
#[derive(Debug, Clone)]
pub struct Veto {
  pub reason:  String,
  pub advisor: Arc<dyn Facet>,
}

/// The aggregate verdict of all advisors consulted for one context. The
/// first veto is kept; later ones are ignored.
#[derive(Debug, Clone)]
pub struct InteractionResult {
  event: InteractionEvent,
  veto:  Option<Veto>,
}

impl InteractionResult {
  pub fn new(event: InteractionEvent) -> Self { Self { event, veto: None } }

  /// Feed one advisor's verdict into the result.
  pub fn advise(&mut self, reason: Option<String>, advisor: &Arc<dyn Facet>) {
    let Some(reason) = reason else { return };
    if let Some(existing) = &self.veto {
      trace!(
        ignored = %reason,
        kept = %existing.reason,
        "later veto ignored"
      );
      return;
    }
    self.veto = Some(Veto {
      reason,
      advisor: Arc::clone(advisor),
    });
  }

  pub fn event(&self) -> &InteractionEvent { &self.event }

  pub fn is_vetoed(&self) -> bool { self.veto.is_some() }

  pub fn is_not_vetoed(&self) -> bool { self.veto.is_none() }

  pub fn veto(&self) -> Option<&Veto> { self.veto.as_ref() }

  /// The veto reason; `None` means allowed.
  pub fn reason(&self) -> Option<&str> {
    self.veto.as_ref().map(|veto| veto.reason.as_str())
  }

  pub fn advisor(&self) -> Option<&Arc<dyn Facet>> {
    self.veto.as_ref().map(|veto| &veto.advisor)
  }

  pub fn create_consent(&self) -> Consent {
    match &self.veto {
      None => Consent::Allow,
      Some(veto) => Consent::Veto(veto.reason.clone()),
    }
  }
}

// ─── InteractionResultSet ────────────────────────────────────────────────────

/// Ordered results of the several checks gating one compound operation.
///
/// Callers pick the mode: [`first_vetoed`](Self::first_vetoed) for a single
/// message, [`vetoes`](Self::vetoes) to show every problem at once.
#[derive(Debug, Clone, Default)]
pub struct InteractionResultSet {
  results: Vec<InteractionResult>,
}

impl InteractionResultSet {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, result: InteractionResult) { self.results.push(result) }

  pub fn len(&self) -> usize { self.results.len() }

  pub fn is_empty(&self) -> bool { self.results.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &InteractionResult> {
    self.results.iter()
  }

  pub fn first_vetoed(&self) -> Option<&InteractionResult> {
    self.results.iter().find(|result| result.is_vetoed())
  }

  pub fn is_vetoed(&self) -> bool { self.first_vetoed().is_some() }

  pub fn is_not_vetoed(&self) -> bool { !self.is_vetoed() }

  pub fn vetoes(&self) -> impl Iterator<Item = &InteractionResult> {
    self.results.iter().filter(|result| result.is_vetoed())
  }

  pub fn reasons(&self) -> Vec<&str> {
    self.results.iter().filter_map(InteractionResult::reason).collect()
  }

  /// First-veto-wins consent over the whole set.
  pub fn create_consent(&self) -> Consent {
    self
      .first_vetoed()
      .map_or(Consent::Allow, InteractionResult::create_consent)
  }
}

impl<'a> IntoIterator for &'a InteractionResultSet {
  type IntoIter = std::slice::Iter<'a, InteractionResult>;
  type Item = &'a InteractionResult;

  fn into_iter(self) -> Self::IntoIter { self.results.iter() }
}
