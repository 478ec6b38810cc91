//! Logical type names and feature identifiers.
//!
//! A [`LogicalType`] is the environment-independent name of a domain type
//! (`"demo.Customer"`), decoupled from whatever Rust type backs it. An
//! [`Identifier`] pins down one feature of such a type: the type itself, one
//! of its members, or one parameter of an action.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── LogicalType ─────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LogicalType {
  name: String,
}

impl LogicalType {
  pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }

  pub fn name(&self) -> &str { &self.name }

  /// The segment after the last `.`, e.g. `Customer` for `demo.Customer`.
  pub fn simple_name(&self) -> &str {
    self
      .name
      .rsplit_once('.')
      .map_or(self.name.as_str(), |(_, simple)| simple)
  }

  /// Everything before the last `.`, if any.
  pub fn namespace(&self) -> Option<&str> {
    self.name.rsplit_once('.').map(|(ns, _)| ns)
  }
}

impl fmt::Display for LogicalType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)
  }
}

impl From<&str> for LogicalType {
  fn from(name: &str) -> Self { Self::new(name) }
}

// ─── FeatureType ─────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeatureType {
  Object,
  Property,
  Collection,
  Action,
  ActionParameter,
}

impl FeatureType {
  pub fn is_member(self) -> bool {
    matches!(self, Self::Property | Self::Collection | Self::Action)
  }
}

// ─── Identifier ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
  pub logical_type:    LogicalType,
  pub feature_type:    FeatureType,
  /// `None` for [`FeatureType::Object`].
  pub member:          Option<String>,
  /// Only set for [`FeatureType::ActionParameter`].
  pub parameter_index: Option<usize>,
}

impl Identifier {
  pub fn object(logical_type: LogicalType) -> Self {
    Self {
      logical_type,
      feature_type: FeatureType::Object,
      member: None,
      parameter_index: None,
    }
  }

  pub fn member(
    logical_type: LogicalType,
    feature_type: FeatureType,
    name: impl Into<String>,
  ) -> Self {
    Self {
      logical_type,
      feature_type,
      member: Some(name.into()),
      parameter_index: None,
    }
  }

  pub fn property(logical_type: LogicalType, name: impl Into<String>) -> Self {
    Self::member(logical_type, FeatureType::Property, name)
  }

  pub fn collection(
    logical_type: LogicalType,
    name: impl Into<String>,
  ) -> Self {
    Self::member(logical_type, FeatureType::Collection, name)
  }

  pub fn action(logical_type: LogicalType, name: impl Into<String>) -> Self {
    Self::member(logical_type, FeatureType::Action, name)
  }

  /// The identifier of the `index`-th parameter of `action`.
  pub fn parameter(action: &Identifier, index: usize) -> Self {
    Self {
      logical_type:    action.logical_type.clone(),
      feature_type:    FeatureType::ActionParameter,
      member:          action.member.clone(),
      parameter_index: Some(index),
    }
  }

  pub fn member_name(&self) -> Option<&str> { self.member.as_deref() }
}

impl fmt::Display for Identifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.logical_type)?;
    if let Some(member) = &self.member {
      write!(f, "#{member}")?;
    }
    if let Some(index) = self.parameter_index {
      write!(f, "[{index}]")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn simple_name_and_namespace() {
    let lt = LogicalType::new("demo.orders.Customer");
    assert_eq!(lt.simple_name(), "Customer");
    assert_eq!(lt.namespace(), Some("demo.orders"));

    let bare = LogicalType::new("Customer");
    assert_eq!(bare.simple_name(), "Customer");
    assert_eq!(bare.namespace(), None);
  }

  #[test]
  fn identifier_display() {
    let lt = LogicalType::new("demo.Customer");
    assert_eq!(Identifier::object(lt.clone()).to_string(), "demo.Customer");

    let action = Identifier::action(lt, "placeOrder");
    assert_eq!(action.to_string(), "demo.Customer#placeOrder");
    assert_eq!(
      Identifier::parameter(&action, 1).to_string(),
      "demo.Customer#placeOrder[1]"
    );
  }
}
