//! XML marshalling of domain types and the schema-inclusion switch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::{Error, Result};

/// Namespace prefix shared by every framework-owned schema.
pub const FRAMEWORK_NAMESPACE_PREFIX: &str = "http://isis.apache.org/schema";

// ─── Schemas ─────────────────────────────────────────────────────────────────

/// Whether [`XmlService::to_xsd`] bundles the framework's own schemas
/// alongside the schema of the requested type.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Schemas {
  Include,
  #[default]
  Ignore,
}

impl Schemas {
  pub fn should_ignore(self, namespace_uri: &str) -> bool {
    match self {
      Self::Include => false,
      Self::Ignore => namespace_uri.starts_with(FRAMEWORK_NAMESPACE_PREFIX),
    }
  }
}

// ─── XmlSchema ───────────────────────────────────────────────────────────────

/// A type with a published XML schema.
pub trait XmlSchema {
  /// Target namespace of [`Self::xsd`].
  const NAMESPACE: &'static str;

  /// Name of the document element.
  const ROOT: &'static str;

  fn xsd() -> String;

  /// Schemas imported by [`Self::xsd`], as `(namespace, xsd)` pairs.
  fn imports() -> Vec<(&'static str, String)> { Vec::new() }
}

// ─── XmlService ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlService;

impl XmlService {
  pub fn to_xml<T: Serialize + XmlSchema>(&self, value: &T) -> Result<String> {
    quick_xml::se::to_string_with_root(T::ROOT, value)
      .map_err(xml_error::<T>)
  }

  pub fn from_xml<T: DeserializeOwned>(&self, xml: &str) -> Result<T> {
    quick_xml::de::from_str(xml).map_err(xml_error::<T>)
  }

  /// The schema of `T` keyed by namespace, together with its imports unless
  /// `schemas` says to ignore them. `T`'s own schema is always present.
  pub fn to_xsd<T: XmlSchema>(&self, schemas: Schemas) -> BTreeMap<String, String> {
    let mut xsds = BTreeMap::from([(T::NAMESPACE.to_string(), T::xsd())]);
    for (namespace, xsd) in T::imports() {
      if schemas.should_ignore(namespace) {
        debug!(namespace, "schema ignored");
        continue;
      }
      xsds.entry(namespace.to_string()).or_insert(xsd);
    }
    xsds
  }
}

fn xml_error<T>(err: impl std::fmt::Display) -> Error {
  Error::Xml {
    type_name: std::any::type_name::<T>(),
    message:   err.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  struct Invoice {
    #[serde(rename = "@number")]
    number: u32,
    total:  String,
  }

  impl XmlSchema for Invoice {
    const NAMESPACE: &'static str = "http://example.com/invoice";
    const ROOT: &'static str = "invoice";

    fn xsd() -> String { "<xs:schema/>".into() }

    fn imports() -> Vec<(&'static str, String)> {
      vec![
        ("http://isis.apache.org/schema/common", "<common/>".into()),
        ("http://example.com/money", "<money/>".into()),
      ]
    }
  }

  #[test]
  fn ignore_skips_framework_namespaces_only() {
    assert!(Schemas::Ignore.should_ignore("http://isis.apache.org/schema/foo"));
    assert!(!Schemas::Ignore.should_ignore("http://example.com/myschema"));
    assert!(!Schemas::Include.should_ignore("http://isis.apache.org/schema/foo"));
    assert!(!Schemas::Include.should_ignore("http://example.com/myschema"));
  }

  #[test]
  fn to_xsd_honours_the_switch() {
    let ignored = XmlService.to_xsd::<Invoice>(Schemas::Ignore);
    assert_eq!(
      ignored.keys().collect::<Vec<_>>(),
      ["http://example.com/invoice", "http://example.com/money"]
    );

    let included = XmlService.to_xsd::<Invoice>(Schemas::Include);
    assert_eq!(included.len(), 3);
    assert_eq!(included["http://isis.apache.org/schema/common"], "<common/>");
  }

  #[test]
  fn xml_round_trip() {
    let invoice = Invoice {
      number: 7,
      total:  "12.50".into(),
    };
    let xml = XmlService.to_xml(&invoice).unwrap();
    assert!(xml.starts_with("<invoice number=\"7\">"));
    assert_eq!(XmlService.from_xml::<Invoice>(&xml).unwrap(), invoice);
  }

  #[test]
  fn parse_errors_name_the_target_type() {
    let err = XmlService.from_xml::<Invoice>("<invoice>").unwrap_err();
    assert!(err.to_string().contains("Invoice"), "{err}");
  }
}
