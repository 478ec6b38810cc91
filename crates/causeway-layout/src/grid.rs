//! The bootstrap grid: rows of columns holding field sets, collections and
//! actions.
//!
//! ```xml
//! <grid>
//!   <row>
//!     <col span="12" unreferencedActions="true">
//!       <domainObject/>
//!     </col>
//!   </row>
//!   <row>
//!     <col span="6">
//!       <fieldSet id="general" name="General" unreferencedProperties="true">
//!         <property id="name"/>
//!       </fieldSet>
//!     </col>
//!     <col span="6" unreferencedCollections="true"/>
//!   </row>
//! </grid>
//! ```

use serde::{Deserialize, Serialize};

use crate::xml::XmlSchema;

fn is_false(value: &bool) -> bool { !*value }

// ─── Components ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainObjectLayout {
  #[serde(rename = "@named", default, skip_serializing_if = "Option::is_none")]
  pub named:        Option<String>,
  #[serde(
    rename = "@cssClassFa",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub css_class_fa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLayout {
  #[serde(rename = "@id")]
  pub id:    String,
  #[serde(rename = "@named", default, skip_serializing_if = "Option::is_none")]
  pub named: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyLayout {
  #[serde(rename = "@id")]
  pub id:      String,
  #[serde(rename = "@named", default, skip_serializing_if = "Option::is_none")]
  pub named:   Option<String>,
  /// Actions rendered next to the property.
  #[serde(rename = "action", default)]
  pub actions: Vec<ActionLayout>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLayout {
  #[serde(rename = "@id")]
  pub id:           String,
  #[serde(rename = "@named", default, skip_serializing_if = "Option::is_none")]
  pub named:        Option<String>,
  #[serde(
    rename = "@defaultView",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub default_view: Option<String>,
  #[serde(rename = "action", default)]
  pub actions:      Vec<ActionLayout>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
  #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
  pub id:                      Option<String>,
  #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
  pub name:                    Option<String>,
  /// Receives the properties no other field set mentions.
  #[serde(
    rename = "@unreferencedProperties",
    default,
    skip_serializing_if = "is_false"
  )]
  pub unreferenced_properties: bool,
  #[serde(rename = "action", default)]
  pub actions:                 Vec<ActionLayout>,
  #[serde(rename = "property", default)]
  pub properties:              Vec<PropertyLayout>,
}

// ─── Bootstrap structure ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
  #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
  pub id:   Option<String>,
  #[serde(rename = "col", default)]
  pub cols: Vec<Col>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Col {
  /// Width out of twelve.
  #[serde(rename = "@span", default)]
  pub span: u8,
  #[serde(
    rename = "@unreferencedActions",
    default,
    skip_serializing_if = "is_false"
  )]
  pub unreferenced_actions: bool,
  #[serde(
    rename = "@unreferencedCollections",
    default,
    skip_serializing_if = "is_false"
  )]
  pub unreferenced_collections: bool,
  #[serde(
    rename = "domainObject",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub domain_object: Option<DomainObjectLayout>,
  #[serde(rename = "action", default)]
  pub actions: Vec<ActionLayout>,
  #[serde(rename = "row", default)]
  pub rows: Vec<Row>,
  #[serde(rename = "fieldSet", default)]
  pub field_sets: Vec<FieldSet>,
  #[serde(rename = "collection", default)]
  pub collections: Vec<CollectionLayout>,
}

impl Col {
  pub fn new(span: u8) -> Self {
    Self {
      span,
      ..Self::default()
    }
  }
}

/// A layout for one domain type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
  #[serde(rename = "row", default)]
  pub rows: Vec<Row>,
}

impl Grid {
  /// Every column, depth first.
  pub fn cols(&self) -> Vec<&Col> {
    let mut out = Vec::new();
    collect_cols(&self.rows, &mut out);
    out
  }

  pub fn field_sets(&self) -> Vec<&FieldSet> {
    self
      .cols()
      .into_iter()
      .flat_map(|col| &col.field_sets)
      .collect()
  }

  /// Ids of all referenced properties, in document order.
  pub fn property_ids(&self) -> Vec<&str> {
    self
      .field_sets()
      .into_iter()
      .flat_map(|field_set| &field_set.properties)
      .map(|property| property.id.as_str())
      .collect()
  }

  pub fn collection_ids(&self) -> Vec<&str> {
    self
      .cols()
      .into_iter()
      .flat_map(|col| &col.collections)
      .map(|collection| collection.id.as_str())
      .collect()
  }

  /// Ids of all referenced actions, wherever they are placed.
  pub fn action_ids(&self) -> Vec<&str> {
    let mut ids = Vec::new();
    for col in self.cols() {
      ids.extend(col.actions.iter().map(|action| action.id.as_str()));
      for field_set in &col.field_sets {
        ids.extend(field_set.actions.iter().map(|action| action.id.as_str()));
        for property in &field_set.properties {
          ids.extend(property.actions.iter().map(|action| action.id.as_str()));
        }
      }
      for collection in &col.collections {
        ids.extend(collection.actions.iter().map(|action| action.id.as_str()));
      }
    }
    ids
  }

  /// Visit every column mutably, depth first.
  pub(crate) fn for_each_col_mut(&mut self, mut visit: impl FnMut(&mut Col)) {
    visit_cols_mut(&mut self.rows, &mut visit);
  }
}

fn collect_cols<'a>(rows: &'a [Row], out: &mut Vec<&'a Col>) {
  for col in rows.iter().flat_map(|row| &row.cols) {
    out.push(col);
    collect_cols(&col.rows, out);
  }
}

fn visit_cols_mut(rows: &mut [Row], visit: &mut impl FnMut(&mut Col)) {
  for col in rows.iter_mut().flat_map(|row| &mut row.cols) {
    visit(col);
    visit_cols_mut(&mut col.rows, visit);
  }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

const GRID_NAMESPACE: &str =
  "http://isis.apache.org/schema/applib/layout/grid/bootstrap3";
const COMPONENT_NAMESPACE: &str =
  "http://isis.apache.org/schema/applib/layout/component";

impl XmlSchema for Grid {
  const NAMESPACE: &'static str = GRID_NAMESPACE;
  const ROOT: &'static str = "grid";

  fn xsd() -> String {
    format!(
      r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="{GRID_NAMESPACE}" xmlns:cpt="{COMPONENT_NAMESPACE}">
  <xs:import namespace="{COMPONENT_NAMESPACE}"/>
  <xs:element name="grid" type="gridType"/>
  <xs:complexType name="gridType">
    <xs:sequence><xs:element name="row" type="rowType" minOccurs="0" maxOccurs="unbounded"/></xs:sequence>
  </xs:complexType>
  <xs:complexType name="rowType">
    <xs:sequence><xs:element name="col" type="colType" minOccurs="0" maxOccurs="unbounded"/></xs:sequence>
    <xs:attribute name="id" type="xs:string"/>
  </xs:complexType>
  <xs:complexType name="colType">
    <xs:sequence>
      <xs:element name="domainObject" type="cpt:domainObjectLayoutType" minOccurs="0"/>
      <xs:element name="action" type="cpt:actionLayoutType" minOccurs="0" maxOccurs="unbounded"/>
      <xs:element name="row" type="rowType" minOccurs="0" maxOccurs="unbounded"/>
      <xs:element name="fieldSet" type="cpt:fieldSetType" minOccurs="0" maxOccurs="unbounded"/>
      <xs:element name="collection" type="cpt:collectionLayoutType" minOccurs="0" maxOccurs="unbounded"/>
    </xs:sequence>
    <xs:attribute name="span" type="xs:int" use="required"/>
    <xs:attribute name="unreferencedActions" type="xs:boolean"/>
    <xs:attribute name="unreferencedCollections" type="xs:boolean"/>
  </xs:complexType>
</xs:schema>"#
    )
  }

  fn imports() -> Vec<(&'static str, String)> {
    vec![(
      COMPONENT_NAMESPACE,
      format!(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="{COMPONENT_NAMESPACE}">
  <xs:complexType name="domainObjectLayoutType">
    <xs:attribute name="named" type="xs:string"/>
    <xs:attribute name="cssClassFa" type="xs:string"/>
  </xs:complexType>
  <xs:complexType name="actionLayoutType">
    <xs:attribute name="id" type="xs:string" use="required"/>
    <xs:attribute name="named" type="xs:string"/>
  </xs:complexType>
  <xs:complexType name="propertyLayoutType">
    <xs:sequence><xs:element name="action" type="actionLayoutType" minOccurs="0" maxOccurs="unbounded"/></xs:sequence>
    <xs:attribute name="id" type="xs:string" use="required"/>
    <xs:attribute name="named" type="xs:string"/>
  </xs:complexType>
  <xs:complexType name="collectionLayoutType">
    <xs:sequence><xs:element name="action" type="actionLayoutType" minOccurs="0" maxOccurs="unbounded"/></xs:sequence>
    <xs:attribute name="id" type="xs:string" use="required"/>
    <xs:attribute name="named" type="xs:string"/>
    <xs:attribute name="defaultView" type="xs:string"/>
  </xs:complexType>
  <xs:complexType name="fieldSetType">
    <xs:sequence>
      <xs:element name="action" type="actionLayoutType" minOccurs="0" maxOccurs="unbounded"/>
      <xs:element name="property" type="propertyLayoutType" minOccurs="0" maxOccurs="unbounded"/>
    </xs:sequence>
    <xs:attribute name="id" type="xs:string"/>
    <xs:attribute name="name" type="xs:string"/>
    <xs:attribute name="unreferencedProperties" type="xs:boolean"/>
  </xs:complexType>
</xs:schema>"#
      ),
    )]
  }
}
