//! Reconciling a grid with the members its specification actually has.

use std::collections::HashSet;

use causeway_core::{identifier::FeatureType, spec::ObjectSpecification};
use tracing::{debug, warn};

use crate::grid::{
  ActionLayout, Col, CollectionLayout, DomainObjectLayout, FieldSet, Grid,
  PropertyLayout, Row,
};

/// The skeleton used when no layout file exists: the object header across
/// the full width, then properties on the left and collections on the
/// right. It references no member; [`normalize`] fills it in.
pub fn default_grid(_spec: &ObjectSpecification) -> Grid {
  Grid {
    rows: vec![
      Row {
        id:   None,
        cols: vec![Col {
          unreferenced_actions: true,
          domain_object: Some(DomainObjectLayout::default()),
          ..Col::new(12)
        }],
      },
      Row {
        id:   None,
        cols: vec![
          Col {
            field_sets: vec![FieldSet {
              id: Some("general".into()),
              name: Some("General".into()),
              unreferenced_properties: true,
              ..FieldSet::default()
            }],
            ..Col::new(6)
          },
          Col {
            unreferenced_collections: true,
            ..Col::new(6)
          },
        ],
      },
    ],
  }
}

/// Drop references to members `spec` does not have, then place every
/// unreferenced property, collection and action.
///
/// Unreferenced members go to the field set or column flagged to receive
/// them, or failing that to the first one.
pub fn normalize(mut grid: Grid, spec: &ObjectSpecification) -> Grid {
  if grid.cols().is_empty() {
    debug!(logical_type = %spec.logical_type(), "empty grid replaced by default");
    grid = default_grid(spec);
  }

  let properties = member_names(spec, FeatureType::Property);
  let collections = member_names(spec, FeatureType::Collection);
  let actions = member_names(spec, FeatureType::Action);

  drop_unknown(&mut grid, spec, &properties, &collections, &actions);

  let referenced: HashSet<String> =
    grid.property_ids().into_iter().map(str::to_owned).collect();
  let missing = unreferenced(&properties, &referenced);
  if !missing.is_empty() {
    add_properties(&mut grid, missing);
  }

  let referenced: HashSet<String> =
    grid.collection_ids().into_iter().map(str::to_owned).collect();
  let missing = unreferenced(&collections, &referenced);
  if !missing.is_empty() {
    let target = target_col(&grid, |col| col.unreferenced_collections);
    let mut missing = Some(missing);
    put_into_col(&mut grid, target, |col| {
      col.collections.extend(missing.take().into_iter().flatten().map(|id| {
        CollectionLayout {
          id,
          ..CollectionLayout::default()
        }
      }));
    });
  }

  let referenced: HashSet<String> =
    grid.action_ids().into_iter().map(str::to_owned).collect();
  let missing = unreferenced(&actions, &referenced);
  if !missing.is_empty() {
    let target = target_col(&grid, |col| col.unreferenced_actions);
    let mut missing = Some(missing);
    put_into_col(&mut grid, target, |col| {
      col.actions.extend(
        missing
          .take()
          .into_iter()
          .flatten()
          .map(|id| ActionLayout { id, named: None }),
      );
    });
  }

  grid
}

fn member_names(spec: &ObjectSpecification, feature: FeatureType) -> Vec<String> {
  spec
    .members_of(feature)
    .map(|member| member.name().to_owned())
    .collect()
}

fn unreferenced(known: &[String], referenced: &HashSet<String>) -> Vec<String> {
  known
    .iter()
    .filter(|name| !referenced.contains(*name))
    .cloned()
    .collect()
}

fn drop_unknown(
  grid: &mut Grid,
  spec: &ObjectSpecification,
  properties: &[String],
  collections: &[String],
  actions: &[String],
) {
  let logical_type = spec.logical_type();
  let keep = |kind: &str, known: &[String], id: &str| {
    let found = known.iter().any(|name| name == id);
    if !found {
      warn!(%logical_type, kind, id, "layout references unknown member; dropped");
    }
    found
  };

  grid.for_each_col_mut(|col| {
    col.actions.retain(|action| keep("action", actions, &action.id));
    for field_set in &mut col.field_sets {
      field_set
        .actions
        .retain(|action| keep("action", actions, &action.id));
      field_set
        .properties
        .retain(|property| keep("property", properties, &property.id));
      for property in &mut field_set.properties {
        property
          .actions
          .retain(|action| keep("action", actions, &action.id));
      }
    }
    col
      .collections
      .retain(|collection| keep("collection", collections, &collection.id));
    for collection in &mut col.collections {
      collection
        .actions
        .retain(|action| keep("action", actions, &action.id));
    }
  });
}

/// Depth-first index of the first column satisfying `flagged`, else 0.
fn target_col(grid: &Grid, flagged: impl Fn(&Col) -> bool) -> usize {
  grid
    .cols()
    .into_iter()
    .position(flagged)
    .unwrap_or_default()
}

fn put_into_col(grid: &mut Grid, target: usize, mut put: impl FnMut(&mut Col)) {
  let mut index = 0;
  grid.for_each_col_mut(|col| {
    if index == target {
      put(col);
    }
    index += 1;
  });
}

fn add_properties(grid: &mut Grid, missing: Vec<String>) {
  let target = {
    let cols = grid.cols();
    cols
      .iter()
      .position(|col| col.field_sets.iter().any(|fs| fs.unreferenced_properties))
      .or_else(|| cols.iter().position(|col| !col.field_sets.is_empty()))
      .unwrap_or_default()
  };

  let mut missing = Some(missing);
  put_into_col(grid, target, |col| {
    let Some(missing) = missing.take() else { return };
    let index = col
      .field_sets
      .iter()
      .position(|fs| fs.unreferenced_properties)
      .unwrap_or_default();
    if col.field_sets.is_empty() {
      col.field_sets.push(FieldSet {
        id: Some("general".into()),
        name: Some("General".into()),
        unreferenced_properties: true,
        ..FieldSet::default()
      });
    }
    col.field_sets[index].properties.extend(missing.into_iter().map(|id| {
      PropertyLayout {
        id,
        ..PropertyLayout::default()
      }
    }));
  });
}

#[cfg(test)]
mod tests {
  use causeway_core::{
    identifier::{Identifier, LogicalType},
    spec::ObjectMember,
  };

  use super::*;

  fn customer() -> ObjectSpecification {
    let lt = LogicalType::new("demo.Customer");
    ObjectSpecification::builder(lt.clone())
      .member(ObjectMember::new(Identifier::property(lt.clone(), "name")))
      .member(ObjectMember::new(Identifier::property(lt.clone(), "email")))
      .member(ObjectMember::new(Identifier::collection(lt.clone(), "orders")))
      .member(ObjectMember::new(Identifier::action(lt, "rename")))
      .build()
  }

  #[test]
  fn default_grid_receives_every_member() {
    let spec = customer();
    let grid = normalize(default_grid(&spec), &spec);
    assert_eq!(grid.property_ids(), ["name", "email"]);
    assert_eq!(grid.collection_ids(), ["orders"]);
    assert_eq!(grid.action_ids(), ["rename"]);

    let cols = grid.cols();
    assert_eq!(cols[0].actions[0].id, "rename");
    assert_eq!(cols[2].collections[0].id, "orders");
  }

  #[test]
  fn unknown_members_are_dropped_and_missing_ones_added() {
    let spec = customer();
    let grid = Grid {
      rows: vec![Row {
        id:   None,
        cols: vec![Col {
          field_sets: vec![FieldSet {
            properties: vec![
              PropertyLayout {
                id: "email".into(),
                ..PropertyLayout::default()
              },
              PropertyLayout {
                id: "shoeSize".into(),
                ..PropertyLayout::default()
              },
            ],
            ..FieldSet::default()
          }],
          ..Col::new(12)
        }],
      }],
    };

    let grid = normalize(grid, &spec);
    assert_eq!(grid.property_ids(), ["email", "name"]);
    assert_eq!(grid.collection_ids(), ["orders"]);
    assert_eq!(grid.action_ids(), ["rename"]);
  }

  #[test]
  fn empty_grid_falls_back_to_default() {
    let spec = customer();
    let grid = normalize(Grid::default(), &spec);
    assert_eq!(grid.rows.len(), 2);
    assert_eq!(grid.field_sets()[0].name.as_deref(), Some("General"));
  }
}
