#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn extent() -> MapExtent {
    MapExtent::new(2048.0, 1024.0)
}

fn make_path(z: i64) -> MapElement {
    let mut element = MapElement::new(
        ElementKind::Terrain,
        ElementGeometry::Path { points: vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)] },
        extent(),
    );
    element.z_index = z;
    element
}

fn make_with_id(id: Uuid, z: i64) -> MapElement {
    MapElement { id, ..make_path(z) }
}

// =============================================================
// MapElement
// =============================================================

#[test]
fn new_element_defaults() {
    let element = MapElement::new(
        ElementKind::Pen,
        ElementGeometry::Stroke { points: vec![Point::new(1.0, 1.0)], width: 3.0 },
        extent(),
    );
    assert_eq!(element.name, "Pen Stroke");
    assert_eq!(element.z_index, 3);
    assert!(!element.projection_aware);
    assert_eq!(element.extent, extent());
}

#[test]
fn new_elements_get_distinct_ids() {
    assert_ne!(make_path(0).id, make_path(0).id);
}

#[test]
fn geometry_bounds() {
    let shape = ElementGeometry::Shape(ClassifiedShape::Circle { center: Point::new(10.0, 10.0), radius: 5.0 });
    assert_eq!(shape.bounds(), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
    let path = ElementGeometry::Path { points: vec![Point::new(4.0, 1.0), Point::new(-2.0, 7.0)] };
    assert_eq!(path.bounds(), Some(Rect::new(-2.0, 1.0, 6.0, 6.0)));
    assert_eq!(ElementGeometry::Path { points: Vec::new() }.bounds(), None);
}

#[test]
fn element_serde_roundtrip() {
    let element = MapElement::new(
        ElementKind::Shape,
        ElementGeometry::Shape(ClassifiedShape::Rectangle(Rect::new(1.0, 2.0, 3.0, 4.0))),
        extent(),
    );
    let json = serde_json::to_value(&element).unwrap();
    assert_eq!(json["kind"], "shape");
    assert_eq!(json["geometry"]["type"], "shape");
    assert_eq!(json["geometry"]["data"]["type"], "rectangle");
    let back: MapElement = serde_json::from_value(json).unwrap();
    assert_eq!(back, element);
}

// =============================================================
// Store basics
// =============================================================

#[test]
fn store_new_is_empty() {
    let doc = MapDoc::new();
    assert!(doc.is_empty());
    assert_eq!(doc.len(), 0);
    assert!(!doc.can_undo());
}

#[test]
fn store_insert_get_remove() {
    let mut doc = MapDoc::new();
    let element = make_path(0);
    let id = element.id;
    doc.insert(element);
    assert_eq!(doc.get(&id).map(|e| e.kind), Some(ElementKind::Terrain));
    assert!(!doc.can_undo());
    assert!(doc.remove(&id).is_some());
    assert!(doc.remove(&id).is_none());
}

#[test]
fn apply_partial_updates_present_fields() {
    let mut doc = MapDoc::new();
    let element = make_path(0);
    let id = element.id;
    doc.insert(element);
    let partial = PartialMapElement { name: Some("Dragon Spine".into()), z_index: Some(9), ..Default::default() };
    assert!(doc.apply_partial(&id, &partial));
    let stored = doc.get(&id).unwrap();
    assert_eq!(stored.name, "Dragon Spine");
    assert_eq!(stored.z_index, 9);
    assert_eq!(stored.color, "#000000");
}

#[test]
fn apply_partial_missing_returns_false() {
    let mut doc = MapDoc::new();
    assert!(!doc.apply_partial(&Uuid::new_v4(), &PartialMapElement::default()));
}

// =============================================================
// Draw order
// =============================================================

#[test]
fn sorted_by_z_then_insertion_order() {
    let mut doc = MapDoc::new();
    let low = Uuid::from_u128(1);
    let high = Uuid::from_u128(2);
    doc.insert(make_with_id(high, 1));
    doc.insert(make_with_id(low, 1));
    doc.insert(make_with_id(Uuid::from_u128(3), 0));
    let ids: Vec<Uuid> = doc.sorted_elements().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![Uuid::from_u128(3), high, low]);
}

#[test]
fn last_committed_is_on_top_regardless_of_id() {
    for _ in 0..20 {
        let mut doc = MapDoc::new();
        doc.commit_add(make_path(3));
        let newest = doc.commit_add(make_path(3));
        assert_eq!(doc.sorted_elements().last().map(|e| e.id), Some(newest));
    }
}

#[test]
fn replacing_keeps_stacking_position() {
    let mut doc = MapDoc::new();
    let first = Uuid::from_u128(9);
    doc.insert(make_with_id(first, 0));
    doc.insert(make_with_id(Uuid::from_u128(1), 0));
    doc.insert(MapElement { name: "Renamed".into(), ..make_with_id(first, 0) });
    let ids: Vec<Uuid> = doc.sorted_elements().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![first, Uuid::from_u128(1)]);
    assert_eq!(doc.get(&first).map(|e| e.name.as_str()), Some("Renamed"));
}

#[test]
fn restored_element_returns_to_its_layer_position() {
    let mut doc = MapDoc::new();
    let bottom = doc.commit_add(make_path(0));
    let top = doc.commit_add(make_path(0));
    doc.remove_with_history(&bottom);
    doc.undo();
    let ids: Vec<Uuid> = doc.sorted_elements().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![bottom, top]);
}

#[test]
fn load_snapshot_replaces_and_clears_history() {
    let mut doc = MapDoc::new();
    doc.commit_add(make_path(0));
    doc.load_snapshot(vec![make_path(0), make_path(1)]);
    assert_eq!(doc.len(), 2);
    assert!(!doc.can_undo());
    assert!(!doc.can_redo());
}

#[test]
fn load_snapshot_stacks_in_given_order() {
    let mut doc = MapDoc::new();
    let ids = [Uuid::from_u128(5), Uuid::from_u128(2), Uuid::from_u128(8)];
    doc.load_snapshot(ids.iter().map(|&id| make_with_id(id, 0)).collect());
    let sorted: Vec<Uuid> = doc.sorted_elements().iter().map(|e| e.id).collect();
    assert_eq!(sorted, ids.to_vec());
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn undo_add_removes_and_redo_restores() {
    let mut doc = MapDoc::new();
    let id = doc.commit_add(make_path(0));
    assert_eq!(doc.undo(), Some(Change::Removed(id)));
    assert!(doc.get(&id).is_none());
    assert!(doc.can_redo());
    match doc.redo() {
        Some(Change::Inserted(element)) => assert_eq!(element.id, id),
        other => panic!("unexpected redo result: {other:?}"),
    }
    assert!(doc.get(&id).is_some());
}

#[test]
fn undo_remove_restores_element() {
    let mut doc = MapDoc::new();
    let id = doc.commit_add(make_path(0));
    assert!(doc.remove_with_history(&id).is_some());
    assert!(doc.is_empty());
    assert!(matches!(doc.undo(), Some(Change::Inserted(e)) if e.id == id));
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.redo(), Some(Change::Removed(id)));
    assert!(doc.is_empty());
}

#[test]
fn redo_add_keeps_edits_made_before_undo() {
    let mut doc = MapDoc::new();
    let id = doc.commit_add(make_path(0));
    let partial = PartialMapElement { name: Some("Iron Ridge".into()), color: Some("#884400".into()), z_index: Some(7) };
    assert!(doc.apply_partial(&id, &partial));
    doc.undo();
    match doc.redo() {
        Some(Change::Inserted(element)) => assert_eq!(element.name, "Iron Ridge"),
        other => panic!("unexpected redo result: {other:?}"),
    }
    let stored = doc.get(&id).unwrap();
    assert_eq!(stored.name, "Iron Ridge");
    assert_eq!(stored.color, "#884400");
    assert_eq!(stored.z_index, 7);
}

#[test]
fn undo_remove_after_redo_keeps_edits() {
    let mut doc = MapDoc::new();
    let id = doc.commit_add(make_path(0));
    doc.remove_with_history(&id);
    doc.undo();
    let partial = PartialMapElement { name: Some("Salt Flats".into()), ..Default::default() };
    assert!(doc.apply_partial(&id, &partial));
    doc.redo();
    doc.undo();
    assert_eq!(doc.get(&id).map(|e| e.name.as_str()), Some("Salt Flats"));
}

#[test]
fn remove_with_history_missing_records_nothing() {
    let mut doc = MapDoc::new();
    assert!(doc.remove_with_history(&Uuid::new_v4()).is_none());
    assert!(!doc.can_undo());
}

#[test]
fn new_commit_clears_redo() {
    let mut doc = MapDoc::new();
    doc.commit_add(make_path(0));
    doc.undo();
    assert!(doc.can_redo());
    doc.commit_add(make_path(0));
    assert!(!doc.can_redo());
    assert_eq!(doc.redo(), None);
}

#[test]
fn history_is_bounded_dropping_oldest() {
    let mut doc = MapDoc::new();
    let first = doc.commit_add(make_path(0));
    for _ in 0..25 {
        doc.commit_add(make_path(0));
    }
    assert_eq!(doc.undo_depth(), 20);
    while doc.undo().is_some() {}
    assert_eq!(doc.len(), 6);
    assert!(doc.get(&first).is_some());
}

#[test]
fn zero_depth_keeps_no_history() {
    let mut doc = MapDoc::with_max_undo(0);
    doc.commit_add(make_path(0));
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.undo(), None);
}

#[test]
fn undo_on_empty_history_is_none() {
    let mut doc = MapDoc::new();
    assert_eq!(doc.undo(), None);
    assert_eq!(doc.redo(), None);
}
