//! Document model: map elements and the in-memory store that owns them.
//!
//! A `MapElement` is anything drawn on top of the base map: a classified or
//! tool-drawn shape, a terrain path, a faction border, or a pen stroke.
//! Geometry is always stored in flat map pixels. `MapDoc` keys elements by id,
//! hands them to the renderer in `(z_index, seq, id)` order, and records adds
//! and removals on a bounded undo/redo history. `seq` is stamped by the store
//! on insertion, so among equal `z_index` the element drawn last is on top.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::ClassifiedShape;
use crate::consts::{ELEMENT_Z, MAX_UNDO};
use crate::geom::{Point, Rect};
use crate::projection::MapExtent;

/// Unique identifier for a map element.
pub type ElementId = Uuid;

/// What an element represents on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Circle, rectangle or polygon from a shape tool or freehand classification.
    Shape,
    /// Smoothed terrain outline.
    Terrain,
    /// Smoothed faction border.
    Border,
    /// Raw pen annotation.
    Pen,
}

impl ElementKind {
    #[must_use]
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Shape => "Shape",
            Self::Terrain => "Terrain",
            Self::Border => "Border",
            Self::Pen => "Pen Stroke",
        }
    }
}

/// Geometry of an element in map pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementGeometry {
    Shape(ClassifiedShape),
    /// Raw samples, smoothed at render time.
    Path { points: Vec<Point> },
    /// Raw samples drawn as a polyline of the given width.
    Stroke { points: Vec<Point>, width: f64 },
}

impl ElementGeometry {
    /// Axis-aligned bounds, or `None` for an empty path.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Shape(shape) => Some(shape.bounds()),
            Self::Path { points } | Self::Stroke { points, .. } => Rect::bounding(points),
        }
    }
}

/// A map element as stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapElement {
    pub id: ElementId,
    pub kind: ElementKind,
    pub geometry: ElementGeometry,
    /// Display name, e.g. "Freehand Circle".
    pub name: String,
    /// Stroke colour as a CSS hex string.
    pub color: String,
    /// Stacking order; lower values are drawn beneath higher values.
    pub z_index: i64,
    /// Insertion order within the document, assigned by `MapDoc`.
    #[serde(default)]
    pub seq: u64,
    /// Whether the geometry was compensated for sphere-mode distortion.
    pub projection_aware: bool,
    /// Map size the geometry was drawn against.
    pub extent: MapExtent,
}

impl MapElement {
    /// A new element with a fresh id and the kind's default name.
    #[must_use]
    pub fn new(kind: ElementKind, geometry: ElementGeometry, extent: MapExtent) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            geometry,
            name: kind.default_name().to_owned(),
            color: "#000000".to_owned(),
            z_index: ELEMENT_Z,
            seq: 0,
            projection_aware: false,
            extent,
        }
    }
}

/// Sparse update for a map element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialMapElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

/// A reversible document edit.
#[derive(Debug, Clone, PartialEq)]
enum Edit {
    Added(MapElement),
    Removed(MapElement),
}

/// What undo or redo did to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Inserted(MapElement),
    Removed(ElementId),
}

/// In-memory store of map elements with undo/redo.
#[derive(Debug, Clone)]
pub struct MapDoc {
    elements: HashMap<ElementId, MapElement>,
    undo_stack: VecDeque<Edit>,
    redo_stack: Vec<Edit>,
    max_undo: usize,
    next_seq: u64,
}

impl MapDoc {
    /// Create an empty store with the default undo depth.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_undo(MAX_UNDO)
    }

    /// Create an empty store keeping at most `max_undo` undo steps.
    #[must_use]
    pub fn with_max_undo(max_undo: usize) -> Self {
        Self {
            elements: HashMap::new(),
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_undo,
            next_seq: 0,
        }
    }

    /// Insert or replace an element without recording history.
    ///
    /// A new element goes on top of its `z_index` layer; a replacement keeps
    /// the stacking position of the element it replaces.
    pub fn insert(&mut self, mut element: MapElement) {
        let existing = self.elements.get(&element.id).map(|e| e.seq);
        element.seq = existing.unwrap_or_else(|| self.stamp());
        self.elements.insert(element.id, element);
    }

    fn stamp(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Remove an element without recording history.
    pub fn remove(&mut self, id: &ElementId) -> Option<MapElement> {
        self.elements.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&MapElement> {
        self.elements.get(id)
    }

    /// Apply a sparse update. Returns false if the element doesn't exist.
    pub fn apply_partial(&mut self, id: &ElementId, partial: &PartialMapElement) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        if let Some(name) = &partial.name {
            element.name.clone_from(name);
        }
        if let Some(color) = &partial.color {
            element.color.clone_from(color);
        }
        if let Some(z) = partial.z_index {
            element.z_index = z;
        }
        true
    }

    /// Insert an element on top of its layer and record the addition for undo.
    pub fn commit_add(&mut self, mut element: MapElement) -> ElementId {
        let id = element.id;
        element.seq = self.stamp();
        self.push_edit(Edit::Added(element.clone()));
        self.elements.insert(id, element);
        id
    }

    /// Remove an element and record the removal for undo.
    pub fn remove_with_history(&mut self, id: &ElementId) -> Option<MapElement> {
        let element = self.elements.remove(id)?;
        self.push_edit(Edit::Removed(element.clone()));
        Some(element)
    }

    fn push_edit(&mut self, edit: Edit) {
        self.redo_stack.clear();
        if self.max_undo == 0 {
            return;
        }
        self.undo_stack.push_back(edit);
        while self.undo_stack.len() > self.max_undo {
            self.undo_stack.pop_front();
        }
    }

    /// Revert the most recent edit.
    ///
    /// The redo entry holds the element as it was just before the undo, so
    /// renames and restacks made since the edit survive a redo.
    pub fn undo(&mut self) -> Option<Change> {
        let edit = self.undo_stack.pop_back()?;
        let (change, redo) = self.revert(edit);
        self.redo_stack.push(redo);
        Some(change)
    }

    /// Reapply the most recently undone edit.
    pub fn redo(&mut self) -> Option<Change> {
        let edit = self.redo_stack.pop()?;
        let (change, undo) = self.reapply(edit);
        self.undo_stack.push_back(undo);
        Some(change)
    }

    fn revert(&mut self, edit: Edit) -> (Change, Edit) {
        match edit {
            Edit::Added(element) => {
                let live = self.elements.remove(&element.id).unwrap_or(element);
                (Change::Removed(live.id), Edit::Added(live))
            }
            Edit::Removed(element) => {
                self.elements.insert(element.id, element.clone());
                (Change::Inserted(element.clone()), Edit::Removed(element))
            }
        }
    }

    fn reapply(&mut self, edit: Edit) -> (Change, Edit) {
        match edit {
            Edit::Added(element) => {
                self.elements.insert(element.id, element.clone());
                (Change::Inserted(element.clone()), Edit::Added(element))
            }
            Edit::Removed(element) => {
                let live = self.elements.remove(&element.id).unwrap_or(element);
                (Change::Removed(live.id), Edit::Removed(live))
            }
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of steps currently available to undo.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Replace all elements and forget history. Elements stack in the order given.
    pub fn load_snapshot(&mut self, elements: Vec<MapElement>) {
        self.elements.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.next_seq = 0;
        for element in elements {
            self.insert(element);
        }
    }

    /// Return all elements sorted by `(z_index, seq, id)` for draw order.
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<&MapElement> {
        let mut elements: Vec<&MapElement> = self.elements.values().collect();
        elements.sort_by(|a, b| {
            a.z_index.cmp(&b.z_index).then_with(|| a.seq.cmp(&b.seq)).then_with(|| a.id.cmp(&b.id))
        });
        elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for MapDoc {
    fn default() -> Self {
        Self::new()
    }
}
