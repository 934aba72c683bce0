//! Drawing engine: turns pointer, wheel and key events into document edits.
//!
//! The host forwards raw events in screen pixels; every handler returns the
//! `Action`s the host should apply (new elements, previews, cursor changes).
//! Nothing here touches a rendering surface, so the whole state machine runs
//! under plain unit tests.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info};

use crate::camera::Camera;
use crate::classify::{ClassifiedShape, Stroke, classify_with};
use crate::config::CanvasConfig;
use crate::consts::{MIN_FREEHAND_POINTS, MIN_PEN_POINTS, MIN_POLYGON_POINTS};
use crate::doc::{Change, ElementGeometry, ElementId, ElementKind, MapDoc, MapElement, PartialMapElement};
use crate::geom::{Point, Rect};
use crate::hit::hit_test;
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::overlay::{ClimateShade, GraticuleLine, GridGeometry, climate_shading, graticule};
use crate::projection::{MapExtent, ProjectionMode, adjust_for_sphere_distortion};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(MapElement),
    ElementUpdated { id: ElementId, fields: PartialMapElement },
    ElementDeleted { id: ElementId },
    /// Provisional geometry for the gesture in progress.
    Preview(ElementGeometry),
    PreviewCleared,
    ToolChanged(Tool),
    SelectionChanged(Option<ElementId>),
    ContextMenu { id: ElementId, screen: Point },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state.
pub struct EngineCore {
    pub doc: MapDoc,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    /// Size of the loaded map in map pixels.
    pub extent: MapExtent,
    /// Size of the host's drawing surface in screen pixels.
    pub viewport: MapExtent,
    pub config: CanvasConfig,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(CanvasConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            doc: MapDoc::with_max_undo(config.max_undo),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            extent: MapExtent::default().or_default_size(),
            viewport: MapExtent::default(),
            config,
        }
    }

    // --- Data inputs ---

    /// Switch to a new base map. A zero or invalid size means a blank 2048×1024 map.
    pub fn load_map(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.extent = MapExtent::new(width, height).or_default_size();
        self.camera.fit(self.extent, self.viewport);
        info!(width = self.extent.width, height = self.extent.height, "map loaded");
        vec![Action::RenderNeeded]
    }

    /// Replace all elements, e.g. when opening a saved map. Clears history.
    pub fn load_snapshot(&mut self, elements: Vec<MapElement>) {
        self.doc.load_snapshot(elements);
        self.ui.selected_id = None;
        self.input = InputState::Idle;
    }

    /// Update the host surface size and refit the map.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = MapExtent::new(width, height);
        self.camera.fit(self.extent, self.viewport);
    }

    /// Apply a sparse update (rename, recolour, restack) to an element.
    pub fn update_element(&mut self, id: ElementId, fields: PartialMapElement) -> Vec<Action> {
        if !self.doc.apply_partial(&id, &fields) {
            return Vec::new();
        }
        vec![Action::ElementUpdated { id, fields }, Action::RenderNeeded]
    }

    // --- Tool / mode ---

    /// Set the active tool, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = Vec::new();
        if !matches!(self.input, InputState::Idle) {
            actions.push(Action::PreviewCleared);
        }
        self.input = InputState::Idle;
        self.ui.tool = tool;
        debug!(?tool, "tool changed");
        actions.push(Action::ToolChanged(tool));
        actions.push(Action::SetCursor(tool.cursor().to_owned()));
        actions
    }

    pub fn set_projection_mode(&mut self, mode: ProjectionMode) -> Vec<Action> {
        if self.ui.projection_mode == mode {
            return Vec::new();
        }
        self.ui.projection_mode = mode;
        debug!(?mode, "projection mode changed");
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match button {
            // A drawing gesture owns the pointer until it finishes or is cancelled.
            Button::Middle if self.input.is_drawing() => Vec::new(),
            Button::Middle => self.begin_pan(screen_pt),
            Button::Secondary => self.secondary_click(screen_pt, world),
            Button::Primary => match self.ui.tool {
                Tool::Select => self.select_at(world),
                Tool::Pan => self.begin_pan(screen_pt),
                Tool::Polygon => self.place_polygon_vertex(world),
                tool if tool.is_stroke() => {
                    self.input = InputState::DrawingStroke { tool, stroke: Stroke::starting_at(world) };
                    Vec::new()
                }
                tool => {
                    self.input = InputState::DrawingShape { tool, anchor: world, current: world };
                    Vec::new()
                }
            },
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let (dx, dy) = (screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
                self.camera.pan_by(dx, dy);
                vec![Action::RenderNeeded]
            }
            InputState::DrawingStroke { tool, stroke } => {
                stroke.push(world);
                let tool = *tool;
                let stroke = stroke.clone();
                vec![Action::Preview(self.stroke_preview(tool, stroke))]
            }
            InputState::DrawingShape { tool, anchor, current } => {
                *current = world;
                vec![Action::Preview(ElementGeometry::Shape(drag_shape(*tool, *anchor, world)))]
            }
            InputState::PlacingPolygon { points } => {
                let mut rubber_band = points.clone();
                rubber_band.push(world);
                vec![Action::Preview(ElementGeometry::Shape(ClassifiedShape::Polygon { points: rubber_band }))]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match std::mem::take(&mut self.input) {
            InputState::Panning { .. } => vec![Action::SetCursor(self.ui.tool.cursor().to_owned())],
            InputState::DrawingStroke { tool, stroke } if button == Button::Primary => self.finish_stroke(tool, stroke),
            InputState::DrawingShape { tool, anchor, .. } if button == Button::Primary => {
                let shape = drag_shape(tool, anchor, world);
                let name = shape.kind().to_string();
                self.finish_element(tool, ElementKind::Shape, ElementGeometry::Shape(shape), name, false)
            }
            // Polygons persist across clicks; anything else is left as it was.
            other => {
                self.input = other;
                Vec::new()
            }
        }
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if self.camera.zoom_at(screen_pt, delta.dy, self.config.zoom_step) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selection(),
            "Escape" => {
                if matches!(self.input, InputState::Idle) {
                    return Vec::new();
                }
                self.input = InputState::Idle;
                vec![Action::PreviewCleared]
            }
            "z" | "Z" if modifiers.command() && modifiers.shift => self.redo(),
            "z" | "Z" if modifiers.command() => self.undo(),
            "y" | "Y" if modifiers.command() => self.redo(),
            _ => Vec::new(),
        }
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        let change = self.doc.undo();
        self.history_actions(change)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let change = self.doc.redo();
        self.history_actions(change)
    }

    fn history_actions(&mut self, change: Option<Change>) -> Vec<Action> {
        match change {
            None => Vec::new(),
            Some(Change::Inserted(element)) => vec![Action::ElementCreated(element), Action::RenderNeeded],
            Some(Change::Removed(id)) => {
                let mut actions = vec![Action::ElementDeleted { id }];
                if self.ui.selected_id == Some(id) {
                    self.ui.selected_id = None;
                    actions.push(Action::SelectionChanged(None));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    /// Remove the selected element through history.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id.take() else {
            return Vec::new();
        };
        if self.doc.remove_with_history(&id).is_none() {
            return vec![Action::SelectionChanged(None)];
        }
        info!(%id, "element deleted");
        vec![Action::ElementDeleted { id }, Action::SelectionChanged(None), Action::RenderNeeded]
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&MapElement> {
        self.doc.get(id)
    }

    /// Graticule lines for the current map, when the overlay is on.
    #[must_use]
    pub fn graticule_lines(&self) -> Vec<GraticuleLine> {
        if !self.ui.show_graticule {
            return Vec::new();
        }
        let spacing = self.config.graticule_spacing;
        graticule(self.extent, spacing, spacing)
    }

    /// Shading for each of the planet's climate zones, when the overlay is on.
    #[must_use]
    pub fn climate_overlay(&self) -> Vec<ClimateShade> {
        if !self.ui.show_climate {
            return Vec::new();
        }
        climate_shading(&self.ui.climate_zones, self.extent)
    }

    #[must_use]
    pub fn grid_overlay(&self) -> GridGeometry {
        self.ui.grid.geometry(self.extent)
    }

    // --- Gesture helpers ---

    fn begin_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        self.input = InputState::Panning { last_screen: screen_pt };
        vec![Action::SetCursor("grabbing".to_owned())]
    }

    fn select_at(&mut self, world: Point) -> Vec<Action> {
        let hit = hit_test(world, &self.doc, &self.camera);
        if hit == self.ui.selected_id {
            return Vec::new();
        }
        self.ui.selected_id = hit;
        vec![Action::SelectionChanged(hit), Action::RenderNeeded]
    }

    fn secondary_click(&mut self, screen_pt: Point, world: Point) -> Vec<Action> {
        if let InputState::PlacingPolygon { points } = &mut self.input {
            let points = std::mem::take(points);
            self.input = InputState::Idle;
            return self.finish_polygon(points);
        }
        if self.ui.tool != Tool::Select {
            return Vec::new();
        }
        let Some(id) = hit_test(world, &self.doc, &self.camera) else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if self.ui.selected_id != Some(id) {
            self.ui.selected_id = Some(id);
            actions.push(Action::SelectionChanged(Some(id)));
        }
        actions.push(Action::ContextMenu { id, screen: screen_pt });
        actions
    }

    fn place_polygon_vertex(&mut self, world: Point) -> Vec<Action> {
        let points = match &mut self.input {
            InputState::PlacingPolygon { points } => {
                points.push(world);
                points.clone()
            }
            _ => {
                self.input = InputState::PlacingPolygon { points: vec![world] };
                vec![world]
            }
        };
        vec![Action::Preview(ElementGeometry::Shape(ClassifiedShape::Polygon { points }))]
    }

    fn finish_polygon(&mut self, points: Vec<Point>) -> Vec<Action> {
        if points.len() < MIN_POLYGON_POINTS {
            debug!(vertices = points.len(), "polygon discarded");
            return self.discard(Tool::Polygon);
        }
        let geometry = ElementGeometry::Shape(ClassifiedShape::Polygon { points });
        self.finish_element(Tool::Polygon, ElementKind::Shape, geometry, "New Polygon".to_owned(), false)
    }

    fn stroke_preview(&self, tool: Tool, stroke: Stroke) -> ElementGeometry {
        match tool {
            Tool::Freehand => ElementGeometry::Shape(classify_with(&stroke, &self.config.classifier)),
            Tool::Pen => ElementGeometry::Stroke { points: stroke.into_points(), width: self.ui.pen_width },
            _ => ElementGeometry::Path { points: stroke.into_points() },
        }
    }

    fn finish_stroke(&mut self, tool: Tool, stroke: Stroke) -> Vec<Action> {
        match tool {
            Tool::Freehand => self.finish_freehand(stroke),
            Tool::Pen => {
                if stroke.points().len() < MIN_PEN_POINTS {
                    return self.discard(tool);
                }
                let geometry = ElementGeometry::Stroke { points: stroke.into_points(), width: self.ui.pen_width };
                let name = ElementKind::Pen.default_name().to_owned();
                self.finish_element(tool, ElementKind::Pen, geometry, name, false)
            }
            _ => {
                let kind = if tool == Tool::Border { ElementKind::Border } else { ElementKind::Terrain };
                let geometry = ElementGeometry::Path { points: stroke.into_points() };
                self.finish_element(tool, kind, geometry, kind.default_name().to_owned(), false)
            }
        }
    }

    fn finish_freehand(&mut self, stroke: Stroke) -> Vec<Action> {
        if stroke.points().len() < MIN_FREEHAND_POINTS {
            debug!(samples = stroke.points().len(), "freehand stroke too short");
            return self.discard(Tool::Freehand);
        }
        let stroke = if self.ui.projection_mode == ProjectionMode::Sphere && self.extent.is_valid() {
            let adjusted = adjust_for_sphere_distortion(stroke.points(), self.extent);
            Stroke::new(adjusted).unwrap_or(stroke)
        } else {
            stroke
        };
        let shape = classify_with(&stroke, &self.config.classifier);
        let name = format!("Freehand {}", shape.kind());
        self.finish_element(Tool::Freehand, ElementKind::Shape, ElementGeometry::Shape(shape), name, true)
    }

    fn finish_element(
        &mut self,
        tool: Tool,
        kind: ElementKind,
        geometry: ElementGeometry,
        name: String,
        projection_aware: bool,
    ) -> Vec<Action> {
        let element = MapElement {
            name,
            color: self.ui.color.clone(),
            projection_aware,
            ..MapElement::new(kind, geometry, self.extent)
        };
        info!(id = %element.id, ?kind, name = %element.name, "element created");
        let id = self.doc.commit_add(element);

        let mut actions = vec![Action::PreviewCleared];
        if let Some(stored) = self.doc.get(&id) {
            actions.push(Action::ElementCreated(stored.clone()));
        }
        actions.push(Action::RenderNeeded);
        actions.extend(self.after_tool_use(tool));
        actions
    }

    fn discard(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = vec![Action::PreviewCleared];
        actions.extend(self.after_tool_use(tool));
        actions
    }

    fn after_tool_use(&mut self, tool: Tool) -> Vec<Action> {
        if tool.returns_to_select() { self.set_tool(Tool::Select) } else { Vec::new() }
    }
}

/// The shape a circle or rectangle drag describes.
fn drag_shape(tool: Tool, anchor: Point, current: Point) -> ClassifiedShape {
    if tool == Tool::Circle {
        ClassifiedShape::Circle { center: anchor, radius: anchor.distance_to(current) }
    } else {
        ClassifiedShape::Rectangle(Rect::from_corners(anchor, current))
    }
}
