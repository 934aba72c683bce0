//! Geometry and input core for the world-map canvas.
//!
//! The map editor hands this crate raw pointer samples and the active map's
//! pixel extent. In return it produces map elements: freehand strokes
//! classified into circles, rectangles or polygons, direct-drawn shapes,
//! terrain and border paths, and pen strokes. Everything here is synchronous
//! and side-effect free apart from the in-memory [`doc::MapDoc`]; the host
//! UI is responsible for rendering and for persisting the resulting
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`geom`] | Points, rectangles, distances and perimeters |
//! | [`projection`] | Mercator-style flat ↔ lat/lon mapping and sphere-mode compensation |
//! | [`simplify`] | Ramer–Douglas–Peucker path simplification |
//! | [`classify`] | Freehand stroke → circle / rectangle / polygon |
//! | [`smooth`] | Quadratic smoothing for terrain and border strokes |
//! | [`overlay`] | Graticule, climate bands and square / hex grids |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`doc`] | Map element store with undo / redo |
//! | [`hit`] | Hit-testing against map elements |
//! | [`input`] | Tools, buttons and the gesture state machine |
//! | [`engine`] | [`engine::EngineCore`]: pointer events → actions |
//! | [`config`] | Tunable thresholds loaded from the environment |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod classify;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod projection;
pub mod simplify;
pub mod smooth;

pub use classify::{ClassifiedShape, ClassifierConfig, Stroke, classify};
pub use geom::{Point, Rect};
pub use projection::{GeoCoord, MapExtent, adjust_for_sphere_distortion, flat_to_geo, geo_to_flat};
pub use simplify::simplify;
