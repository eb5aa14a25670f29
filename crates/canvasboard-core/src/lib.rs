//! # Canvasboard Core
//!
//! Shape model and the in-memory shape store behind the canvas editor:
//! ordered rectangles and circles, single selection, undo/redo via a
//! command-pattern journal, R-tree hit-testing, and the node/edge flow graph.

pub mod geometry;
pub mod shape;
pub mod store;
pub mod commands;
pub mod spatial;
pub mod flow;

pub use store::{EditKey, ShapeStore};
pub use shape::{default_shapes, seed_shapes, Shape, ShapeId, ShapeKind};
pub use geometry::{BBox, Point};
pub use flow::{default_flow, FlowError, FlowGraph};
