//! # Canvasboard Renderer
//!
//! Pan/zoom viewport, render frames, and the interaction surface that turns
//! pointer, wheel, key and resize events into shape store operations.
//!
//! Frames are plain serializable data; whatever paints them (a browser
//! canvas, a terminal, a test) only needs the drawables and the transform.

pub mod viewport;
pub mod render_data;
pub mod surface;

pub use viewport::Viewport;
pub use render_data::{Drawable, Primitive, RenderFrame};
pub use surface::{CanvasSurface, Response, SurfaceEvent};
