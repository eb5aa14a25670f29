use canvasboard_core::spatial::SpatialIndex;
use canvasboard_core::{EditKey, Point, ShapeId, ShapeStore};
use serde::{Deserialize, Serialize};

use crate::render_data::RenderFrame;
use crate::Viewport;

/// Input delivered to the canvas surface. Pointer coordinates are screen
/// pixels except `DragEnd`, which carries the shape's new canvas position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// Press and release without movement.
    Click { x: f64, y: f64 },
    /// A shape drag finished.
    DragEnd { id: ShapeId, x: f64, y: f64 },
    /// The empty stage was dragged.
    StageDrag { dx: f64, dy: f64 },
    Wheel { delta_y: f64, x: f64, y: f64 },
    Key { key: EditKey },
    /// The container changed pixel size.
    Resize { width: f64, height: f64 },
}

/// What an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// The shape collection changed and should be persisted.
    pub shapes_changed: bool,
    /// Anything visible changed.
    pub redraw: bool,
}

impl Response {
    fn shapes(changed: bool) -> Self {
        Self {
            shapes_changed: changed,
            redraw: changed,
        }
    }

    fn view() -> Self {
        Self {
            shapes_changed: false,
            redraw: true,
        }
    }
}

/// Translates pointer, wheel, key and resize events into store and
/// viewport operations.
#[derive(Debug, Default)]
pub struct CanvasSurface {
    viewport: Viewport,
}

impl CanvasSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn handle(&mut self, store: &mut ShapeStore, event: SurfaceEvent) -> Response {
        log::trace!("surface event {:?}", event);
        match event {
            SurfaceEvent::Click { x, y } => {
                let before = store.selected().map(str::to_owned);
                let hit = self.hit_test(store, x, y);
                store.select(hit.as_deref());
                Response {
                    shapes_changed: false,
                    redraw: before.as_deref() != store.selected(),
                }
            }
            SurfaceEvent::DragEnd { id, x, y } => Response::shapes(store.move_shape(&id, x, y)),
            SurfaceEvent::StageDrag { dx, dy } => {
                self.viewport.pan(dx, dy);
                Response::view()
            }
            SurfaceEvent::Wheel { delta_y, x, y } => {
                self.viewport.zoom(delta_y, x, y);
                Response::view()
            }
            SurfaceEvent::Key { key } => {
                let selected_before = store.selected().map(str::to_owned);
                let changed = store.handle_key(key);
                Response {
                    shapes_changed: changed,
                    redraw: changed || selected_before.as_deref() != store.selected(),
                }
            }
            SurfaceEvent::Resize { width, height } => {
                self.viewport.resize(width, height);
                Response::view()
            }
        }
    }

    /// Id of the topmost shape under a screen position.
    pub fn hit_test(&self, store: &ShapeStore, screen_x: f64, screen_y: f64) -> Option<ShapeId> {
        let point = self.viewport.screen_to_canvas(Point::new(screen_x, screen_y));
        let index = SpatialIndex::build(store.shapes());
        index
            .topmost_at(store.shapes(), &point)
            .map(|shape| shape.id.clone())
    }

    /// Ids of shapes intersecting the visible area, bottom to top.
    pub fn visible_shapes(&self, store: &ShapeStore) -> Vec<ShapeId> {
        let index = SpatialIndex::build(store.shapes());
        let mut z: Vec<usize> = index
            .query_viewport(&self.viewport.visible_bounds())
            .into_iter()
            .map(|entry| entry.z_index)
            .collect();
        z.sort_unstable();
        z.into_iter()
            .filter_map(|i| store.shapes().get(i).map(|s| s.id.clone()))
            .collect()
    }

    /// Drawables for every shape at least partly on screen.
    pub fn frame(&self, store: &ShapeStore) -> RenderFrame {
        RenderFrame::build(store, self.viewport, &self.visible_shapes(store))
    }
}
