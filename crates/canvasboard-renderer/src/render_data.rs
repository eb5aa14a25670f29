use canvasboard_core::{Shape, ShapeId, ShapeKind, ShapeStore};
use serde::{Deserialize, Serialize};

use crate::Viewport;

pub const SELECTION_STROKE_COLOR: &str = "black";
pub const SELECTION_STROKE_WIDTH: f64 = 2.0;

/// Geometry of a drawable in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "primitive", rename_all = "lowercase")]
pub enum Primitive {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, radius: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

/// A shape ready for drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub id: String,
    #[serde(flatten)]
    pub primitive: Primitive,
    pub fill: String,
    /// Outline; only the selected shape has one.
    pub stroke: Option<Stroke>,
}

impl Drawable {
    pub fn from_shape(shape: &Shape, selected: bool) -> Self {
        let primitive = match shape.kind {
            ShapeKind::Rect => Primitive::Rect {
                x: shape.position.x,
                y: shape.position.y,
                width: shape.size,
                height: shape.size,
            },
            ShapeKind::Circle => Primitive::Circle {
                cx: shape.position.x,
                cy: shape.position.y,
                radius: shape.size,
            },
        };
        Self {
            id: shape.id.clone(),
            primitive,
            fill: shape.fill.clone(),
            stroke: selected.then(|| Stroke {
                color: SELECTION_STROKE_COLOR.to_string(),
                width: SELECTION_STROKE_WIDTH,
            }),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.stroke.is_some()
    }
}

/// Complete frame: drawables bottom to top plus the transform to draw them with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub drawables: Vec<Drawable>,
}

impl RenderFrame {
    /// Frame holding the shapes named in `visible`, which must be in z-order.
    pub fn build(store: &ShapeStore, viewport: Viewport, visible: &[ShapeId]) -> Self {
        Self {
            viewport,
            drawables: visible
                .iter()
                .filter_map(|id| store.get(id))
                .map(|s| Drawable::from_shape(s, store.is_selected(&s.id)))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvasboard_core::default_shapes;

    fn all_ids(store: &ShapeStore) -> Vec<ShapeId> {
        store.shapes().iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_frame_follows_z_order_and_selection() {
        let mut store = ShapeStore::new(default_shapes());
        store.select(Some("c1"));
        let frame = RenderFrame::build(&store, Viewport::default(), &all_ids(&store));
        assert_eq!(frame.drawables.len(), 2);
        assert_eq!(frame.drawables[0].id, "r1");
        assert!(!frame.drawables[0].is_highlighted());
        assert!(frame.drawables[1].is_highlighted());
        assert_eq!(
            frame.drawables[1].primitive,
            Primitive::Circle { cx: 320.0, cy: 200.0, radius: 60.0 }
        );
        assert_eq!(
            frame.drawables[0].primitive,
            Primitive::Rect { x: 100.0, y: 100.0, width: 120.0, height: 120.0 }
        );
    }

    #[test]
    fn test_frame_json() {
        let store = ShapeStore::new(default_shapes());
        let json = RenderFrame::build(&store, Viewport::default(), &all_ids(&store))
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["drawables"][0]["primitive"], "rect");
        assert_eq!(value["drawables"][1]["radius"], 60.0);
        let empty = RenderFrame::build(&store, Viewport::default(), &[]);
        assert!(empty.drawables.is_empty());
    }
}
