use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{BBox, Point};

/// Unique shape identifier.
pub type ShapeId = String;

const ID_SUFFIX_LEN: usize = 5;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Closed set of shape variants. Serialized as `"rect"` / `"circle"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
}

impl ShapeKind {
    /// Single-letter prefix used for generated ids.
    pub fn id_prefix(&self) -> char {
        match self {
            ShapeKind::Rect => 'r',
            ShapeKind::Circle => 'c',
        }
    }

    pub fn default_size(&self) -> f64 {
        match self {
            ShapeKind::Rect => 100.0,
            ShapeKind::Circle => 50.0,
        }
    }

    pub fn default_fill(&self) -> &'static str {
        match self {
            ShapeKind::Rect => "#fbbf24",
            ShapeKind::Circle => "#a78bfa",
        }
    }

    /// Placement for the shape added when the collection already holds `count` shapes.
    /// Successive shapes step diagonally so they never land exactly on top of each other.
    pub fn spawn_position(&self, count: usize) -> Point {
        let step = 20.0 * count as f64;
        match self {
            ShapeKind::Rect => Point::new(80.0 + step, 80.0 + step),
            ShapeKind::Circle => Point::new(200.0 + step, 160.0 + step),
        }
    }
}

impl std::str::FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rect" | "rectangle" => Ok(ShapeKind::Rect),
            "circle" => Ok(ShapeKind::Circle),
            other => Err(format!("unknown shape kind '{}'", other)),
        }
    }
}

/// A rectangle or circle on the canvas.
///
/// For rectangles `position` is the top-left corner and `size` the edge length;
/// for circles `position` is the center and `size` the radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    #[serde(flatten)]
    pub position: Point,
    pub size: f64,
    pub fill: String,
}

impl Shape {
    pub fn new(id: &str, kind: ShapeKind, x: f64, y: f64, size: f64, fill: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            position: Point::new(x, y),
            size,
            fill: fill.to_string(),
        }
    }

    pub fn bbox(&self) -> BBox {
        match self.kind {
            ShapeKind::Rect => BBox::square(self.position, self.size),
            ShapeKind::Circle => BBox::around(self.position, self.size),
        }
    }

    /// Exact containment test, used after a bounding-box prefilter.
    pub fn contains_point(&self, p: &Point) -> bool {
        match self.kind {
            ShapeKind::Rect => self.bbox().contains_point(p),
            ShapeKind::Circle => self.position.distance_to(p) <= self.size,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && self.size.is_finite()
            && self.size > 0.0
            && self.position.x.is_finite()
            && self.position.y.is_finite()
    }
}

/// The pair shown on a fresh canvas when nothing has been stored yet.
pub fn default_shapes() -> Vec<Shape> {
    vec![
        Shape::new("r1", ShapeKind::Rect, 100.0, 100.0, 120.0, "#60a5fa"),
        Shape::new("c1", ShapeKind::Circle, 320.0, 200.0, 60.0, "#34d399"),
    ]
}

/// The list a fresh shapes API starts with; also what fallback sync returns.
pub fn seed_shapes() -> Vec<Shape> {
    vec![
        Shape::new("r100", ShapeKind::Rect, 60.0, 80.0, 90.0, "#60a5fa"),
        Shape::new("c100", ShapeKind::Circle, 220.0, 180.0, 50.0, "#34d399"),
    ]
}

/// Generate a candidate id: kind prefix plus a short random base-36 suffix.
/// Uniqueness against a collection is the caller's job (see `ShapeStore::add`).
pub fn generate_id(kind: ShapeKind) -> ShapeId {
    let mut bits = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(ID_SUFFIX_LEN + 1);
    id.push(kind.id_prefix());
    for _ in 0..ID_SUFFIX_LEN {
        let digit = (bits % ID_ALPHABET.len() as u128) as usize;
        id.push(ID_ALPHABET[digit] as char);
        bits /= ID_ALPHABET.len() as u128;
    }
    id
}

/// Check a whole collection: every shape valid and every id unique.
pub fn validate_collection(shapes: &[Shape]) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for shape in shapes {
        if !shape.is_valid() {
            return Err(format!("invalid shape '{}'", shape.id));
        }
        if !seen.insert(shape.id.as_str()) {
            return Err(format!("duplicate shape id '{}'", shape.id));
        }
    }
    Ok(())
}
