use serde::{Deserialize, Serialize};

use crate::commands::{AddShapeCommand, CommandHistory, MoveShapeCommand, RemoveShapeCommand};
use crate::geometry::Point;
use crate::shape::{generate_id, Shape, ShapeId, ShapeKind};

/// Keys the store reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKey {
    Delete,
    Backspace,
    Undo,
    Redo,
}

/// Ordered collection of shapes plus the current selection.
///
/// Vector order is z-order: later shapes draw on top. Every mutating method
/// returns `true` when the collection changed so the caller knows to persist
/// and redraw.
#[derive(Debug, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    selected: Option<ShapeId>,
    /// Command history for undo/redo.
    history: CommandHistory,
}

impl ShapeStore {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            selected: None,
            history: CommandHistory::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Append a new shape of `kind` with a fresh id and per-kind defaults.
    pub fn add(&mut self, kind: ShapeKind) -> ShapeId {
        let mut id = generate_id(kind);
        while self.contains(&id) {
            id = generate_id(kind);
        }
        let position = kind.spawn_position(self.shapes.len());
        let shape = Shape {
            id: id.clone(),
            kind,
            position,
            size: kind.default_size(),
            fill: kind.default_fill().to_string(),
        };
        log::debug!("add {:?} {} at ({}, {})", kind, id, position.x, position.y);
        self.history
            .execute(Box::new(AddShapeCommand::new(shape)), &mut self.shapes);
        id
    }

    /// Set the position of an existing shape. Unknown ids and non-finite
    /// coordinates are ignored.
    pub fn move_shape(&mut self, id: &str, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            log::warn!("ignoring move of {} to non-finite ({}, {})", id, x, y);
            return false;
        }
        let command = MoveShapeCommand::new(id, Point::new(x, y));
        self.history.execute(Box::new(command), &mut self.shapes)
    }

    /// Delete a shape, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self
            .history
            .execute(Box::new(RemoveShapeCommand::new(id)), &mut self.shapes);
        if removed && self.is_selected(id) {
            self.selected = None;
        }
        removed
    }

    /// Select a shape, or clear with `None`. Selecting an id that is not in
    /// the collection leaves the selection as it was and returns `false`.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if !self.contains(id) => false,
            Some(id) => {
                self.selected = Some(id.to_string());
                true
            }
            None => {
                self.selected = None;
                true
            }
        }
    }

    /// Swap in a whole new collection (e.g. after a reload). History is
    /// dropped and a selection that no longer resolves is cleared.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.history.clear();
        self.revalidate_selection();
    }

    /// Apply a key press. Returns `true` when the collection changed.
    pub fn handle_key(&mut self, key: EditKey) -> bool {
        match key {
            EditKey::Delete | EditKey::Backspace => match self.selected.clone() {
                Some(id) => self.remove(&id),
                None => false,
            },
            EditKey::Undo => self.undo(),
            EditKey::Redo => self.redo(),
        }
    }

    // ── Undo / Redo ──────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo(&mut self.shapes);
        self.revalidate_selection();
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo(&mut self.shapes);
        self.revalidate_selection();
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    fn revalidate_selection(&mut self) {
        let stale = self
            .selected
            .as_deref()
            .is_some_and(|id| !self.contains(id));
        if stale {
            log::debug!("selection {:?} no longer exists, clearing", self.selected);
            self.selected = None;
        }
    }
}
