use crate::geometry::Point;
use crate::shape::{Shape, ShapeId};

/// A reversible mutation of the shape collection, recorded for undo/redo.
pub trait Command: std::fmt::Debug + Send {
    /// Apply the change. Returns `false` when the target does not exist,
    /// in which case the command is not recorded.
    fn execute(&mut self, shapes: &mut Vec<Shape>) -> bool;
    /// Reverse a previously applied change.
    fn undo(&mut self, shapes: &mut Vec<Shape>);
    /// Human-readable description for the undo/redo history.
    fn description(&self) -> &str;
}

fn index_of(shapes: &[Shape], id: &str) -> Option<usize> {
    shapes.iter().position(|s| s.id == id)
}

// ══════════════════════════════════════════════════════════════════════
// Concrete Commands
// ══════════════════════════════════════════════════════════════════════

/// Append a shape on top of the z-order.
#[derive(Debug)]
pub struct AddShapeCommand {
    pub shape: Shape,
}

impl AddShapeCommand {
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }
}

impl Command for AddShapeCommand {
    fn execute(&mut self, shapes: &mut Vec<Shape>) -> bool {
        if index_of(shapes, &self.shape.id).is_some() {
            return false;
        }
        shapes.push(self.shape.clone());
        true
    }

    fn undo(&mut self, shapes: &mut Vec<Shape>) {
        if let Some(idx) = index_of(shapes, &self.shape.id) {
            shapes.remove(idx);
        }
    }

    fn description(&self) -> &str {
        "Add shape"
    }
}

/// Remove a shape by id.
#[derive(Debug)]
pub struct RemoveShapeCommand {
    pub id: ShapeId,
    /// The removed shape and its z-index (saved for undo).
    removed: Option<(usize, Shape)>,
}

impl RemoveShapeCommand {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            removed: None,
        }
    }
}

impl Command for RemoveShapeCommand {
    fn execute(&mut self, shapes: &mut Vec<Shape>) -> bool {
        match index_of(shapes, &self.id) {
            Some(idx) => {
                self.removed = Some((idx, shapes.remove(idx)));
                true
            }
            None => false,
        }
    }

    fn undo(&mut self, shapes: &mut Vec<Shape>) {
        if let Some((idx, shape)) = self.removed.take() {
            // Re-insert at the original z-index
            if idx <= shapes.len() {
                shapes.insert(idx, shape);
            } else {
                shapes.push(shape);
            }
        }
    }

    fn description(&self) -> &str {
        "Remove shape"
    }
}

/// Move a shape to an absolute position.
#[derive(Debug)]
pub struct MoveShapeCommand {
    pub id: ShapeId,
    pub to: Point,
    /// Position before the move (set on execute).
    from: Option<Point>,
}

impl MoveShapeCommand {
    pub fn new(id: &str, to: Point) -> Self {
        Self {
            id: id.to_string(),
            to,
            from: None,
        }
    }
}

impl Command for MoveShapeCommand {
    fn execute(&mut self, shapes: &mut Vec<Shape>) -> bool {
        match shapes.iter_mut().find(|s| s.id == self.id) {
            Some(shape) => {
                self.from = Some(shape.position);
                shape.position = self.to;
                true
            }
            None => false,
        }
    }

    fn undo(&mut self, shapes: &mut Vec<Shape>) {
        if let Some(from) = self.from {
            if let Some(shape) = shapes.iter_mut().find(|s| s.id == self.id) {
                shape.position = from;
            }
        }
    }

    fn description(&self) -> &str {
        "Move shape"
    }
}

/// Manages the undo/redo history stack.
#[derive(Debug, Default)]
pub struct CommandHistory {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Run a command and record it if it changed anything.
    pub fn execute(&mut self, mut command: Box<dyn Command>, shapes: &mut Vec<Shape>) -> bool {
        if !command.execute(shapes) {
            return false;
        }
        self.undo_stack.push(command);
        // Executing a new command clears the redo stack.
        self.redo_stack.clear();
        true
    }

    pub fn undo(&mut self, shapes: &mut Vec<Shape>) -> bool {
        if let Some(mut command) = self.undo_stack.pop() {
            command.undo(shapes);
            self.redo_stack.push(command);
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self, shapes: &mut Vec<Shape>) -> bool {
        if let Some(mut command) = self.redo_stack.pop() {
            command.execute(shapes);
            self.undo_stack.push(command);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{default_shapes, ShapeKind};

    #[test]
    fn test_remove_undo_restores_z_order() {
        let mut shapes = default_shapes();
        let mut history = CommandHistory::new();
        assert!(history.execute(Box::new(RemoveShapeCommand::new("r1")), &mut shapes));
        assert_eq!(shapes.len(), 1);
        assert!(history.undo(&mut shapes));
        assert_eq!(shapes, default_shapes());
    }

    #[test]
    fn test_failed_command_not_recorded() {
        let mut shapes = default_shapes();
        let mut history = CommandHistory::new();
        assert!(!history.execute(Box::new(RemoveShapeCommand::new("nope")), &mut shapes));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut shapes = Vec::new();
        let mut history = CommandHistory::new();
        let a = Shape::new("a", ShapeKind::Rect, 0.0, 0.0, 10.0, "#fff");
        let b = Shape::new("b", ShapeKind::Rect, 0.0, 0.0, 10.0, "#fff");
        history.execute(Box::new(AddShapeCommand::new(a)), &mut shapes);
        history.undo(&mut shapes);
        assert!(history.can_redo());
        history.execute(Box::new(AddShapeCommand::new(b)), &mut shapes);
        assert!(!history.can_redo());
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn test_move_undo_redo() {
        let mut shapes = default_shapes();
        let mut history = CommandHistory::new();
        history.execute(
            Box::new(MoveShapeCommand::new("c1", Point::new(1.0, 2.0))),
            &mut shapes,
        );
        assert_eq!(shapes[1].position, Point::new(1.0, 2.0));
        history.undo(&mut shapes);
        assert_eq!(shapes[1].position, Point::new(320.0, 200.0));
        history.redo(&mut shapes);
        assert_eq!(shapes[1].position, Point::new(1.0, 2.0));
    }
}
