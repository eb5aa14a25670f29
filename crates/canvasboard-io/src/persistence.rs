use canvasboard_core::shape::validate_collection;
use canvasboard_core::{default_flow, default_shapes, FlowGraph, Shape};

use crate::storage::{KeyValueStore, PersistenceError};

/// Storage key holding the shape list.
pub const SHAPES_KEY: &str = "shapes";
/// Storage key holding the flow diagram.
pub const FLOW_KEY: &str = "flow";

/// Reads and writes the shape list and the flow diagram through a
/// key-value store. Values are always replaced whole.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// The stored shape list, or the default pair when nothing usable is stored.
    pub fn load_shapes(&self) -> Vec<Shape> {
        match self.read_shapes() {
            Ok(Some(shapes)) => shapes,
            Ok(None) => {
                log::info!("no stored shapes, using defaults");
                default_shapes()
            }
            Err(e) => {
                log::warn!("stored shapes unreadable ({}), using defaults", e);
                default_shapes()
            }
        }
    }

    /// The stored shape list, or an empty list when nothing usable is stored.
    pub fn load_raw_shapes(&self) -> Vec<Shape> {
        self.stored_shapes().unwrap_or_default()
    }

    /// The stored shape list, empty when nothing is stored. Unlike the
    /// loaders above, an unreadable or invalid list is an error.
    pub fn stored_shapes(&self) -> Result<Vec<Shape>, PersistenceError> {
        Ok(self.read_shapes()?.unwrap_or_default())
    }

    fn read_shapes(&self) -> Result<Option<Vec<Shape>>, PersistenceError> {
        let Some(raw) = self.store.get(SHAPES_KEY)? else {
            return Ok(None);
        };
        let shapes: Vec<Shape> = serde_json::from_str(&raw)?;
        validate_collection(&shapes).map_err(PersistenceError::InvalidShapes)?;
        Ok(Some(shapes))
    }

    /// Replace the stored list. A list with invalid shapes or duplicate ids
    /// is refused and storage is left as it was.
    pub fn save_shapes(&mut self, shapes: &[Shape]) -> Result<(), PersistenceError> {
        validate_collection(shapes).map_err(PersistenceError::InvalidShapes)?;
        let json = serde_json::to_string(shapes)?;
        self.store.set(SHAPES_KEY, &json)?;
        log::debug!("saved {} shapes", shapes.len());
        Ok(())
    }

    /// The stored flow diagram, or the default one.
    pub fn load_flow(&self) -> FlowGraph {
        let stored = self
            .store
            .get(FLOW_KEY)
            .and_then(|raw| match raw {
                Some(raw) => Ok(Some(serde_json::from_str::<FlowGraph>(&raw)?)),
                None => Ok(None),
            });
        match stored {
            Ok(Some(graph)) if graph.is_consistent() => graph,
            Ok(Some(_)) => {
                log::warn!("stored flow is inconsistent, using default");
                default_flow()
            }
            Ok(None) => default_flow(),
            Err(e) => {
                log::warn!("stored flow unreadable ({}), using default", e);
                default_flow()
            }
        }
    }

    pub fn save_flow(&mut self, graph: &FlowGraph) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(graph)?;
        self.store.set(FLOW_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use canvasboard_core::{ShapeKind, ShapeStore};

    #[test]
    fn test_empty_store_gives_defaults() {
        let p = Persistence::new(MemoryStore::new());
        assert_eq!(p.load_shapes(), default_shapes());
        assert!(p.load_raw_shapes().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let mut store = ShapeStore::new(default_shapes());
        store.add(ShapeKind::Circle);
        store.move_shape("r1", 3.5, -2.0);

        let mut p = Persistence::new(MemoryStore::new());
        p.save_shapes(store.shapes()).unwrap();
        assert_eq!(p.load_shapes(), store.shapes());
    }

    #[test]
    fn test_malformed_falls_back() {
        let mut kv = MemoryStore::new();
        kv.set(SHAPES_KEY, "{not json").unwrap();
        assert_eq!(Persistence::new(kv.clone()).load_shapes(), default_shapes());

        kv.set(SHAPES_KEY, r##"[{"id":"x","type":"hexagon","x":0,"y":0,"size":1,"fill":"#000"}]"##)
            .unwrap();
        assert_eq!(Persistence::new(kv.clone()).load_shapes(), default_shapes());

        kv.set(SHAPES_KEY, r##"[{"id":"x","type":"rect","x":0,"y":0,"size":-4,"fill":"#000"}]"##)
            .unwrap();
        let p = Persistence::new(kv);
        assert_eq!(p.load_shapes(), default_shapes());
        assert!(p.load_raw_shapes().is_empty());
        assert!(matches!(p.stored_shapes(), Err(PersistenceError::InvalidShapes(_))));
    }

    #[test]
    fn test_save_refuses_invalid_list() {
        let mut p = Persistence::new(MemoryStore::new());
        p.save_shapes(&default_shapes()).unwrap();
        let dup = vec![
            Shape::new("a", ShapeKind::Rect, 0.0, 0.0, 1.0, "#fff"),
            Shape::new("a", ShapeKind::Circle, 0.0, 0.0, 1.0, "#fff"),
        ];
        assert!(matches!(p.save_shapes(&dup), Err(PersistenceError::InvalidShapes(_))));
        let nan = vec![Shape::new("n", ShapeKind::Rect, f64::NAN, 0.0, 1.0, "#fff")];
        assert!(p.save_shapes(&nan).is_err());
        assert_eq!(p.stored_shapes().unwrap(), default_shapes());
    }

    #[test]
    fn test_empty_list_is_kept() {
        let mut p = Persistence::new(MemoryStore::new());
        p.save_shapes(&[]).unwrap();
        assert!(p.load_shapes().is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = Persistence::new(FileStore::open(dir.path()).unwrap());
        let shapes = vec![Shape::new("c9", ShapeKind::Circle, 1.0, 2.0, 3.0, "#123456")];
        p.save_shapes(&shapes).unwrap();

        let reopened = Persistence::new(FileStore::open(dir.path()).unwrap());
        assert_eq!(reopened.load_shapes(), shapes);
    }

    #[test]
    fn test_flow_round_trip_and_fallback() {
        let mut p = Persistence::new(MemoryStore::new());
        assert_eq!(p.load_flow(), default_flow());

        let mut graph = default_flow();
        graph.connect("1", "3").unwrap();
        p.save_flow(&graph).unwrap();
        assert_eq!(p.load_flow(), graph);

        let mut kv = p.into_inner();
        kv.set(FLOW_KEY, "garbage").unwrap();
        assert_eq!(Persistence::new(kv.clone()).load_flow(), default_flow());

        let mut renamed = serde_json::to_value(&graph).unwrap();
        renamed["nodes"]["1"]["id"] = "start".into();
        kv.set(FLOW_KEY, &renamed.to_string()).unwrap();
        assert_eq!(Persistence::new(kv).load_flow(), default_flow());
    }
}
