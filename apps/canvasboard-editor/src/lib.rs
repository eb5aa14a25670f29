use serde::Serialize;

use canvasboard_core::{FlowGraph, ShapeId, ShapeKind, ShapeStore, Shape};
use canvasboard_io::{FileStore, KeyValueStore, Persistence};
use canvasboard_renderer::{CanvasSurface, RenderFrame, Response, SurfaceEvent, Viewport};
use canvasboard_sync::SyncClient;

pub mod config;
pub mod shell;

pub use config::EditorConfig;

pub const STATUS_LOADING: &str = "Loading from API...";
pub const STATUS_LOADED: &str = "Loaded shapes from API (mock or backend).";
pub const STATUS_LOAD_FAILED: &str = "Failed to load shapes.";
pub const STATUS_SAVING: &str = "Saving to API...";
pub const STATUS_SAVED: &str = "Saved to API (mock or backend).";
pub const STATUS_SAVE_FAILED: &str = "Failed to save.";

/// Which editor is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Canvas,
    Flow,
}

/// Everything one editing session owns: the canvas (shape store plus
/// surface), the flow diagram, local persistence, the sync client and the
/// status line.
///
/// Every change to shapes or to the flow diagram is written through to
/// storage straight away. A storage write failure is logged and the session
/// carries on.
pub struct Editor<S: KeyValueStore> {
    store: ShapeStore,
    surface: CanvasSurface,
    flow: FlowGraph,
    persistence: Persistence<S>,
    sync: SyncClient,
    status: String,
    tab: Tab,
}

impl Editor<FileStore> {
    /// Open the file-backed session described by `config`.
    pub fn from_config(config: &EditorConfig) -> Result<Self, String> {
        let store = FileStore::open(&config.storage_dir)
            .map_err(|e| format!("Failed to open storage: {}", e))?;
        Ok(Self::open(
            Persistence::new(store),
            SyncClient::from_config(&config.sync),
        ))
    }
}

impl<S: KeyValueStore> Editor<S> {
    pub fn open(persistence: Persistence<S>, sync: SyncClient) -> Self {
        let store = ShapeStore::new(persistence.load_shapes());
        let flow = persistence.load_flow();
        log::info!(
            "editor opened with {} shapes and {} flow nodes",
            store.len(),
            flow.node_count()
        );
        let mut editor = Self {
            store,
            surface: CanvasSurface::new(Viewport::default()),
            flow,
            persistence,
            sync,
            status: String::new(),
            tab: Tab::default(),
        };
        // Defaults become the stored value on first run.
        editor.persist_shapes();
        editor
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn flow(&self) -> &FlowGraph {
        &self.flow
    }

    pub fn viewport(&self) -> &Viewport {
        self.surface.viewport()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn frame(&self) -> RenderFrame {
        self.surface.frame(&self.store)
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    // ── Canvas ───────────────────────────────────────────────────────

    pub fn add_shape(&mut self, kind: ShapeKind) -> ShapeId {
        let id = self.store.add(kind);
        self.persist_shapes();
        id
    }

    pub fn move_shape(&mut self, id: &str, x: f64, y: f64) -> bool {
        let moved = self.store.move_shape(id, x, y);
        if moved {
            self.persist_shapes();
        }
        moved
    }

    pub fn remove_shape(&mut self, id: &str) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.persist_shapes();
        }
        removed
    }

    pub fn select(&mut self, id: Option<&str>) -> bool {
        self.store.select(id)
    }

    pub fn reset_zoom(&mut self) {
        self.surface.viewport_mut().reset_zoom();
    }

    /// Route a pointer/key/resize event through the canvas surface.
    pub fn handle_event(&mut self, event: SurfaceEvent) -> Response {
        let response = self.surface.handle(&mut self.store, event);
        if response.shapes_changed {
            self.persist_shapes();
        }
        response
    }

    fn persist_shapes(&mut self) {
        if let Err(e) = self.persistence.save_shapes(self.store.shapes()) {
            log::error!("failed to persist shapes: {}", e);
        }
    }

    // ── Flow ─────────────────────────────────────────────────────────

    pub fn connect(&mut self, source: &str, target: &str) -> Result<String, String> {
        let id = self.flow.connect(source, target).map_err(|e| e.to_string())?;
        self.persist_flow();
        Ok(id)
    }

    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> bool {
        let moved = self.flow.move_node(id, x, y);
        if moved {
            self.persist_flow();
        }
        moved
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let removed = self.flow.remove_node(id).is_some();
        if removed {
            self.persist_flow();
        }
        removed
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let removed = self.flow.remove_edge(id).is_some();
        if removed {
            self.persist_flow();
        }
        removed
    }

    fn persist_flow(&mut self) {
        if let Err(e) = self.persistence.save_flow(&self.flow) {
            log::error!("failed to persist flow: {}", e);
        }
    }

    // ── Sync ─────────────────────────────────────────────────────────

    /// Fetch the remote list, store it locally and reload the canvas from it.
    /// On failure, including a fetched list that does not validate, nothing
    /// local changes.
    pub async fn load_from_api(&mut self) -> &str {
        self.status = STATUS_LOADING.to_string();
        match self.sync.fetch_remote().await {
            Ok(shapes) => match self.persistence.save_shapes(&shapes) {
                Ok(()) => {
                    self.store.replace_all(shapes);
                    self.status = STATUS_LOADED.to_string();
                }
                Err(e) => {
                    log::error!("failed to store fetched shapes: {}", e);
                    self.status = STATUS_LOAD_FAILED.to_string();
                }
            },
            Err(e) => {
                log::warn!("load from API failed: {}", e);
                self.status = STATUS_LOAD_FAILED.to_string();
            }
        }
        &self.status
    }

    /// Send the locally stored list to the remote. An unreadable stored list
    /// is reported as a failed save and nothing is sent.
    pub async fn save_to_api(&mut self) -> &str {
        self.status = STATUS_SAVING.to_string();
        let shapes = match self.persistence.stored_shapes() {
            Ok(shapes) => shapes,
            Err(e) => {
                log::warn!("stored shapes unreadable, not saving: {}", e);
                self.status = STATUS_SAVE_FAILED.to_string();
                return &self.status;
            }
        };
        self.status = match self.sync.save_remote(&shapes).await {
            Ok(ack) if ack.ok => STATUS_SAVED.to_string(),
            Ok(_) => STATUS_SAVE_FAILED.to_string(),
            Err(e) => {
                log::warn!("save to API failed: {}", e);
                STATUS_SAVE_FAILED.to_string()
            }
        };
        &self.status
    }
}
