//! # Canvasboard Server
//!
//! In-memory stub of the shapes API. One process-wide list, no validation,
//! no persistence:
//!
//! - `GET /shapes` returns the current list.
//! - `POST /shapes` replaces it with the request body verbatim and answers `{"ok": true}`.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use canvasboard_core::seed_shapes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use warp::Filter;

/// Environment variable naming the listen port.
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 4000;

/// Largest accepted POST body.
const MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl ServerConfig {
    /// Read `PORT`, falling back to 4000 when unset or unparsable.
    pub fn from_env() -> Self {
        match std::env::var(PORT_ENV) {
            Ok(raw) => match raw.trim().parse() {
                Ok(port) => Self { port },
                Err(_) => {
                    log::warn!("ignoring invalid {}={:?}", PORT_ENV, raw);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// All interfaces on the configured port.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// The shared shape list. Kept as raw JSON because POST stores whatever it is given.
/// Concurrent writers race; the last one wins.
#[derive(Debug, Clone)]
pub struct ShapeBoard {
    shapes: Arc<Mutex<Value>>,
}

impl ShapeBoard {
    pub fn new(initial: Value) -> Self {
        Self {
            shapes: Arc::new(Mutex::new(initial)),
        }
    }

    /// Board holding the r100/c100 pair.
    pub fn seeded() -> Self {
        Self::new(json!(seed_shapes()))
    }

    fn lock(&self) -> MutexGuard<'_, Value> {
        // Every write is a single assignment, so a poisoned lock still holds a whole Value.
        self.shapes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Value {
        self.lock().clone()
    }

    /// Replace the list. A JSON `null` body leaves it untouched.
    pub fn replace(&self, body: Value) {
        if body.is_null() {
            log::debug!("null body, keeping current shapes");
            return;
        }
        *self.lock() = body;
    }
}

/// The complete API: both `/shapes` routes with permissive CORS and request logging.
pub fn routes(
    board: ShapeBoard,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST"])
        .allow_header("content-type");

    list_shapes(board.clone())
        .or(replace_shapes(board))
        .with(cors)
        .with(warp::log("canvasboard_server::api"))
}

fn with_board(
    board: ShapeBoard,
) -> impl Filter<Extract = (ShapeBoard,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || board.clone())
}

/// GET /shapes
fn list_shapes(
    board: ShapeBoard,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("shapes")
        .and(warp::get())
        .and(with_board(board))
        .map(|board: ShapeBoard| warp::reply::json(&board.snapshot()))
}

/// POST /shapes
fn replace_shapes(
    board: ShapeBoard,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("shapes")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_board(board))
        .map(|body: Value, board: ShapeBoard| {
            board.replace(body);
            warp::reply::json(&json!({ "ok": true }))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::http::StatusCode;

    #[tokio::test]
    async fn test_get_returns_seed() {
        let api = routes(ShapeBoard::seeded());
        let res = warp::test::request().method("GET").path("/shapes").reply(&api).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body[0]["id"], "r100");
        assert_eq!(body[0]["type"], "rect");
        assert_eq!(body[1]["id"], "c100");
        assert_eq!(body[1]["size"], 50.0);
    }

    #[tokio::test]
    async fn test_post_empty_then_get_empty() {
        let api = routes(ShapeBoard::seeded());
        let res = warp::test::request()
            .method("POST")
            .path("/shapes")
            .json(&json!([]))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let ack: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(ack, json!({ "ok": true }));

        let res = warp::test::request().method("GET").path("/shapes").reply(&api).await;
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_post_stores_verbatim() {
        let board = ShapeBoard::seeded();
        let api = routes(board.clone());
        let payload = json!([{ "id": "x", "type": "triangle", "extra": true }]);
        warp::test::request()
            .method("POST")
            .path("/shapes")
            .json(&payload)
            .reply(&api)
            .await;
        assert_eq!(board.snapshot(), payload);
    }

    #[tokio::test]
    async fn test_post_null_keeps_list() {
        let board = ShapeBoard::seeded();
        let api = routes(board.clone());
        warp::test::request()
            .method("POST")
            .path("/shapes")
            .header("content-type", "application/json")
            .body("null")
            .reply(&api)
            .await;
        assert_eq!(board.snapshot(), json!(seed_shapes()));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let api = routes(ShapeBoard::seeded());
        let res = warp::test::request()
            .method("GET")
            .path("/shapes")
            .header("origin", "http://example.com")
            .reply(&api)
            .await;
        assert_eq!(res.headers()["access-control-allow-origin"], "http://example.com");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let api = routes(ShapeBoard::seeded());
        let res = warp::test::request().method("GET").path("/nope").reply(&api).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_default_port() {
        assert_eq!(ServerConfig::default().socket_addr().port(), 4000);
    }
}
