use std::time::Duration;

use canvasboard_core::{seed_shapes, Shape};
use serde::{Deserialize, Serialize};

use crate::config::SyncConfig;
use crate::error::SyncError;

/// Acknowledgement returned by a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

/// Loads and saves the shape list against the shapes API, or against a
/// built-in stand-in when no endpoint is configured.
#[derive(Debug, Clone)]
pub enum SyncClient {
    /// Simulated API: fixed dataset, no network.
    Fallback { delay: Duration },
    Http {
        base_url: String,
        client: reqwest::Client,
    },
}

impl SyncClient {
    pub fn from_config(config: &SyncConfig) -> Self {
        match &config.api_base {
            Some(base) => {
                log::info!("syncing shapes with {}", base);
                Self::http(base)
            }
            None => {
                log::info!("no shapes API configured, using built-in fallback");
                Self::fallback(config.fallback_delay())
            }
        }
    }

    pub fn fallback(delay: Duration) -> Self {
        Self::Fallback { delay }
    }

    pub fn http(base_url: &str) -> Self {
        Self::Http {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// `GET /shapes`.
    pub async fn fetch_remote(&self) -> Result<Vec<Shape>, SyncError> {
        match self {
            Self::Fallback { delay } => {
                tokio::time::sleep(*delay).await;
                Ok(seed_shapes())
            }
            Self::Http { base_url, client } => {
                let url = format!("{}/shapes", base_url);
                let response = client.get(&url).send().await?;
                let response = check_status(response, &url)?;
                let shapes: Vec<Shape> = response.json().await?;
                log::debug!("fetched {} shapes from {}", shapes.len(), url);
                Ok(shapes)
            }
        }
    }

    /// `POST /shapes`, replacing the remote list.
    pub async fn save_remote(&self, shapes: &[Shape]) -> Result<Ack, SyncError> {
        match self {
            Self::Fallback { delay } => {
                tokio::time::sleep(*delay).await;
                Ok(Ack { ok: true })
            }
            Self::Http { base_url, client } => {
                let url = format!("{}/shapes", base_url);
                let response = client.post(&url).json(shapes).send().await?;
                let response = check_status(response, &url)?;
                let ack: Ack = response.json().await?;
                log::debug!("saved {} shapes to {}", shapes.len(), url);
                Ok(ack)
            }
        }
    }
}

fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SyncError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}
