//! HTTP client for the page service.
//!
//! Speaks the service's wire contract: snake_case page documents on reads,
//! camelCase partial updates on writes. Transport and unexpected server
//! failures collapse into [`StoreError::SaveFailed`] without further
//! classification; the caller's recovery is the same either way.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

use super::{CreatePage, PageStore, SavedBlock};
use crate::error::StoreError;
use crate::models::{BlockInstance, Page};

/// Request timeout for all page-service calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Page service client.
#[derive(Debug, Clone)]
pub struct HttpPageStore {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpPageStore {
    /// Create a client for the page service at `base_url`. The base URL
    /// should end with a trailing slash (e.g. `https://api.example.com/v1/`)
    /// so endpoint paths join under it.
    pub fn new(base_url: Url) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { base_url, client }
    }

    fn page_url(&self, page_id: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(&format!("pages/{page_id}"))
            .map_err(|e| {
                warn!(error = %e, page_id, "failed to build page URL");
                StoreError::SaveFailed
            })
    }

    fn pages_url(&self) -> Result<Url, StoreError> {
        self.base_url.join("pages").map_err(|e| {
            warn!(error = %e, "failed to build pages URL");
            StoreError::SaveFailed
        })
    }
}

/// `GET /pages/{id}` response envelope.
#[derive(Debug, Deserialize)]
struct PageEnvelope {
    page: WirePage,
}

/// A page document as returned by the service.
#[derive(Debug, Deserialize)]
struct WirePage {
    id: String,
    title: String,
    slug: String,
    is_published: bool,
    #[serde(default)]
    blocks: Vec<WireBlock>,
}

/// A stored block as returned by the service. The server's block id is
/// ignored: instance ids are session-local and freshly assigned on load.
#[derive(Debug, Deserialize)]
struct WireBlock {
    block_key: String,
    #[serde(default)]
    props: Map<String, Value>,
    #[serde(default)]
    order: i64,
}

impl WirePage {
    fn into_page(self) -> Page {
        let mut blocks = self.blocks;
        blocks.sort_by_key(|b| b.order);

        Page {
            id: self.id,
            title: self.title,
            slug: self.slug,
            is_published: self.is_published,
            blocks: blocks
                .into_iter()
                .map(|b| BlockInstance::with_props(b.block_key, b.props))
                .collect(),
        }
    }
}

/// `PUT /pages/{id}` body replacing the block list. Omitted fields are
/// unchanged server-side.
#[derive(Debug, Serialize)]
struct UpdateBlocksBody<'a> {
    blocks: &'a [SavedBlock],
}

/// `PUT /pages/{id}` body flipping only the published flag.
#[derive(Debug, Serialize)]
struct UpdatePublishedBody {
    #[serde(rename = "isPublished")]
    is_published: bool,
}

/// Error body of a rejected block save; keys are positions in the
/// submitted array.
#[derive(Debug, Default, Deserialize)]
struct RejectedSaveBody {
    #[serde(rename = "blockErrors", default)]
    block_errors: BTreeMap<usize, String>,
}

#[async_trait]
impl PageStore for HttpPageStore {
    async fn load_page(&self, page_id: &str) -> Result<Page, StoreError> {
        let url = self.page_url(page_id)?;
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, page_id, "page load request failed");
            StoreError::SaveFailed
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::PageNotFound),
            status if status.is_success() => {
                let envelope: PageEnvelope = response.json().await.map_err(|e| {
                    warn!(error = %e, page_id, "malformed page document");
                    StoreError::SaveFailed
                })?;
                Ok(envelope.page.into_page())
            }
            status => {
                warn!(%status, page_id, "page load rejected");
                Err(StoreError::SaveFailed)
            }
        }
    }

    async fn save_blocks(&self, page_id: &str, blocks: &[SavedBlock]) -> Result<(), StoreError> {
        let url = self.page_url(page_id)?;
        let response = self
            .client
            .put(url)
            .json(&UpdateBlocksBody { blocks })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, page_id, "block save request failed");
                StoreError::SaveFailed
            })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::PageNotFound),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let rejected: RejectedSaveBody = response.json().await.unwrap_or_default();
                if rejected.block_errors.is_empty() {
                    Err(StoreError::SaveFailed)
                } else {
                    Err(StoreError::InvalidBlocks(rejected.block_errors))
                }
            }
            status => {
                warn!(%status, page_id, "block save rejected");
                Err(StoreError::SaveFailed)
            }
        }
    }

    async fn set_published(&self, page_id: &str, is_published: bool) -> Result<(), StoreError> {
        let url = self.page_url(page_id)?;
        let response = self
            .client
            .put(url)
            .json(&UpdatePublishedBody { is_published })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, page_id, "publish flag request failed");
                StoreError::SaveFailed
            })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::PageNotFound),
            status => {
                warn!(%status, page_id, is_published, "publish flag rejected");
                Err(StoreError::SaveFailed)
            }
        }
    }

    async fn create_page(&self, page: &CreatePage) -> Result<Page, StoreError> {
        let url = self
            .pages_url()
            .map_err(|_| StoreError::CreateFailed("invalid base URL".to_string()))?;
        let response = self.client.post(url).json(page).send().await.map_err(|e| {
            warn!(error = %e, slug = %page.slug, "page create request failed");
            StoreError::CreateFailed("request failed".to_string())
        })?;

        match response.status() {
            StatusCode::CONFLICT => Err(StoreError::SlugConflict),
            status if status.is_success() => {
                let envelope: PageEnvelope = response.json().await.map_err(|e| {
                    warn!(error = %e, "malformed create response");
                    StoreError::CreateFailed("malformed response".to_string())
                })?;
                Ok(envelope.page.into_page())
            }
            status => {
                let detail = response.text().await.unwrap_or_default();
                warn!(%status, detail = %detail, "page create rejected");
                Err(StoreError::CreateFailed(format!(
                    "server responded with {status}"
                )))
            }
        }
    }

    async fn delete_page(&self, page_id: &str) -> Result<(), StoreError> {
        let url = self.page_url(page_id)?;
        let response = self.client.delete(url).send().await.map_err(|e| {
            warn!(error = %e, page_id, "page delete request failed");
            StoreError::SaveFailed
        })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::PageNotFound),
            status => {
                warn!(%status, page_id, "page delete rejected");
                Err(StoreError::SaveFailed)
            }
        }
    }
}
