//! Typed hub endpoints over the API gateway.
//!
//! Thin wrappers only: each method names a route, shapes its query or body,
//! and decodes the reply. Auth headers and 401 handling happen in
//! [`ApiClient`]; nothing here touches the session.

#[cfg(test)]
#[path = "hub_test.rs"]
mod hub_test;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::{ApiCall, ApiClient};
use crate::error::ApiError;
use crate::types::{CatalogItem, HubStats, ItemDetail, UserProfile};

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Page sizes offered by list views.
pub const PAGE_SIZES: [u32; 3] = [12, 24, 48];

// =============================================================================
// ITEM KIND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Model,
    Dataset,
}

impl ItemKind {
    /// Collection segment in hub routes.
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            Self::Model => "models",
            Self::Dataset => "datasets",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => f.write_str("model"),
            Self::Dataset => f.write_str("dataset"),
        }
    }
}

// =============================================================================
// LIST QUERIES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Downloads,
    Stars,
    Newest,
    Oldest,
    /// Datasets only: by sample count.
    Samples,
}

impl SortKey {
    pub const ALL: [Self; 5] = [Self::Downloads, Self::Stars, Self::Newest, Self::Oldest, Self::Samples];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Downloads => "downloads",
            Self::Stars => "stars",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Samples => "samples",
        }
    }

    /// Inverse of [`SortKey::as_str`].
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == text)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search, sort, filter and pagination for a catalog list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// 1-based.
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub sort: SortKey,
    pub tasks: Vec<String>,
    pub languages: Vec<String>,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort: SortKey::default(),
            tasks: Vec::new(),
            languages: Vec::new(),
        }
    }
}

impl CatalogQuery {
    /// Query pairs in the order the hub documents them. Empty filters are
    /// still sent, as empty strings.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.max(1).to_string()),
            ("q", self.search.trim().to_owned()),
            ("sort", self.sort.as_str().to_owned()),
            ("tasks", self.tasks.join(",")),
            ("languages", self.languages.join(",")),
        ]
    }

    /// Number of pages needed for `total` items at this page size.
    #[must_use]
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit.max(1)))
    }
}

/// One page of a catalog list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub total: u64,
}

#[derive(Deserialize)]
struct RawCatalogPage {
    #[serde(default)]
    models: Option<Vec<CatalogItem>>,
    #[serde(default)]
    datasets: Option<Vec<CatalogItem>>,
    #[serde(default)]
    total: Option<u64>,
}

impl RawCatalogPage {
    fn into_page(self, kind: ItemKind) -> CatalogPage {
        let items = match kind {
            ItemKind::Model => self.models,
            ItemKind::Dataset => self.datasets,
        }
        .unwrap_or_default();
        // An empty list resets the total so pagination never points past it.
        let total = if items.is_empty() { 0 } else { self.total.unwrap_or(items.len() as u64) };
        CatalogPage { items, total }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DownloadRequest<'a> {
    file_name: &'a str,
}

// =============================================================================
// HUB API
// =============================================================================

/// Typed access to the hub's catalog, item and user routes.
#[derive(Debug, Clone)]
pub struct HubApi {
    client: ApiClient,
}

impl HubApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Site-wide counters.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway.
    pub async fn stats(&self) -> Result<HubStats, ApiError> {
        self.client.get("/stats").await
    }

    /// Currently trending models or datasets.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway.
    pub async fn trending(&self, kind: ItemKind) -> Result<Vec<CatalogItem>, ApiError> {
        self.fetch_list(ApiCall::get(format!("/{}/trending", kind.collection()))).await
    }

    /// One page of the catalog.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway.
    pub async fn list(&self, kind: ItemKind, query: &CatalogQuery) -> Result<CatalogPage, ApiError> {
        let mut call = ApiCall::get(format!("/{}", kind.collection()));
        for (key, value) in query.to_pairs() {
            call = call.query(key, value);
        }
        let raw: Option<RawCatalogPage> = self.client.fetch(call).await?;
        Ok(raw.map(|raw| raw.into_page(kind)).unwrap_or_default())
    }

    /// Full detail for one item.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway.
    pub async fn detail(&self, kind: ItemKind, id: &str) -> Result<ItemDetail, ApiError> {
        self.client.fetch(ApiCall::get(item_path(kind, id, ""))).await
    }

    /// Count a page view.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway.
    pub async fn record_view(&self, kind: ItemKind, id: &str) -> Result<(), ApiError> {
        self.client.execute(ApiCall::post(item_path(kind, id, "/view"))).await
    }

    /// Star an item for the signed-in user.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway; 401 when signed out.
    pub async fn star(&self, kind: ItemKind, id: &str) -> Result<(), ApiError> {
        self.client.execute(ApiCall::post(item_path(kind, id, "/star"))).await
    }

    /// Remove the signed-in user's star.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway; 401 when signed out.
    pub async fn unstar(&self, kind: ItemKind, id: &str) -> Result<(), ApiError> {
        self.client.execute(ApiCall::delete(item_path(kind, id, "/star"))).await
    }

    /// Ask the hub to serve `file_name`. The reply body is passed through as
    /// JSON since its shape is server-defined.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway.
    pub async fn request_download(&self, kind: ItemKind, id: &str, file_name: &str) -> Result<serde_json::Value, ApiError> {
        let call = ApiCall::post(item_path(kind, id, "/download")).json(&DownloadRequest { file_name })?;
        let reply: Option<serde_json::Value> = self.client.fetch(call).await?;
        Ok(reply.unwrap_or(serde_json::Value::Null))
    }

    /// Public profile.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway.
    pub async fn user_profile(&self, username: &str) -> Result<UserProfile, ApiError> {
        self.client.fetch(ApiCall::get(user_path(username, ""))).await
    }

    /// Models or datasets published by `username`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway.
    pub async fn user_items(&self, username: &str, kind: ItemKind) -> Result<Vec<CatalogItem>, ApiError> {
        let suffix = format!("/{}", kind.collection());
        self.fetch_list(ApiCall::get(user_path(username, &suffix))).await
    }

    /// Follow `username` as the signed-in user.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway; 401 when signed out.
    pub async fn follow(&self, username: &str) -> Result<(), ApiError> {
        self.client.execute(ApiCall::post(user_path(username, "/follow"))).await
    }

    /// Stop following `username`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the gateway; 401 when signed out.
    pub async fn unfollow(&self, username: &str) -> Result<(), ApiError> {
        self.client.execute(ApiCall::delete(user_path(username, "/follow"))).await
    }

    async fn fetch_list<T: DeserializeOwned>(&self, call: ApiCall) -> Result<Vec<T>, ApiError> {
        let items: Option<Vec<T>> = self.client.fetch(call).await?;
        Ok(items.unwrap_or_default())
    }
}

// =============================================================================
// PATHS
// =============================================================================

fn item_path(kind: ItemKind, id: &str, suffix: &str) -> String {
    format!("/{}/{}{suffix}", kind.collection(), urlencoding::encode(id))
}

fn user_path(username: &str, suffix: &str) -> String {
    format!("/users/{}{suffix}", urlencoding::encode(username))
}
