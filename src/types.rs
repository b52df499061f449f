//! Wire DTOs for the hub REST API.
//!
//! DESIGN
//! ======
//! Field names mirror the server's camelCase JSON. Counters and identifiers
//! are decoded leniently (integer-valued floats, numeric ids) so minor server
//! drift does not turn into decode failures on read-only views.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// AUTH
// =============================================================================

/// A signed-in hub user as returned by `/auth/me`, `/auth/login` and
/// `/auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Server-assigned identifier. Opaque; numeric ids are kept as text.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Unique handle used in profile URLs.
    pub username: String,
    pub email: String,
    /// Avatar image URL, if the user set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful credential exchange: a bearer token plus the identity it
/// belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserIdentity,
}

// =============================================================================
// CATALOG
// =============================================================================

/// Summary card for a model or dataset in list and trending views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub downloads: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub stars: u64,
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Human-formatted size (e.g. `"1.2 GB"`); datasets and models only.
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

/// A file attached to a model or dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: String,
}

/// A published version in an item's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

/// One column of a dataset schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub field: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

/// Copy-paste usage snippets shown on detail pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCode {
    #[serde(default)]
    pub python: String,
    #[serde(default)]
    pub javascript: Option<String>,
}

/// Full detail record for a model or dataset.
///
/// Model-only fields (`framework`, `task`) and dataset-only fields
/// (`sample_count`, `schema`, `samples`) are optional so one type serves both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Markdown body.
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub downloads: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub stars: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub views: u64,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub language: Vec<String>,
    #[serde(default)]
    pub sample_count: Option<u64>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
    #[serde(default)]
    pub schema: Vec<SchemaField>,
    #[serde(default)]
    pub samples: Vec<serde_json::Value>,
    #[serde(default)]
    pub usage_code: UsageCode,
}

/// Site-wide counters shown on the home page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubStats {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_models: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_datasets: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_downloads: u64,
}

// =============================================================================
// USERS
// =============================================================================

/// Public profile of a hub user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub join_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub followers: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub following: u64,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub is_current_user: bool,
    #[serde(default)]
    pub stats: ProfileStats,
}

/// Aggregate counters for a profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub models: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub datasets: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub downloads: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub stars: u64,
}

// =============================================================================
// LENIENT DECODING
// =============================================================================

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        _ => Err(D::Error::custom("expected string or numeric id")),
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_u64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= 0.0
                && float <= u64::MAX as f64
            {
                return Ok(float as u64);
            }
            Err(D::Error::custom("expected non-negative integer count"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}
