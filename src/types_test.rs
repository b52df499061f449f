use super::*;

// =============================================================================
// UserIdentity
// =============================================================================

#[test]
fn user_identity_decodes_without_avatar() {
    let user: UserIdentity =
        serde_json::from_str(r#"{"id":"1","username":"alice","email":"a@b.com"}"#).unwrap();
    assert_eq!(user.id, "1");
    assert_eq!(user.username, "alice");
    assert_eq!(user.avatar, None);
}

#[test]
fn user_identity_accepts_numeric_id() {
    let user: UserIdentity =
        serde_json::from_str(r#"{"id":42,"username":"bob","email":"b@c.com","avatar":"https://x/a.png"}"#).unwrap();
    assert_eq!(user.id, "42");
    assert_eq!(user.avatar.as_deref(), Some("https://x/a.png"));
}

#[test]
fn user_identity_rejects_object_id() {
    let err = serde_json::from_str::<UserIdentity>(r#"{"id":{},"username":"x","email":"y"}"#).unwrap_err();
    assert!(err.to_string().contains("expected string or numeric id"));
}

#[test]
fn user_identity_skips_missing_avatar_on_encode() {
    let user = UserIdentity { id: "1".into(), username: "alice".into(), email: "a@b.com".into(), avatar: None };
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("avatar").is_none());
}

#[test]
fn auth_response_decodes_token_and_user() {
    let resp: AuthResponse = serde_json::from_str(
        r#"{"token":"tok1","user":{"id":"1","username":"alice","email":"a@b.com"}}"#,
    )
    .unwrap();
    assert_eq!(resp.token, "tok1");
    assert_eq!(resp.user.username, "alice");
}

#[test]
fn register_request_encodes_all_fields() {
    let body = RegisterRequest { username: "alice", email: "a@b.com", password: "pw" };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        serde_json::json!({ "username": "alice", "email": "a@b.com", "password": "pw" })
    );
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn catalog_item_decodes_camel_case_and_defaults() {
    let item: CatalogItem = serde_json::from_str(
        r#"{"id":"m1","name":"bert","downloads":12.0,"stars":null,"lastUpdated":"2024-01-01"}"#,
    )
    .unwrap();
    assert_eq!(item.downloads, 12);
    assert_eq!(item.stars, 0);
    assert!(item.tags.is_empty());
    assert_eq!(item.last_updated.as_deref(), Some("2024-01-01"));
}

#[test]
fn catalog_item_rejects_fractional_count() {
    let err = serde_json::from_str::<CatalogItem>(r#"{"id":"m1","name":"x","downloads":1.5}"#).unwrap_err();
    assert!(err.to_string().contains("non-negative integer"));
}

#[test]
fn catalog_item_rejects_negative_count() {
    assert!(serde_json::from_str::<CatalogItem>(r#"{"id":"m1","name":"x","stars":-3}"#).is_err());
}

#[test]
fn item_detail_decodes_model_payload() {
    let detail: ItemDetail = serde_json::from_value(serde_json::json!({
        "id": "m1",
        "name": "bert-base",
        "author": "google",
        "longDescription": "# BERT",
        "isStarred": true,
        "stars": 10,
        "views": 99,
        "framework": "pytorch",
        "files": [{ "name": "model.bin", "size": "420 MB", "type": "binary", "url": "/f/model.bin" }],
        "versions": [{ "version": "1.0", "date": "2024-01-01", "description": "first" }],
        "usageCode": { "python": "import x" }
    }))
    .unwrap();
    assert!(detail.is_starred);
    assert_eq!(detail.long_description, "# BERT");
    assert_eq!(detail.files[0].kind, "binary");
    assert_eq!(detail.usage_code.python, "import x");
    assert_eq!(detail.usage_code.javascript, None);
    assert!(detail.schema.is_empty());
}

#[test]
fn item_detail_decodes_dataset_payload() {
    let detail: ItemDetail = serde_json::from_value(serde_json::json!({
        "id": 7,
        "name": "squad",
        "sampleCount": 1000,
        "schema": [{ "field": "question", "type": "string", "description": "q" }],
        "samples": [{ "question": "why?" }]
    }))
    .unwrap();
    assert_eq!(detail.id, "7");
    assert_eq!(detail.sample_count, Some(1000));
    assert_eq!(detail.schema[0].kind, "string");
    assert_eq!(detail.samples.len(), 1);
}

#[test]
fn hub_stats_defaults_missing_fields() {
    let stats: HubStats = serde_json::from_str(r#"{"totalModels":3}"#).unwrap();
    assert_eq!(stats, HubStats { total_models: 3, ..HubStats::default() });
}

// =============================================================================
// Users
// =============================================================================

#[test]
fn user_profile_decodes_flags_and_stats() {
    let profile: UserProfile = serde_json::from_value(serde_json::json!({
        "username": "alice",
        "name": "Alice",
        "bio": "",
        "joinDate": "2023-05-01",
        "followers": 5,
        "following": 2,
        "isFollowing": true,
        "isCurrentUser": false,
        "stats": { "models": 1, "datasets": 2, "downloads": 300, "stars": 4 }
    }))
    .unwrap();
    assert!(profile.is_following);
    assert_eq!(profile.join_date.as_deref(), Some("2023-05-01"));
    assert_eq!(profile.stats.downloads, 300);
}
