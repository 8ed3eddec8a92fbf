//! End-to-end tests for the composite create endpoint
//!
//! Tests find-or-create, business rules and transaction rollback.

mod common;

use common::{
    TestClient, TestServer, SEEDED_ALBUM_NAME, SEEDED_ARTIST_ID, SEEDED_ARTIST_NAME,
    SEEDED_RELEASE_NAME, TOTAL_RELEASES_COUNT,
};
use release_catalog_server::catalog_store::CatalogStore;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create(client: &TestClient, body: Value) -> (StatusCode, Value) {
    let response = client.create_catalog_entries(&body).await;
    let status = response.status();
    (status, response.json().await.unwrap())
}

// =============================================================================
// Successful Creation
// =============================================================================

#[tokio::test]
async fn test_create_single_artist() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let artists_before = server.catalog_store.get_artists_count();

    let (status, body) = create(&client, json!({"artist": {"name": "Radiohead"}})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["artist"]["name"], "Radiohead");
    assert!(body["artist"]["id"].is_i64());
    assert!(body.get("release").is_none());
    assert!(body.get("album").is_none());
    assert_eq!(server.catalog_store.get_artists_count(), artists_before + 1);
}

#[tokio::test]
async fn test_create_artist_twice_is_idempotent() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let (_, first) = create(&client, json!({"artist": {"name": "X"}})).await;
    let artists_after_first = server.catalog_store.get_artists_count();
    let (status, second) = create(&client, json!({"artist": {"name": "X"}})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["artist"]["id"], second["artist"]["id"]);
    assert_eq!(server.catalog_store.get_artists_count(), artists_after_first);
}

#[tokio::test]
async fn test_create_artist_release_and_album() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let (status, body) = create(
        &client,
        json!({
            "artist": {"name": "Nirvana"},
            "release": {"name": "Nevermind", "released_at": "1991-09-24T00:00:00Z"},
            "album": {"name": "Nevermind", "duration_in_minutes": 49}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["artist"]["name"], "Nirvana");
    assert_eq!(body["release"]["name"], "Nevermind");
    assert_eq!(body["release"]["released_at"], "1991-09-24T00:00:00Z");
    assert_eq!(body["album"]["name"], "Nevermind");
    assert_eq!(body["album"]["duration_in_minutes"], 49);
    assert_eq!(server.catalog_store.get_releases_count(), TOTAL_RELEASES_COUNT + 1);
    assert_eq!(server.catalog_store.get_albums_count(), 2);

    // The new release is the oldest past one and lists its artist
    let response = client
        .list_releases(&[("past", "1"), ("limit", "100")])
        .await;
    let listing: Value = response.json().await.unwrap();
    let last = listing["data"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["attributes"]["name"], "Nevermind");
    assert_eq!(last["attributes"]["artists"][0]["name"], "Nirvana");
    assert_eq!(last["attributes"]["duration_in_minutes"], 49);
}

#[tokio::test]
async fn test_create_album_for_existing_entities_by_id() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let (_, release) = create(&client, json!({"release": {"name": "Fresh Release"}})).await;
    let release_id = release["release"]["id"].as_i64().unwrap();

    let (status, body) = create(
        &client,
        json!({
            "artist_id": SEEDED_ARTIST_ID.to_string(),
            "release_id": release_id,
            "album": {"name": "Second Album"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["artist"]["name"], SEEDED_ARTIST_NAME);
    assert_eq!(body["release"]["id"], release_id);
    assert_eq!(body["album"]["duration_in_minutes"], 0);
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_release_with_album_cannot_get_another() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let (status, body) = create(
        &client,
        json!({
            "artist": {"name": SEEDED_ARTIST_NAME},
            "release": {"name": SEEDED_RELEASE_NAME},
            "album": {"name": "Another Album"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let message = body["errors"][0].as_str().unwrap();
    assert!(message.contains("already has an associated album"));
    assert!(message.contains(SEEDED_ALBUM_NAME));
    assert_eq!(server.catalog_store.get_albums_count(), 1);
}

#[tokio::test]
async fn test_album_without_release_creates_nothing() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let artists_before = server.catalog_store.get_artists_count();

    let (status, body) = create(
        &client,
        json!({"artist": {"name": "Ghost"}, "album": {"name": "Phantom"}}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"errors": ["Album requires release to be provided"]})
    );
    assert_eq!(server.catalog_store.get_artists_count(), artists_before);
    assert_eq!(server.catalog_store.get_albums_count(), 1);
}

#[tokio::test]
async fn test_unknown_release_id_rolls_back_new_artist() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let artists_before = server.catalog_store.get_artists_count();

    let (status, body) = create(
        &client,
        json!({
            "artist": {"name": "Ghost"},
            "release_id": 999,
            "album": {"name": "Phantom"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"errors": ["Couldn't find Release with 'id'=999"]}));
    assert_eq!(server.catalog_store.get_artists_count(), artists_before);
}

#[tokio::test]
async fn test_empty_request_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let (status, body) = create(&client, json!({"artist": {"name": ""}})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"errors": ["You must provide at least one resource to create"]})
    );
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.create_catalog_entries_raw("{not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
