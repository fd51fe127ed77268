//! HTTP-level tests for the PostgREST note store.

use ainotes_cloud::{CloudConfig, PostgrestNoteStore};
use ainotes_core::{NoteFilter, NoteId, NoteInsert, NoteUpdate, RemoteNoteStore, SortKey};
use chrono::{DateTime, Utc};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> PostgrestNoteStore {
    let config = CloudConfig {
        url: server.uri(),
        anon_key: "anon-key".to_string(),
        access_token: Some("session-token".to_string()),
        timeout_seconds: 5,
        ..Default::default()
    };
    PostgrestNoteStore::new(config).expect("Failed to create store")
}

fn row_json(id: &str, pinned: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "user_id": "u1",
        "title": format!("title {}", id),
        "content": "body",
        "is_pinned": pinned,
        "is_archived": false,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
        "color": "transparent"
    })
}

#[tokio::test]
async fn test_query_sends_filters_order_and_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/notes"))
        .and(query_param("select", "*"))
        .and(query_param("user_id", "eq.u1"))
        .and(query_param("is_archived", "eq.false"))
        .and(query_param("order", "is_pinned.desc,updated_at.desc"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer session-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([row_json("n1", true), row_json("n2", false)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let notes = store
        .query_notes("u1", NoteFilter::active(), &SortKey::active_order())
        .await
        .expect("query should succeed");

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, NoteId::persisted("n1"));
    assert!(notes[0].is_pinned);
    assert_eq!(notes[1].title, "title n2");
}

#[tokio::test]
async fn test_query_server_error_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/notes"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let err = store
        .query_notes("u1", NoteFilter::archived(), &SortKey::archived_order())
        .await
        .unwrap_err();

    assert!(err.is_unreachable());
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_query_malformed_body_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let err = store
        .query_notes("u1", NoteFilter::active(), &[])
        .await
        .unwrap_err();
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn test_insert_returns_representation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/notes"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(serde_json::json!([{
            "user_id": "u1",
            "title": "title n9",
            "content": "body",
            "is_pinned": true,
            "is_archived": false,
            "color": "transparent"
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([row_json(
            "n9", true
        )])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let note = store
        .insert_note(
            "u1",
            NoteInsert {
                title: "title n9".to_string(),
                content: "body".to_string(),
                is_pinned: true,
                is_archived: false,
                color: Some("transparent".to_string()),
            },
        )
        .await
        .expect("insert should succeed");

    assert_eq!(note.id, NoteId::persisted("n9"));
    assert_eq!(note.user_id, "u1");
}

#[tokio::test]
async fn test_insert_without_row_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/notes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let err = store
        .insert_note(
            "u1",
            NoteInsert {
                title: "t".to_string(),
                content: String::new(),
                is_pinned: false,
                is_archived: false,
                color: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn test_update_patches_changed_fields_only() {
    let mock_server = MockServer::start().await;
    let at: DateTime<Utc> = "2024-05-01T12:00:00Z".parse().unwrap();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/notes"))
        .and(query_param("id", "eq.n1"))
        .and(body_json(serde_json::json!({
            "is_pinned": true,
            "updated_at": "2024-05-01T12:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    store
        .update_note("n1", &NoteUpdate::new().pinned(true), at)
        .await
        .expect("update should succeed");
}

#[tokio::test]
async fn test_delete_targets_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/notes"))
        .and(query_param("id", "eq.n1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    store.delete_note("n1").await.expect("delete should succeed");
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    let config = CloudConfig {
        url: "http://127.0.0.1:1".to_string(),
        anon_key: "k".to_string(),
        timeout_seconds: 2,
        ..Default::default()
    };
    let store = PostgrestNoteStore::new(config).unwrap();

    let err = store.delete_note("n1").await.unwrap_err();
    assert!(err.is_unreachable());
}
