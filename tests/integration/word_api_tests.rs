/*!
 * HTTP API tests: requests are driven through the full router with
 * `tower::ServiceExt::oneshot`, over an in-memory SQLite database
 */

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use wortwirbel::api::{create_router, INTERNAL_ERROR_MESSAGE};
use wortwirbel::words::WordService;

use crate::common::mock_repository::MockWordRepository;
use crate::common::{init_logging, sqlite_service};

fn app() -> Router {
    init_logging();
    create_router(sqlite_service())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn hallo_json() -> Value {
    json!({
        "lemma": "Hallo",
        "lang": "de",
        "pos": "interjection",
        "defs": ["hello", "hi"],
        "examples": [{"text": "Hallo Welt!", "tr": "Hello world!"}],
        "cefr": "A1"
    })
}

#[tokio::test]
async fn test_root_shouldReturnServiceInfo() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello World");
    assert_eq!(body["service"], "wort-wirbel-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_shouldReportHealthy() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "service": "wort-wirbel-api"}));
}

#[tokio::test]
async fn test_postWords_shouldCreateAndReturn201() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/words", Some(hallo_json())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_str().unwrap().starts_with("de:Hallo:"));
    assert_eq!(body["pos"], "interjection");
    assert_eq!(body["examples"][0]["tr"], "Hello world!");
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn test_postWords_duplicate_shouldReturn409() {
    let app = app();
    send(&app, Method::POST, "/words", Some(hallo_json())).await;

    let (status, body) = send(&app, Method::POST, "/words", Some(hallo_json())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Word 'Hallo' already exists for language 'de'");
}

#[tokio::test]
async fn test_postWords_emptyDefinitions_shouldReturn400() {
    let app = app();
    let mut word = hallo_json();
    word["defs"] = json!([]);

    let (status, body) = send(&app, Method::POST, "/words", Some(word)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("definition"));
}

#[tokio::test]
async fn test_postWords_unknownPartOfSpeech_shouldBeRejected() {
    let app = app();
    let mut word = hallo_json();
    word["pos"] = json!("gerund");

    let (status, _) = send(&app, Method::POST, "/words", Some(word)).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_getWordById_shouldRoundTripAndReturn404WhenMissing() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/words", Some(hallo_json())).await;
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = send(&app, Method::GET, &format!("/words/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, Method::GET, "/words/de:Nichts:00000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Word with ID de:Nichts:00000000 not found");
}

#[tokio::test]
async fn test_lookup_shouldFindByLemmaAndLanguage() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/words", Some(hallo_json())).await;

    let (status, found) = send(&app, Method::GET, "/words/lookup?lemma=Hallo&lang=de", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], created["id"]);

    let (status, _) = send(&app, Method::GET, "/words/lookup?lemma=Hallo&lang=en", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listWords_shouldReturnAllInInsertionOrder() {
    let app = app();
    send(&app, Method::POST, "/words", Some(hallo_json())).await;
    send(
        &app,
        Method::POST,
        "/words",
        Some(json!({"lemma": "Haus", "lang": "de", "pos": "noun", "defs": ["house"]})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/words", None).await;

    assert_eq!(status, StatusCode::OK);
    let lemmas: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["lemma"].as_str().unwrap())
        .collect();
    assert_eq!(lemmas, vec!["Hallo", "Haus"]);
}

#[tokio::test]
async fn test_putWord_shouldReplaceDefinitionsAndBumpUpdatedAt() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/words", Some(hallo_json())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let mut changed = created.clone();
    changed["defs"] = json!(["hello", "hi", "hey"]);
    let (status, updated) = send(&app, Method::PUT, &format!("/words/{}", id), Some(changed)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["defs"], json!(["hello", "hi", "hey"]));
    assert_eq!(updated["created_at"], created["created_at"]);
    assert!(updated["updated_at"].as_str().unwrap() > created["updated_at"].as_str().unwrap());
    assert_eq!(updated["examples"], created["examples"]);
}

#[tokio::test]
async fn test_putWord_withoutBodyId_shouldUsePathId() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/words", Some(hallo_json())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let mut changed = hallo_json();
    changed["cefr"] = json!("A2");
    let (status, updated) = send(&app, Method::PUT, &format!("/words/{}", id), Some(changed)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["cefr"], "A2");
}

#[tokio::test]
async fn test_putWord_mismatchedIds_shouldReturn400() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/words", Some(hallo_json())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let mut changed = created.clone();
    changed["id"] = json!("de:Hallo:ffffffff");
    let (status, _) = send(&app, Method::PUT, &format!("/words/{}", id), Some(changed)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_putWord_unknownId_shouldReturn404() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/words/de:Hallo:deadbeef",
        Some(hallo_json()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Word with ID de:Hallo:deadbeef not found");
}

#[tokio::test]
async fn test_putWord_onto_existingLemma_shouldReturn409() {
    let app = app();
    send(&app, Method::POST, "/words", Some(hallo_json())).await;
    let (_, haus) = send(
        &app,
        Method::POST,
        "/words",
        Some(json!({"lemma": "Haus", "lang": "de", "pos": "noun", "defs": ["house"]})),
    )
    .await;
    let id = haus["id"].as_str().unwrap().to_string();

    let mut renamed = haus.clone();
    renamed["lemma"] = json!("Hallo");
    let (status, _) = send(&app, Method::PUT, &format!("/words/{}", id), Some(renamed)).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_deleteWord_shouldReturn204ThenMakeIdUnusable() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/words", Some(hallo_json())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::DELETE, &format!("/words/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &format!("/words/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/words/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut reuse = hallo_json();
    reuse["id"] = json!(id);
    let (status, _) = send(&app, Method::POST, "/words", Some(reuse)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_storageFailure_shouldReturn500() {
    init_logging();
    let repository = MockWordRepository::new();
    repository.fail_storage();
    let app = create_router(Arc::new(WordService::new(repository)));

    let (status, body) = send(&app, Method::GET, "/words", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    assert!(!body.to_string().contains("simulated storage outage"));
}

#[tokio::test]
async fn test_postWords_reviewTimeBeyondYear9999_shouldReturn400AndKeepListReadable() {
    let app = app();
    let mut word = hallo_json();
    word["next_review_at"] = json!("+10000-01-01T00:00:00Z");

    let (status, body) = send(&app, Method::POST, "/words", Some(word)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("next_review_at"));

    let (status, body) = send(&app, Method::GET, "/words", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_postWords_nanosecondReviewTime_shouldMatchLaterGet() {
    let app = app();
    let mut word = hallo_json();
    word["last_reviewed_at"] = json!("2025-09-01T12:44:00.123456789Z");

    let (status, created) = send(&app, Method::POST, "/words", Some(word)).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap();
    let (_, fetched) = send(&app, Method::GET, &format!("/words/{}", id), None).await;
    assert_eq!(fetched, created);
    assert_eq!(fetched["last_reviewed_at"], "2025-09-01T12:44:00.123456Z");
}
