//! Word REST API routes
//!
//! Thin handlers mapping HTTP onto `WordService`:
//!
//! - `GET    /words`                      - list every word
//! - `POST   /words`                      - create a word
//! - `GET    /words/lookup?lemma=&lang=`  - look a word up by lemma and language
//! - `GET    /words/:id`                  - fetch one word
//! - `PUT    /words/:id`                  - replace a word's mutable fields
//! - `DELETE /words/:id`                  - delete a word

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::database::WordRepository;
use crate::words::{Word, WordService};

// ============================================================================
// State and Request Types
// ============================================================================

/// Shared state for word routes
pub type WordState<R> = Arc<WordService<R>>;

/// Query params for natural-key lookup
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub lemma: String,
    pub lang: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /words
async fn list_words<R: WordRepository>(
    State(service): State<WordState<R>>,
) -> Result<Json<Vec<Word>>, ApiError> {
    Ok(Json(service.get_all_words().await?))
}

/// POST /words
async fn create_word<R: WordRepository>(
    State(service): State<WordState<R>>,
    Json(word): Json<Word>,
) -> Result<(StatusCode, Json<Word>), ApiError> {
    let created = service.create_word(word).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /words/lookup?lemma=Hallo&lang=de
async fn lookup_word<R: WordRepository>(
    State(service): State<WordState<R>>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Word>, ApiError> {
    service
        .get_word_by_lemma(&query.lemma, &query.lang)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Word '{}' not found for language '{}'",
                query.lemma, query.lang
            ))
        })
}

/// GET /words/:id
async fn get_word<R: WordRepository>(
    State(service): State<WordState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Word>, ApiError> {
    service
        .get_word_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Word with ID {} not found", id)))
}

/// PUT /words/:id
///
/// The path id is authoritative; a body id that disagrees with it is rejected.
async fn update_word<R: WordRepository>(
    State(service): State<WordState<R>>,
    Path(id): Path<String>,
    Json(mut word): Json<Word>,
) -> Result<Json<Word>, ApiError> {
    if let Some(body_id) = word.id() {
        if body_id != id {
            return Err(ApiError::bad_request(format!(
                "Body id '{}' does not match path id '{}'",
                body_id, id
            )));
        }
    }
    word.id = Some(id);

    Ok(Json(service.update_word(word).await?))
}

/// DELETE /words/:id
async fn delete_word<R: WordRepository>(
    State(service): State<WordState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if service.delete_word(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Word with ID {} not found", id)))
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create router for word endpoints
pub fn create_word_router<R: WordRepository + 'static>(service: WordState<R>) -> Router {
    Router::new()
        .route("/words", get(list_words::<R>).post(create_word::<R>))
        .route("/words/lookup", get(lookup_word::<R>))
        .route(
            "/words/:id",
            get(get_word::<R>)
                .put(update_word::<R>)
                .delete(delete_word::<R>),
        )
        .with_state(service)
}
