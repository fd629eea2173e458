use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::app::movie_store::MovieStore;
use crate::enrich::Enricher;
use crate::formats::StoredMovie;
use crate::import::{ReleaseFeed, import_feed};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MovieStore>,
    pub enricher: Enricher,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/api/movies/import", post(import_movies))
        .route(
            "/api/movies/:movie_id",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
        .route("/api/movie-home/:movie_id", get(get_movie_home))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn bad_request(rejection: &JsonRejection) -> Response {
    json_error(rejection.status(), &rejection.body_text())
}

fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Movie not found")
}

fn internal_error(err: &anyhow::Error, message: &str) -> Response {
    tracing::error!(?err, "{message}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

async fn get_movie(State(state): State<AppState>, Path(movie_id): Path<String>) -> Response {
    match state.store.get(&movie_id).await {
        Ok(Some(movie)) => Json(movie).into_response(),
        Ok(None) => not_found(),
        Err(err) => internal_error(&err, "Failed to fetch movie"),
    }
}

/// Field-wise `$set`: keys present in the body overwrite the stored document.
async fn update_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    patch: Result<Json<serde_json::Map<String, serde_json::Value>>, JsonRejection>,
) -> Response {
    let Json(patch) = match patch {
        Ok(patch) => patch,
        Err(rejection) => return bad_request(&rejection),
    };
    let existing = match state.store.get(&movie_id).await {
        Ok(Some(movie)) => movie,
        Ok(None) => return not_found(),
        Err(err) => return internal_error(&err, "Failed to update movie"),
    };

    let updated = match apply_patch(&existing, patch) {
        Ok(movie) => movie,
        Err(err) => {
            return json_error(StatusCode::BAD_REQUEST, &format!("invalid update: {err:#}"));
        }
    };

    match state.store.put(&updated).await {
        Ok(()) => {
            Json(serde_json::json!({ "message": "Movie updated successfully" })).into_response()
        }
        Err(err) => internal_error(&err, "Failed to update movie"),
    }
}

pub fn apply_patch(
    existing: &StoredMovie,
    patch: serde_json::Map<String, serde_json::Value>,
) -> anyhow::Result<StoredMovie> {
    let mut doc = match serde_json::to_value(existing)? {
        serde_json::Value::Object(doc) => doc,
        _ => anyhow::bail!("stored movie is not a JSON object"),
    };
    for (key, value) in patch {
        if key == "id" {
            continue;
        }
        doc.insert(key, value);
    }
    Ok(serde_json::from_value(serde_json::Value::Object(doc))?)
}

async fn delete_movie(State(state): State<AppState>, Path(movie_id): Path<String>) -> Response {
    match state.store.delete(&movie_id).await {
        Ok(true) => {
            Json(serde_json::json!({ "message": "Movie deleted successfully" })).into_response()
        }
        Ok(false) => not_found(),
        Err(err) => internal_error(&err, "Failed to delete movie"),
    }
}

async fn import_movies(
    State(state): State<AppState>,
    feed: Result<Json<ReleaseFeed>, JsonRejection>,
) -> Response {
    let Json(feed) = match feed {
        Ok(feed) => feed,
        Err(rejection) => return bad_request(&rejection),
    };
    let summary = import_feed(state.store.as_ref(), &feed).await;
    Json(serde_json::json!({
        "message": format!(
            "Processed successfully: {} created, {} updated, {} unchanged, {} errors",
            summary.created, summary.updated, summary.unchanged, summary.errors
        ),
        "updates": summary,
    }))
    .into_response()
}

async fn get_movie_home(State(state): State<AppState>, Path(movie_id): Path<String>) -> Response {
    let movie = match state.store.get(&movie_id).await {
        Ok(Some(movie)) => movie,
        Ok(None) => return not_found(),
        Err(err) => return internal_error(&err, "Failed to fetch movie details"),
    };

    let record = state.enricher.enrich_stored(&movie).await;
    Json(record).into_response()
}
