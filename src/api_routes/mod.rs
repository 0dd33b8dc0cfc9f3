use crate::catalog::{CatalogError, GameRecord, Recommender};
use crate::submission::{
    NavigationStrategy, Navigator, SubmissionError, TargetBase, TitleSubmissionHandler,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::sync::Arc;

/// Shared, read-only state for the routes
#[derive(Clone, Default)]
pub struct AppState {
    recommender: Option<Arc<Recommender>>,
}

impl AppState {
    pub fn new(recommender: Option<Recommender>) -> Self {
        Self {
            recommender: recommender.map(Arc::new),
        }
    }
}

// --- Models ---

#[derive(Debug, Deserialize)]
struct SubmitQuery {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct GameQuery {
    #[serde(default)]
    game: String,
}

#[derive(Debug, Serialize)]
struct GameResponse {
    game: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched: Option<GameRecord>,
    default_index: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, err: impl ToString) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Holds the URL the handler navigated to so it can become a 303.
#[derive(Default)]
struct RedirectSlot(RefCell<Option<String>>);

impl Navigator for RedirectSlot {
    fn strategy(&self) -> NavigationStrategy {
        NavigationStrategy::InPlace
    }

    fn navigate(&self, url: &str) -> Result<(), SubmissionError> {
        *self.0.borrow_mut() = Some(url.to_string());
        Ok(())
    }
}

// --- Handlers ---

/// Plain form posts land here when the page script is not running.
async fn submit_title(Query(query): Query<SubmitQuery>) -> Redirect {
    let slot = RedirectSlot::default();
    TitleSubmissionHandler::new(query.title, TargetBase::Relative, &slot).dispatch();
    let target = slot.0.take().unwrap_or_else(|| "/".to_string());
    Redirect::to(&target)
}

async fn game_lookup(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Json<GameResponse> {
    let catalog = state.recommender.as_deref().map(Recommender::catalog);
    let matched = catalog.and_then(|c| c.find(&query.game)).cloned();
    let default_index = catalog.map_or(0, |c| c.default_index(&query.game));

    Json(GameResponse {
        game: query.game,
        matched,
        default_index,
    })
}

async fn recommendations(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> impl IntoResponse {
    let Some(recommender) = state.recommender.as_deref() else {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, CatalogError::NotConfigured);
    };

    match recommender.recommend(&query.game) {
        Ok(recs) => (StatusCode::OK, Json(recs)).into_response(),
        Err(err @ CatalogError::UnknownTitle(_)) => error_response(StatusCode::NOT_FOUND, err),
        Err(err) => {
            tracing::error!(error = %err, game = %query.game, "Recommendation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err)
        }
    }
}

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/submit", get(submit_title))
        .route("/api/game", get(game_lookup))
        .route("/api/recommendations", get(recommendations))
        .with_state(state)
}
