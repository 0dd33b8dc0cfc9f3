use axum::{
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use rust_embed::RustEmbed;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use crate::api_routes::{self, AppState};
use crate::submission::{ExternalOpener, Navigator, TargetBase, TitleSubmissionHandler};

#[derive(RustEmbed)]
#[folder = "ui/dist"]
struct Asset;

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes::api_routes(state))
        .route("/", get(index_handler))
        .route("/*file", get(static_handler))
        .layer(TraceLayer::new_for_http())
}

/// Serve the submission page. When `open_browser` is set the page is opened
/// externally, preselecting `game` if one is given.
pub async fn start_server(
    port: u16,
    open_browser: bool,
    game: Option<String>,
    state: AppState,
) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting web UI at http://{}", addr);

    if open_browser {
        match game {
            Some(title) => {
                let base = TargetBase::origin(addr.ip().to_string(), addr.port());
                TitleSubmissionHandler::new(title, base, ExternalOpener).dispatch();
            }
            None => {
                let url = format!("http://{addr}/");
                if let Err(err) = ExternalOpener.navigate(&url) {
                    tracing::warn!(error = %err, "Could not open browser; visit {}", url);
                }
            }
        }
    }

    axum::serve(listener, app(state)).await?;

    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    static_handler(Uri::from_static("/index.html")).await
}

async fn static_handler(uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/').to_string();

    if path.is_empty() {
        path = "index.html".to_string();
    }

    match Asset::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}
