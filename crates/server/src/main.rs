//! Whiskers Server
//!
//! Axum server exposing the cat catalog browser as a JSON API, plus one-shot
//! CLI commands for listing breeds, browsing and toggling favourites.

mod api;
mod cli;

use axum::{
    body::Body,
    http::{header, Response},
    response::IntoResponse,
    routing::get,
    Router,
};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::broadcast};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

use api::{AppState, BroadcastObserver, SharedState};
use whiskers_core::api::{RequestEvent, RequestObserver};
use whiskers_core::{Browser, WhiskersConfig};

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Whiskers - Cat catalog browser")]
struct Args {
    /// Catalog base url (overrides config and CAT_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Catalog API key (overrides config and CAT_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Images shown per breed
    #[arg(long, global = true)]
    limit: Option<usize>,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum CliCommand {
    /// Start the Whiskers server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// List every breed
    Breeds,
    /// Show a breed's info and images (the first breed by default)
    Browse {
        /// Breed id, e.g. abys
        #[arg(short, long)]
        breed: Option<String>,
    },
    /// Show every favourite
    Favourites,
    /// Favourite an image, or unfavourite it if it already is one
    Toggle {
        /// Catalog image id
        image_id: String,
    },
}

impl Args {
    /// Config file and environment, then CLI flags on top
    fn resolve_config(&self) -> anyhow::Result<WhiskersConfig> {
        let mut config = WhiskersConfig::load()?;
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key);
        }
        if let Some(limit) = self.limit {
            config = config.with_image_limit(limit);
        }
        Ok(config)
    }
}

// === OpenAPI Definition ===

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Whiskers API",
        version = "1.0.0",
        description = "Browse cat breeds and toggle favourites"
    ),
    paths(
        api::view::get_view,
        api::view::list_breeds,
        api::view::initial_load,
        api::view::select_breed,
        api::view::load_favourites,
        api::view::next_item,
        api::view::previous_item,
        api::favourites::toggle_favourite,
        api::events::events
    ),
    components(
        schemas(
            api::ApiResponse,
            api::ViewResponse,
            api::view::BreedListResponse,
            api::view::BreedOptionResponse,
            api::favourites::ToggleResponse
        )
    ),
    tags(
        (name = "view", description = "Breed and favourites views"),
        (name = "carousel", description = "Carousel navigation"),
        (name = "favourites", description = "Favourite toggling"),
        (name = "events", description = "Request progress events")
    )
)]
struct ApiDoc;

async fn serve_openapi() -> impl IntoResponse {
    let spec = ApiDoc::openapi().to_json().unwrap_or_default();
    (
        [(header::CONTENT_TYPE, "application/json")],
        Response::new(Body::from(spec)).into_body(),
    )
}

// === Server Entry ===

fn app(state: SharedState) -> Router {
    Router::new()
        .nest("/api/v1/view", api::view::view_routes())
        .nest("/api/v1/carousel", api::view::carousel_routes())
        .nest("/api/v1/favourites", api::favourites::favourite_routes())
        .route("/api/v1/breeds", get(api::view::list_breeds))
        .route("/api/v1/events", get(api::events::events))
        .route("/api/v1/openapi.json", get(serve_openapi))
        .with_state(state)
}

pub async fn run_server(config: WhiskersConfig, port: u16) -> anyhow::Result<()> {
    let (event_tx, _) = broadcast::channel::<RequestEvent>(100);

    let observer: Arc<dyn RequestObserver> = Arc::new(BroadcastObserver::new(event_tx.clone()));
    let browser = Browser::connect(&config, vec![observer])?;

    // Populate the breed select before accepting requests
    match browser.initial_load().await {
        Ok(outcome) => tracing::info!(?outcome, "Initial view loaded"),
        Err(e) => tracing::warn!(error = %e, "Initial load failed; retry with POST /api/v1/view/initial"),
    }

    let state: SharedState = Arc::new(AppState { browser, event_tx });
    let app = app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("🐈 Whiskers Server running at http://{}", addr);
    println!("   View:       /api/v1/view, /initial, /breeds/:breed_id, /favourites");
    println!("   Carousel:   /api/v1/carousel/next, /previous");
    println!("   Favourites: /api/v1/favourites/:image_id/toggle");
    println!("   Events:     /api/v1/events (SSE)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// A missing `.env` is fine; anything else is reported
fn dotenv_outcome<T>(result: Result<T, dotenvy::Error>) -> Result<Option<T>, dotenvy::Error> {
    match result {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    match dotenv_outcome(dotenv) {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
    }

    let args = Args::parse();
    let config = args.resolve_config()?;

    match args.command.unwrap_or(CliCommand::Serve { port: 8080 }) {
        CliCommand::Serve { port } => run_server(config, port).await,
        command => cli::run(command, &config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use whiskers_core::api::{
        ApiError, ApiRequest, ApiResponse, InstrumentedTransport, Method, ProgressFn, Transport,
    };
    use whiskers_core::ui::Surface;

    /// Fixed catalog: one breed with two images and one favourite on `abys-1`.
    /// Creating favourites fails as if the catalog were offline.
    struct StubCatalog;

    #[async_trait]
    impl Transport for StubCatalog {
        async fn send(
            &self,
            request: ApiRequest,
            _on_progress: &ProgressFn<'_>,
        ) -> Result<ApiResponse, ApiError> {
            let resource = request.resource();
            let body = match (request.method, request.path.as_str()) {
                (Method::Get, "/breeds") => json!([{ "id": "abys", "name": "Abyssinian" }]),
                (Method::Get, "/images/search") => json!([
                    { "id": "abys-0", "url": "https://cdn.example/abys-0.jpg",
                      "breeds": [{ "id": "abys", "name": "Abyssinian" }] },
                    { "id": "abys-1", "url": "https://cdn.example/abys-1.jpg",
                      "breeds": [{ "id": "abys", "name": "Abyssinian" }] }
                ]),
                (Method::Get, "/favourites") => json!([{ "id": 7, "image_id": "abys-1" }]),
                (Method::Post, "/favourites") => {
                    return Err(ApiError::Network("catalog offline".to_string()))
                }
                _ => return Err(ApiError::NotFound { resource }),
            };
            Ok(ApiResponse {
                status: 200,
                resource,
                body: serde_json::to_vec(&body).unwrap(),
            })
        }
    }

    fn test_app() -> Router {
        let (event_tx, _) = broadcast::channel(16);
        let surface = Arc::new(Surface::new());
        let transport = InstrumentedTransport::new(StubCatalog).with_observer(surface.activity());
        let browser = Browser::new(Arc::new(transport), surface, 10);
        app(Arc::new(AppState { browser, event_tx }))
    }

    async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_select_breed_route_shows_images() {
        let app = test_app();

        let (status, body) = call(&app, "POST", "/api/v1/view/breeds/abys").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], json!({ "outcome": "shown", "items": 2 }));
        assert_eq!(body["view"]["carousel"]["items"][1]["image_id"], "abys-1");
        assert_eq!(body["view"]["breed_select"]["selected"], "abys");
        assert_eq!(body["view"]["progress_width"], "100%");

        let (status, body) = call(&app, "POST", "/api/v1/carousel/next").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["carousel"]["active"], 1);
        assert!(body["outcome"].is_null());

        let (_, body) = call(&app, "GET", "/api/v1/view").await;
        assert_eq!(body["view"]["carousel"]["active"], 1);
    }

    #[tokio::test]
    async fn test_initial_route_fills_breed_select() {
        let app = test_app();

        let (status, _) = call(&app, "POST", "/api/v1/view/initial").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&app, "GET", "/api/v1/breeds").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "options": [{ "value": "abys", "label": "Abyssinian" }], "selected": "abys" })
        );
    }

    #[tokio::test]
    async fn test_events_route_is_an_event_stream() {
        let request = Request::builder()
            .uri("/api/v1/events")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
    }

    #[tokio::test]
    async fn test_toggle_route_failures_are_json() {
        let app = test_app();

        // Existing favourite 7 vanished upstream
        let (status, body) = call(&app, "POST", "/api/v1/favourites/abys-1/toggle").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("/favourites/7"));

        let (status, body) = call(&app, "POST", "/api/v1/favourites/abys-0/toggle").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("catalog offline"));
    }

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let args = Args::try_parse_from(["whiskers"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_serve_port() {
        let args = Args::try_parse_from(["whiskers", "serve", "-p", "9000"]).unwrap();
        assert_eq!(args.command, Some(CliCommand::Serve { port: 9000 }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "whiskers",
            "browse",
            "--breed",
            "abys",
            "--limit",
            "3",
            "--base-url",
            "http://localhost:9999/v1",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Some(CliCommand::Browse {
                breed: Some("abys".to_string())
            })
        );
        assert_eq!(args.limit, Some(3));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:9999/v1"));
    }

    #[test]
    fn test_toggle_requires_image_id() {
        assert!(Args::try_parse_from(["whiskers", "toggle"]).is_err());
        let args = Args::try_parse_from(["whiskers", "toggle", "0XYvRd7oD"]).unwrap();
        assert_eq!(
            args.command,
            Some(CliCommand::Toggle {
                image_id: "0XYvRd7oD".to_string()
            })
        );
    }

    #[test]
    fn test_missing_dotenv_is_ignored() {
        let missing = std::env::temp_dir().join("whiskers-no-such-dir").join(".env");
        let outcome = dotenv_outcome(dotenvy::from_path(&missing)).unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let path = std::env::temp_dir().join(format!("whiskers-bad-{}.env", std::process::id()));
        std::fs::write(&path, "this line is not an assignment\n").unwrap();

        let outcome = dotenv_outcome(dotenvy::from_path(&path));
        std::fs::remove_file(&path).unwrap();

        assert!(outcome.is_err());
    }

    #[test]
    fn test_openapi_lists_routes() {
        let spec = ApiDoc::openapi().to_json().unwrap();
        assert!(spec.contains("/api/v1/favourites/{image_id}/toggle"));
        assert!(spec.contains("/api/v1/view/breeds/{breed_id}"));
    }
}
