//! HTTP server wiring for Noteful (router, middleware, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for folder, tag, and note endpoints.
pub mod handlers;

pub use noteful_core::{config, db, models, AppError, Config, Database, ObjectId, DEFAULT_PORT};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    pub fn new(config: Config, db: Database) -> Self {
        Self::with_shared_db(config, Arc::new(db))
    }

    /// Construct state around a database handle the caller keeps a clone of.
    pub fn with_shared_db(config: Config, db: Arc<Database>) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Build the `/api` router with tracing, compression, CORS, security headers,
/// and the body size limit from `state.config`.
///
/// `allow_public_access` opens CORS to any origin; otherwise only
/// `localhost`/`127.0.0.1` on the configured port are allowed.
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

fn loopback(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Pick the listen address: `BIND` when set and parseable, else loopback on
/// `config.port`.
///
/// Without `allow_public_access` a non-loopback `BIND` keeps its port but is
/// moved onto 127.0.0.1.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let fallback = loopback(config.port);
    let Ok(raw) = std::env::var("BIND") else {
        return fallback;
    };
    let requested = match raw.trim().parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::warn!("Ignoring BIND='{}' ({}); using {}", raw, err, fallback);
            return fallback;
        }
    };

    if requested.ip().is_loopback() || allow_public_access {
        requested
    } else {
        tracing::warn!(
            "BIND={} is not loopback and ALLOW_PUBLIC_ACCESS is off; listening on 127.0.0.1",
            requested
        );
        loopback(requested.port())
    }
}

const API_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

fn cors_layer(allow_public_access: bool, cors_port: u16) -> CorsLayer {
    if allow_public_access {
        return CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(API_METHODS)
            .allow_headers(tower_http::cors::Any)
            .expose_headers([header::LOCATION]);
    }

    let origins: Vec<HeaderValue> = ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| format!("http://{}:{}", host, cors_port).parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(API_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::LOCATION])
}

fn api_routes() -> Router<AppState> {
    use handlers::{folder, note, tag};

    Router::new()
        .route(
            "/api/folders",
            get(folder::list_folders).post(folder::create_folder),
        )
        .route(
            "/api/folders/:id",
            get(folder::get_folder)
                .put(folder::update_folder)
                .delete(folder::delete_folder),
        )
        .route("/api/tags", get(tag::list_tags).post(tag::create_tag))
        .route(
            "/api/tags/:id",
            get(tag::get_tag)
                .put(tag::update_tag)
                .delete(tag::delete_tag),
        )
        .route("/api/notes", get(note::list_notes).post(note::create_note))
        .route(
            "/api/notes/:id",
            get(note::get_note)
                .put(note::update_note)
                .delete(note::delete_note),
        )
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    let max_body_size = state.config.max_body_size;

    api_routes()
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(max_body_size))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(allow_public_access, cors_port))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

/// Port browsers will see; differs from `config.port` when binding to `:0`.
fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    match listener.local_addr() {
        Ok(addr) => addr.port(),
        Err(_) => fallback_port,
    }
}

/// Serve the API on `listener` until `shutdown_signal` resolves.
///
/// CORS origins are derived from the port actually bound.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
