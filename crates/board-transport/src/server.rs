//! HTTP transport server using Axum.
//!
//! Every discussion route becomes a [`BoardRequest`] for one [`Action`];
//! the handler's [`BoardResponse`] is written back as a redirect or an HTML
//! page. Flash messages ride along in a [`FlashStore`] keyed by a session
//! cookie.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
};
use board_protocol::{Action, BoardRequest, BoardResponse, FormFields, ResponseBody, Routes};
use serde_json::json;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::flash::FlashStore;

/// Trait implemented by the board server to handle incoming requests.
/// The transport calls this once per routed request.
pub trait RequestHandler: Send + Sync + 'static {
    fn handle_request(
        &self,
        request: BoardRequest,
    ) -> impl std::future::Future<Output = BoardResponse> + Send;
}

/// Transport server configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Port to listen on (0 for OS-assigned)
    pub port: u16,
    /// Hostname to bind to
    pub hostname: String,
    /// Header carrying the authenticated user's id
    pub user_header: String,
    /// Cookie naming the browser session that owns pending flash messages
    pub session_cookie: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            hostname: "127.0.0.1".into(),
            user_header: "x-user-id".into(),
            session_cookie: "board_sid".into(),
        }
    }
}

/// Shared state for the transport server.
struct AppState<H: RequestHandler> {
    handler: Arc<H>,
    config: TransportConfig,
    flash: Arc<FlashStore>,
}

/// The transport server — owns the listener task.
pub struct TransportServer {
    /// Shutdown signal
    shutdown_tx: Option<mpsc::Sender<()>>,
    /// Server task handle
    handle: Option<tokio::task::JoinHandle<()>>,
    /// Actual bound port
    port: u16,
}

impl TransportServer {
    /// Start the transport server with the given request handler.
    pub async fn start<H: RequestHandler>(
        config: TransportConfig,
        handler: H,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::start_shared(config, Arc::new(handler)).await
    }

    /// Start with a handler that is also held elsewhere.
    pub async fn start_shared<H: RequestHandler>(
        config: TransportConfig,
        handler: Arc<H>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let addr: SocketAddr = format!("{}:{}", config.hostname, config.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let actual_port = listener.local_addr()?.port();

        let app = build_router(config.clone(), handler);

        info!(
            "Discussion board listening on http://{}:{}",
            config.hostname, actual_port
        );

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            port: actual_port,
        })
    }

    /// Get the actual bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Gracefully stop the server.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("Discussion board transport stopped");
    }
}

/// Build the application router without binding a socket.
pub fn build_router<H: RequestHandler>(config: TransportConfig, handler: Arc<H>) -> Router {
    build_router_with_flash(config, handler, Arc::new(FlashStore::new()))
}

/// Build the router around an existing flash store.
pub fn build_router_with_flash<H: RequestHandler>(
    config: TransportConfig,
    handler: Arc<H>,
    flash: Arc<FlashStore>,
) -> Router {
    let state = Arc::new(AppState {
        handler,
        config,
        flash,
    });

    Router::new()
        .route(Routes::ROOT, get(root_handler))
        .route(Routes::HEALTH, get(health_handler))
        .route(Routes::DISCUSSIONS, get(index_handler::<H>))
        .route(Routes::DISCUSSIONS_NEW, get(new_handler::<H>))
        .route(Routes::DISCUSSIONS_CREATE, post(create_handler::<H>))
        .route(Routes::DISCUSSION, get(show_handler::<H>))
        .route(Routes::DISCUSSION_EDIT, get(edit_handler::<H>))
        .route(
            Routes::DISCUSSION_UPDATE,
            post(update_handler::<H>).put(update_handler::<H>),
        )
        .route(
            Routes::DISCUSSION_DELETE,
            post(delete_handler::<H>).delete(delete_handler::<H>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn root_handler() -> Redirect {
    Redirect::to(Routes::DISCUSSIONS)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn index_handler<H: RequestHandler>(
    State(state): State<Arc<AppState<H>>>,
    headers: HeaderMap,
) -> Response {
    dispatch(&state, &headers, BoardRequest::new(Action::Index)).await
}

async fn new_handler<H: RequestHandler>(
    State(state): State<Arc<AppState<H>>>,
    headers: HeaderMap,
) -> Response {
    dispatch(&state, &headers, BoardRequest::new(Action::New)).await
}

async fn create_handler<H: RequestHandler>(
    State(state): State<Arc<AppState<H>>>,
    headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let request = BoardRequest::new(Action::Create).with_fields(FormFields::new(fields));
    dispatch(&state, &headers, request).await
}

async fn show_handler<H: RequestHandler>(
    State(state): State<Arc<AppState<H>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    dispatch(&state, &headers, BoardRequest::new(Action::Show).with_id(id)).await
}

async fn edit_handler<H: RequestHandler>(
    State(state): State<Arc<AppState<H>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    dispatch(&state, &headers, BoardRequest::new(Action::Edit).with_id(id)).await
}

async fn update_handler<H: RequestHandler>(
    State(state): State<Arc<AppState<H>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let request = BoardRequest::new(Action::Update)
        .with_id(id)
        .with_fields(FormFields::new(fields));
    dispatch(&state, &headers, request).await
}

async fn delete_handler<H: RequestHandler>(
    State(state): State<Arc<AppState<H>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    dispatch(&state, &headers, BoardRequest::new(Action::Delete).with_id(id)).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / response plumbing
// ─────────────────────────────────────────────────────────────────────────────

/// Attach session, user and pending flash to `request`, run it, and write
/// the result.
async fn dispatch<H: RequestHandler>(
    state: &AppState<H>,
    headers: &HeaderMap,
    mut request: BoardRequest,
) -> Response {
    let cookies = parse_cookies(headers);
    let (session, fresh) = match cookies.get(&state.config.session_cookie) {
        Some(sid) if !sid.is_empty() => (sid.clone(), false),
        _ => (uuid::Uuid::new_v4().to_string(), true),
    };

    request.user = headers
        .get(state.config.user_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let incoming = state.flash.take(&session);
    request.flash = incoming.clone();

    let action = request.action;
    let response = state.handler.handle_request(request).await;
    debug!(
        action = action.name(),
        status = response.status,
        "request handled"
    );

    // Only a session the client has sent back can ever collect parked flash.
    if fresh {
        if !response.flash.is_empty() {
            debug!(action = action.name(), "flash dropped for cookieless request");
        }
    } else {
        // Redirects render nothing, so whatever was pending is still unseen.
        if response.is_redirect() {
            state.flash.push(&session, incoming);
        }
        state.flash.push(&session, response.flash.clone());
    }

    let cookie = fresh.then(|| {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            state.config.session_cookie, session
        )
    });
    into_http(response, cookie)
}

fn into_http(response: BoardResponse, set_cookie: Option<String>) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut http = match response.body {
        ResponseBody::Redirect(location) => match HeaderValue::from_str(&location) {
            Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        },
        ResponseBody::Html(body) => (status, Html(body)).into_response(),
    };

    if let Some(cookie) = set_cookie {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            http.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    http
}

/// Parse cookies from the Cookie header.
fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    for cookie_header in headers.get_all(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some((key, value)) = cookie.trim().split_once('=') {
                    cookies.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    cookies
}
