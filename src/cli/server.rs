//! HTTP server mode
//!
//! Serves the explorer views as JSON. Every paginated route runs the same
//! cycle against the visitor's session:
//!
//! 1. `navigate` with the URL query, answering `303` when history cannot
//!    reach the requested page
//! 2. fetch the page from the backend with no lock held
//! 3. `data_loaded` with the ticket, then render the buttons as links

use super::session::{session_cookie, session_from_cookie_header, SessionStore};
use crate::api::{
    is_evm_address, is_resource_id, AddressTokensSource, AddressTransactionsSource, ApiRegistry,
    BlockTransactionsSource, BlocksSource, ExplorerApi, TokenTransfersSource, TokensSource,
};
use crate::config::ExplorerConfig;
use crate::error::{Error, Result};
use crate::pagination::{
    Cursor, FetchTicket, LinkContext, NavigateOutcome, Page, PageSource, PaginationView,
};
use crate::types::NETWORK_KEY;
use axum::{
    extract::{Path, RawQuery, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<ExplorerConfig>,
    apis: ApiRegistry,
    sessions: SessionStore,
}

impl AppState {
    /// Build clients for every configured network
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        let apis = ApiRegistry::from_config(&config)?;
        Ok(Self::with_apis(config, apis))
    }

    /// Use pre-built clients
    pub fn with_apis(config: ExplorerConfig, apis: ApiRegistry) -> Self {
        let sessions = SessionStore::new(config.server.max_sessions);
        Self {
            config: Arc::new(config),
            apis,
            sessions,
        }
    }

    /// Session store backing paginated views
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Client and link context for the network a request asks for
    fn resolve(&self, query: &Cursor, pathname: String) -> Result<(Arc<ExplorerApi>, LinkContext)> {
        let (name, _) = self.config.network(query.get(NETWORK_KEY))?;
        let api = self
            .apis
            .get(name)
            .ok_or_else(|| Error::unknown_network(name))?;
        let links = LinkContext::new(pathname)
            .with_network((!self.config.is_default_network(name)).then_some(name));
        Ok((api, links))
    }
}

/// Session id of the current request
#[derive(Debug, Clone)]
struct SessionId(String);

/// Response wrapper for failures
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Error returned from handlers
#[derive(Debug)]
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_bad_request() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            warn!(error = %self.0, "Backend request failed");
            StatusCode::BAD_GATEWAY
        };
        let body = ErrorBody {
            success: false,
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type HandlerResult = std::result::Result<Response, ApiError>;

/// One page of a collection with its controls
#[derive(Debug, Serialize)]
struct Paged<T> {
    items: Vec<T>,
    pagination: PaginationView,
}

/// Build the router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/", get(home))
        .route("/blocks", get(blocks))
        .route("/blocks/:id", get(block))
        .route("/blocks/:id/transactions", get(block_transactions))
        .route("/address/:aid", get(address))
        .route("/address/:aid/tokens", get(address_tokens))
        .route("/address/:aid/contract", get(address_contract))
        .route("/tokens", get(tokens))
        .route("/token/:id", get(token))
        .layer(middleware::from_fn_with_state(state.clone(), session_layer))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Attach a session to every request, issuing a cookie for new visitors
async fn session_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let existing = req
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_from_cookie_header)
        .map(str::to_string);

    let (id, fresh) = match existing {
        Some(id) => (id, false),
        None => (state.sessions.new_id(), true),
    };
    req.extensions_mut().insert(SessionId(id.clone()));

    let mut response = next.run(req).await;
    if fresh {
        if let Ok(cookie) = HeaderValue::from_str(&session_cookie(&id)) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }
    response
}

fn parse_query(raw: Option<String>) -> Cursor {
    raw.as_deref().map(Cursor::from_query_str).unwrap_or_default()
}

fn require_address(aid: &str) -> Result<()> {
    if is_evm_address(aid) {
        Ok(())
    } else {
        Err(Error::invalid_address(aid))
    }
}

fn require_id(id: &str) -> Result<()> {
    if is_resource_id(id) {
        Ok(())
    } else {
        Err(Error::invalid_id(id))
    }
}

// ============================================================================
// Pagination Cycle
// ============================================================================

/// A paginated view being served for one request
struct PagedView<'a> {
    state: &'a AppState,
    session: &'a str,
    key: String,
    links: LinkContext,
    query: Cursor,
}

impl<'a> PagedView<'a> {
    fn new(state: &'a AppState, session: &'a SessionId, links: LinkContext, query: Cursor) -> Self {
        Self {
            state,
            session: &session.0,
            key: links.base_href(),
            links,
            query,
        }
    }

    /// Navigate; `Err` carries the redirect to send instead of the page
    async fn begin(&self) -> std::result::Result<FetchTicket, Response> {
        match self
            .state
            .sessions
            .navigate(self.session, &self.key, &self.query)
            .await
        {
            NavigateOutcome::Accepted(ticket) => Ok(ticket),
            NavigateOutcome::Redirect => {
                let target = self.links.base_href();
                debug!(target = %target, "Redirecting to first page");
                Err(Redirect::to(&target).into_response())
            }
        }
    }

    /// Cursor to send to the backend
    fn cursor(&self) -> Cursor {
        self.query.without_network()
    }

    /// Report the fetched page and render its controls
    async fn finish<T>(&self, ticket: FetchTicket, page: Page<T>) -> Paged<T> {
        let (outcome, buttons) = self
            .state
            .sessions
            .data_loaded(
                self.session,
                &self.key,
                ticket,
                &self.query,
                page.next_page_params,
            )
            .await;
        debug!(page = ticket.page_number, ?outcome, "Page loaded");

        Paged {
            items: page.items,
            pagination: self.links.render(&buttons),
        }
    }

    /// Run the full cycle for a source
    async fn run<S>(&self, source: S) -> HandlerResult
    where
        S: PageSource,
        S::Item: Serialize,
    {
        let ticket = match self.begin().await {
            Ok(ticket) => ticket,
            Err(redirect) => return Ok(redirect),
        };
        let page = source.fetch_page(&self.cursor()).await?;
        Ok(Json(self.finish(ticket, page).await).into_response())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Latest blocks and transactions
async fn home(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    RawQuery(raw): RawQuery,
) -> HandlerResult {
    let query = parse_query(raw);
    let (api, _) = state.resolve(&query, "/".to_string())?;
    state.sessions.leave(&session.0).await;

    let (blocks, transactions) =
        futures::try_join!(api.latest_blocks(), api.latest_transactions())?;
    Ok(Json(json!({ "blocks": blocks, "transactions": transactions })).into_response())
}

async fn blocks(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    RawQuery(raw): RawQuery,
) -> HandlerResult {
    let query = parse_query(raw);
    let (api, links) = state.resolve(&query, "/blocks".to_string())?;
    PagedView::new(&state, &session, links, query)
        .run(BlocksSource::new(api))
        .await
}

async fn block(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<String>,
    RawQuery(raw): RawQuery,
) -> HandlerResult {
    let query = parse_query(raw);
    let (api, _) = state.resolve(&query, format!("/blocks/{id}"))?;
    state.sessions.leave(&session.0).await;
    Ok(Json(api.block(&id).await?).into_response())
}

async fn block_transactions(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<String>,
    RawQuery(raw): RawQuery,
) -> HandlerResult {
    require_id(&id)?;
    let query = parse_query(raw);
    let (api, links) = state.resolve(&query, format!("/blocks/{id}/transactions"))?;
    PagedView::new(&state, &session, links, query)
        .run(BlockTransactionsSource::new(api, id))
        .await
}

/// Address detail, counters and one page of its transactions
async fn address(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(aid): Path<String>,
    RawQuery(raw): RawQuery,
) -> HandlerResult {
    require_address(&aid)?;
    let query = parse_query(raw);
    let (api, links) = state.resolve(&query, format!("/address/{aid}"))?;
    let view = PagedView::new(&state, &session, links, query);

    let ticket = match view.begin().await {
        Ok(ticket) => ticket,
        Err(redirect) => return Ok(redirect),
    };
    let source = AddressTransactionsSource::new(api.clone(), aid.as_str());
    let cursor = view.cursor();
    let (detail, counters, page) = futures::try_join!(
        api.address(&aid),
        api.address_counters(&aid),
        source.fetch_page(&cursor)
    )?;

    let transactions = view.finish(ticket, page).await;
    Ok(Json(json!({
        "address": detail,
        "counters": counters,
        "transactions": transactions,
    }))
    .into_response())
}

async fn address_tokens(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(aid): Path<String>,
    RawQuery(raw): RawQuery,
) -> HandlerResult {
    require_address(&aid)?;
    let query = parse_query(raw);
    let (api, links) = state.resolve(&query, format!("/address/{aid}/tokens"))?;
    PagedView::new(&state, &session, links, query)
        .run(AddressTokensSource::new(api, aid))
        .await
}

async fn address_contract(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(aid): Path<String>,
    RawQuery(raw): RawQuery,
) -> HandlerResult {
    require_address(&aid)?;
    let query = parse_query(raw);
    let (api, _) = state.resolve(&query, format!("/address/{aid}/contract"))?;
    state.sessions.leave(&session.0).await;
    Ok(Json(api.contract(&aid).await?).into_response())
}

async fn tokens(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    RawQuery(raw): RawQuery,
) -> HandlerResult {
    let query = parse_query(raw);
    let (api, links) = state.resolve(&query, "/tokens".to_string())?;
    PagedView::new(&state, &session, links, query)
        .run(TokensSource::new(api))
        .await
}

/// Token detail, counters and one page of its transfers
async fn token(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<String>,
    RawQuery(raw): RawQuery,
) -> HandlerResult {
    require_id(&id)?;
    let query = parse_query(raw);
    let (api, links) = state.resolve(&query, format!("/token/{id}"))?;
    let view = PagedView::new(&state, &session, links, query);

    let ticket = match view.begin().await {
        Ok(ticket) => ticket,
        Err(redirect) => return Ok(redirect),
    };
    let source = TokenTransfersSource::new(api.clone(), id.as_str());
    let cursor = view.cursor();
    let (detail, counters, page) = futures::try_join!(
        api.token(&id),
        api.token_counters(&id),
        source.fetch_page(&cursor)
    )?;

    let transfers = view.finish(ticket, page).await;
    Ok(Json(json!({
        "token": detail,
        "counters": counters,
        "transfers": transfers,
    }))
    .into_response())
}
