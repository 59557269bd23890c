use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{debug, info};

use crate::catalog::card_data::CardDataStore;
use crate::catalog::store::ComboCatalog;
use crate::cli::ServeArgs;
use crate::core::color::ColorIdentity;
use crate::core::deck::{Deck, NoColorData};
use crate::core::types::{ComboId, Vendor};
use crate::matching::engine::{MatchingConfig, Tolerance};
use crate::matching::finder::{ComboFinder, FinderRequest, LookupReport};
use crate::matching::sorting::{SortDirection, SortKey, SortOptions};
use crate::parsing::decklist::{build_deck, parse_decklist_text, DecklistError};
use crate::utils::validation::MAX_DECKLIST_BYTES;

/// Request body limit: the largest accepted decklist plus room for the JSON envelope
pub const MAX_REQUEST_BODY_BYTES: usize = MAX_DECKLIST_BYTES + 16 * 1024;

/// Security configuration constants to prevent `DoS` attacks
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Shared application state
pub struct AppState {
    pub catalog: ComboCatalog,
    pub card_data: Option<CardDataStore>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: ComboCatalog, card_data: Option<CardDataStore>) -> Self {
        Self { catalog, card_data }
    }
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

fn error_response(status: StatusCode, error_type: &str, message: &str) -> Response {
    (status, Json(create_safe_error_response(error_type, message, None))).into_response()
}

/// Body of `POST /api/find-my-combos`
#[derive(Debug, Deserialize)]
pub struct FindCombosRequest {
    pub decklist: String,
    /// Colors added to the identity derived from card data
    pub deck_colors: Option<String>,
    /// Colors allowed for combos outside the deck identity
    pub colors: Option<String>,
    pub max_missing: Option<usize>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub vendor: Option<String>,
    #[serde(default)]
    pub hide_banned: bool,
    #[serde(default)]
    pub hide_previews: bool,
}

/// Parse an optional keyword field, mapping failures to a 400 response
fn parse_field<T>(value: Option<&str>, error_type: &str) -> Result<Option<T>, Response>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .map(|raw| {
            raw.parse::<T>().map_err(|e| {
                error_response(StatusCode::BAD_REQUEST, error_type, &e.to_string())
            })
        })
        .transpose()
}

/// Everything a lookup needs, validated
struct ValidatedRequest {
    finder_request: FinderRequest,
    config: MatchingConfig,
}

fn validate_request(state: &AppState, body: &FindCombosRequest) -> Result<ValidatedRequest, Response> {
    let deck = parse_deck(state, &body.decklist).map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, "invalid_decklist", &e.to_string())
    })?;

    let deck_colors: Option<ColorIdentity> =
        parse_field(body.deck_colors.as_deref(), "invalid_colors")?;
    let selected: Option<ColorIdentity> = parse_field(body.colors.as_deref(), "invalid_colors")?;
    let key: Option<SortKey> = parse_field(body.sort.as_deref(), "invalid_sort")?;
    let direction: Option<SortDirection> = parse_field(body.order.as_deref(), "invalid_sort")?;
    let vendor: Option<Vendor> = parse_field(body.vendor.as_deref(), "invalid_vendor")?;

    let sort = SortOptions::new(key.unwrap_or_default(), direction.unwrap_or_default())
        .with_vendor(vendor.unwrap_or_default());

    let mut finder_request = FinderRequest::new(deck).with_sort(sort);
    finder_request.selected = selected;
    finder_request.deck_colors = deck_colors;

    let config = MatchingConfig {
        tolerance: body
            .max_missing
            .map_or(Tolerance::Unbounded, Tolerance::AtMost),
        exclude_banned: body.hide_banned,
        exclude_spoiled: body.hide_previews,
    };

    Ok(ValidatedRequest {
        finder_request,
        config,
    })
}

fn parse_deck(state: &AppState, decklist: &str) -> Result<Deck, DecklistError> {
    let entries = parse_decklist_text(decklist)?;
    match &state.card_data {
        Some(store) => build_deck(&entries, store),
        None => build_deck(&entries, &NoColorData),
    }
}

/// Create the application router with all routes and middleware configured.
///
/// Rate limiting is added by [`run`], since it keys on the peer address.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/find-my-combos", post(find_combos_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/combos/{id}", get(combo_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // Request timeout to prevent slow client attacks
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                ))
                // Limit concurrent requests to prevent DOS
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES)),
        )
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the tokio runtime cannot
/// be created, or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    // Refuse to start on a bad catalog rather than serve empty results
    let (catalog, card_data) = args.source.load(false)?;
    info!(
        "Loaded catalog with {} combos ({} skipped)",
        catalog.len(),
        catalog.skipped().len()
    );
    let state = Arc::new(AppState::new(catalog, card_data));

    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, state).await })
}

async fn run_server(args: ServeArgs, state: Arc<AppState>) -> anyhow::Result<()> {
    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?;

    let app = create_router(state).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    });

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting combo-finder API at http://{addr}");
    info!("Listening on {addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}/api/catalog"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn find_combos_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FindCombosRequest>,
) -> Response {
    let start_time = std::time::Instant::now();

    let validated = match validate_request(&state, &body) {
        Ok(validated) => validated,
        Err(response) => return response,
    };

    let finder = ComboFinder::with_config(&state.catalog, validated.config);
    let results = finder.lookup(&validated.finder_request);
    let report = LookupReport::new(&validated.finder_request.deck, results);

    debug!(
        "find-my-combos answered in {}ms",
        start_time.elapsed().as_millis()
    );

    Json(report).into_response()
}

async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "count": state.catalog.len(),
        "skipped": state.catalog.skipped().len(),
        "distinct_cards": state.catalog.card_index().card_count(),
        "card_data": state.card_data.as_ref().map(CardDataStore::len),
    }))
}

async fn combo_handler(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Response {
    match state.catalog.get(ComboId::new(id)) {
        Some(combo) => Json(combo).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            &format!("Combo {id} not found"),
        ),
    }
}
