// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  The backend serves a single local
// dashboard session, so there is no authentication layer.  CORS is configured
// permissively for development.
//
// Error policy mirrors the fetch pipeline: an unknown symbol is a 200 with a
// user-facing no-data message; a provider failure is a 502.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::app_state::AppState;
use crate::chart::ChartSpec;
use crate::indicators::{annotate, IndicatorFlags};
use crate::summary::SummaryMetrics;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/session", get(session))
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/select", post(select))
        .route("/api/v1/flags", get(get_flags))
        .route("/api/v1/flags", post(set_flags))
        .route("/api/v1/recents/clear", post(clear_recents))
        .route("/api/v1/cache/clear", post(clear_cache))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Session snapshot
// =============================================================================

async fn session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session_snapshot())
}

// =============================================================================
// Symbol selection
// =============================================================================

#[derive(Deserialize)]
struct SelectRequest {
    symbol: String,
}

#[derive(Serialize)]
struct SelectResponse {
    selected_symbol: String,
}

async fn select(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    match state.select_symbol(&req.symbol) {
        Some(symbol) => Ok(Json(SelectResponse {
            selected_symbol: symbol,
        })),
        None => Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "symbol must be non-empty" })),
        )),
    }
}

// =============================================================================
// Indicator toggles
// =============================================================================

async fn get_flags(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(*state.indicator_flags.read())
}

#[derive(Deserialize)]
struct FlagsUpdate {
    #[serde(default)]
    rsi: Option<bool>,
    #[serde(default)]
    sma: Option<bool>,
    #[serde(default)]
    ema: Option<bool>,
    #[serde(default)]
    macd: Option<bool>,
}

#[derive(Serialize)]
struct FlagsResponse {
    #[serde(flatten)]
    flags: IndicatorFlags,
    changes: Vec<String>,
}

async fn set_flags(
    State(state): State<Arc<AppState>>,
    Json(update): Json<FlagsUpdate>,
) -> impl IntoResponse {
    let mut flags = state.indicator_flags.write();
    let mut changes = Vec::new();

    macro_rules! apply_flag {
        ($field:ident) => {
            if let Some(val) = update.$field {
                if flags.$field != val {
                    changes.push(format!(
                        "{}: {} -> {}",
                        stringify!($field),
                        flags.$field,
                        val
                    ));
                    flags.$field = val;
                }
            }
        };
    }

    apply_flag!(rsi);
    apply_flag!(sma);
    apply_flag!(ema);
    apply_flag!(macd);

    let snapshot = *flags;
    drop(flags);

    if !changes.is_empty() {
        info!(changes = ?changes, "indicator toggles updated");
        state.increment_version();
    }

    Json(FlagsResponse {
        flags: snapshot,
        changes,
    })
}

// =============================================================================
// Dashboard — the full fetch → annotate → render pipeline
// =============================================================================

#[derive(Serialize)]
struct DashboardResponse {
    state_version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    flags: IndicatorFlags,
    /// User-facing notice when there is nothing to chart.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SummaryMetrics>,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, (StatusCode, Json<serde_json::Value>)> {
    let flags = *state.indicator_flags.read();
    let selected = state.selected_symbol.read().clone();

    let Some(symbol) = selected else {
        return Ok(Json(DashboardResponse {
            state_version: state.current_state_version(),
            symbol: None,
            flags,
            message: Some("Enter a stock symbol to get started.".to_string()),
            chart: None,
            summary: None,
        }));
    };

    // Primary fetch: failures terminate the interaction as a gateway error.
    let series = state.fetch_history(&symbol).await.map_err(|e| {
        (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "error": format!("failed to fetch data for {symbol}: {e:#}"),
            })),
        )
    })?;

    if series.is_empty() {
        return Ok(Json(DashboardResponse {
            state_version: state.current_state_version(),
            symbol: Some(symbol.clone()),
            flags,
            message: Some(format!("No data found for {symbol}. Check the symbol.")),
            chart: None,
            summary: None,
        }));
    }

    // Only a successful non-empty fetch updates the recents list.
    state.record_recent(&symbol);

    let annotated = annotate(&series, flags);

    // Ancillary lookup, best-effort.
    let market_cap = state.client.market_cap(&symbol).await;

    let chart = ChartSpec::build(&annotated);
    let summary = SummaryMetrics::build(&annotated, market_cap);

    Ok(Json(DashboardResponse {
        state_version: state.current_state_version(),
        symbol: Some(symbol),
        flags,
        message: None,
        chart,
        summary,
    }))
}

// =============================================================================
// Reset actions
// =============================================================================

#[derive(Serialize)]
struct ResetResponse {
    message: &'static str,
}

async fn clear_recents(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.clear_recents();
    Json(ResetResponse {
        message: "Recent symbols cleared",
    })
}

async fn clear_cache(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.clear_cache();
    Json(ResetResponse {
        message: "Cache cleared!",
    })
}
