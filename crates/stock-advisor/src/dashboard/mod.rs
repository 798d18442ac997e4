//! Web dashboard
//!
//! `GET /` renders the form and, when a ticker is submitted, the company
//! view and the requested analysis. Failures are shown inline on the page.

pub mod chart;
pub mod page;

use crate::engine::{AnalysisMode, AnalysisRequest, Persona, StockAdvisor};
use crate::error::StockError;
use crate::indicators::trend_signals;
use axum::{
    Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use chart::PriceChart;
use page::{AnalysisView, PageView, SignalsView, StockView};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct AppState {
    advisor: Arc<StockAdvisor>,
}

/// Query string of the dashboard form
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub ticker: Option<String>,
    pub mode: Option<String>,
    pub persona: Option<String>,
}

/// Message shown to the user for a failed request
pub fn user_message(err: &StockError) -> String {
    match err {
        StockError::InvalidSymbol(message) | StockError::InvalidRequest(message) => {
            message.clone()
        }
        StockError::DataUnavailable { reason, .. } => reason.clone(),
        StockError::MissingApiKey => err.to_string(),
        other => format!("An error occurred during analysis: {other}"),
    }
}

/// Build the page view for a query
pub async fn dashboard_view(advisor: &StockAdvisor, query: DashboardQuery) -> PageView {
    let persona = query
        .persona
        .as_deref()
        .map_or(Persona::default(), Persona::parse);

    let mode = match query.mode.as_deref() {
        None => Ok(AnalysisMode::InvestorStyle),
        Some(raw) => raw.parse::<AnalysisMode>(),
    };

    let input = query.ticker.unwrap_or_default();
    let mut view = PageView::new(
        input.trim(),
        *mode.as_ref().unwrap_or(&AnalysisMode::InvestorStyle),
        persona,
    );

    let mode = match mode {
        Ok(mode) => mode,
        Err(e) => {
            view.error = Some(user_message(&e));
            return view;
        }
    };

    // first visit, nothing submitted yet
    if query.mode.is_none() && input.is_empty() {
        return view;
    }

    let ticker = match StockAdvisor::normalize_ticker(&input) {
        Ok(ticker) => ticker,
        Err(e) => {
            view.error = Some(user_message(&e));
            return view;
        }
    };

    let data = match advisor.load_stock(&ticker).await {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(%ticker, error = %e, "Failed to load stock data");
            view.error = Some(user_message(&e));
            return view;
        }
    };

    view.stock = Some(StockView::from_data(&data));
    match trend_signals(&data.history) {
        Ok(signals) => view.signals = signals.as_ref().map(SignalsView::from),
        Err(e) => tracing::warn!(error = %e, "Trend signals unavailable"),
    }
    match PriceChart::from_history(&data.history) {
        Ok(chart) => view.chart = chart,
        Err(e) => tracing::warn!(error = %e, "Price chart unavailable"),
    }

    if !advisor.can_analyze() {
        view.api_key_missing = true;
        return view;
    }

    let request = AnalysisRequest::new(ticker, mode).with_persona(persona);
    match advisor.analyze(&request, &data).await {
        Ok(analysis) => view.analysis = Some(AnalysisView::from(&analysis)),
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            view.error = Some(user_message(&e));
        }
    }

    view
}

async fn index(State(state): State<AppState>, Query(query): Query<DashboardQuery>) -> Html<String> {
    let view = dashboard_view(&state.advisor, query).await;
    match page::render(&view) {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render dashboard");
            Html(page::fallback(&e.to_string()))
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

/// Dashboard routes
pub fn router(advisor: Arc<StockAdvisor>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .with_state(AppState { advisor })
        .layer(TraceLayer::new_for_http())
}

/// Serve the dashboard until Ctrl-C
pub async fn serve(advisor: Arc<StockAdvisor>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(advisor);

    tracing::info!(%addr, "dashboard listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
