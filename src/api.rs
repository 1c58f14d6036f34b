use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::aggregate::{Aggregator, AggregatorConfig, NewsItem};

#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
}

impl AppState {
    /// State over the production catalog.
    pub fn new(config: AggregatorConfig) -> Self {
        Self::with_aggregator(Aggregator::new(config))
    }

    /// State over a custom facade; tests point this at local fixtures.
    pub fn with_aggregator(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/trending", get(trending))
        .route("/api/news", get(news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct TrendingQuery {
    platform: Option<String>,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

/// `GET /api/trending` serves every board in one round; `?platform=key`
/// narrows to one board. A key outside the catalog is a 400 and no fetch
/// is scheduled for it.
async fn trending(State(state): State<AppState>, Query(q): Query<TrendingQuery>) -> Response {
    match q.platform.as_deref() {
        Some(key) => match state.aggregator.fetch_platform(key).await {
            Ok(report) => Json(report).into_response(),
            Err(e) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
                .into_response(),
        },
        None => Json(state.aggregator.fetch_all_platforms().await).into_response(),
    }
}

#[derive(serde::Serialize)]
struct NewsResp {
    news: Vec<NewsItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

/// `GET /api/news` always answers 200; when the merged list comes back empty
/// an advisory message rides along so the dashboard can say why.
async fn news(State(state): State<AppState>) -> Json<NewsResp> {
    let news = state.aggregator.fetch_news().await;
    let error = news
        .is_empty()
        .then_some("news feeds temporarily unavailable");
    Json(NewsResp { news, error })
}
