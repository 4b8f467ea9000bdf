use crate::config::Settings;
use crate::models::{Bet, BetCreate, BetUpdate};
use crate::store::{BetStore, StoreError};
use crate::utils::aggregation::Summary;
use crate::utils::filtering::{BetFilter, RawBetFilter};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Store handle shared across request handlers
pub type SharedStore = Arc<RwLock<BetStore>>;

/// Store failures mapped onto HTTP responses: unknown ids are 404,
/// invariant violations are 422 with every message in `detail`
struct ApiFailure(StoreError);

impl From<StoreError> for ApiFailure {
    fn from(err: StoreError) -> Self {
        ApiFailure(err)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self.0 {
            StoreError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Bet not found" })),
            )
                .into_response(),
            StoreError::Invalid(errors) => {
                let detail: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": detail })),
                )
                    .into_response()
            }
        }
    }
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to NBA Bet Tracker",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": "NBA Bet Tracker" }))
}

async fn create_bet(
    State(store): State<SharedStore>,
    Json(input): Json<BetCreate>,
) -> Result<impl IntoResponse, ApiFailure> {
    let bet = store.write().await.create(&input)?;
    tracing::info!("created bet {} ({})", bet.id, bet.bet_type);
    Ok((StatusCode::CREATED, Json(bet)))
}

async fn list_bets(
    State(store): State<SharedStore>,
    Query(raw): Query<RawBetFilter>,
) -> Json<Vec<Bet>> {
    let filter = BetFilter::from(raw);
    Json(store.read().await.list(&filter))
}

async fn get_bet(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<Json<Bet>, ApiFailure> {
    Ok(Json(store.read().await.get(id)?))
}

async fn update_bet(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
    Json(patch): Json<BetUpdate>,
) -> Result<Json<Bet>, ApiFailure> {
    let bet = store.write().await.update(id, &patch)?;
    tracing::info!("updated bet {}", id);
    Ok(Json(bet))
}

async fn replace_bet(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
    Json(input): Json<BetCreate>,
) -> Result<Json<Bet>, ApiFailure> {
    let bet = store.write().await.replace(id, &input)?;
    tracing::info!("replaced bet {}", id);
    Ok(Json(bet))
}

async fn delete_bet(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiFailure> {
    store.write().await.delete(id)?;
    tracing::info!("deleted bet {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn summary(State(store): State<SharedStore>) -> Json<Summary> {
    Json(store.read().await.summary())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router with the bets API nested under the
/// configured prefix
pub fn router(store: SharedStore, settings: &Settings) -> Router {
    let bets = Router::new()
        .route("/bets", get(list_bets).post(create_bet))
        .route("/bets/analytics/summary", get(summary))
        .route(
            "/bets/:id",
            get(get_bet)
                .patch(update_bet)
                .put(replace_bet)
                .delete(delete_bet),
        );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest(&settings.api_prefix, bets)
        .layer(ServiceBuilder::new().layer(cors_layer(&settings.cors_origins)))
        .with_state(store)
}
