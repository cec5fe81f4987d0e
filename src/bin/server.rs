use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cellar_engine::drink::current_year;
use cellar_engine::{
    CellarError, CellarSort, CellarStore, DrinkStatus, EngineConfig, NewWine, RecognitionEngine,
    RecognizeResponse, SqliteCellar, WineGuess, WineRecord,
};

#[derive(Clone)]
struct AppState {
    engine: Arc<RecognitionEngine>,
    cellar: Arc<dyn CellarStore>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    sort: CellarSort,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    ok: bool,
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Wine plus its drink badge for the current year
#[derive(Debug, Serialize)]
struct WineView {
    #[serde(flatten)]
    wine: WineRecord,
    drink: DrinkStatus,
}

impl WineView {
    fn new(wine: WineRecord, year: i32) -> Self {
        let drink = wine.drink_status(year);
        Self { wine, drink }
    }

    fn many(wines: Vec<WineRecord>) -> Vec<Self> {
        let year = current_year();
        wines.into_iter().map(|w| Self::new(w, year)).collect()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cellar_server=debug,cellar_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env();

    tracing::info!("🚀 Starting cellar server");
    tracing::info!("📦 Database: {}", config.db_path);
    tracing::info!("🔌 Port: {}", config.port);

    let engine = RecognitionEngine::from_config(&config)?;
    let cellar = SqliteCellar::new(&config.db_path).await?;

    let state = AppState {
        engine: Arc::new(engine),
        cellar: Arc::new(cellar),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/recognize-wine", post(recognize_handler))
        .route("/v1/wines", get(list_handler).post(create_handler))
        .route(
            "/v1/wines/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/v1/wines/:id/take-one", post(take_one_handler))
        .route("/v1/drink-now", get(drink_now_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🍷 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: cellar_engine::VERSION.to_string(),
    })
}

async fn recognize_handler(
    State(state): State<AppState>,
    Json(guess): Json<WineGuess>,
) -> Result<Json<RecognizeResponse>, AppError> {
    tracing::debug!("Recognize request: {:?}", guess);
    let response = state.engine.recognize(guess).await?;
    Ok(Json(response))
}

async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<WineView>>, AppError> {
    let wines = state.cellar.list(params.sort).await?;
    Ok(Json(WineView::many(wines)))
}

async fn create_handler(
    State(state): State<AppState>,
    Json(wine): Json<NewWine>,
) -> Result<(StatusCode, Json<WineView>), AppError> {
    let stored = state.cellar.insert(wine).await?;
    tracing::info!("➕ Added {}", stored.display_name());
    Ok((StatusCode::CREATED, Json(WineView::new(stored, current_year()))))
}

async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WineView>, AppError> {
    let wine = state
        .cellar
        .get(&id)
        .await?
        .ok_or(CellarError::NotFound(id))?;
    Ok(Json(WineView::new(wine, current_year())))
}

async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut wine): Json<WineRecord>,
) -> Result<Json<WineView>, AppError> {
    wine.id = id;
    let updated = state.cellar.update(wine).await?;
    Ok(Json(WineView::new(updated, current_year())))
}

async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.cellar.delete(&id).await?;
    tracing::info!("🗑️ Deleted wine {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn take_one_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WineView>, AppError> {
    let wine = state.cellar.take_one(&id).await?;
    Ok(Json(WineView::new(wine, current_year())))
}

async fn drink_now_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<WineView>>, AppError> {
    let wines = state.cellar.drink_now(current_year()).await?;
    Ok(Json(WineView::many(wines)))
}

// Error handling
struct AppError(CellarError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            CellarError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            CellarError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Wine not found: {}", id)),
            e @ CellarError::UpstreamUnavailable { .. } => (StatusCode::BAD_GATEWAY, e.to_string()),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        if status.is_server_error() {
            tracing::error!("❌ Error: {} - {}", status, message);
        } else {
            tracing::debug!("Rejected: {} - {}", status, message);
        }

        (
            status,
            Json(ErrorResponse {
                ok: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<CellarError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
