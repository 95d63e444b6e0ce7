/// API сервер предсказания задержек рейсов

use axum::{
    extract::State,
    http::Method,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber;

use flight_delay_ml::{ArtifactBundle, DelayPredictor, RawItinerary, Verdict};

#[derive(Clone)]
struct AppState {
    predictor: std::sync::Arc<DelayPredictor>,
}

#[tokio::main]
async fn main() {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Артефакты загружаются один раз и дальше только читаются,
    // поэтому состояние без блокировок
    let artifacts_path = std::env::var("FLIGHT_MODEL_ARTIFACTS")
        .unwrap_or_else(|_| "model/artifacts.json".to_string());
    let bundle = ArtifactBundle::load(&artifacts_path)
        .expect("failed to load model artifacts");
    let state = AppState {
        predictor: std::sync::Arc::new(DelayPredictor::from_artifacts(bundle)),
    };

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/predict", post(predict))
        .layer(cors)
        .with_state(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], 8000));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    tracing::info!("Server listening on http://0.0.0.0:8000");
    axum::serve(listener, app).await.unwrap();
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Flight Delay Predictor API (Rust)",
        "version": "0.1.0"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn predict(
    State(state): State<AppState>,
    Json(raw): Json<RawItinerary>,
) -> Result<Json<Verdict>, String> {
    tracing::info!(
        "Predict request: {} {} -> {}",
        raw.unique_carrier,
        raw.origin,
        raw.dest
    );

    // Внешняя граница запроса: любая ошибка конвейера превращается
    // в одно пользовательское сообщение, без повторных попыток
    match state.predictor.predict(&raw) {
        Ok(verdict) => Ok(Json(verdict)),
        Err(e) => Err(format!("Prediction error: {}", e)),
    }
}
