//! traypick HTTP boundary.
//!
//! Thin axum front over the judgment core: request parsing and validation
//! happen here, the pipeline itself stays pure and synchronous. Each request
//! is an independent computation sharing only the immutable catalog, so the
//! handlers borrow an `Arc<ProductCatalog>` and nothing else.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use tower_http::trace::TraceLayer;

use traypick::{judge, JudgeConfig, JudgeInput, JudgeResponse, ProductCatalog};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "traypick-server")]
#[command(about = "HTTP service judging vended products from detections and weight changes")]
#[command(version)]
struct Args {
    /// Socket address to bind.
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: String,

    /// Path to a catalog JSON file (embedded catalog when omitted).
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Clone)]
struct AppState {
    catalog: Arc<ProductCatalog>,
    config: JudgeConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => ProductCatalog::from_json_file(path)?,
        None => ProductCatalog::default(),
    };
    tracing::info!("serving {} products", catalog.len());

    let state = AppState {
        catalog: Arc::new(catalog),
        config: JudgeConfig::default(),
    };

    let app = Router::new()
        .route("/api/judge", post(judge_handler))
        .route("/api/health", get(health_handler))
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    tracing::info!("listening on {}", args.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn judge_handler(State(state): State<AppState>, Json(input): Json<JudgeInput>) -> Response {
    let detections = match input.validate() {
        Ok(detections) => detections,
        Err(err) => {
            tracing::warn!("rejecting judge request: {err}");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    };

    let mut config = state.config.clone();
    config.use_hand_filter = input.use_hand_filter;

    let result = judge(&detections, input.delta_weight, &state.catalog, &config);
    Json(JudgeResponse::from(&result)).into_response()
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
        "productCount": state.catalog.len(),
    }))
}

async fn list_products(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "count": state.catalog.len(),
        "products": state.catalog.all(),
    }))
}

async fn get_product(State(state): State<AppState>, Path(id): Path<u32>) -> Response {
    match state.catalog.by_id(id) {
        Some(product) => Json(product.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("product {id} not found") })),
        )
            .into_response(),
    }
}
