use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use locale_tree::{
    GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator, MtError,
    TranslateOptions, TreeTranslator,
};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Serialize, Deserialize)]
pub struct TranslateRequest {
    pub document: Value,
    pub target_language: String,
    #[serde(default)]
    pub source_language: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TranslateResponse {
    pub document: Value,
    pub translated: usize,
    pub failures: Vec<FailureResponse>,
}

#[derive(Serialize, Deserialize)]
pub struct FailureResponse {
    pub path: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<TreeTranslator>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let provider: Arc<dyn MachineTranslator> = if std::env::var("LOCALE_TREE_MOCK").is_ok() {
        Arc::new(MockTranslator::new(MockMode::Suffix))
    } else {
        Arc::new(
            GoogleTranslateProvider::from_env()
                .map_err(|e| format!("Failed to initialize translator: {}", e))?,
        )
    };
    info!(provider = provider.provider_name(), "Starting locale-tree web server");

    let state = AppState {
        translator: Arc::new(TreeTranslator::new(provider)),
    };

    let addr = std::env::var("LOCALE_TREE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/translate", post(translate_document))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

fn error_response(error: MtError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match error {
        MtError::InputFormatError(_) | MtError::InvalidLocale(_) => StatusCode::BAD_REQUEST,
        MtError::ConfigError(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

async fn translate_document(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let translator = match &request.source_language {
        Some(source) => {
            let options = TranslateOptions {
                source_locale: source.clone(),
                ..state.translator.options().clone()
            };
            state.translator.as_ref().clone().with_options(options)
        }
        None => state.translator.as_ref().clone(),
    };

    info!(
        "Translating document from {} to {}",
        translator.options().source_locale,
        request.target_language
    );

    let result = translator
        .translate_value(request.document, &request.target_language)
        .await
        .map_err(error_response)?;

    info!(
        translated = result.translated,
        failed = result.failures.len(),
        "Document translated"
    );

    Ok(Json(TranslateResponse {
        document: result.document.into_value(),
        translated: result.translated,
        failures: result
            .failures
            .into_iter()
            .map(|failure| FailureResponse {
                path: failure.path,
                error: failure.error.to_string(),
            })
            .collect(),
    }))
}
