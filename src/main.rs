use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use soma_client::{AnalysisClient, AnalyzeRequest};
use soma_core::view::DEFAULT_TITLE;
use soma_core::{AnalysisPayload, BodyMapView, InteractionState, svg};
use soma_types::BodyZone;

/// Application state shared across REST API handlers
///
/// Holds the client for the remote analysis backend; everything else the
/// handlers need arrives in the request.
#[derive(Clone)]
struct AppState {
    analysis: AnalysisClient,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, analyze, bodymap_view, bodymap_svg),
    components(schemas(HealthRes, AnalyzeReq))
)]
struct ApiDoc;

/// Health check response body.
#[derive(Debug, Serialize, ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

/// Request body for `/analyze`, forwarded to the backend pipeline.
#[derive(Debug, Deserialize, ToSchema)]
struct AnalyzeReq {
    /// The interview transcript to analyse
    text: String,
    /// Optional research-context block from the context wizard
    #[serde(default)]
    #[schema(value_type = Object)]
    context: Option<serde_json::Value>,
    /// Optional researcher-supplied code definitions to seed the codebook
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    custom_codes: Option<Vec<serde_json::Value>>,
}

/// Interaction parameters accepted by the body-map endpoints.
///
/// Zone names outside the canonical set are ignored rather than rejected,
/// mirroring how the resolver treats unknown wire zones.
#[derive(Debug, Default, Deserialize, IntoParams)]
struct ViewParams {
    /// Structure index to display (structural payloads only)
    structure: Option<usize>,
    /// Zone currently under the pointer
    hovered: Option<String>,
    /// Zone to select, as if clicked
    selected: Option<String>,
}

/// Replays the requested interaction on a fresh state.
///
/// Selection goes through the click transition, so a request selecting an
/// empty zone ends up with no selection, exactly as the click would have.
fn interaction_for(payload: &AnalysisPayload, params: &ViewParams) -> InteractionState {
    let mut state = InteractionState::new();
    if let Some(index) = params.structure {
        state.select_structure(index, payload.structure_count());
    }
    if let Some(zone) = params
        .selected
        .as_deref()
        .and_then(|name| BodyZone::parse(name).ok())
    {
        state.click(zone, payload.zones(state.structure_index()));
    }
    if let Some(zone) = params
        .hovered
        .as_deref()
        .and_then(|name| BodyZone::parse(name).ok())
    {
        state.pointer_enter(zone);
    }
    state
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/bodymap/view", post(bodymap_view))
        .route("/bodymap/svg", post(bodymap_svg))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Main entry point for the SOMA front-end server
///
/// Serves the REST API used by browser clients: a proxy to the remote
/// analysis backend plus stateless body-map view derivation.
///
/// # Environment Variables
/// - `SOMA_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `ANALYSIS_BACKEND_URL`: Analysis backend base URL (default: "http://localhost:8000")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("soma=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("SOMA_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let backend_url =
        std::env::var("ANALYSIS_BACKEND_URL").unwrap_or_else(|_| "http://localhost:8000".into());

    tracing::info!("++ Starting SOMA REST on {}", rest_addr);
    tracing::info!("++ Analysis backend at {}", backend_url);

    let analysis = AnalysisClient::new(backend_url)?;
    let rest_app = app(AppState { analysis });

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, rest_app).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "SOMA is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeReq,
    responses(
        (status = 200, description = "Backend analysis result", body = Object),
        (status = 502, description = "Analysis backend unavailable")
    )
)]
/// Forward a transcript to the analysis backend
///
/// Submits the transcript to the remote enhanced-analysis pipeline and
/// returns its structured JSON verbatim. The body-map endpoints accept that
/// JSON as their request body.
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeReq>,
) -> Result<Json<serde_json::Value>, (StatusCode, &'static str)> {
    let request = AnalyzeRequest {
        text: req.text,
        context: req.context,
        custom_codes: req.custom_codes,
    };
    match state.analysis.analyze(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!("Analysis request failed: {:?}", e);
            Err((StatusCode::BAD_GATEWAY, "Analysis backend unavailable"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/bodymap/view",
    request_body = Object,
    params(ViewParams),
    responses(
        (status = 200, description = "Body-map render model", body = Object)
    )
)]
/// Derive the body-map render model from an analysis payload
///
/// Accepts an analysis result in any supported shape and returns the full
/// render model: per-zone paint, structure tabs, legend, tooltip, and detail
/// panel. A payload with no recognisable body-map data yields the explicit
/// empty state.
async fn bodymap_view(
    State(_state): State<AppState>,
    Query(params): Query<ViewParams>,
    Json(payload): Json<serde_json::Value>,
) -> Json<BodyMapView> {
    let payload = AnalysisPayload::from_value(&payload);
    let state = interaction_for(&payload, &params);
    Json(BodyMapView::build(&payload, &state))
}

#[utoipa::path(
    post,
    path = "/bodymap/svg",
    request_body = Object,
    params(ViewParams),
    responses(
        (status = 200, description = "Rendered body diagram", content_type = "image/svg+xml", body = String)
    )
)]
/// Render the body diagram as SVG
///
/// Accepts an analysis result in any supported shape and returns the
/// diagram for the requested structure. An empty payload renders the
/// explicit empty-state document.
async fn bodymap_svg(
    State(_state): State<AppState>,
    Query(params): Query<ViewParams>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    let payload = AnalysisPayload::from_value(&payload);
    let state = interaction_for(&payload, &params);

    let rendered = match payload.mode() {
        Some(mode) => {
            let title = payload
                .structure_name(state.structure_index())
                .unwrap_or(DEFAULT_TITLE);
            svg::render(payload.zones(state.structure_index()), mode, title)
        }
        None => svg::render_empty(),
    };

    ([(header::CONTENT_TYPE, "image/svg+xml")], rendered)
}
