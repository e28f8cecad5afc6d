use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::Method,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use memeforge_shared::{synth, DeployRequest, ValidatedDeploy};
use memeforge_store::{MemeCoin, Storage};

use crate::config::ServerConfig;
use crate::deploy::{Deployer, GAS_USED};
use crate::error::ServerError;
use crate::rate_limit::{throttle_middleware, Throttle};

/// Headroom on top of the file limit for multipart framing around the bytes.
const MULTIPART_OVERHEAD: usize = 16 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Storage>,
    pub deployer: Arc<Deployer>,
    pub throttle: Throttle,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    // Only the mutating routes carry the per-IP throttle.
    let mutating = Router::new()
        .route("/api/upload", post(upload_image))
        .route("/api/deploy", post(deploy_coin))
        .route_layer(middleware::from_fn_with_state(
            state.throttle.clone(),
            throttle_middleware,
        ));

    Router::new()
        .merge(mutating)
        .route("/api/coins/:address", get(coins_by_creator))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_size + MULTIPART_OVERHEAD,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    image_url: String,
    file_name: String,
    file_size: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployResponse {
    success: bool,
    meme_coin: MemeCoin,
    contract_address: String,
    deployment_tx_hash: String,
    basescan_url: String,
    gas_used: &'static str,
    fee_recipient: String,
}

#[derive(Serialize)]
struct CoinsResponse {
    coins: Vec<MemeCoin>,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/upload` — accept one `image` field from a multipart form and
/// fabricate a content-address URL for it.  The payload is discarded after
/// the reference exists; a real implementation would hand the bytes to a
/// content-addressed store behind the same interface.
async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Multipart(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            return Err(ServerError::NotAnImage);
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::Multipart(e.to_string()))?;

        if data.len() > state.config.max_upload_size {
            return Err(ServerError::ImageTooLarge {
                size: data.len(),
                max: state.config.max_upload_size,
            });
        }

        let image_url = synth::content_address_url();

        info!(file = %file_name, size = data.len(), "image upload simulated");

        return Ok(Json(UploadResponse {
            success: true,
            image_url,
            file_name,
            file_size: data.len(),
        }));
    }

    Err(ServerError::MissingImage)
}

/// `POST /api/deploy` — validate token metadata, then run the staged
/// deployment pipeline and answer with the finished record plus chain
/// metadata.
async fn deploy_coin(
    State(state): State<AppState>,
    Json(req): Json<DeployRequest>,
) -> Result<Json<DeployResponse>, ServerError> {
    let input = ValidatedDeploy::parse(req)?;

    let receipt = state
        .deployer
        .deploy(input)
        .await
        .map_err(|e| ServerError::DeployFailed(e.to_string()))?;

    info!(
        id = %receipt.coin.id,
        symbol = %receipt.coin.symbol,
        contract = %receipt.contract_address,
        "meme coin deployed"
    );

    let basescan_url = synth::basescan_url(&receipt.contract_address);

    Ok(Json(DeployResponse {
        success: true,
        meme_coin: receipt.coin,
        contract_address: receipt.contract_address,
        deployment_tx_hash: receipt.deployment_tx_hash,
        basescan_url,
        gas_used: GAS_USED,
        fee_recipient: state.config.fee_recipient.clone(),
    }))
}

/// `GET /api/coins/:address` — list every coin created by `address`, in
/// insertion order.  No format check: a malformed address simply matches
/// nothing and yields an empty list.
async fn coins_by_creator(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<CoinsResponse>, ServerError> {
    let coins = state
        .store
        .meme_coins_by_creator(&address)
        .map_err(|e| ServerError::QueryFailed(e.to_string()))?;

    Ok(Json(CoinsResponse { coins }))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
