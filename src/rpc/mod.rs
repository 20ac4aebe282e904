//! HTTP surface of the relay.
//!
//! - `GET /fees/quote` signs a fee quote for a transfer.
//! - `POST /fees/verify` checks a previously signed quote.
//! - `GET /nonce/{address}` returns the nonce the account must sign with.
//! - `POST /relay` validates and broadcasts a signed intent.
//! - `GET /relay/status` reports the relayer balance.
//! - `GET /health` is the liveness probe.

mod relay;
pub use relay::Relay;

use crate::{
    error::RelayError,
    types::{
        FeeQuoteDto, RelayRequest, RelayResponse, VerifyFeeQuoteRequest, VerifyFeeQuoteResponse,
        rpc::{FeeQuoteParams, Health, NonceParams, NonceResponse, RelayStatus},
    },
};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, post},
};
use http::header;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::{AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

impl Relay {
    /// Builds the HTTP router, serving at most `max_connections` requests at once.
    pub fn into_router(self, max_connections: usize) -> Router {
        let cors = CorsLayer::new()
            .allow_methods(AllowMethods::any())
            .allow_origin(AllowOrigin::any())
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route("/fees/quote", get(quote_fee))
            .route("/fees/verify", post(verify_fee_quote))
            .route("/nonce/{address}", get(get_nonce))
            .route("/relay", post(relay))
            .route("/relay/status", get(relay_status))
            .route("/health", get(health))
            .layer(GlobalConcurrencyLimitLayer::new(max_connections))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self)
    }
}

async fn quote_fee(
    State(relay): State<Relay>,
    params: Result<Query<FeeQuoteParams>, QueryRejection>,
) -> Result<Json<FeeQuoteDto>, RelayError> {
    let Query(params) = params.map_err(|err| RelayError::InvalidParams(err.body_text()))?;
    relay.quote_fee(params).await.map(Json)
}

async fn verify_fee_quote(
    State(relay): State<Relay>,
    request: Result<Json<VerifyFeeQuoteRequest>, JsonRejection>,
) -> Result<Json<VerifyFeeQuoteResponse>, RelayError> {
    let Json(request) = request.map_err(|err| RelayError::InvalidParams(err.body_text()))?;
    Ok(Json(relay.verify_fee_quote(request)))
}

async fn get_nonce(
    State(relay): State<Relay>,
    Path(address): Path<String>,
    params: Result<Query<NonceParams>, QueryRejection>,
) -> Result<Json<NonceResponse>, RelayError> {
    let Query(params) = params.map_err(|err| RelayError::InvalidParams(err.body_text()))?;
    relay.get_nonce(&address, params).await.map(Json)
}

async fn relay(
    State(relay): State<Relay>,
    request: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayResponse>, RelayError> {
    let Json(request) = request.map_err(|err| RelayError::InvalidParams(err.body_text()))?;
    relay.relay(request).await.map(Json)
}

async fn relay_status(State(relay): State<Relay>) -> Result<Json<RelayStatus>, RelayError> {
    relay.relay_status().await.map(Json)
}

async fn health(State(relay): State<Relay>) -> Json<Health> {
    Json(relay.health().await)
}
