use std::sync::Arc;

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use common_auth::{protect, JwtGate, TokenClaims, TokenHeader};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::HEALTH_PATH;

async fn health() -> &'static str {
    "ok"
}

/// Echoes what the gate attached for the caller.
async fn whoami(claims: TokenClaims, header: TokenHeader) -> Json<Value> {
    Json(json!({
        "subject": claims.subject(),
        "algorithm": header.algorithm(),
        "claims": claims,
        "header": header,
    }))
}

pub fn build_router(gate: Arc<JwtGate>) -> Router {
    let routes = Router::new()
        .route(HEALTH_PATH, get(health))
        .route("/whoami", get(whoami));

    protect(routes, gate)
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION])
}
