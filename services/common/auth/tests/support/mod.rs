#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use common_auth::{
    protect, AuthGate, DecodeError, DecodeOptions, DecodedToken, GateConfig, JwtGate, Secret,
    TokenClaims, TokenCodec, TokenHeader,
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

pub const SECRET: &str = "gate-test-secret";
pub const DOWNSTREAM_HEADER: &str = "x-downstream";

/// Codec double: accepts `a.b.c`, rejects everything else with a fixed message.
#[derive(Default)]
pub struct StubCodec {
    pub calls: AtomicUsize,
}

impl StubCodec {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenCodec for StubCodec {
    type Options = ();

    async fn decode(
        &self,
        token: &str,
        _secret: &Secret,
        _verify: bool,
        _options: &(),
    ) -> Result<DecodedToken, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if token == "a.b.c" {
            Ok(DecodedToken::new(
                json!({"sub": "stub-user", "scope": "read"}),
                json!({"alg": "HS256", "typ": "JWT"}),
            ))
        } else {
            Err(DecodeError::new("signature verification failed"))
        }
    }
}

/// Downstream handler: reports what the gate attached and marks the response so tests can
/// tell it came through untouched.
pub async fn inspect(request: Request) -> Response {
    let claims = request
        .extensions()
        .get::<TokenClaims>()
        .map(|claims| claims.0.clone());
    let header = request
        .extensions()
        .get::<TokenHeader>()
        .map(|header| header.0.clone());

    (
        StatusCode::ACCEPTED,
        [(
            HeaderName::from_static(DOWNSTREAM_HEADER),
            HeaderValue::from_static("hit"),
        )],
        Json(json!({ "claims": claims, "header": header })),
    )
        .into_response()
}

fn routes() -> Router {
    Router::new()
        .route("/", get(inspect))
        .route("/public", get(inspect))
        .route("/public/", get(inspect))
        .route("/public/x", get(inspect))
        .route("/private", get(inspect))
}

pub fn stub_app(exclude: &[&str]) -> (Router, Arc<AuthGate<Arc<StubCodec>>>, Arc<StubCodec>) {
    let codec = Arc::new(StubCodec::default());
    let config = GateConfig::<()>::builder()
        .secret(SECRET)
        .exclude(exclude.iter().copied())
        .build()
        .expect("config");
    let gate = Arc::new(AuthGate::new(config, codec.clone()));
    (protect(routes(), gate.clone()), gate, codec)
}

pub fn jwt_app(verify: bool, options: DecodeOptions, exclude: &[&str]) -> Router {
    let config = GateConfig::builder()
        .secret(SECRET)
        .verify(verify)
        .options(options)
        .exclude(exclude.iter().copied())
        .build()
        .expect("config");
    protect(routes(), Arc::new(JwtGate::jsonwebtoken(config)))
}

pub fn request(path: &str, authorization: Option<&str>) -> Request {
    let mut builder = axum::http::Request::builder().uri(path).method("GET");
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn body_bytes(resp: Response) -> Vec<u8> {
    resp.into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(resp: Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).expect("json body")
}

pub fn sign(claims: &Value, secret: &str) -> String {
    sign_with(Algorithm::HS256, claims, secret)
}

pub fn sign_with(algorithm: Algorithm, claims: &Value, secret: &str) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign token")
}

pub fn now() -> i64 {
    Utc::now().timestamp()
}
