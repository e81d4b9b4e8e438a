use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::claims::{TokenClaims, TokenHeader};
use crate::error::GateError;

// Handlers asking for claims on a route the gate never saw (or excluded) get the
// same 401 a missing header would produce. Excluded paths are never inspected, so a header
// the client did send there was not checked and does not count as authentication.

#[async_trait]
impl<S> FromRequestParts<S> for TokenClaims
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .ok_or(GateError::MissingHeader)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TokenHeader
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenHeader>()
            .cloned()
            .ok_or(GateError::MissingHeader)
    }
}
