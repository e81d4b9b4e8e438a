use axum::http::HeaderValue;

use crate::error::GateError;

const BEARER: &str = "Bearer";

/// Structural reading of an `Authorization` header value. No cryptography happens here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationHeader<'a> {
    Missing,
    /// First whitespace-delimited token is not exactly `Bearer`.
    NotBearer,
    /// `Bearer` followed by something that is not a single `x.y.z` value.
    ShapeMismatch,
    Bearer(&'a str),
}

impl<'a> AuthorizationHeader<'a> {
    /// Header values that are not visible ASCII can never carry a bearer token.
    pub fn from_header(value: Option<&'a HeaderValue>) -> Self {
        match value {
            None => Self::Missing,
            Some(value) => match value.to_str() {
                Ok(raw) => classify_authorization(Some(raw)),
                Err(_) => Self::NotBearer,
            },
        }
    }

    pub fn into_token(self) -> Result<&'a str, GateError> {
        match self {
            Self::Bearer(token) => Ok(token),
            Self::Missing => Err(GateError::MissingHeader),
            Self::NotBearer => Err(GateError::MalformedHeader),
            Self::ShapeMismatch => Err(GateError::ShapeMismatch),
        }
    }
}

pub fn classify_authorization(value: Option<&str>) -> AuthorizationHeader<'_> {
    let Some(raw) = value else {
        return AuthorizationHeader::Missing;
    };

    let mut parts = raw.split_whitespace();
    if parts.next() != Some(BEARER) {
        return AuthorizationHeader::NotBearer;
    }

    // the token is the last segment, so runs of spaces after the scheme are fine
    let rest: Vec<&str> = parts.collect();
    match rest.as_slice() {
        [token] if has_jwt_shape(token) => AuthorizationHeader::Bearer(token),
        _ => AuthorizationHeader::ShapeMismatch,
    }
}

fn has_jwt_shape(token: &str) -> bool {
    token.split('.').count() == 3
}
