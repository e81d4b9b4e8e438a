use axum::http::Extensions;
use serde::Serialize;
use serde_json::Value;

/// Output of a successful decode: the payload and JOSE header, both as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub claims: Value,
    pub header: Value,
}

impl DecodedToken {
    pub fn new(claims: Value, header: Value) -> Self {
        Self { claims, header }
    }

    /// Stores the sections as [`TokenClaims`] / [`TokenHeader`] request extensions.
    /// A `null` section is skipped.
    pub fn attach(self, extensions: &mut Extensions) {
        if !self.claims.is_null() {
            extensions.insert(TokenClaims(self.claims));
        }
        if !self.header.is_null() {
            extensions.insert(TokenHeader(self.header));
        }
    }
}

/// Verified JWT payload attached to the request for downstream handlers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TokenClaims(pub Value);

impl TokenClaims {
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// JOSE header of the verified token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TokenHeader(pub Value);

impl TokenHeader {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn algorithm(&self) -> Option<&str> {
        self.get("alg").and_then(Value::as_str)
    }

    pub fn key_id(&self) -> Option<&str> {
        self.get("kid").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
