use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tracing::{debug, trace};

use crate::claims::DecodedToken;
use crate::codec::TokenCodec;
use crate::config::GateConfig;
use crate::error::GateResult;
use crate::header::AuthorizationHeader;
use crate::verifier::{DecodeOptions, JsonWebTokenCodec};

pub type JwtGate = AuthGate<JsonWebTokenCodec>;

/// Bearer-token gate placed in front of a router.
///
/// Paths in the exclusion set pass untouched. Everything else needs
/// `Authorization: Bearer <x.y.z>` that the codec accepts; the decoded claims and header
/// are then attached to the request as [`TokenClaims`](crate::TokenClaims) and
/// [`TokenHeader`](crate::TokenHeader).
pub struct AuthGate<C: TokenCodec> {
    config: GateConfig<C::Options>,
    codec: C,
}

impl<C: TokenCodec> AuthGate<C> {
    pub fn new(config: GateConfig<C::Options>, codec: C) -> Self {
        Self { config, codec }
    }

    pub fn config(&self) -> &GateConfig<C::Options> {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Decides the outcome for one request.
    ///
    /// `Ok(None)` means the path is excluded and nothing was checked; `Ok(Some(_))` carries
    /// the decoded token to attach before forwarding.
    pub async fn authorize(
        &self,
        path: &str,
        authorization: Option<&HeaderValue>,
    ) -> GateResult<Option<DecodedToken>> {
        if self.config.is_excluded(path) {
            trace!(path, "path excluded from bearer authentication");
            return Ok(None);
        }

        match self.verify(authorization).await {
            Ok(decoded) => Ok(Some(decoded)),
            Err(err) => {
                debug!(path, error = %err, "rejected request");
                Err(err)
            }
        }
    }

    async fn verify(&self, authorization: Option<&HeaderValue>) -> GateResult<DecodedToken> {
        let token = AuthorizationHeader::from_header(authorization).into_token()?;
        let decoded = self
            .codec
            .decode(
                token,
                self.config.secret(),
                self.config.verify(),
                self.config.options(),
            )
            .await?;
        Ok(decoded)
    }
}

impl JwtGate {
    pub fn jsonwebtoken(config: GateConfig<DecodeOptions>) -> Self {
        Self::new(config, JsonWebTokenCodec::new())
    }
}

/// Axum middleware running the gate; use with `middleware::from_fn_with_state` or [`protect`].
pub async fn authenticate<C: TokenCodec>(
    State(gate): State<Arc<AuthGate<C>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let authorization = request.headers().get(AUTHORIZATION).cloned();

    match gate.authorize(&path, authorization.as_ref()).await {
        Ok(None) => next.run(request).await,
        Ok(Some(decoded)) => {
            decoded.attach(request.extensions_mut());
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Wraps every route currently on `router` with the gate.
///
/// Exclusions match the path the layer sees, so apply this on the outermost router when
/// excluded paths are written as full paths.
pub fn protect<S, C>(router: Router<S>, gate: Arc<AuthGate<C>>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    C: TokenCodec,
{
    router.layer(middleware::from_fn_with_state(gate, authenticate::<C>))
}
