use std::sync::Arc;

use async_trait::async_trait;

use crate::claims::DecodedToken;
use crate::config::Secret;
use crate::error::DecodeError;

/// Token decoding collaborator used by [`AuthGate`](crate::gate::AuthGate).
///
/// The gate hands over the raw token plus its configured secret, verify flag and options;
/// how those are interpreted is entirely up to the codec. With `verify == false` the codec
/// must still parse the token but skip signature and claim checks.
#[async_trait]
pub trait TokenCodec: Send + Sync + 'static {
    type Options: Send + Sync + 'static;

    async fn decode(
        &self,
        token: &str,
        secret: &Secret,
        verify: bool,
        options: &Self::Options,
    ) -> Result<DecodedToken, DecodeError>;
}

#[async_trait]
impl<C> TokenCodec for Arc<C>
where
    C: TokenCodec,
{
    type Options = C::Options;

    async fn decode(
        &self,
        token: &str,
        secret: &Secret,
        verify: bool,
        options: &Self::Options,
    ) -> Result<DecodedToken, DecodeError> {
        C::decode(&**self, token, secret, verify, options).await
    }
}
