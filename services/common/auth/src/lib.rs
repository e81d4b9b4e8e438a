pub mod claims;
pub mod codec;
pub mod config;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod header;
pub mod verifier;

pub use claims::{DecodedToken, TokenClaims, TokenHeader};
pub use codec::TokenCodec;
pub use config::{GateConfig, GateConfigBuilder, Secret};
pub use error::{ConfigError, DecodeError, GateError, GateResult};
pub use gate::{authenticate, protect, AuthGate, JwtGate};
pub use header::{classify_authorization, AuthorizationHeader};
pub use verifier::{DecodeOptions, JsonWebTokenCodec};
