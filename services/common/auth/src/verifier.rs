use async_trait::async_trait;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::claims::DecodedToken;
use crate::codec::TokenCodec;
use crate::config::Secret;
use crate::error::DecodeError;

/// Registered claims `jsonwebtoken` knows how to require on its own.
const REGISTERED_CLAIMS: [&str; 5] = ["exp", "nbf", "aud", "iss", "sub"];

/// Decode options understood by [`JsonWebTokenCodec`].
///
/// Deserializable so it can come straight out of a config file; every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Accepted `alg` values. All entries must use the same key type.
    pub algorithms: Vec<Algorithm>,
    /// Allowable clock skew in seconds when validating exp/nbf.
    pub leeway: u64,
    pub validate_exp: bool,
    pub validate_nbf: bool,
    /// Claims that must be present in the payload, registered or not.
    pub required_claims: Vec<String>,
    /// Accepted issuers (iss). Empty disables the check.
    pub issuer: Vec<String>,
    /// Accepted audiences (aud). Empty disables the check.
    pub audience: Vec<String>,
    pub subject: Option<String>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            algorithms: vec![Algorithm::HS256],
            leeway: 0,
            validate_exp: true,
            validate_nbf: true,
            required_claims: Vec::new(),
            issuer: Vec::new(),
            audience: Vec::new(),
            subject: None,
        }
    }
}

impl DecodeOptions {
    pub fn with_algorithms(mut self, algorithms: impl Into<Vec<Algorithm>>) -> Self {
        self.algorithms = algorithms.into();
        self
    }

    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer.push(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience.push(audience.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn require_claim(mut self, claim: impl Into<String>) -> Self {
        self.required_claims.push(claim.into());
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.algorithms = self.algorithms.clone();
        validation.leeway = self.leeway;
        validation.validate_exp = self.validate_exp;
        validation.validate_nbf = self.validate_nbf;
        validation.required_spec_claims = self
            .required_claims
            .iter()
            .filter(|claim| REGISTERED_CLAIMS.contains(&claim.as_str()))
            .cloned()
            .collect();

        // jsonwebtoken only compares iss/aud when the token carries them.
        if !self.issuer.is_empty() {
            validation.set_issuer(&self.issuer);
            validation.required_spec_claims.insert("iss".to_string());
        }
        if self.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&self.audience);
            validation.required_spec_claims.insert("aud".to_string());
        }
        validation.sub = self.subject.clone();

        validation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyFamily {
    Hmac,
    Rsa,
    Ec,
    Ed,
}

impl KeyFamily {
    fn of(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Self::Hmac,
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => Self::Rsa,
            Algorithm::ES256 | Algorithm::ES384 => Self::Ec,
            Algorithm::EdDSA => Self::Ed,
        }
    }
}

/// [`TokenCodec`] backed by the `jsonwebtoken` crate.
///
/// The secret is read according to the key type of the allowed algorithms: raw bytes for
/// HMAC, PEM for RSA/PSS, ECDSA and EdDSA.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWebTokenCodec;

impl JsonWebTokenCodec {
    pub fn new() -> Self {
        Self
    }

    pub fn decode_token(
        &self,
        token: &str,
        secret: &Secret,
        verify: bool,
        options: &DecodeOptions,
    ) -> Result<DecodedToken, DecodeError> {
        let (key, validation) = if verify {
            (decoding_key(secret, &options.algorithms)?, options.validation())
        } else {
            (DecodingKey::from_secret(&[]), unverified_validation())
        };

        let data = decode::<Value>(token, &key, &validation).map_err(from_jwt_error)?;
        if verify {
            ensure_required_claims(&data.claims, &options.required_claims)?;
        }

        let header = serde_json::to_value(&data.header)
            .map_err(|err| DecodeError::new(format!("Unserializable header: {err}")))?;

        debug!(alg = ?data.header.alg, verified = verify, "decoded JSON Web Token");
        Ok(DecodedToken::new(data.claims, header))
    }
}

#[async_trait]
impl TokenCodec for JsonWebTokenCodec {
    type Options = DecodeOptions;

    async fn decode(
        &self,
        token: &str,
        secret: &Secret,
        verify: bool,
        options: &DecodeOptions,
    ) -> Result<DecodedToken, DecodeError> {
        self.decode_token(token, secret, verify, options)
    }
}

fn decoding_key(secret: &Secret, algorithms: &[Algorithm]) -> Result<DecodingKey, DecodeError> {
    let mut families = algorithms.iter().map(|alg| KeyFamily::of(*alg));
    let family = families
        .next()
        .ok_or_else(|| DecodeError::new("No algorithm allowed"))?;
    if families.any(|other| other != family) {
        return Err(DecodeError::new(
            "Allowed algorithms must share one key type",
        ));
    }

    let bytes = secret.expose();
    let key = match family {
        KeyFamily::Hmac => Ok(DecodingKey::from_secret(bytes)),
        KeyFamily::Rsa => DecodingKey::from_rsa_pem(bytes),
        KeyFamily::Ec => DecodingKey::from_ec_pem(bytes),
        KeyFamily::Ed => DecodingKey::from_ed_pem(bytes),
    };
    key.map_err(from_jwt_error)
}

fn unverified_validation() -> Validation {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

fn ensure_required_claims(claims: &Value, required: &[String]) -> Result<(), DecodeError> {
    match required.iter().find(|claim| claims.get(claim.as_str()).is_none()) {
        Some(missing) => Err(DecodeError::new(format!(
            "Missing required claim {missing}"
        ))),
        None => Ok(()),
    }
}

fn from_jwt_error(err: JwtError) -> DecodeError {
    let message = match err.kind() {
        ErrorKind::InvalidToken => "Not enough or too many segments".to_string(),
        ErrorKind::InvalidSignature => "Signature verification failed".to_string(),
        ErrorKind::ExpiredSignature => "Signature has expired".to_string(),
        ErrorKind::ImmatureSignature => "Signature nbf has not been reached".to_string(),
        ErrorKind::InvalidIssuer => "Invalid issuer".to_string(),
        ErrorKind::InvalidAudience => "Invalid audience".to_string(),
        ErrorKind::InvalidSubject => "Invalid subject".to_string(),
        ErrorKind::MissingRequiredClaim(claim) => format!("Missing required claim {claim}"),
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
            "Expected a different algorithm".to_string()
        }
        ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            "Invalid segment encoding".to_string()
        }
        ErrorKind::InvalidKeyFormat | ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidEcdsaKey => {
            "Invalid key material".to_string()
        }
        _ => err.to_string(),
    };
    DecodeError::new(message)
}
