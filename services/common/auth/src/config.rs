use std::collections::HashSet;
use std::fmt;

use crate::error::ConfigError;

/// Key material handed to the token codec. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(**redacted**)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<&[u8]> for Secret {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for Secret {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

/// Immutable gate configuration, built once at startup.
///
/// `O` is the option type of the token codec in use; the gate forwards it untouched.
#[derive(Debug, Clone)]
pub struct GateConfig<O> {
    secret: Secret,
    verify: bool,
    options: O,
    exclude: HashSet<String>,
}

impl<O: Default> GateConfig<O> {
    pub fn builder() -> GateConfigBuilder<O> {
        GateConfigBuilder::default()
    }
}

impl<O> GateConfig<O> {
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    pub fn verify(&self) -> bool {
        self.verify
    }

    pub fn options(&self) -> &O {
        &self.options
    }

    pub fn exclude(&self) -> &HashSet<String> {
        &self.exclude
    }

    /// Exact string comparison; `/health` does not cover `/health/` or `/health/live`.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.contains(path)
    }
}

#[derive(Debug)]
pub struct GateConfigBuilder<O> {
    secret: Option<Secret>,
    verify: bool,
    options: O,
    exclude: HashSet<String>,
}

impl<O: Default> Default for GateConfigBuilder<O> {
    fn default() -> Self {
        Self {
            secret: None,
            verify: true,
            options: O::default(),
            exclude: HashSet::new(),
        }
    }
}

impl<O> GateConfigBuilder<O> {
    pub fn secret(mut self, secret: impl Into<Secret>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn options(mut self, options: O) -> Self {
        self.options = options;
        self
    }

    pub fn exclude_path(mut self, path: impl Into<String>) -> Self {
        self.exclude.insert(path.into());
        self
    }

    pub fn exclude<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.exclude.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<GateConfig<O>, ConfigError> {
        let secret = self.secret.ok_or(ConfigError::MissingSecret)?;

        Ok(GateConfig {
            secret,
            verify: self.verify,
            options: self.options,
            exclude: self.exclude,
        })
    }
}
