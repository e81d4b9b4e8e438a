use anyhow::{anyhow, Context, Result};
use common_auth::{DecodeOptions, GateConfig};
use jsonwebtoken::Algorithm;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const HEALTH_PATH: &str = "/healthz";

const DEFAULT_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:5173",
];

#[derive(Debug, Clone)]
pub struct GateSettings {
    pub addr: SocketAddr,
    pub cors_allowed_origins: Vec<String>,
    pub gate: GateConfig<DecodeOptions>,
}

impl GateSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // PEM keys are usually passed with escaped newlines
        let secret = lookup("JWT_SECRET")
            .and_then(|value| normalize_optional(&value))
            .map(|value| value.replace("\\n", "\n"))
            .context("JWT_SECRET must be set")?;

        let verify = lookup("JWT_VERIFY")
            .map(|value| parse_bool(&value))
            .unwrap_or(true);

        let exclude = lookup("JWT_EXCLUDE")
            .map(|value| parse_list(&value))
            .unwrap_or_else(|| vec![HEALTH_PATH.to_string()]);

        let algorithms = lookup("JWT_ALGORITHMS")
            .map(|value| parse_algorithms(&value))
            .transpose()
            .context("Failed to parse JWT_ALGORITHMS")?
            .unwrap_or_else(|| vec![Algorithm::HS256]);

        let leeway = lookup("JWT_LEEWAY_SECONDS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|err| anyhow!("Invalid JWT_LEEWAY_SECONDS '{value}': {err}"))
            })
            .transpose()?
            .unwrap_or(0);

        let mut options = DecodeOptions::default()
            .with_algorithms(algorithms)
            .with_leeway(leeway);
        options.validate_exp = lookup("JWT_VALIDATE_EXP")
            .map(|value| parse_bool(&value))
            .unwrap_or(true);
        options.issuer = list_from(&lookup, "JWT_ISSUER");
        options.audience = list_from(&lookup, "JWT_AUDIENCE");
        options.required_claims = list_from(&lookup, "JWT_REQUIRED_CLAIMS");

        let gate = GateConfig::builder()
            .secret(secret)
            .verify(verify)
            .options(options)
            .exclude(exclude)
            .build()?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(8080);
        let ip: IpAddr = host
            .parse()
            .with_context(|| format!("Invalid HOST '{host}'"))?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|value| parse_list(&value))
            .unwrap_or_else(|| DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect());

        Ok(Self {
            addr: SocketAddr::from((ip, port)),
            cors_allowed_origins,
            gate,
        })
    }
}

fn list_from<F>(lookup: &F, key: &str) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|value| parse_list(&value)).unwrap_or_default()
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(normalize_optional)
        .collect()
}

fn parse_algorithms(value: &str) -> Result<Vec<Algorithm>> {
    let algorithms = parse_list(value)
        .iter()
        .map(|name| {
            Algorithm::from_str(name).map_err(|_| anyhow!("Unsupported JWT algorithm '{name}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    if algorithms.is_empty() {
        return Err(anyhow!("At least one algorithm is required"));
    }
    Ok(algorithms)
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
