use std::sync::Arc;

use common_auth::JwtGate;
use gate_service::{build_router, cors_layer, GateSettings};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = GateSettings::from_env()?;
    info!(
        verify = settings.gate.verify(),
        excluded = settings.gate.exclude().len(),
        algorithms = ?settings.gate.options().algorithms,
        "bearer gate configured"
    );

    let gate = Arc::new(JwtGate::jsonwebtoken(settings.gate));
    let app = build_router(gate).layer(cors_layer(&settings.cors_allowed_origins));

    info!(addr = %settings.addr, "starting gate-service");
    let listener = TcpListener::bind(settings.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
