pub mod config;
pub mod routes;

pub use config::GateSettings;
pub use routes::{build_router, cors_layer};
