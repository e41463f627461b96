//! Cross-chain payment orchestrator entry point.
//!
//! This binary loads configuration, wires up tracing, and validates the
//! configured secrets before handing the assembled [`OrchestratorCore`] off
//! to whatever (out-of-scope) HTTP or cron layer embeds it. It does not
//! serve requests itself — persistence drivers and the API boundary are
//! both out of scope for this crate (SPEC_FULL.md §1 Non-goals).
//!
//! Environment:
//! - `.env` values loaded at startup via `dotenvy`.
//! - `CONFIG` (or `--config`) selects the JSON configuration file.
//! - `RUST_LOG` controls the tracing filter.

use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use paycross_apikey::crypto::parse_encryption_key;
use paycross_orchestrator::config::OrchestratorConfig;
use paycross_orchestrator::error::OrchestratorError;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), OrchestratorError> {
    dotenv().ok();
    init_tracing();

    let config = OrchestratorConfig::load()?;
    let encryption_key = parse_encryption_key(config.encryption_key.as_str())?;
    // Keep the key material out of the log line below; only its length
    // (already validated) and the configured defaults are worth logging.
    let _ = encryption_key;

    tracing::info!(
        fixed_base_fee = %config.fee_defaults.default_fixed_fee_usd,
        percentage_fee = %config.fee_defaults.default_percentage_fee,
        bridge_fee_flat = %config.fee_defaults.default_bridge_fee_flat,
        payment_expiry_seconds = config.ttls.payment_expiry_seconds,
        payment_request_expiry_seconds = config.ttls.payment_request_expiry_seconds,
        configured_chains = config.rpc_endpoints.len(),
        "paycross-orchestrator configuration loaded"
    );

    tracing::info!(
        "configuration validated; wire OrchestratorCore::new(..) with this deployment's repository and RPC-pool implementations to run the orchestrator"
    );

    Ok(())
}
