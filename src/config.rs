//! Configuration module for the orchestrator binary (SPEC_FULL.md §10.3).
//!
//! A `clap::Parser` CLI for selecting a config file, a serde `Deserialize`
//! struct with field-level defaults, and environment-variable resolution
//! for secrets via a transparent wrapper type. Library crates never read
//! this module; only the binary entry point does.

use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// CLI arguments for the orchestrator binary.
#[derive(Parser, Debug)]
#[command(name = "paycross-orchestrator")]
#[command(about = "Cross-chain payment orchestrator core")]
pub struct CliArgs {
    /// Path to the JSON configuration file.
    #[arg(long, short, env = "CONFIG", default_value = "config.json")]
    pub config: PathBuf,
}

/// A transparent wrapper that resolves environment variables during
/// deserialization, supporting both a literal value and a `$VAR` /
/// `${VAR}` reference (SPEC_FULL.md §10.3: "environment-variable
/// resolution for secrets ... via a transparent wrapper type").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralOrEnv<T>(pub T);

impl<T> Deref for LiteralOrEnv<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> LiteralOrEnv<T> {
    fn parse_env_var_syntax(s: &str) -> Option<String> {
        if let Some(inner) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
            Some(inner.to_string())
        } else if let Some(name) = s.strip_prefix('$') {
            if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                Some(name.to_string())
            } else {
                None
            }
        } else {
            None
        }
    }
}

impl<'de, T> Deserialize<'de> for LiteralOrEnv<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let resolved = match Self::parse_env_var_syntax(&raw) {
            Some(var_name) => std::env::var(&var_name).map_err(|_| {
                serde::de::Error::custom(format!(
                    "environment variable {var_name:?} not found (referenced as {raw:?})"
                ))
            })?,
            None => raw,
        };
        resolved
            .parse::<T>()
            .map_err(|err| serde::de::Error::custom(format!("failed to parse value: {err}")))
            .map(LiteralOrEnv)
    }
}

/// A 32-byte key as required by `paycross_apikey::crypto::parse_encryption_key`
/// (SPEC_FULL.md §6: "64-character hex string (required); a raw 32-character
/// fallback is accepted but discouraged"). Stored as the original string;
/// parsed lazily so the discouraged-fallback warning is logged once, at the
/// point of use, rather than at config-load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionKeyConfig(pub String);

impl FromStr for EncryptionKeyConfig {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl EncryptionKeyConfig {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One RPC endpoint for a configured chain, ranked by `priority` the same
/// way `paycross_chain::rpc::RpcClientPool` expects.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcEndpointConfig {
    pub url: LiteralOrEnv<Url>,
    #[serde(default)]
    pub priority: u32,
}

mod fee_default_values {
    pub const DEFAULT_FIXED_FEE_USD: &str = "0.50";
    pub const DEFAULT_PERCENTAGE_FEE: &str = "0.003";
    pub const DEFAULT_BRIDGE_FEE_FLAT: &str = "0.10";

    pub fn fixed_fee_usd() -> String {
        DEFAULT_FIXED_FEE_USD.to_string()
    }
    pub fn percentage_fee() -> String {
        DEFAULT_PERCENTAGE_FEE.to_string()
    }
    pub fn bridge_fee_flat() -> String {
        DEFAULT_BRIDGE_FEE_FLAT.to_string()
    }
}

/// Fee defaults (SPEC_FULL.md §6: "Fee defaults"), matching
/// `paycross_payments::fees::DEFAULT_*` exactly.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeDefaultsConfig {
    #[serde(default = "fee_default_values::fixed_fee_usd")]
    pub default_fixed_fee_usd: String,
    #[serde(default = "fee_default_values::percentage_fee")]
    pub default_percentage_fee: String,
    #[serde(default = "fee_default_values::bridge_fee_flat")]
    pub default_bridge_fee_flat: String,
}

impl Default for FeeDefaultsConfig {
    fn default() -> Self {
        Self {
            default_fixed_fee_usd: fee_default_values::fixed_fee_usd(),
            default_percentage_fee: fee_default_values::percentage_fee(),
            default_bridge_fee_flat: fee_default_values::bridge_fee_flat(),
        }
    }
}

mod ttl_default_values {
    pub fn payment_expiry_seconds() -> u64 {
        60 * 60
    }
    pub fn payment_request_expiry_seconds() -> u64 {
        15 * 60
    }
}

/// TTLs (SPEC_FULL.md §6: `PaymentExpiry=1h`, `PaymentRequestExpiry=15min`),
/// stored in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtlConfig {
    #[serde(default = "ttl_default_values::payment_expiry_seconds")]
    pub payment_expiry_seconds: u64,
    #[serde(default = "ttl_default_values::payment_request_expiry_seconds")]
    pub payment_request_expiry_seconds: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            payment_expiry_seconds: ttl_default_values::payment_expiry_seconds(),
            payment_request_expiry_seconds: ttl_default_values::payment_request_expiry_seconds(),
        }
    }
}

/// Root orchestrator configuration (SPEC_FULL.md §10.3, §6).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorConfig {
    /// 64-character hex (or discouraged 32-character raw) secret-at-rest key.
    pub encryption_key: LiteralOrEnv<EncryptionKeyConfig>,
    #[serde(default)]
    pub fee_defaults: FeeDefaultsConfig,
    #[serde(default)]
    pub ttls: TtlConfig,
    /// RPC endpoints per CAIP-2 chain id, e.g. `"eip155:8453"`.
    #[serde(default)]
    pub rpc_endpoints: std::collections::HashMap<String, Vec<RpcEndpointConfig>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {0:?}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl OrchestratorConfig {
    /// Loads configuration from CLI arguments plus a JSON file: CLI
    /// `--config` picks the path, then every field not present in the file
    /// falls back to its serde default or an environment-variable
    /// reference inline in the file.
    pub fn load() -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        Self::load_from_path(&cli_args.config)
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::FileRead(path.to_path_buf(), err))?;
        let config: OrchestratorConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
