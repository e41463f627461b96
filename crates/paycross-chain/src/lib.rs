//! Chain resolution and EVM RPC client pool (SPEC_FULL.md §4.1, §2 item 3).
//!
//! - [`resolver`] — `resolveAny`: normalizes an external chain identifier.
//! - [`rpc`] — per-endpoint RPC client pool with a ranked failover walk and a
//!   test-injection hook.
//! - [`error`] — [`ChainError`] / [`RpcCallError`].

pub mod error;
pub mod resolver;
pub mod rpc;

pub use error::{ChainError, RpcCallError};
pub use resolver::ChainResolver;
pub use rpc::{EvmRpcClient, HttpRpcClient, RpcClientPool};
