//! EVM RPC Client Pool (SPEC_FULL.md §2 item 3, §5).
//!
//! Maintains a mapping from endpoint URL to a shared, concurrency-safe
//! client. Real clients are constructed lazily on first use; tests install a
//! canned client via [`RpcClientPool::inject`] instead, matching the
//! teacher's `ProviderCache`-style test-injection hook (SPEC_FULL.md §10.4).

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use url::Url;

use paycross_repo::entities::Chain;

use crate::error::RpcCallError;

/// A JSON-RPC client capable of issuing `eth_call` view calls.
///
/// Abstracted behind a trait so the Probe and Quote Engine can run against a
/// deterministic mock in tests (SPEC_FULL.md §5: "a test-injection path
/// allows replacing a URL's client with a mock").
#[async_trait]
pub trait EvmRpcClient: Send + Sync {
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcCallError>;
}

/// Real `eth_call` client over a single HTTP JSON-RPC endpoint.
pub struct HttpRpcClient {
    client: alloy_rpc_client::RpcClient,
}

impl HttpRpcClient {
    pub fn new(url: &Url) -> Self {
        Self {
            client: alloy_rpc_client::RpcClient::new_http(url.clone()),
        }
    }
}

#[async_trait]
impl EvmRpcClient for HttpRpcClient {
    #[tracing::instrument(skip(self, data), err)]
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcCallError> {
        let call_object = serde_json::json!({
            "to": to,
            "data": data,
        });
        self.client
            .request::<_, Bytes>("eth_call", (call_object, "latest"))
            .await
            .map_err(|err| RpcCallError::Transport(err.to_string()))
    }
}

/// Per-endpoint client cache with a ranked failover walk over a chain's
/// active endpoints (SPEC_FULL.md §4.4: "iterate the chain's active
/// endpoints; the first endpoint that returns a client is used").
#[derive(Default)]
pub struct RpcClientPool {
    clients: DashMap<String, Arc<dyn EvmRpcClient>>,
}

impl RpcClientPool {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
        }
    }

    /// Installs a canned client for `url`, overriding whatever lazy
    /// construction would otherwise happen. Test-only entry point.
    pub fn inject(&self, url: &str, client: Arc<dyn EvmRpcClient>) {
        self.clients.insert(url.to_string(), client);
    }

    fn client_for_url(&self, url: &str) -> Option<Arc<dyn EvmRpcClient>> {
        if let Some(existing) = self.clients.get(url) {
            return Some(existing.clone());
        }
        let parsed = Url::parse(url).ok()?;
        let client: Arc<dyn EvmRpcClient> = Arc::new(HttpRpcClient::new(&parsed));
        self.clients.insert(url.to_string(), client.clone());
        Some(client)
    }

    /// Walks `chain`'s active endpoints in stored order and returns the
    /// first one a client can be constructed for.
    pub fn client_for_chain(&self, chain: &Chain) -> Result<Arc<dyn EvmRpcClient>, RpcCallError> {
        for endpoint in chain.active_endpoints() {
            if let Some(client) = self.client_for_url(&endpoint.url) {
                return Ok(client);
            }
        }
        Err(RpcCallError::NoEndpoints(chain.caip2().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paycross_repo::entities::RpcEndpoint;
    use paycross_types::{ChainType, EntityId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockClient {
        calls: AtomicUsize,
        response: Bytes,
    }

    #[async_trait]
    impl EvmRpcClient for MockClient {
        async fn eth_call(&self, _to: Address, _data: Bytes) -> Result<Bytes, RpcCallError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    fn chain_with_endpoints(endpoints: Vec<RpcEndpoint>) -> Chain {
        Chain {
            id: EntityId::from_u128(1),
            chain_type: ChainType::Evm,
            chain_ref: "8453".into(),
            rpc_endpoints: endpoints,
        }
    }

    #[tokio::test]
    async fn injected_client_is_used_for_its_url() {
        let pool = RpcClientPool::new();
        let mock = Arc::new(MockClient {
            calls: AtomicUsize::new(0),
            response: Bytes::from_static(&[0x01]),
        });
        pool.inject("https://rpc-1.example", mock.clone());

        let chain = chain_with_endpoints(vec![RpcEndpoint {
            url: "https://rpc-1.example".into(),
            active: true,
        }]);
        let client = pool.client_for_chain(&chain).unwrap();
        let result = client
            .eth_call(Address::ZERO, Bytes::new())
            .await
            .unwrap();
        assert_eq!(result, Bytes::from_static(&[0x01]));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn skips_inactive_endpoints_in_the_ranked_walk() {
        let pool = RpcClientPool::new();
        let mock = Arc::new(MockClient {
            calls: AtomicUsize::new(0),
            response: Bytes::new(),
        });
        pool.inject("https://rpc-active.example", mock.clone());

        let chain = chain_with_endpoints(vec![
            RpcEndpoint {
                url: "https://rpc-inactive.example".into(),
                active: false,
            },
            RpcEndpoint {
                url: "https://rpc-active.example".into(),
                active: true,
            },
        ]);
        let client = pool.client_for_chain(&chain).unwrap();
        client.eth_call(Address::ZERO, Bytes::new()).await.unwrap();
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fails_when_chain_has_no_active_endpoints() {
        let pool = RpcClientPool::new();
        let chain = chain_with_endpoints(vec![RpcEndpoint {
            url: "https://rpc.example".into(),
            active: false,
        }]);
        assert!(pool.client_for_chain(&chain).is_err());
    }
}
