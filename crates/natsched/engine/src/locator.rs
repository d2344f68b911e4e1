//! Read-only lookup of tagged addresses and live gateways.

use crate::error::{LifecycleError, Result};
use natsched_provider::NetworkProvider;
use natsched_types::{Address, Gateway, GatewayState, SubnetId};
use std::sync::Arc;

/// Finds existing tagged resources by query. Read-only; no side effects.
///
/// Results are sorted by identifier so that "first match wins" downstream
/// is deterministic regardless of provider ordering.
pub struct ResourceLocator {
    provider: Arc<dyn NetworkProvider>,
}

impl ResourceLocator {
    pub fn new(provider: Arc<dyn NetworkProvider>) -> Self {
        Self { provider }
    }

    /// All addresses carrying `name_tag`, sorted by allocation id.
    /// An empty result is a valid, non-error outcome.
    pub async fn addresses_tagged(&self, name_tag: &str) -> Result<Vec<Address>> {
        let mut addresses = self
            .provider
            .describe_addresses(name_tag)
            .await
            .map_err(LifecycleError::Query)?;
        addresses.sort_by(|a, b| a.allocation_id.cmp(&b.allocation_id));
        Ok(addresses)
    }

    /// All gateways in `subnet_id` in the `available` state, sorted by id.
    pub async fn available_gateways(&self, subnet_id: &SubnetId) -> Result<Vec<Gateway>> {
        let mut gateways = self
            .provider
            .describe_gateways(subnet_id, GatewayState::Available)
            .await
            .map_err(LifecycleError::Query)?;
        gateways.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(gateways)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natsched_provider::InMemoryNetwork;

    #[tokio::test]
    async fn test_addresses_sorted_by_allocation_id() {
        let network = Arc::new(InMemoryNetwork::new());
        network
            .seed_address("eipalloc-b", "203.0.113.2", "nat-eip", None)
            .await;
        network
            .seed_address("eipalloc-a", "203.0.113.1", "nat-eip", None)
            .await;

        let locator = ResourceLocator::new(network);
        let addresses = locator.addresses_tagged("nat-eip").await.unwrap();

        assert_eq!(addresses[0].allocation_id.as_str(), "eipalloc-a");
        assert_eq!(addresses[1].allocation_id.as_str(), "eipalloc-b");
    }

    #[tokio::test]
    async fn test_empty_lookup_is_not_an_error() {
        let network = Arc::new(InMemoryNetwork::new());
        let locator = ResourceLocator::new(network);

        let addresses = locator.addresses_tagged("nat-eip").await.unwrap();
        assert!(addresses.is_empty());

        let gateways = locator
            .available_gateways(&SubnetId::new("subnet-pub"))
            .await
            .unwrap();
        assert!(gateways.is_empty());
    }

    #[tokio::test]
    async fn test_only_available_gateways_are_returned() {
        let network = Arc::new(InMemoryNetwork::new());
        network
            .seed_gateway(
                "nat-1",
                "subnet-pub",
                "eipalloc-1",
                GatewayState::Deleting,
                "nat-gw",
            )
            .await;
        network
            .seed_gateway(
                "nat-2",
                "subnet-pub",
                "eipalloc-2",
                GatewayState::Available,
                "nat-gw",
            )
            .await;

        let locator = ResourceLocator::new(network);
        let gateways = locator
            .available_gateways(&SubnetId::new("subnet-pub"))
            .await
            .unwrap();

        assert_eq!(gateways.len(), 1);
        assert_eq!(gateways[0].id.as_str(), "nat-2");
    }
}
