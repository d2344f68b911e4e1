//! Address reconciliation: ensure exactly one reusable address exists.

use crate::error::{LifecycleError, Result};
use crate::locator::ResourceLocator;
use natsched_provider::NetworkProvider;
use natsched_types::AllocationId;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Ensures a usable address exists under the configured tag, allocating
/// one only if none is free. Addresses are never released; orphaned copies
/// are tolerated and flagged, not corrected.
pub struct AddressReconciler {
    locator: ResourceLocator,
    provider: Arc<dyn NetworkProvider>,
}

impl AddressReconciler {
    pub fn new(provider: Arc<dyn NetworkProvider>) -> Self {
        Self {
            locator: ResourceLocator::new(provider.clone()),
            provider,
        }
    }

    /// Return a reusable unassociated address, or allocate a new one.
    ///
    /// Never leaves the caller without a usable address unless the
    /// allocation call itself fails. May create a new billable address.
    #[instrument(skip(self))]
    pub async fn ensure_address(&self, name_tag: &str) -> Result<AllocationId> {
        let addresses = self.locator.addresses_tagged(name_tag).await?;
        let (associated, unassociated): (Vec<_>, Vec<_>) =
            addresses.into_iter().partition(|a| a.is_associated());

        if let Some(address) = unassociated.first() {
            if unassociated.len() > 1 {
                // Resource leak signal; no corrective deletion.
                warn!(
                    count = unassociated.len(),
                    name_tag,
                    "multiple unassociated addresses share this tag; using the first"
                );
            }
            info!(
                allocation_id = %address.allocation_id,
                public_ip = %address.public_ip,
                "reusing existing address"
            );
            return Ok(address.allocation_id.clone());
        }

        if !associated.is_empty() {
            info!(
                count = associated.len(),
                name_tag, "all tagged addresses are associated; allocating a new one"
            );
        }

        let address = self
            .provider
            .allocate_address(name_tag)
            .await
            .map_err(LifecycleError::Allocation)?;
        info!(
            allocation_id = %address.allocation_id,
            public_ip = %address.public_ip,
            "allocated new address"
        );
        Ok(address.allocation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natsched_provider::InMemoryNetwork;

    #[tokio::test]
    async fn test_reuses_unassociated_address() {
        let network = Arc::new(InMemoryNetwork::new());
        network
            .seed_address("eipalloc-1", "203.0.113.1", "nat-eip", None)
            .await;

        let reconciler = AddressReconciler::new(network.clone());
        let allocation = reconciler.ensure_address("nat-eip").await.unwrap();

        assert_eq!(allocation.as_str(), "eipalloc-1");
        assert_eq!(network.mutation_count().await, 0);
    }

    #[tokio::test]
    async fn test_allocates_when_none_tagged() {
        let network = Arc::new(InMemoryNetwork::new());
        let reconciler = AddressReconciler::new(network.clone());

        let allocation = reconciler.ensure_address("nat-eip").await.unwrap();

        assert_eq!(network.address_count().await, 1);
        let address = network.address(&allocation).await.unwrap();
        assert_eq!(address.name_tag, "nat-eip");
    }

    #[tokio::test]
    async fn test_allocates_when_all_associated() {
        let network = Arc::new(InMemoryNetwork::new());
        network
            .seed_address("eipalloc-1", "203.0.113.1", "nat-eip", Some("eipassoc-1"))
            .await;

        let reconciler = AddressReconciler::new(network.clone());
        let allocation = reconciler.ensure_address("nat-eip").await.unwrap();

        assert_ne!(allocation.as_str(), "eipalloc-1");
        assert_eq!(network.address_count().await, 2);
    }

    #[tokio::test]
    async fn test_multiple_unassociated_picks_first_sorted_without_cleanup() {
        let network = Arc::new(InMemoryNetwork::new());
        network
            .seed_address("eipalloc-b", "203.0.113.2", "nat-eip", None)
            .await;
        network
            .seed_address("eipalloc-a", "203.0.113.1", "nat-eip", None)
            .await;

        let reconciler = AddressReconciler::new(network.clone());
        let allocation = reconciler.ensure_address("nat-eip").await.unwrap();

        // Deterministic tie-break, surplus left alone.
        assert_eq!(allocation.as_str(), "eipalloc-a");
        assert_eq!(network.address_count().await, 2);
        assert_eq!(network.mutation_count().await, 0);
    }

    #[tokio::test]
    async fn test_allocation_failure_is_fatal() {
        let network = Arc::new(InMemoryNetwork::new());
        network.fail_allocations().await;

        let reconciler = AddressReconciler::new(network);
        let result = reconciler.ensure_address("nat-eip").await;

        assert!(matches!(result, Err(LifecycleError::Allocation(_))));
    }
}
