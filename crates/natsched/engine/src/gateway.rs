//! Gateway reconciliation: converge to a created or deleted gateway.

use crate::address::AddressReconciler;
use crate::config::WaitConfig;
use crate::error::{LifecycleError, Result};
use crate::locator::ResourceLocator;
use crate::waiter::{await_gateway_state, WaitOutcome};
use natsched_provider::NetworkProvider;
use natsched_types::{GatewayId, GatewayState, SubnetId};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Creates or removes the managed gateway and blocks until it reaches the
/// terminal state route convergence depends on. Routes cannot legally
/// target a pending or deleting gateway, and the scheduler window is short
/// enough that a synchronous bounded wait is the simpler correct design.
pub struct GatewayReconciler {
    locator: ResourceLocator,
    addresses: AddressReconciler,
    provider: Arc<dyn NetworkProvider>,
    wait: WaitConfig,
}

impl GatewayReconciler {
    pub fn new(provider: Arc<dyn NetworkProvider>, wait: WaitConfig) -> Self {
        Self {
            locator: ResourceLocator::new(provider.clone()),
            addresses: AddressReconciler::new(provider.clone()),
            provider,
            wait,
        }
    }

    /// Create a gateway in `public_subnet_id` bound to a reconciled
    /// address, and wait until it is available.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        public_subnet_id: &SubnetId,
        eip_tag: &str,
        gateway_tag: &str,
    ) -> Result<GatewayId> {
        let allocation_id = self.addresses.ensure_address(eip_tag).await?;

        let gateway = self
            .provider
            .create_gateway(public_subnet_id, &allocation_id, gateway_tag)
            .await
            .map_err(LifecycleError::Creation)?;
        info!(
            gateway_id = %gateway.id,
            subnet_id = %public_subnet_id,
            allocation_id = %allocation_id,
            "gateway creation requested"
        );

        self.await_terminal(gateway.id, GatewayState::Available)
            .await
    }

    /// Delete the available gateway in `public_subnet_id` and wait until
    /// it is gone. The bound address is deliberately retained.
    #[instrument(skip(self))]
    pub async fn delete(&self, public_subnet_id: &SubnetId) -> Result<GatewayId> {
        let gateways = self.locator.available_gateways(public_subnet_id).await?;

        let Some(gateway) = gateways.first() else {
            // Zero gateways is an error here, unlike the address case:
            // deletion with nothing to delete signals drift.
            return Err(LifecycleError::NotFound {
                subnet_id: public_subnet_id.clone(),
            });
        };
        if gateways.len() > 1 {
            warn!(
                count = gateways.len(),
                subnet_id = %public_subnet_id,
                "multiple available gateways in subnet; deleting the first"
            );
        }

        // Address retention is a deliberate policy, not an oversight.
        info!(
            gateway_id = %gateway.id,
            allocation_id = %gateway.allocation_id,
            public_ip = gateway.public_ip.as_deref().unwrap_or("<unknown>"),
            "deleting gateway; its address is retained for future use"
        );

        self.provider
            .delete_gateway(&gateway.id)
            .await
            .map_err(LifecycleError::Deletion)?;

        self.await_terminal(gateway.id.clone(), GatewayState::Deleted)
            .await
    }

    async fn await_terminal(&self, gateway_id: GatewayId, target: GatewayState) -> Result<GatewayId> {
        match await_gateway_state(self.provider.as_ref(), &gateway_id, target, &self.wait).await? {
            WaitOutcome::Reached => {
                info!(gateway_id = %gateway_id, state = %target, "gateway reached terminal state");
                Ok(gateway_id)
            }
            WaitOutcome::TimedOut { last_observed } => {
                warn!(
                    gateway_id = %gateway_id,
                    last_observed = %last_observed,
                    "wait budget elapsed; state may still converge out-of-band"
                );
                Err(LifecycleError::ProvisioningTimeout {
                    gateway_id,
                    target,
                    budget: self.wait.max_wait(),
                })
            }
        }
    }
}
