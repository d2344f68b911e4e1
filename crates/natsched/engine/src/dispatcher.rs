//! Top-level entry point: select a lifecycle direction and sequence the
//! gateway reconciler then route convergence.

use crate::config::ScheduleConfig;
use crate::error::{DispatchError, Result};
use crate::gateway::GatewayReconciler;
use crate::routes::RouteConvergenceEngine;
use natsched_provider::NetworkProvider;
use natsched_types::{GatewayId, InvocationEvent, InvocationResponse, Operation};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Sequences one scheduled invocation end to end.
///
/// On any stage failure a single wrapped error names the direction being
/// attempted and the underlying cause. No rollback is performed:
/// reconciliation is corrected by the next scheduled invocation, not by
/// compensating transactions.
pub struct Dispatcher {
    config: ScheduleConfig,
    gateways: GatewayReconciler,
    routes: RouteConvergenceEngine,
}

impl Dispatcher {
    /// Build a dispatcher, validating the configuration once up front.
    pub fn new(provider: Arc<dyn NetworkProvider>, mut config: ScheduleConfig) -> Result<Self> {
        config.normalize();
        config.validate()?;
        Ok(Self {
            gateways: GatewayReconciler::new(provider.clone(), config.wait.clone()),
            routes: RouteConvergenceEngine::new(provider),
            config,
        })
    }

    /// Handle a structured scheduler event.
    pub async fn handle(
        &self,
        event: InvocationEvent,
    ) -> std::result::Result<InvocationResponse, DispatchError> {
        self.run(event.operation).await
    }

    /// Run one lifecycle operation to completion.
    #[instrument(skip(self))]
    pub async fn run(
        &self,
        operation: Operation,
    ) -> std::result::Result<InvocationResponse, DispatchError> {
        match self.execute(operation).await {
            Ok(gateway_id) => {
                info!(operation = %operation, gateway_id = %gateway_id, "operation succeeded");
                Ok(InvocationResponse::success(operation, &gateway_id))
            }
            Err(source) => {
                error!(operation = %operation, error = %source, "operation failed");
                Err(DispatchError { operation, source })
            }
        }
    }

    async fn execute(&self, operation: Operation) -> Result<GatewayId> {
        match operation {
            Operation::Create => {
                let gateway_id = self
                    .gateways
                    .create(
                        &self.config.public_subnet_id,
                        &self.config.eip_tag_name,
                        &self.config.nat_gateway_tag_name,
                    )
                    .await?;
                self.routes
                    .converge(&gateway_id, &self.config.private_subnet_ids, true)
                    .await?;
                Ok(gateway_id)
            }
            Operation::Delete => {
                let gateway_id = self.gateways.delete(&self.config.public_subnet_id).await?;
                self.routes
                    .converge(&gateway_id, &self.config.private_subnet_ids, false)
                    .await?;
                Ok(gateway_id)
            }
        }
    }
}
