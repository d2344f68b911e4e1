//! Route-table convergence: make default routes agree with gateway state.
//!
//! Convergence compares observed routes against the desired end state and
//! issues only the minimal corrective calls, so a steady-state run is a
//! pure read. Routes owned by anything other than the active gateway are
//! never touched on the delete path.

use crate::error::{LifecycleError, Result};
use natsched_provider::{NetworkProvider, ProviderError};
use natsched_types::{GatewayId, Route, RouteTableId, SubnetId, DEFAULT_ROUTE_CIDR};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// The corrective call a table needs, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RouteAction {
    Create,
    Replace { previous: Option<GatewayId> },
    Remove,
    Noop,
}

/// Decide what a table's default route needs. Pure; drives all mutation.
fn plan(current: Option<&Route>, gateway_id: &GatewayId, to_created: bool) -> RouteAction {
    match (to_created, current) {
        (true, None) => RouteAction::Create,
        (true, Some(route)) if route.gateway_id.as_ref() == Some(gateway_id) => RouteAction::Noop,
        (true, Some(route)) => RouteAction::Replace {
            previous: route.gateway_id.clone(),
        },
        (false, Some(route)) if route.gateway_id.as_ref() == Some(gateway_id) => {
            RouteAction::Remove
        }
        (false, _) => RouteAction::Noop,
    }
}

/// Counts of corrective calls issued in one convergence sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvergenceSummary {
    pub tables_examined: usize,
    pub created: usize,
    pub replaced: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Drives every dependent route table toward the desired gateway state.
pub struct RouteConvergenceEngine {
    provider: Arc<dyn NetworkProvider>,
}

impl RouteConvergenceEngine {
    pub fn new(provider: Arc<dyn NetworkProvider>) -> Self {
        Self { provider }
    }

    /// Converge the route tables of every subnet in `subnet_ids`, in input
    /// order, toward (`to_created = true`) or away from (`false`) the
    /// default route targeting `gateway_id`.
    ///
    /// Per-table mutation failures do not abort the sweep: remaining
    /// tables and subnets are still converged, and the first failure is
    /// surfaced afterwards. A failed read of a subnet's tables aborts,
    /// since nothing can be planned for it.
    #[instrument(skip_all, fields(gateway_id = %gateway_id, to_created = to_created))]
    pub async fn converge(
        &self,
        gateway_id: &GatewayId,
        subnet_ids: &[SubnetId],
        to_created: bool,
    ) -> Result<ConvergenceSummary> {
        let mut summary = ConvergenceSummary::default();
        let mut first_failure: Option<(RouteTableId, ProviderError)> = None;

        for subnet_id in subnet_ids {
            let tables = self
                .provider
                .describe_route_tables(subnet_id)
                .await
                .map_err(LifecycleError::Query)?;

            for table in tables {
                summary.tables_examined += 1;
                let action = plan(table.default_route(), gateway_id, to_created);

                let outcome = self
                    .apply(&table.id, gateway_id, &action, &mut summary)
                    .await;
                if let Err(source) = outcome {
                    error!(
                        table_id = %table.id,
                        error = %source,
                        "route update failed; continuing with remaining tables"
                    );
                    if first_failure.is_none() {
                        first_failure = Some((table.id.clone(), source));
                    }
                }
            }
        }

        match first_failure {
            Some((table_id, source)) => Err(LifecycleError::Route { table_id, source }),
            None => Ok(summary),
        }
    }

    async fn apply(
        &self,
        table_id: &RouteTableId,
        gateway_id: &GatewayId,
        action: &RouteAction,
        summary: &mut ConvergenceSummary,
    ) -> std::result::Result<(), ProviderError> {
        match action {
            RouteAction::Create => {
                info!(table_id = %table_id, gateway_id = %gateway_id, "creating default route");
                self.provider
                    .create_route(table_id, DEFAULT_ROUTE_CIDR, gateway_id)
                    .await?;
                summary.created += 1;
            }
            RouteAction::Replace { previous } => {
                info!(
                    table_id = %table_id,
                    gateway_id = %gateway_id,
                    previous = %previous.as_ref().map(|g| g.as_str()).unwrap_or("<non-gateway target>"),
                    "replacing default route"
                );
                self.provider
                    .replace_route(table_id, DEFAULT_ROUTE_CIDR, gateway_id)
                    .await?;
                summary.replaced += 1;
            }
            RouteAction::Remove => {
                info!(table_id = %table_id, gateway_id = %gateway_id, "removing default route");
                self.provider
                    .delete_route(table_id, DEFAULT_ROUTE_CIDR)
                    .await?;
                summary.removed += 1;
            }
            RouteAction::Noop => {
                info!(table_id = %table_id, "default route already correct");
                summary.unchanged += 1;
            }
        }
        Ok(())
    }
}
