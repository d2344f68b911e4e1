//! Error taxonomy for the lifecycle engine.
//!
//! No error is caught and suppressed except the benign conditions (extra
//! unassociated addresses, already-correct routes, multiple live gateways),
//! which are logged instead. Everything else propagates to the dispatcher
//! and is re-raised as a single wrapped [`DispatchError`].

use natsched_provider::ProviderError;
use natsched_types::{GatewayId, GatewayState, Operation, RouteTableId, SubnetId};
use std::time::Duration;
use thiserror::Error;

/// Fatal failure of a single lifecycle invocation.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Required configuration missing or empty. No retry will help.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A read against the cloud API failed. Expected to self-heal on the
    /// scheduler's next firing.
    #[error("query failed: {0}")]
    Query(#[source] ProviderError),

    /// Address allocation returned no usable identifier.
    #[error("address allocation failed: {0}")]
    Allocation(#[source] ProviderError),

    /// Gateway creation returned no usable identifier.
    #[error("gateway creation failed: {0}")]
    Creation(#[source] ProviderError),

    /// The delete request itself was rejected.
    #[error("gateway deletion failed: {0}")]
    Deletion(#[source] ProviderError),

    /// Delete requested but no live gateway exists. Signals drift between
    /// the schedule and actual state.
    #[error("no available NAT gateway found in subnet {subnet_id}")]
    NotFound { subnet_id: SubnetId },

    /// Terminal state not reached within the wait budget. The gateway may
    /// still converge out-of-band; re-invoke to confirm.
    #[error("gateway {gateway_id} did not reach state {target} within {budget:?}")]
    ProvisioningTimeout {
        gateway_id: GatewayId,
        target: GatewayState,
        budget: Duration,
    },

    /// A mutating route call failed on one table.
    #[error("route update failed on table {table_id}: {source}")]
    Route {
        table_id: RouteTableId,
        #[source]
        source: ProviderError,
    },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Top-level wrap surfaced to the invoking scheduler.
///
/// Names the lifecycle direction that was being attempted plus the
/// underlying cause. No rollback is performed; the next scheduled run
/// re-runs the idempotent convergence logic.
#[derive(Debug, Error)]
#[error("Failed to {operation} NAT Gateway: {source}")]
pub struct DispatchError {
    /// The direction being attempted.
    pub operation: Operation,

    /// The underlying failure.
    #[source]
    pub source: LifecycleError,
}
