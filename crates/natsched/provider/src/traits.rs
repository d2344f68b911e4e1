//! The cloud networking API surface required by the reconcilers.

use crate::error::ProviderResult;
use async_trait::async_trait;
use natsched_types::{
    Address, AllocationId, Gateway, GatewayId, GatewayState, RouteTable, RouteTableId, SubnetId,
};

/// Cloud networking API consumed by the lifecycle engine.
///
/// Reads are side-effect free; mutating calls may bill. Implementations
/// must not retry internally - resilience comes from the next scheduled
/// run of the idempotent convergence logic.
#[async_trait]
pub trait NetworkProvider: Send + Sync {
    /// All addresses carrying the given name tag, in provider order.
    async fn describe_addresses(&self, name_tag: &str) -> ProviderResult<Vec<Address>>;

    /// Allocate a new public address tagged with `name_tag`.
    async fn allocate_address(&self, name_tag: &str) -> ProviderResult<Address>;

    /// All gateways in `subnet_id` currently in `state`, in provider order.
    async fn describe_gateways(
        &self,
        subnet_id: &SubnetId,
        state: GatewayState,
    ) -> ProviderResult<Vec<Gateway>>;

    /// Create a gateway in `subnet_id` bound to `allocation_id`, tagged
    /// with `name_tag`. The returned gateway is typically still pending.
    async fn create_gateway(
        &self,
        subnet_id: &SubnetId,
        allocation_id: &AllocationId,
        name_tag: &str,
    ) -> ProviderResult<Gateway>;

    /// Request deletion of a gateway. Completion is observed via
    /// [`NetworkProvider::gateway_state`].
    async fn delete_gateway(&self, gateway_id: &GatewayId) -> ProviderResult<()>;

    /// Current lifecycle state of a gateway.
    async fn gateway_state(&self, gateway_id: &GatewayId) -> ProviderResult<GatewayState>;

    /// Route tables associated with `subnet_id` (zero, one, or many).
    async fn describe_route_tables(&self, subnet_id: &SubnetId) -> ProviderResult<Vec<RouteTable>>;

    /// Add a route for `destination` targeting `gateway_id`.
    async fn create_route(
        &self,
        table_id: &RouteTableId,
        destination: &str,
        gateway_id: &GatewayId,
    ) -> ProviderResult<()>;

    /// Re-point the existing route for `destination` at `gateway_id`.
    async fn replace_route(
        &self,
        table_id: &RouteTableId,
        destination: &str,
        gateway_id: &GatewayId,
    ) -> ProviderResult<()>;

    /// Remove the route for `destination`.
    async fn delete_route(&self, table_id: &RouteTableId, destination: &str)
        -> ProviderResult<()>;
}
