//! Resource models observed through the cloud networking API.

use crate::ids::{AllocationId, GatewayId, RouteTableId, SubnetId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The catch-all destination block of a default route.
pub const DEFAULT_ROUTE_CIDR: &str = "0.0.0.0/0";

/// A stable public address bindable to a gateway.
///
/// Addresses are allocated lazily and never released by this system;
/// orphaned copies are tolerated and only flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Allocation identifier.
    pub allocation_id: AllocationId,

    /// Public IP, for operator-facing logs.
    pub public_ip: String,

    /// Association identifier when the address is bound to a gateway.
    pub association_id: Option<String>,

    /// Value of the name tag the address was allocated under.
    pub name_tag: String,

    /// When the address was allocated.
    pub allocated_at: DateTime<Utc>,
}

impl Address {
    /// Whether the address is currently bound to a gateway.
    pub fn is_associated(&self) -> bool {
        self.association_id.is_some()
    }
}

/// Lifecycle state of a NAT gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayState {
    Pending,
    Available,
    Deleting,
    Deleted,
    Failed,
}

impl GatewayState {
    /// Terminal states are never left without an explicit API call.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Available | Self::Deleted | Self::Failed)
    }
}

impl fmt::Display for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Available => "available",
            Self::Deleting => "deleting",
            Self::Deleted => "deleted",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A managed NAT gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    /// Gateway identifier.
    pub id: GatewayId,

    /// Subnet the gateway lives in.
    pub subnet_id: SubnetId,

    /// Address the gateway is bound to. Binding, not ownership: the
    /// address survives gateway deletion.
    pub allocation_id: AllocationId,

    /// Public IP of the bound address, when the provider reports it.
    pub public_ip: Option<String>,

    /// Current lifecycle state.
    pub state: GatewayState,

    /// Value of the name tag the gateway was created under.
    pub name_tag: String,

    /// When the gateway was created.
    pub created_at: DateTime<Utc>,
}

/// A single route within a route table.
///
/// The target gateway is a weak reference by identifier; a dangling
/// target is corrected by the next reconciliation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Destination CIDR block.
    pub destination: String,

    /// Target NAT gateway, if the route points at one.
    pub gateway_id: Option<GatewayId>,
}

impl Route {
    /// Whether this is the catch-all default route.
    pub fn is_default(&self) -> bool {
        self.destination == DEFAULT_ROUTE_CIDR
    }
}

/// A subnet's routing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Route table identifier.
    pub id: RouteTableId,

    /// Subnet this table is associated with.
    pub subnet_id: SubnetId,

    /// Routes, in provider order. Only the default route is ever touched.
    pub routes: Vec<Route>,
}

impl RouteTable {
    /// The current default route, if any. At most one exists per table.
    pub fn default_route(&self) -> Option<&Route> {
        self.routes.iter().find(|r| r.is_default())
    }
}
