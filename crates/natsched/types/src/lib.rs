//! Core types for the scheduled NAT gateway lifecycle.
//!
//! Identifiers are cloud-assigned strings wrapped in newtypes for type
//! safety. Resource models carry only the attributes the reconcilers
//! inspect; everything else stays on the provider side.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod event;
pub mod ids;
pub mod resources;

// Re-exports
pub use event::{InvocationEvent, InvocationResponse, Operation};
pub use ids::{AllocationId, GatewayId, RouteTableId, SubnetId};
pub use resources::{Address, Gateway, GatewayState, Route, RouteTable, DEFAULT_ROUTE_CIDR};
