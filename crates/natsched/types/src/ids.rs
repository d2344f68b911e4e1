//! Strongly-typed identifiers for cloud network resources.
//!
//! All identifiers are assigned by the cloud provider, so they are opaque
//! strings wrapped in newtype structs rather than locally generated UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! cloud_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

cloud_id! {
    /// Allocation identifier of a public address (e.g. `eipalloc-0abc...`)
    AllocationId
}

cloud_id! {
    /// Identifier of a NAT gateway (e.g. `nat-0abc...`)
    GatewayId
}

cloud_id! {
    /// Identifier of a route table (e.g. `rtb-0abc...`)
    RouteTableId
}

cloud_id! {
    /// Identifier of a subnet (e.g. `subnet-0abc...`)
    SubnetId
}
