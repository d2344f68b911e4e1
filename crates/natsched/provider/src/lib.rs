//! Cloud networking API seam for the scheduled NAT gateway lifecycle.
//!
//! The [`NetworkProvider`] trait is the only boundary between the
//! reconciliation engine and the cloud. Production deployments implement
//! it against their provider's SDK; tests and local rehearsal use the
//! bundled [`InMemoryNetwork`].

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod memory;
pub mod traits;

// Re-exports
pub use error::{ProviderError, ProviderResult};
pub use memory::{InMemoryNetwork, Mutation};
pub use traits::NetworkProvider;
