//! Scheduled NAT gateway lifecycle engine.
//!
//! Converges cloud state toward "gateway exists and is routed" or
//! "gateway is gone and unrouted" on each scheduled invocation. All state
//! lives in the provider's resource graph and is recovered by query on
//! every run; both directions are idempotent and safe to re-run after
//! partial failure.
//!
//! ## Architectural Boundaries
//!
//! - `natsched-provider` owns: the cloud API surface and its fakes
//! - `natsched-engine` owns: reconciliation decisions, bounded waits,
//!   route convergence, dispatch
//! - scheduling triggers, packaging, and IAM live outside this workspace
//!
//! ## Usage
//!
//! ```no_run
//! use natsched_engine::{Dispatcher, ScheduleConfig};
//! use natsched_provider::InMemoryNetwork;
//! use natsched_types::{InvocationEvent, Operation, SubnetId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(InMemoryNetwork::new());
//! let config = ScheduleConfig::new(
//!     SubnetId::new("subnet-pub"),
//!     vec![SubnetId::new("subnet-a"), SubnetId::new("subnet-b")],
//! );
//!
//! let dispatcher = Dispatcher::new(provider, config)?;
//! let response = dispatcher
//!     .handle(InvocationEvent { operation: Operation::Create })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod address;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod locator;
pub mod routes;
pub mod waiter;

// Re-exports
pub use address::AddressReconciler;
pub use config::{ScheduleConfig, WaitConfig};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, LifecycleError, Result};
pub use gateway::GatewayReconciler;
pub use locator::ResourceLocator;
pub use routes::{ConvergenceSummary, RouteConvergenceEngine};
pub use waiter::{await_gateway_state, WaitOutcome};
