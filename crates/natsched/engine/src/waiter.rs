//! Bounded polling for a gateway's terminal state.
//!
//! Modeled as an explicit outcome rather than an error so the state
//! machine can be exercised without real delays (paused-clock tests).
//! The poll is a plain future, so it inherits any deadline the hosting
//! runtime imposes on the caller.

use crate::config::WaitConfig;
use crate::error::{LifecycleError, Result};
use natsched_provider::NetworkProvider;
use natsched_types::{GatewayId, GatewayState};
use tracing::{debug, warn};

/// Result of a bounded wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The target state was observed.
    Reached,

    /// The budget elapsed, or the gateway settled into a different
    /// terminal state it will never leave on its own.
    TimedOut { last_observed: GatewayState },
}

/// Poll until the gateway reaches `target` or the budget elapses.
///
/// Query failures propagate as [`LifecycleError::Query`]; reaching a
/// wrong terminal state short-circuits instead of burning the budget.
pub async fn await_gateway_state(
    provider: &dyn NetworkProvider,
    gateway_id: &GatewayId,
    target: GatewayState,
    config: &WaitConfig,
) -> Result<WaitOutcome> {
    let deadline = tokio::time::Instant::now() + config.max_wait();

    loop {
        let state = provider
            .gateway_state(gateway_id)
            .await
            .map_err(LifecycleError::Query)?;

        if state == target {
            debug!(gateway_id = %gateway_id, state = %state, "target state reached");
            return Ok(WaitOutcome::Reached);
        }

        if state.is_terminal() {
            warn!(
                gateway_id = %gateway_id,
                state = %state,
                target = %target,
                "gateway settled into a different terminal state"
            );
            return Ok(WaitOutcome::TimedOut {
                last_observed: state,
            });
        }

        if tokio::time::Instant::now() + config.poll_interval() > deadline {
            return Ok(WaitOutcome::TimedOut {
                last_observed: state,
            });
        }

        debug!(gateway_id = %gateway_id, state = %state, "still waiting");
        tokio::time::sleep(config.poll_interval()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natsched_provider::InMemoryNetwork;
    use natsched_types::{AllocationId, SubnetId};

    async fn pending_gateway(network: &InMemoryNetwork, settle_polls: usize) -> GatewayId {
        network.set_settle_polls(settle_polls).await;
        network
            .seed_address("eipalloc-1", "203.0.113.1", "nat-eip", None)
            .await;
        network
            .create_gateway(
                &SubnetId::new("subnet-pub"),
                &AllocationId::new("eipalloc-1"),
                "nat-gw",
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaches_target_after_polls() {
        let network = InMemoryNetwork::new();
        let gateway_id = pending_gateway(&network, 3).await;

        let outcome = await_gateway_state(
            &network,
            &gateway_id,
            GatewayState::Available,
            &WaitConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, WaitOutcome::Reached);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_gateway_never_settles() {
        let network = InMemoryNetwork::new();
        // More polls than the budget allows: 600s / 15s = 40 polls.
        let gateway_id = pending_gateway(&network, 10_000).await;

        let outcome = await_gateway_state(
            &network,
            &gateway_id,
            GatewayState::Available,
            &WaitConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            WaitOutcome::TimedOut {
                last_observed: GatewayState::Pending
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_terminal_state_short_circuits() {
        let network = InMemoryNetwork::new();
        let gateway_id = pending_gateway(&network, 10_000).await;
        network
            .force_gateway_state(&gateway_id, GatewayState::Failed)
            .await;

        let started = tokio::time::Instant::now();
        let outcome = await_gateway_state(
            &network,
            &gateway_id,
            GatewayState::Available,
            &WaitConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            WaitOutcome::TimedOut {
                last_observed: GatewayState::Failed
            }
        );
        // No budget burned once the gateway is observably stuck.
        assert_eq!(tokio::time::Instant::now(), started);
    }
}
