//! Configuration for the lifecycle engine.
//!
//! Loaded once at the entry boundary into an explicit struct and injected
//! into all components; no component reads the environment on its own.

use crate::error::{LifecycleError, Result};
use natsched_types::SubnetId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long to wait for a gateway to reach its terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Total wait budget in seconds.
    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,

    /// Interval between state polls in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl WaitConfig {
    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_wait_secs: default_max_wait(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

/// Required configuration for one scheduled invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Public subnet hosting the gateway.
    pub public_subnet_id: SubnetId,

    /// Private subnets whose route tables are converged.
    #[serde(default)]
    pub private_subnet_ids: Vec<SubnetId>,

    /// Name tag addresses are allocated and looked up under.
    #[serde(default = "default_eip_tag")]
    pub eip_tag_name: String,

    /// Name tag gateways are created and looked up under.
    #[serde(default = "default_gateway_tag")]
    pub nat_gateway_tag_name: String,

    /// Wait budget for terminal-state polling.
    #[serde(default)]
    pub wait: WaitConfig,
}

impl ScheduleConfig {
    /// Build a configuration with default tag names.
    pub fn new(public_subnet_id: SubnetId, private_subnet_ids: Vec<SubnetId>) -> Self {
        Self {
            public_subnet_id,
            private_subnet_ids,
            eip_tag_name: default_eip_tag(),
            nat_gateway_tag_name: default_gateway_tag(),
            wait: WaitConfig::default(),
        }
    }

    /// Load from the environment.
    ///
    /// Env contract: `PUBLIC_SUBNET_ID`, `PRIVATE_SUBNET_IDS`
    /// (comma-separated), `EIP_TAG_NAME`, `NAT_GATEWAY_TAG_NAME`.
    pub fn from_env() -> Result<Self> {
        let source = config::Environment::default()
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("private_subnet_ids");

        let loaded = config::Config::builder()
            .add_source(source)
            .build()
            .map_err(|e| LifecycleError::Configuration(e.to_string()))?;

        let mut parsed: Self = loaded
            .try_deserialize()
            .map_err(|e| LifecycleError::Configuration(e.to_string()))?;

        parsed.normalize();
        parsed.validate()?;
        Ok(parsed)
    }

    /// Drop blank private subnet entries left over from list splitting.
    pub fn normalize(&mut self) {
        self.private_subnet_ids
            .retain(|id| !id.as_str().trim().is_empty());
    }

    /// Validate required fields are present and non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.public_subnet_id.as_str().trim().is_empty() {
            return Err(LifecycleError::Configuration(
                "public_subnet_id is required".to_string(),
            ));
        }
        if self.private_subnet_ids.is_empty() {
            return Err(LifecycleError::Configuration(
                "private_subnet_ids must contain at least one subnet".to_string(),
            ));
        }
        if self.eip_tag_name.trim().is_empty() {
            return Err(LifecycleError::Configuration(
                "eip_tag_name must not be empty".to_string(),
            ));
        }
        if self.nat_gateway_tag_name.trim().is_empty() {
            return Err(LifecycleError::Configuration(
                "nat_gateway_tag_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_eip_tag() -> String {
    "scheduled-nat-eip".to_string()
}

fn default_gateway_tag() -> String {
    "scheduled-nat-gateway".to_string()
}

fn default_max_wait() -> u64 {
    600
}

fn default_poll_interval() -> u64 {
    15
}
