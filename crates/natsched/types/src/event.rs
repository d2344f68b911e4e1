//! Invocation contract consumed from the external scheduler.

use crate::ids::GatewayId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle direction requested by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Converge to a created gateway with routed private subnets.
    Create,
    /// Converge to a deleted gateway with routes removed.
    Delete,
}

impl Operation {
    /// Past-tense form for success messages.
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Delete => "deleted",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// The structured event carried by each scheduled trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationEvent {
    /// Requested lifecycle direction.
    pub operation: Operation,
}

/// Structured success response returned to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    /// HTTP-style status code; always 200 on success (failure is an error).
    pub status_code: u16,

    /// Human-readable message naming the operation and affected gateway.
    pub body: String,
}

impl InvocationResponse {
    /// Build the success response for a completed operation.
    pub fn success(operation: Operation, gateway_id: &GatewayId) -> Self {
        Self {
            status_code: 200,
            body: format!(
                "Successfully {} NAT Gateway {}",
                operation.past_tense(),
                gateway_id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_deserializes_lowercase() {
        let event: InvocationEvent = serde_json::from_str(r#"{"operation":"create"}"#).unwrap();
        assert_eq!(event.operation, Operation::Create);

        let event: InvocationEvent = serde_json::from_str(r#"{"operation":"delete"}"#).unwrap();
        assert_eq!(event.operation, Operation::Delete);
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        let result = serde_json::from_str::<InvocationEvent>(r#"{"operation":"restart"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_success_response_body() {
        let response = InvocationResponse::success(Operation::Create, &GatewayId::new("nat-42"));
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "Successfully created NAT Gateway nat-42");
    }
}
