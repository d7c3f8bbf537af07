//! Domain port for recording group access decisions.
//!
//! The gateway reports every allow/deny decision it takes so operators can
//! watch for spikes in refused membership reads or admin-only calls.
//! Recording is fire-and-forget: failures never change a request outcome.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording access metrics.
    pub enum GroupAccessMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "group access metrics exporter failed: {message}",
    }
}

/// Gateway operation a decision was taken for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupOperation {
    ListMembers,
    ListMembersDetailed,
    CreateGroup,
    DeleteGroup,
    AdminGate,
}

impl GroupOperation {
    /// Stable label value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListMembers => "list_members",
            Self::ListMembersDetailed => "list_members_detailed",
            Self::CreateGroup => "create_group",
            Self::DeleteGroup => "delete_group",
            Self::AdminGate => "admin_gate",
        }
    }
}

/// Result of an access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessOutcome {
    Allowed,
    Denied,
}

impl AccessOutcome {
    /// Stable label value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Denied => "denied",
        }
    }
}

/// Metrics recording port for access decisions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupAccessMetrics: Send + Sync {
    /// Record one decision for `operation`.
    async fn record_decision(
        &self,
        operation: GroupOperation,
        outcome: AccessOutcome,
    ) -> Result<(), GroupAccessMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpGroupAccessMetrics;

#[async_trait]
impl GroupAccessMetrics for NoOpGroupAccessMetrics {
    async fn record_decision(
        &self,
        _operation: GroupOperation,
        _outcome: AccessOutcome,
    ) -> Result<(), GroupAccessMetricsError> {
        Ok(())
    }
}
