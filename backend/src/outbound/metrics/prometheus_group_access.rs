//! Prometheus adapter for group access decisions.
//!
//! Registers a counter with the registry shared by the HTTP metrics
//! middleware so decisions are exported on the same `/metrics` endpoint.

use async_trait::async_trait;
use prometheus::{IntCounterVec, Opts, Registry};

use crate::domain::ports::{
    AccessOutcome, GroupAccessMetrics, GroupAccessMetricsError, GroupOperation,
};

/// Prometheus-backed access decision recorder.
///
/// # Metric Specification
///
/// - **Name**: `provisioning_group_access_decisions_total`
/// - **Type**: Counter
/// - **Labels**:
///   - `operation`: `list_members`, `list_members_detailed`, `create_group`,
///     `delete_group` or `admin_gate`
///   - `outcome`: `allowed` or `denied`
pub struct PrometheusGroupAccessMetrics {
    decisions_total: IntCounterVec,
}

impl PrometheusGroupAccessMetrics {
    /// Create and register the counter with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let decisions_total = IntCounterVec::new(
            Opts::new(
                "provisioning_group_access_decisions_total",
                "Group access decisions by operation and outcome",
            ),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(decisions_total.clone()))?;
        Ok(Self { decisions_total })
    }
}

#[async_trait]
impl GroupAccessMetrics for PrometheusGroupAccessMetrics {
    async fn record_decision(
        &self,
        operation: GroupOperation,
        outcome: AccessOutcome,
    ) -> Result<(), GroupAccessMetricsError> {
        self.decisions_total
            .get_metric_with_label_values(&[operation.as_str(), outcome.as_str()])
            .map_err(|err| GroupAccessMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }
}
