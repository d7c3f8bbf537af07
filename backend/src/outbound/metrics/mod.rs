//! Outbound adapters for metrics exporting.
//!
//! Prometheus-backed implementations of domain metrics ports, feature-gated
//! behind the `metrics` feature.

mod prometheus_group_access;

pub use prometheus_group_access::PrometheusGroupAccessMetrics;
