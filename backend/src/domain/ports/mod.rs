//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`GroupsQuery`, `GroupsCommand`, `AdminGate`,
//! `LoginService`) are called by inbound adapters. Driven ports
//! (`GroupDirectory`, `UserDetailsQuery`, `GroupAccessMetrics`) are
//! implemented by outbound adapters and consumed by the domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_gate;
mod group_access_metrics;
mod group_directory;
mod groups_command;
mod groups_query;
mod login_service;
mod user_details_query;

pub use admin_gate::AdminGate;
#[cfg(test)]
pub use group_access_metrics::MockGroupAccessMetrics;
pub use group_access_metrics::{
    AccessOutcome, GroupAccessMetrics, GroupAccessMetricsError, GroupOperation,
    NoOpGroupAccessMetrics,
};
#[cfg(test)]
pub use group_directory::MockGroupDirectory;
pub use group_directory::{GroupDirectory, GroupDirectoryError};
pub use groups_command::GroupsCommand;
pub use groups_query::GroupsQuery;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use user_details_query::MockUserDetailsQuery;
pub use user_details_query::UserDetailsQuery;
