//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AdminGate, GroupsCommand, GroupsQuery, LoginService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub groups: Arc<dyn GroupsQuery>,
    pub groups_command: Arc<dyn GroupsCommand>,
    pub admin_gate: Arc<dyn AdminGate>,
}

impl HttpState {
    /// Construct state from individual ports.
    pub fn new(
        login: Arc<dyn LoginService>,
        groups: Arc<dyn GroupsQuery>,
        groups_command: Arc<dyn GroupsCommand>,
        admin_gate: Arc<dyn AdminGate>,
    ) -> Self {
        Self {
            login,
            groups,
            groups_command,
            admin_gate,
        }
    }

    /// Construct state where one gateway serves every group port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use provisioning::domain::GroupAccessService;
    /// use provisioning::inbound::http::state::HttpState;
    /// use provisioning::outbound::directory::{DirectorySeed, InMemoryDirectory};
    ///
    /// let directory = Arc::new(InMemoryDirectory::from_seed(
    ///     DirectorySeed::development().expect("valid seed"),
    /// ));
    /// let gateway = Arc::new(GroupAccessService::new(directory.clone(), directory.clone()));
    /// let state = HttpState::from_gateway(directory, gateway);
    /// let _groups = state.groups.clone();
    /// ```
    pub fn from_gateway<G>(login: Arc<dyn LoginService>, gateway: Arc<G>) -> Self
    where
        G: GroupsQuery + GroupsCommand + AdminGate + 'static,
    {
        Self::new(
            login,
            gateway.clone() as Arc<dyn GroupsQuery>,
            gateway.clone() as Arc<dyn GroupsCommand>,
            gateway as Arc<dyn AdminGate>,
        )
    }
}
