//! Group provisioning service library.
//!
//! Layout follows a hexagonal split: [`domain`] holds types, ports and the
//! group access gateway; [`inbound`] adapts HTTP requests onto the driving
//! ports; [`outbound`] implements the driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
