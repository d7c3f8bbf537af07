//! Inbound adapters that translate external requests into gateway calls while
//! keeping framework details at the edge.
//!
//! The REST adapter lives under [`http`].

pub mod http;
