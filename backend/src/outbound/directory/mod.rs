//! Directory adapter implementing the group, user-detail and login ports.
//!
//! The directory is process-local and populated from a [`DirectorySeed`].

mod memory;
mod seed;

pub use memory::InMemoryDirectory;
pub use seed::{DirectorySeed, SeedError, SeedGroup, SeedSubAdmin, SeedUser};
