//! Persistence layer — schema provisioning, row mapping, and seeding.

pub mod converters;
pub mod schema;
pub mod seed;
