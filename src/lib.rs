//! orgchart — organizational hierarchy resolver.
//!
//! Stores an org tree as a flat parent-pointer table in SQLite and answers
//! two questions about it: which top-level node sits above a given node,
//! and which nodes of a given kind sit below one.

pub mod config;
pub mod db;
pub mod error;
pub mod hierarchy;
pub mod observability;
pub mod request;
pub mod types;
