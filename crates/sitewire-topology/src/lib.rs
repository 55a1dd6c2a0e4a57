//! Topology builders for the sitewire provisioner.
//!
//! Two independent topologies are composed from shared environment
//! configuration:
//! - [`full`]: hosted site with DNS, TLS, CDN, and a CI pipeline
//! - [`simple`]: disposable static hosting behind the CDN's default
//!   domain, seeded with a placeholder document
//!
//! Builders are pure functions of profile and settings: the same input
//! always produces the same resource graph.

pub mod error;
pub mod full;
pub mod simple;
mod site;

pub use error::{Result, TopologyError};
