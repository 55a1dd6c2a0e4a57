//! Core resource-graph types for the sitewire provisioner.
//!
//! This crate contains:
//! - Logical resource identifiers and late-bound attribute values
//! - Typed resource descriptors for the static-site topology
//! - The resource graph arena handed to the provisioning engine
//! - Graph validation (reference resolution, cycle detection)

pub mod error;
pub mod graph;
pub mod id;
pub mod resource;
pub mod value;

pub use error::{Error, Result};
pub use graph::{Output, Resource, ResourceGraph, TargetEnv};
pub use id::LogicalId;
pub use value::{Attr, Value};
