//! Evolution API node
//!
//! The request dispatcher: a `(resource, operation)` pair and a set of
//! parameters become one outbound request, and the response becomes output
//! items.
//!
//! # Architecture
//!
//! - [`host`] - Traits for what the workflow host supplies
//! - [`params`] - Parameter access and truthiness rules
//! - [`request`] - Request descriptors and URL helpers
//! - [`registry`] - Template lookup table and the embedded node description
//! - [`instances`] / [`messages`] - Request templates per operation
//! - [`dispatch`] - Build, send, project

pub mod dispatch;
pub mod host;
pub mod instances;
pub mod messages;
pub mod params;
pub mod registry;
pub mod request;

pub use dispatch::{build_request, dispatch, execute, NodeItem, PreparedRequest};
pub use registry::{node_description, Operation, OperationKey, Resource};
