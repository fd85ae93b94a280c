//! Host contract
//!
//! The workflow host owns parameter values, the credential store and the
//! HTTP transport. The node only sees them through these traits.

use crate::error::{Result, TransportError};
use crate::evolution::credentials::Credentials;
use crate::node::request::RequestDescriptor;
use serde_json::{Map, Value};
use std::future::Future;

/// Named parameter values, per input item
pub trait ParameterSource: Sync {
    /// Value of `name` for the item at `item_index`, `None` when unset
    fn get_parameter(&self, name: &str, item_index: usize) -> Option<Value>;
}

/// Credential store
pub trait CredentialSource: Sync {
    fn get_credentials(&self, name: &str) -> Result<Credentials>;
}

/// Outbound HTTP
pub trait Transport: Sync {
    /// Send `descriptor` and return the decoded JSON body
    fn request(
        &self,
        descriptor: &RequestDescriptor,
    ) -> impl Future<Output = std::result::Result<Value, TransportError>> + Send;
}

/// Fixed parameters for a single item
#[derive(Debug, Clone, Default)]
pub struct StaticParameters {
    values: Map<String, Value>,
}

impl StaticParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Merge another mapping over this one
    pub fn extend(&mut self, other: Map<String, Value>) {
        self.values.extend(other);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for StaticParameters {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl ParameterSource for StaticParameters {
    fn get_parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        if item_index != 0 {
            return None;
        }
        self.values.get(name).cloned()
    }
}

/// A single set of credentials, whatever name is asked for
impl CredentialSource for Credentials {
    fn get_credentials(&self, _name: &str) -> Result<Credentials> {
        Ok(self.clone())
    }
}
