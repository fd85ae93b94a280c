//! Request Dispatcher
//!
//! Resolves a `(resource, operation)` pair to its template, builds the
//! request, sends it through the host transport and shapes the response
//! into output items.

use crate::error::{Error, Result};
use crate::evolution::credentials::{Credentials, CREDENTIALS_NAME};
use crate::node::host::{CredentialSource, ParameterSource, Transport};
use crate::node::params::{ParameterBag, ITEM_INDEX};
use crate::node::registry::{self, OperationKey, Projection};
use crate::node::request::RequestDescriptor;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// One output item in the host's format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeItem {
    pub json: Value,
}

/// A built request, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub key: OperationKey,
    pub descriptor: RequestDescriptor,
    pub projection: Projection,
}

/// Build the request for a pair without sending it
pub fn build_request(
    resource: &str,
    operation: &str,
    params: &dyn ParameterSource,
    credentials: &Credentials,
) -> Result<PreparedRequest> {
    let template = registry::resolve(resource, operation)?;
    tracing::debug!("build_request: key={}", template.key);

    let bag = ParameterBag::new(params, template.key);
    let descriptor = (template.build)(&bag, credentials)?;

    Ok(PreparedRequest {
        key: template.key,
        descriptor,
        projection: template.projection,
    })
}

/// Build, send and project one request
pub async fn dispatch<T: Transport>(
    resource: &str,
    operation: &str,
    params: &dyn ParameterSource,
    credentials: &Credentials,
    transport: &T,
) -> Result<Vec<NodeItem>> {
    let prepared = build_request(resource, operation, params, credentials)?;
    send_prepared(prepared, transport).await
}

/// Send an already built request and project its response
pub async fn send_prepared<T: Transport>(prepared: PreparedRequest, transport: &T) -> Result<Vec<NodeItem>> {
    tracing::debug!(
        "dispatch: key={}, method={}, url={}",
        prepared.key,
        prepared.descriptor.method,
        prepared.descriptor.url
    );

    let response = transport
        .request(&prepared.descriptor)
        .await
        .map_err(|source| Error::Transport {
            key: prepared.key,
            source,
        })?;

    project(prepared.key, prepared.projection, response)
}

/// Node entry point: read the pair from the host, then dispatch.
///
/// The pair is resolved before credentials are requested, so unsupported
/// pairs never touch the credential store.
pub async fn execute<T: Transport>(
    params: &dyn ParameterSource,
    credentials: &dyn CredentialSource,
    transport: &T,
) -> Result<Vec<NodeItem>> {
    let resource = read_option(params, "resource");
    let operation = read_option(params, "operation");

    registry::resolve(&resource, &operation)?;

    let credentials = credentials.get_credentials(CREDENTIALS_NAME)?;
    credentials.validate()?;

    tracing::info!("execute: resource={}, operation={}", resource, operation);

    dispatch(&resource, &operation, params, &credentials, transport).await
}

fn read_option(params: &dyn ParameterSource, name: &str) -> String {
    match params.get_parameter(name, ITEM_INDEX) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Shape a raw response into output items
pub fn project(key: OperationKey, projection: Projection, response: Value) -> Result<Vec<NodeItem>> {
    match projection {
        Projection::Identity => Ok(return_json_array(response)),
        Projection::InstanceOptions => {
            let options = instance_options(&response).ok_or(Error::Shape {
                key,
                field: "instances",
                response: response.clone(),
            })?;
            Ok(return_json_array(Value::Array(options)))
        }
    }
}

/// `{name, value}` option pairs from `response.instances`, in order
fn instance_options(response: &Value) -> Option<Vec<Value>> {
    let instances = response.get("instances")?.as_array()?;

    Some(
        instances
            .iter()
            .map(|instance| {
                json!({
                    "name": instance.get("name").cloned().unwrap_or(Value::Null),
                    "value": instance.get("id").cloned().unwrap_or(Value::Null),
                })
            })
            .collect(),
    )
}

/// Wrap a JSON value as output items: one per list element, else one
pub fn return_json_array(value: Value) -> Vec<NodeItem> {
    match value {
        Value::Array(items) => items.into_iter().map(|json| NodeItem { json }).collect(),
        Value::Null => vec![NodeItem {
            json: Value::Object(Map::new()),
        }],
        json => vec![NodeItem { json }],
    }
}
