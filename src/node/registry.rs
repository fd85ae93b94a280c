//! Operation Registry
//!
//! Maps each `(resource, operation)` pair to the template that builds its
//! request, and loads the host-facing node description from embedded JSON.

use crate::error::{Error, Result};
use crate::evolution::credentials::Credentials;
use crate::node::params::ParameterBag;
use crate::node::request::RequestDescriptor;
use crate::node::{instances, messages};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Embedded node description (compiled into the binary)
const NODE_DESCRIPTION: &str = include_str!("../resources/node.json");

/// Top-level category of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Instances,
    Messages,
}

impl Resource {
    pub const ALL: [Resource; 2] = [Resource::Instances, Resource::Messages];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instances => "instances-api",
            Self::Messages => "messages-api",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

/// Action within a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchInstances,
    InstanceBasic,
    InstanceProxy,
    InstanceConnect,
    ConnectionState,
    RestartInstance,
    LogoutInstance,
    DeleteInstance,
    InstanceSettings,
    SendText,
    SendImage,
    SendVideo,
    SendAudio,
    SendDocument,
    SendPoll,
    SendList,
    SendStories,
}

impl Operation {
    pub const ALL: [Operation; 17] = [
        Operation::FetchInstances,
        Operation::InstanceBasic,
        Operation::InstanceProxy,
        Operation::InstanceConnect,
        Operation::ConnectionState,
        Operation::RestartInstance,
        Operation::LogoutInstance,
        Operation::DeleteInstance,
        Operation::InstanceSettings,
        Operation::SendText,
        Operation::SendImage,
        Operation::SendVideo,
        Operation::SendAudio,
        Operation::SendDocument,
        Operation::SendPoll,
        Operation::SendList,
        Operation::SendStories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchInstances => "fetch-instances",
            Self::InstanceBasic => "instance-basic",
            Self::InstanceProxy => "instance-proxy",
            Self::InstanceConnect => "instance-connect",
            Self::ConnectionState => "connection-state",
            Self::RestartInstance => "restart-instance",
            Self::LogoutInstance => "logout-instance",
            Self::DeleteInstance => "delete-instance",
            Self::InstanceSettings => "instanceSettings",
            Self::SendText => "sendText",
            Self::SendImage => "sendImage",
            Self::SendVideo => "sendVideo",
            Self::SendAudio => "sendAudio",
            Self::SendDocument => "sendDocument",
            Self::SendPoll => "sendPoll",
            Self::SendList => "sendList",
            Self::SendStories => "sendStories",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == value)
    }
}

/// Selects exactly one template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub resource: Resource,
    pub operation: Operation,
}

impl OperationKey {
    pub const fn new(resource: Resource, operation: Operation) -> Self {
        Self { resource, operation }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource.as_str(), self.operation.as_str())
    }
}

/// How a raw response becomes output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Pass the response through
    Identity,
    /// `response.instances` to `{name, value}` option pairs
    InstanceOptions,
}

/// Builds the request for one operation
pub type BuildFn = fn(&ParameterBag<'_>, &Credentials) -> Result<RequestDescriptor>;

/// Request template for one `(resource, operation)` pair
pub struct TemplateDef {
    pub key: OperationKey,
    pub build: BuildFn,
    pub projection: Projection,
}

const fn template(resource: Resource, operation: Operation, build: BuildFn) -> TemplateDef {
    TemplateDef {
        key: OperationKey::new(resource, operation),
        build,
        projection: Projection::Identity,
    }
}

static TEMPLATES: [TemplateDef; 17] = [
    TemplateDef {
        key: OperationKey::new(Resource::Instances, Operation::FetchInstances),
        build: instances::fetch_instances,
        projection: Projection::InstanceOptions,
    },
    template(Resource::Instances, Operation::InstanceBasic, instances::create_basic),
    template(Resource::Instances, Operation::InstanceProxy, instances::create_with_proxy),
    template(Resource::Instances, Operation::InstanceConnect, instances::connect),
    template(Resource::Instances, Operation::ConnectionState, instances::connection_state),
    template(Resource::Instances, Operation::RestartInstance, instances::restart),
    template(Resource::Instances, Operation::LogoutInstance, instances::logout),
    template(Resource::Instances, Operation::DeleteInstance, instances::delete),
    template(Resource::Instances, Operation::InstanceSettings, instances::settings),
    template(Resource::Messages, Operation::SendText, messages::send_text),
    template(Resource::Messages, Operation::SendImage, messages::send_image),
    template(Resource::Messages, Operation::SendVideo, messages::send_video),
    template(Resource::Messages, Operation::SendAudio, messages::send_audio),
    template(Resource::Messages, Operation::SendDocument, messages::send_document),
    template(Resource::Messages, Operation::SendPoll, messages::send_poll),
    template(Resource::Messages, Operation::SendList, messages::send_list),
    template(Resource::Messages, Operation::SendStories, messages::send_stories),
];

static TEMPLATE_TABLE: OnceLock<HashMap<OperationKey, &'static TemplateDef>> = OnceLock::new();

fn template_table() -> &'static HashMap<OperationKey, &'static TemplateDef> {
    TEMPLATE_TABLE.get_or_init(|| TEMPLATES.iter().map(|t| (t.key, t)).collect())
}

/// All registered templates, in declaration order
pub fn templates() -> &'static [TemplateDef] {
    &TEMPLATES
}

/// Template for a typed key
pub fn get_template(key: &OperationKey) -> Option<&'static TemplateDef> {
    template_table().get(key).copied()
}

/// Resolve host option values to a template
pub fn resolve(resource: &str, operation: &str) -> Result<&'static TemplateDef> {
    let unsupported = || Error::UnsupportedOperation {
        resource: resource.to_string(),
        operation: operation.to_string(),
    };

    let resource_kind = Resource::parse(resource).ok_or_else(unsupported)?;
    let operation_kind = Operation::parse(operation).ok_or_else(unsupported)?;

    get_template(&OperationKey::new(resource_kind, operation_kind)).ok_or_else(unsupported)
}

/// Option entry (`name` shown, `value` sent)
#[derive(Debug, Clone, Deserialize)]
pub struct OptionDef {
    pub name: String,
    pub value: String,
}

/// Field declaration from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Value,
}

/// Operation declaration from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct OperationDef {
    pub resource: String,
    pub value: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Root structure of resources/node.json
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    pub display_name: String,
    pub name: String,
    pub description: String,
    pub credentials: String,
    pub resources: Vec<OptionDef>,
    pub operations: Vec<OperationDef>,
}

impl NodeDescription {
    /// Operations declared under a resource value
    pub fn operations_for<'a>(&'a self, resource: &'a str) -> impl Iterator<Item = &'a OperationDef> {
        self.operations.iter().filter(move |op| op.resource == resource)
    }
}

static DESCRIPTION: OnceLock<NodeDescription> = OnceLock::new();

/// Node description (parsed from embedded JSON on first access)
pub fn node_description() -> &'static NodeDescription {
    DESCRIPTION.get_or_init(|| {
        serde_json::from_str(NODE_DESCRIPTION)
            .unwrap_or_else(|e| panic!("Failed to parse embedded node description: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_one_template() {
        assert_eq!(template_table().len(), TEMPLATES.len());
        for op in Operation::ALL {
            let count = TEMPLATES.iter().filter(|t| t.key.operation == op).count();
            assert_eq!(count, 1, "{} should have exactly one template", op.as_str());
        }
    }

    #[test]
    fn test_resolve_known_pair() {
        let template = resolve("messages-api", "sendText").unwrap();
        assert_eq!(template.key, OperationKey::new(Resource::Messages, Operation::SendText));
        assert_eq!(template.projection, Projection::Identity);

        let fetch = resolve("instances-api", "fetch-instances").unwrap();
        assert_eq!(fetch.projection, Projection::InstanceOptions);
    }

    #[test]
    fn test_resolve_rejects_unknown_and_mismatched_pairs() {
        for (resource, operation) in [
            ("instances-api", "sendText"),
            ("messages-api", "fetch-instances"),
            ("groups-api", "create"),
            ("instances-api", "nope"),
        ] {
            match resolve(resource, operation) {
                Err(Error::UnsupportedOperation { resource: r, operation: o }) => {
                    assert_eq!(r, resource);
                    assert_eq!(o, operation);
                }
                _ => panic!("{}/{} should be unsupported", resource, operation),
            }
        }
    }

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::parse(op.as_str()), Some(op));
        }
        assert_eq!(Resource::parse("instances-api"), Some(Resource::Instances));
        assert_eq!(Resource::parse("Instances"), None);
    }

    #[test]
    fn test_description_matches_templates() {
        let description = node_description();
        assert_eq!(description.credentials, crate::evolution::credentials::CREDENTIALS_NAME);

        for op in &description.operations {
            assert!(
                resolve(&op.resource, &op.value).is_ok(),
                "described operation {}/{} has no template",
                op.resource,
                op.value
            );
        }

        for template in templates() {
            let described = description.operations.iter().any(|op| {
                op.resource == template.key.resource.as_str()
                    && op.value == template.key.operation.as_str()
            });
            assert!(described, "template {} is not described", template.key);
        }
    }

    #[test]
    fn test_description_resources_parse() {
        let description = node_description();
        assert_eq!(description.resources.len(), 2);
        for resource in &description.resources {
            assert!(Resource::parse(&resource.value).is_some());
        }
        assert_eq!(description.operations_for("messages-api").count(), 8);
    }
}
