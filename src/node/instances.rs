//! Instance management templates
//!
//! Creation sends optional fields only when they are truthy; the settings
//! update always sends all seven settings. The two policies are distinct on
//! the wire and stay that way.

use crate::error::Result;
use crate::evolution::credentials::Credentials;
use crate::node::params::{include_if_truthy, ParameterBag};
use crate::node::request::{api_url, with_query, HttpMethod, RequestDescriptor};
use serde_json::{json, Map, Value};

/// Integration sent when none is chosen
pub const DEFAULT_INTEGRATION: &str = "WHATSAPP-BAILEYS";

/// Session options for a new instance
pub const SESSION_FIELDS: &[&str] = &["number", "qrcode"];

/// Instance behaviour flags (also the settings-update fields)
pub const SETTINGS_FIELDS: &[&str] = &[
    "rejectCall",
    "msgCall",
    "groupsIgnore",
    "alwaysOnline",
    "readMessages",
    "readStatus",
    "syncFullHistory",
];

/// Chatwoot support-inbox integration
pub const CHATWOOT_FIELDS: &[&str] = &[
    "chatwootAccountId",
    "chatwootToken",
    "chatwootUrl",
    "chatwootSignMsg",
    "chatwootReopenConversation",
    "chatwootConversationPending",
    "chatwootImportContacts",
    "chatwootNameInbox",
    "chatwootMergeBrazilContacts",
    "chatwootImportMessages",
    "chatwootDaysLimitImportMessages",
    "chatwootOrganization",
    "chatwootLogo",
];

/// Typebot chatbot integration
pub const TYPEBOT_FIELDS: &[&str] = &[
    "typebotUrl",
    "typebot",
    "typebotExpire",
    "typebotKeywordFinish",
    "typebotDelayMessage",
    "typebotUnknownMessage",
    "typebotListeningFromMe",
];

/// Proxy settings (proxy variant only)
pub const PROXY_FIELDS: &[&str] = &[
    "proxyHost",
    "proxyPort",
    "proxyProtocol",
    "proxyUsername",
    "proxyPassword",
];

/// GET /instance/fetchInstances, optionally filtered by name
pub fn fetch_instances(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let url = api_url(credentials, "instance/fetchInstances", &[]);
    let url = match params.truthy_string("instanceName") {
        Some(name) => with_query(url, &[("instanceName", &name)]),
        None => url,
    };

    Ok(RequestDescriptor::get(url, credentials))
}

/// POST /instance/create without proxy
pub fn create_basic(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let body = create_body(params, &[SESSION_FIELDS, SETTINGS_FIELDS, CHATWOOT_FIELDS, TYPEBOT_FIELDS])?;
    Ok(RequestDescriptor::post_json(
        api_url(credentials, "instance/create", &[]),
        body,
        credentials,
    ))
}

/// POST /instance/create with proxy settings
pub fn create_with_proxy(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let body = create_body(
        params,
        &[SESSION_FIELDS, PROXY_FIELDS, SETTINGS_FIELDS, CHATWOOT_FIELDS, TYPEBOT_FIELDS],
    )?;
    Ok(RequestDescriptor::post_json(
        api_url(credentials, "instance/create", &[]),
        body,
        credentials,
    ))
}

fn create_body(params: &ParameterBag<'_>, optional: &[&[&str]]) -> Result<Value> {
    let mut body = Map::new();
    body.insert("instanceName".to_string(), json!(params.required_str("instanceName")?));
    body.insert("token".to_string(), json!(params.string_or("token", "")));
    body.insert(
        "integration".to_string(),
        json!(params
            .truthy_string("integration")
            .unwrap_or_else(|| DEFAULT_INTEGRATION.to_string())),
    );

    for fields in optional {
        include_if_truthy(&mut body, params, fields);
    }

    Ok(Value::Object(body))
}

/// GET /instance/connect/{instance}, with a pairing number when given
pub fn connect(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let instance = params.required_str("instanceName")?;
    let url = api_url(credentials, "instance/connect", &[&instance]);
    let url = match params.truthy_string("phoneNumber") {
        Some(number) => with_query(url, &[("number", &number)]),
        None => url,
    };

    Ok(RequestDescriptor::get(url, credentials))
}

pub fn connection_state(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let instance = params.required_str("instanceName")?;
    Ok(RequestDescriptor::get(
        api_url(credentials, "instance/connectionState", &[&instance]),
        credentials,
    ))
}

/// POST /instance/restart/{instance}, no body
pub fn restart(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let instance = params.required_str("instanceName")?;
    Ok(RequestDescriptor::new(
        HttpMethod::Post,
        api_url(credentials, "instance/restart", &[&instance]),
        credentials,
    ))
}

pub fn logout(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let instance = params.required_str("instanceName")?;
    Ok(RequestDescriptor::delete(
        api_url(credentials, "instance/logout", &[&instance]),
        credentials,
    ))
}

pub fn delete(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let instance = params.required_str("instanceName")?;
    Ok(RequestDescriptor::delete(
        api_url(credentials, "instance/delete", &[&instance]),
        credentials,
    ))
}

/// POST /settings/set/{instance} with every settings field present
pub fn settings(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let instance = params.required_str("instanceName")?;

    let mut body = Map::new();
    for field in SETTINGS_FIELDS {
        let default = if *field == "msgCall" { json!("") } else { json!(false) };
        body.insert((*field).to_string(), params.value_or(field, default));
    }

    Ok(RequestDescriptor::post_json(
        api_url(credentials, "settings/set", &[&instance]),
        Value::Object(body),
        credentials,
    ))
}
