//! Message send templates
//!
//! Every send posts to `/message/{endpoint}/{instance}`; the body shape
//! depends on the endpoint.

use crate::error::Result;
use crate::evolution::credentials::Credentials;
use crate::node::params::{project_member, ParameterBag};
use crate::node::request::{api_url, RequestDescriptor};
use serde_json::{json, Map, Value};

fn message_url(credentials: &Credentials, endpoint: &str, instance: &str) -> String {
    api_url(credentials, &format!("message/{}", endpoint), &[instance])
}

fn post(params: &ParameterBag<'_>, credentials: &Credentials, endpoint: &str, body: Value) -> Result<RequestDescriptor> {
    let instance = params.required_str("instanceName")?;
    Ok(RequestDescriptor::post_json(
        message_url(credentials, endpoint, &instance),
        body,
        credentials,
    ))
}

/// `mentionsEveryOne` is only sent when set
pub fn send_text(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let mut body = Map::new();
    body.insert("number".to_string(), json!(params.required_str("remoteJid")?));
    body.insert("text".to_string(), json!(params.string_or("messageText", "")));
    if let Some(mentions) = params.truthy("mentionsEveryOne") {
        body.insert("mentionsEveryOne".to_string(), mentions);
    }

    post(params, credentials, "sendText", Value::Object(body))
}

pub fn send_image(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let body = media_body(params, "image", Some("image/png"))?;
    post(params, credentials, "sendMedia", body)
}

pub fn send_video(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let body = media_body(params, "video", Some("video/mp4"))?;
    post(params, credentials, "sendMedia", body)
}

pub fn send_document(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let body = media_body(params, "document", None)?;
    post(params, credentials, "sendMedia", body)
}

fn media_body(params: &ParameterBag<'_>, mediatype: &str, mimetype: Option<&str>) -> Result<Value> {
    let mut body = Map::new();
    body.insert("number".to_string(), json!(params.required_str("remoteJid")?));
    body.insert("mediatype".to_string(), json!(mediatype));
    body.insert("media".to_string(), json!(params.string_or("media", "")));
    if let Some(mimetype) = mimetype {
        body.insert("mimetype".to_string(), json!(mimetype));
    }
    body.insert("caption".to_string(), json!(params.string_or("caption", "")));
    body.insert("fileName".to_string(), json!(params.string_or("fileName", "")));
    body.insert("mentionsEveryOne".to_string(), json!(params.flag("mentionsEveryOne")));

    Ok(Value::Object(body))
}

pub fn send_audio(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let body = json!({
        "number": params.required_str("remoteJid")?,
        "audio": params.string_or("media", ""),
        "mentionsEveryOne": params.flag("mentionsEveryOne"),
    });

    post(params, credentials, "sendWhatsAppAudio", body)
}

pub fn send_poll(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let number = params.required_str("remoteJid")?;
    let values = project_member(&params.collection("pollOptions"), "optionValue");

    let body = json!({
        "number": number,
        "name": params.string_or("pollTitle", ""),
        "selectableCount": values.len(),
        "values": values,
        "mentionsEveryOne": params.flag("mentionsEveryOne"),
    });

    post(params, credentials, "sendPoll", body)
}

/// The section description is the list of row descriptions.
pub fn send_list(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let number = params.required_str("remoteJid")?;
    let entries = params.collection("listRows");

    let rows: Vec<Value> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let row_id = match entry.get("rowId") {
                Some(Value::String(id)) if !id.is_empty() => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                _ => (index + 1).to_string(),
            };
            json!({
                "title": entry.get("rowTitle").cloned().unwrap_or_else(|| json!("")),
                "description": entry.get("optionDescription").cloned().unwrap_or_else(|| json!("")),
                "rowId": row_id,
            })
        })
        .collect();

    let body = json!({
        "number": number,
        "title": params.string_or("listTitle", ""),
        "description": params.string_or("listDescription", ""),
        "footerText": params.string_or("footerText", ""),
        "buttonText": params.string_or("buttonText", ""),
        "sections": [{
            "title": params.string_or("sectionTitle", ""),
            "description": project_member(&entries, "optionDescription"),
            "rows": rows,
        }],
    });

    post(params, credentials, "sendList", body)
}

/// Status posts always go to all contacts
pub fn send_stories(params: &ParameterBag<'_>, credentials: &Credentials) -> Result<RequestDescriptor> {
    let body = json!({
        "type": params.string_or("statusType", "text"),
        "content": params.string_or("content", ""),
        "caption": params.string_or("caption", ""),
        "backgroundColor": params.string_or("backgroundColor", "#000000"),
        "font": params.value_or("font", json!(1)),
        "allContacts": true,
    });

    post(params, credentials, "sendStatus", body)
}
