//! Golden request checks
//!
//! For every operation, the built descriptor must match the expected method,
//! URL and body exactly.

use evonode::evolution::credentials::Credentials;
use evonode::node::host::StaticParameters;
use evonode::node::registry::templates;
use evonode::node::request::HttpMethod;
use evonode::node::{build_request, PreparedRequest};
use serde_json::{json, Value};

const SERVER: &str = "https://evo.example.com";

fn creds() -> Credentials {
    Credentials::new(format!("{}/", SERVER), "golden-key")
}

fn params(values: Value) -> StaticParameters {
    match values {
        Value::Object(map) => StaticParameters::from(map),
        _ => panic!("params must be an object"),
    }
}

fn build(resource: &str, operation: &str, values: Value) -> PreparedRequest {
    build_request(resource, operation, &params(values), &creds())
        .unwrap_or_else(|e| panic!("{}/{} should build: {}", resource, operation, e))
}

fn assert_golden(
    resource: &str,
    operation: &str,
    values: Value,
    method: HttpMethod,
    path: &str,
    body: Option<Value>,
) {
    let prepared = build(resource, operation, values);
    let descriptor = prepared.descriptor;

    assert_eq!(descriptor.method, method, "{} method", operation);
    assert_eq!(descriptor.url, format!("{}{}", SERVER, path), "{} url", operation);
    assert_eq!(descriptor.header("apikey"), Some("golden-key"), "{} apikey", operation);
    assert_eq!(descriptor.body, body, "{} body", operation);
    assert_eq!(
        descriptor.header("Content-Type").is_some(),
        descriptor.body.is_some(),
        "{} content type follows body",
        operation
    );
}

#[test]
fn test_golden_instance_operations() {
    let instance = json!({"instanceName": "bot1"});

    assert_golden("instances-api", "fetch-instances", json!({}), HttpMethod::Get, "/instance/fetchInstances", None);
    assert_golden("instances-api", "instance-connect", instance.clone(), HttpMethod::Get, "/instance/connect/bot1", None);
    assert_golden(
        "instances-api",
        "connection-state",
        instance.clone(),
        HttpMethod::Get,
        "/instance/connectionState/bot1",
        None,
    );
    assert_golden("instances-api", "restart-instance", instance.clone(), HttpMethod::Post, "/instance/restart/bot1", None);
    assert_golden("instances-api", "logout-instance", instance.clone(), HttpMethod::Delete, "/instance/logout/bot1", None);
    assert_golden("instances-api", "delete-instance", instance.clone(), HttpMethod::Delete, "/instance/delete/bot1", None);
}

#[test]
fn test_golden_instance_creation() {
    assert_golden(
        "instances-api",
        "instance-basic",
        json!({
            "instanceName": "bot1",
            "token": "abc",
            "integration": "WHATSAPP-BUSINESS",
            "alwaysOnline": true,
            "readMessages": false,
            "chatwootAccountId": "7",
            "chatwootUrl": "https://chat.example.com",
            "typebotUrl": "",
            "typebotExpire": 20
        }),
        HttpMethod::Post,
        "/instance/create",
        Some(json!({
            "instanceName": "bot1",
            "token": "abc",
            "integration": "WHATSAPP-BUSINESS",
            "alwaysOnline": true,
            "chatwootAccountId": "7",
            "chatwootUrl": "https://chat.example.com",
            "typebotExpire": 20
        })),
    );

    assert_golden(
        "instances-api",
        "instance-proxy",
        json!({
            "instanceName": "bot1",
            "proxyHost": "proxy.local",
            "proxyPort": 3128,
            "proxyProtocol": "https",
            "proxyUsername": "user",
            "proxyPassword": "pass"
        }),
        HttpMethod::Post,
        "/instance/create",
        Some(json!({
            "instanceName": "bot1",
            "token": "",
            "integration": "WHATSAPP-BAILEYS",
            "proxyHost": "proxy.local",
            "proxyPort": 3128,
            "proxyProtocol": "https",
            "proxyUsername": "user",
            "proxyPassword": "pass"
        })),
    );
}

#[test]
fn test_golden_settings() {
    assert_golden(
        "instances-api",
        "instanceSettings",
        json!({
            "instanceName": "bot1",
            "rejectCall": false,
            "msgCall": "",
            "groupsIgnore": true,
            "alwaysOnline": true,
            "readMessages": false,
            "readStatus": false,
            "syncFullHistory": true
        }),
        HttpMethod::Post,
        "/settings/set/bot1",
        Some(json!({
            "rejectCall": false,
            "msgCall": "",
            "groupsIgnore": true,
            "alwaysOnline": true,
            "readMessages": false,
            "readStatus": false,
            "syncFullHistory": true
        })),
    );
}

#[test]
fn test_golden_message_sends() {
    let media = json!({
        "instanceName": "bot1",
        "remoteJid": "5511999999999",
        "media": "https://cdn.example.com/file",
        "caption": "cap",
        "fileName": "file.bin",
        "mentionsEveryOne": true
    });

    assert_golden(
        "messages-api",
        "sendText",
        json!({"instanceName": "bot1", "remoteJid": "5511999999999", "messageText": "hi", "mentionsEveryOne": false}),
        HttpMethod::Post,
        "/message/sendText/bot1",
        Some(json!({"number": "5511999999999", "text": "hi"})),
    );

    for (operation, mediatype, mimetype) in [("sendImage", "image", "image/png"), ("sendVideo", "video", "video/mp4")] {
        assert_golden(
            "messages-api",
            operation,
            media.clone(),
            HttpMethod::Post,
            "/message/sendMedia/bot1",
            Some(json!({
                "number": "5511999999999",
                "mediatype": mediatype,
                "media": "https://cdn.example.com/file",
                "mimetype": mimetype,
                "caption": "cap",
                "fileName": "file.bin",
                "mentionsEveryOne": true
            })),
        );
    }

    assert_golden(
        "messages-api",
        "sendDocument",
        media.clone(),
        HttpMethod::Post,
        "/message/sendMedia/bot1",
        Some(json!({
            "number": "5511999999999",
            "mediatype": "document",
            "media": "https://cdn.example.com/file",
            "caption": "cap",
            "fileName": "file.bin",
            "mentionsEveryOne": true
        })),
    );

    assert_golden(
        "messages-api",
        "sendAudio",
        media,
        HttpMethod::Post,
        "/message/sendWhatsAppAudio/bot1",
        Some(json!({
            "number": "5511999999999",
            "audio": "https://cdn.example.com/file",
            "mentionsEveryOne": true
        })),
    );
}

#[test]
fn test_golden_interactive_sends() {
    assert_golden(
        "messages-api",
        "sendPoll",
        json!({
            "instanceName": "bot1",
            "remoteJid": "5511999999999",
            "pollTitle": "Pick",
            "pollOptions": [{"optionValue": "A"}, {"optionValue": "B"}]
        }),
        HttpMethod::Post,
        "/message/sendPoll/bot1",
        Some(json!({
            "number": "5511999999999",
            "name": "Pick",
            "values": ["A", "B"],
            "selectableCount": 2,
            "mentionsEveryOne": false
        })),
    );

    assert_golden(
        "messages-api",
        "sendList",
        json!({
            "instanceName": "bot1",
            "remoteJid": "5511999999999",
            "listTitle": "Menu",
            "listDescription": "Today",
            "footerText": "Thanks",
            "buttonText": "Open",
            "sectionTitle": "Mains",
            "listRows": [{"rowTitle": "Soup", "optionDescription": "Tomato", "rowId": "s1"}]
        }),
        HttpMethod::Post,
        "/message/sendList/bot1",
        Some(json!({
            "number": "5511999999999",
            "title": "Menu",
            "description": "Today",
            "footerText": "Thanks",
            "buttonText": "Open",
            "sections": [{
                "title": "Mains",
                "description": ["Tomato"],
                "rows": [{"title": "Soup", "description": "Tomato", "rowId": "s1"}]
            }]
        })),
    );

    assert_golden(
        "messages-api",
        "sendStories",
        json!({
            "instanceName": "bot1",
            "statusType": "image",
            "content": "https://cdn.example.com/pic.png",
            "caption": "sunset",
            "backgroundColor": "#ff8800",
            "font": 3
        }),
        HttpMethod::Post,
        "/message/sendStatus/bot1",
        Some(json!({
            "type": "image",
            "content": "https://cdn.example.com/pic.png",
            "caption": "sunset",
            "backgroundColor": "#ff8800",
            "font": 3,
            "allContacts": true
        })),
    );
}

#[test]
fn test_every_template_builds_with_minimal_params() {
    let minimal = json!({
        "instanceName": "bot1",
        "remoteJid": "5511999999999"
    });

    for template in templates() {
        let prepared = build(
            template.key.resource.as_str(),
            template.key.operation.as_str(),
            minimal.clone(),
        );
        assert!(prepared.descriptor.url.starts_with(SERVER));
        assert_eq!(prepared.key, template.key);
    }
}
