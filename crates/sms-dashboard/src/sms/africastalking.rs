//! Africa's Talking SMS API client.
//!
//! `POST {endpoint}/version1/messaging` with form fields `username`, `to`,
//! `message` and optional `from`, authenticated by the `apiKey` header.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;

use super::{build_http_client, SmsError, SmsProvider};
use crate::config::ProviderConfig;

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(rename = "SMSMessageData")]
    data: Option<MessageData>,
}

#[derive(Debug, Deserialize)]
struct MessageData {
    #[serde(rename = "Recipients", default)]
    recipients: Vec<Recipient>,
}

#[derive(Debug, Deserialize)]
struct Recipient {
    #[serde(default)]
    status: Option<String>,

    /// Numeric in practice, but tolerated as any JSON scalar.
    #[serde(rename = "statusCode", default)]
    status_code: Option<serde_json::Value>,

    #[serde(rename = "messageId", default)]
    message_id: Option<String>,
}

impl Recipient {
    fn status_code(&self) -> Option<String> {
        match self.status_code.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// HTTP client for the Africa's Talking messaging API.
#[derive(Clone)]
pub struct AfricasTalkingClient {
    client: Client,
    endpoint: String,
    username: String,
    api_key: String,
    sender_id: Option<String>,
}

impl AfricasTalkingClient {
    /// Create a client; the HTTPS client is configured from `AT_CA_BUNDLE`
    /// and `AT_SSL_VERIFY` at this point.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, SmsError> {
        Ok(Self {
            client: build_http_client(config)?,
            endpoint: config.endpoint(),
            username: config.username.clone(),
            api_key: config.api_key.trim().to_string(),
            sender_id: config.sender_id().map(str::to_string),
        })
    }

    fn messaging_url(&self) -> String {
        format!("{}/version1/messaging", self.endpoint)
    }
}

#[async_trait]
impl SmsProvider for AfricasTalkingClient {
    fn name(&self) -> &'static str {
        "africastalking"
    }

    async fn send(&self, to: &str, body: &str) -> Result<String, SmsError> {
        let mut form = vec![
            ("username", self.username.as_str()),
            ("to", to),
            ("message", body),
        ];
        if let Some(sender_id) = self.sender_id.as_deref() {
            form.push(("from", sender_id));
        }

        let response = self
            .client
            .post(self.messaging_url())
            .header("apiKey", &self.api_key)
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(SmsError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: SendResponse = serde_json::from_str(&text)
            .map_err(|e| SmsError::InvalidResponse(format!("{}: {}", e, text)))?;

        interpret(parsed)
    }
}

/// Turn the first recipient entry into a message id or a rejection.
fn interpret(response: SendResponse) -> Result<String, SmsError> {
    let Some(recipient) = response.data.and_then(|d| d.recipients.into_iter().next()) else {
        return Ok(fallback_id());
    };

    let status = recipient.status.clone().unwrap_or_default();
    if !status.eq_ignore_ascii_case("success") {
        return Err(SmsError::Rejected {
            status,
            code: recipient.status_code().unwrap_or_default(),
        });
    }

    Ok(recipient
        .message_id
        .clone()
        .filter(|id| !id.is_empty())
        .or_else(|| recipient.status_code())
        .unwrap_or_else(fallback_id))
}

fn fallback_id() -> String {
    format!("at_{}", chrono::Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(base_url: &str) -> ProviderConfig {
        ProviderConfig {
            username: "acme".to_string(),
            api_key: "secret-key".to_string(),
            sender_id: Some("ACME".to_string()),
            base_url: Some(base_url.to_string()),
            ..ProviderConfig::default()
        }
    }

    fn parse(value: serde_json::Value) -> SendResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_interpret_success_returns_message_id() {
        let response = parse(json!({
            "SMSMessageData": {
                "Message": "Sent to 1/1 Total Cost: KES 0.8000",
                "Recipients": [{
                    "statusCode": 101,
                    "number": "+254711XXXYYY",
                    "status": "Success",
                    "cost": "KES 0.8000",
                    "messageId": "ATPid_SampleTxnId123"
                }]
            }
        }));
        assert_eq!(interpret(response).unwrap(), "ATPid_SampleTxnId123");
    }

    #[test]
    fn test_interpret_success_without_message_id_uses_status_code() {
        let response = parse(json!({
            "SMSMessageData": { "Recipients": [{ "status": "success", "statusCode": 101 }] }
        }));
        assert_eq!(interpret(response).unwrap(), "101");
    }

    #[test]
    fn test_interpret_rejection() {
        let response = parse(json!({
            "SMSMessageData": {
                "Recipients": [{ "status": "InvalidPhoneNumber", "statusCode": 403, "messageId": "None" }]
            }
        }));
        let err = interpret(response).unwrap_err();
        assert_eq!(err.to_string(), "AT send failed: InvalidPhoneNumber (403)");
    }

    #[test]
    fn test_interpret_without_recipients_falls_back() {
        let id = interpret(parse(json!({ "SMSMessageData": { "Recipients": [] } }))).unwrap();
        assert!(id.starts_with("at_"));

        let id = interpret(parse(json!({}))).unwrap();
        assert!(id.starts_with("at_"));
    }

    #[tokio::test]
    async fn test_send_posts_form_with_api_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/version1/messaging")
                    .header("apikey", "secret-key")
                    .header("accept", "application/json")
                    .x_www_form_urlencoded_tuple("username", "acme")
                    .x_www_form_urlencoded_tuple("to", "+254700000001")
                    .x_www_form_urlencoded_tuple("message", "Hello there")
                    .x_www_form_urlencoded_tuple("from", "ACME");
                then.status(201).json_body(json!({
                    "SMSMessageData": {
                        "Recipients": [{ "status": "Success", "statusCode": 101, "messageId": "ATXid_1" }]
                    }
                }));
            })
            .await;

        let client = AfricasTalkingClient::from_config(&config(&server.base_url())).unwrap();
        let id = client.send("+254700000001", "Hello there").await.unwrap();

        mock.assert_async().await;
        assert_eq!(id, "ATXid_1");
    }

    #[tokio::test]
    async fn test_send_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/version1/messaging");
                then.status(401).body("The supplied authentication is invalid");
            })
            .await;

        let client = AfricasTalkingClient::from_config(&config(&server.base_url())).unwrap();
        let err = client.send("+254700000001", "Hello").await.unwrap_err();

        assert!(matches!(err, SmsError::Http { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_send_non_json_body_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/version1/messaging");
                then.status(200).body("<html>proxy page</html>");
            })
            .await;

        let client = AfricasTalkingClient::from_config(&config(&server.base_url())).unwrap();
        let err = client.send("+254700000001", "Hello").await.unwrap_err();

        assert!(matches!(err, SmsError::InvalidResponse(_)));
    }
}
