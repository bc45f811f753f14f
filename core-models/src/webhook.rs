//! Webhook subscriptions and callback payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Header a subscriber echoes back to verify a new webhook.
pub const HOOK_RESPONSE_HEADER: &str = "Smartsheet-Hook-Response";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_callback_attempt_retry_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_callback_attempt: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_successful_callback: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscope {
    #[serde(default)]
    pub column_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// Only `sheet` is supported by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_object_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscope: Option<WebhookSubscope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<WebhookStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Webhook {
    /// A subscription to every event on one sheet.
    pub fn for_sheet(
        name: impl Into<String>,
        callback_url: impl Into<String>,
        sheet_id: i64,
    ) -> Self {
        Self {
            name: Some(name.into()),
            callback_url: Some(callback_url.into()),
            scope: Some("sheet".to_string()),
            scope_object_id: Some(sheet_id),
            events: Some(vec!["*.*".to_string()]),
            version: Some(1),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body the service posts to a webhook's callback url.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookCallback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_agent: Option<String>,
    /// Present only on verification requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_object_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_webhook_status: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

impl WebhookCallback {
    pub fn is_verification(&self) -> bool {
        self.challenge.is_some()
    }

    /// Header pair to return from the callback endpoint, if this is a challenge.
    pub fn challenge_response(&self) -> Option<(&'static str, &str)> {
        self.challenge
            .as_deref()
            .map(|challenge| (HOOK_RESPONSE_HEADER, challenge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_echo() {
        let callback: WebhookCallback =
            serde_json::from_str(r#"{"challenge": "d78dd1d3", "webhookId": 9}"#).unwrap();

        assert!(callback.is_verification());
        assert_eq!(
            callback.challenge_response(),
            Some(("Smartsheet-Hook-Response", "d78dd1d3"))
        );
    }

    #[test]
    fn test_event_payload() {
        let callback: WebhookCallback = serde_json::from_str(
            r#"{"nonce": "n", "scope": "sheet", "scopeObjectId": 5, "webhookId": 9,
                "events": [{"objectType": "cell", "eventType": "updated", "rowId": 1, "columnId": 2}]}"#,
        )
        .unwrap();

        assert!(!callback.is_verification());
        assert_eq!(callback.events[0].column_id, Some(2));
    }

    #[test]
    fn test_sheet_subscription_shape() {
        let hook = Webhook::for_sheet("sync", "https://hooks.example.com/s", 5);
        let json = serde_json::to_value(hook).unwrap();

        assert_eq!(json["scope"], "sheet");
        assert_eq!(json["events"], serde_json::json!(["*.*"]));
        assert!(json.get("enabled").is_none());
    }
}
