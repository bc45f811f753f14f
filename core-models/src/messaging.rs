//! Row emails and update requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
}

impl Recipient {
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            group_id: None,
        }
    }

    pub fn group(group_id: i64) -> Self {
        Self {
            email: None,
            group_id: Some(group_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    #[serde(default)]
    pub send_to: Vec<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_me: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowEmail {
    #[serde(flatten)]
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_attachments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_discussions: Option<bool>,
    /// `HORIZONTAL` or `VERTICAL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_ids: Option<Vec<i64>>,
}

/// Email carrying several rows; the body of `rows/emails`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiRowEmail {
    #[serde(flatten)]
    pub row_email: RowEmail,
    #[serde(default)]
    pub row_ids: Vec<i64>,
}

impl MultiRowEmail {
    pub fn new(row_ids: Vec<i64>, send_to: Vec<Recipient>) -> Self {
        Self {
            row_email: RowEmail {
                email: Email {
                    send_to,
                    ..Default::default()
                },
                ..Default::default()
            },
            row_ids,
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.row_email.email.subject = Some(subject.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.row_email.email.message = Some(message.into());
        self
    }
}

/// A request for recipients to update specific rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub rows: MultiRowEmail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<MultiRowEmail> for UpdateRequest {
    fn from(rows: MultiRowEmail) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_row_email_flattens() {
        let recipients = vec![Recipient::email("a@b.co"), Recipient::group(7)];
        let email = MultiRowEmail::new(vec![1, 2], recipients).subject("Weekly status");
        let json = serde_json::to_value(&email).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "sendTo": [{ "email": "a@b.co" }, { "groupId": 7 }],
                "subject": "Weekly status",
                "rowIds": [1, 2]
            })
        );
    }

    #[test]
    fn test_update_request_parses_nested_fields() {
        let request: UpdateRequest = serde_json::from_str(
            r#"{"id": 3, "rowIds": [9], "sendTo": [{"email": "x@y.z"}], "ccMe": true}"#,
        )
        .unwrap();

        assert_eq!(request.id, Some(3));
        assert_eq!(request.rows.row_ids, vec![9]);
        assert_eq!(request.rows.row_email.email.cc_me, Some(true));
    }
}
