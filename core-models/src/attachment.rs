//! Attachments, discussions and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::{AccessLevel, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentType {
    BoxCom,
    Dropbox,
    Egnyte,
    Evernote,
    File,
    GoogleDrive,
    Link,
    Onedrive,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentSubType {
    Folder,
    Document,
    Drawing,
    Pdf,
    Presentation,
    Spreadsheet,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_expires_in_millis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_kb: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Download url for files, target url for links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_type: Option<AttachmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_sub_type: Option<AttachmentSubType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// `SHEET`, `ROW` or `COMMENT`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
}

impl Attachment {
    /// A url attachment (link or cloud file) ready to be posted.
    pub fn link(name: impl Into<String>, url: impl Into<String>, kind: AttachmentType) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.into()),
            attachment_type: Some(kind),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commented_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commented_user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
    /// Only the first comment is sent when a discussion is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_attachments: Option<Vec<Attachment>>,
}

impl Discussion {
    /// A new discussion opened with its first comment.
    pub fn new(title: impl Into<String>, first_comment: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            comment: Some(Comment::new(first_comment)),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_discussion_shape() {
        let json = serde_json::to_value(Discussion::new("Blocked", "Waiting on legal")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "title": "Blocked", "comment": { "text": "Waiting on legal" } })
        );
    }

    #[test]
    fn test_attachment_enum_wire_names() {
        let attachment: Attachment = serde_json::from_str(
            r#"{"id": 1, "attachmentType": "GOOGLE_DRIVE", "attachmentSubType": "SPREADSHEET",
                "sizeInKb": 12}"#,
        )
        .unwrap();

        assert_eq!(attachment.attachment_type, Some(AttachmentType::GoogleDrive));
        assert_eq!(attachment.attachment_sub_type, Some(AttachmentSubType::Spreadsheet));

        let link = Attachment::link("Roadmap", "https://example.com/roadmap", AttachmentType::Link);
        let json = serde_json::to_value(link).unwrap();
        assert_eq!(json["attachmentType"], "LINK");
    }
}
