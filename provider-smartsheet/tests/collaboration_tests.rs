//! Webhooks, sharing and discussions: request shapes sent to the service.

use std::sync::Arc;

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_models::{AccessLevel, Share, Webhook};
use mockall::mock;
use provider_smartsheet::{ClientConfig, DiscussionQuery, SmartsheetClient, SmartsheetError};
use serde_json::json;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

fn client(mock: MockHttpClient) -> SmartsheetClient {
    let config = ClientConfig::builder()
        .access_token("token")
        .http_client(Arc::new(mock))
        .build()
        .unwrap();
    SmartsheetClient::new(&config).unwrap()
}

fn success(result: serde_json::Value) -> HttpResponse {
    let body = json!({ "message": "SUCCESS", "resultCode": 0, "result": result });
    HttpResponse::new(200, body.to_string())
}

fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(request.body.as_deref().unwrap()).unwrap()
}

#[tokio::test]
async fn test_create_webhook_posts_subscription() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(1).returning(|request| {
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.smartsheet.com/2.0/webhooks");
        let body = body_json(&request);
        assert_eq!(body["scope"], "sheet");
        assert_eq!(body["scopeObjectId"], 9);
        assert_eq!(body["events"], json!(["*.*"]));
        Ok(success(json!({ "id": 31, "name": "sync", "enabled": false })))
    });

    let webhook = Webhook::for_sheet("sync", "https://hooks.example.com/in", 9);
    let created = client(mock).create_webhook(&webhook, None).await.unwrap();

    assert_eq!(created.id, Some(31));
    assert_eq!(created.enabled, Some(false));
}

#[tokio::test]
async fn test_create_webhook_requires_callback() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(0);

    let mut webhook = Webhook::for_sheet("sync", "https://hooks.example.com/in", 9);
    webhook.callback_url = Some("  ".to_string());

    assert!(matches!(
        client(mock).create_webhook(&webhook, None).await,
        Err(SmartsheetError::Validation(_))
    ));
}

#[tokio::test]
async fn test_update_webhook_sends_only_mutable_fields() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(1).returning(|request| {
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, "https://api.smartsheet.com/2.0/webhooks/31");
        assert_eq!(
            body_json(&request),
            json!({
                "name": "sync",
                "callbackUrl": "https://hooks.example.com/in",
                "events": ["*.*"],
                "version": 1,
                "enabled": true
            })
        );
        Ok(success(json!({ "id": 31, "enabled": true, "status": "ENABLED" })))
    });

    let mut webhook = Webhook::for_sheet("sync", "https://hooks.example.com/in", 9);
    webhook.id = Some(31);
    webhook.enabled = Some(true);
    webhook.shared_secret = Some("secret".to_string());

    let updated = client(mock).update_webhook(31, &webhook, None).await.unwrap();
    assert_eq!(updated.status.as_deref(), Some("ENABLED"));
}

#[tokio::test]
async fn test_share_sheet_strips_server_fields() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(1).returning(|request| {
        assert_eq!(
            request.url,
            "https://api.smartsheet.com/2.0/sheets/9/shares?sendEmail=true"
        );
        assert_eq!(
            body_json(&request),
            json!([{ "email": "kim@example.com", "accessLevel": "EDITOR" }])
        );
        Ok(success(json!([{ "id": "AQAISF82FOeE", "email": "kim@example.com" }])))
    });

    let mut share = Share::for_email("kim@example.com", AccessLevel::Editor);
    share.id = Some("stale".to_string());
    share.user_id = Some(4);

    let shares = client(mock).share_sheet(9, &[share], true, None).await.unwrap();
    assert_eq!(shares[0].id.as_deref(), Some("AQAISF82FOeE"));
}

#[tokio::test]
async fn test_share_requires_recipient() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(0);

    let share = Share {
        access_level: Some(AccessLevel::Viewer),
        ..Default::default()
    };

    assert!(matches!(
        client(mock).share_workspace(3, &[share], false, None).await,
        Err(SmartsheetError::Validation(_))
    ));
}

#[tokio::test]
async fn test_row_discussions_query() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(1).returning(|request| {
        assert_eq!(
            request.url,
            "https://api.smartsheet.com/2.0/sheets/9/rows/10/discussions?include=comments,attachments&includeAll=true"
        );
        Ok(HttpResponse::new(
            200,
            json!({ "pageNumber": 1, "totalCount": 1, "data": [{ "id": 5, "title": "Why?" }] })
                .to_string(),
        ))
    });

    let query = DiscussionQuery {
        include_comments: true,
        include_attachments: true,
        include_all: true,
    };
    let discussions = client(mock)
        .list_row_discussions(9, 10, &query, None)
        .await
        .unwrap();

    assert_eq!(discussions.len(), 1);
    assert_eq!(discussions[0].id, Some(5));
}
