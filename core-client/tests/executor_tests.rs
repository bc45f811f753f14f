//! Retry, classification and cancellation behaviour of the request executor.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_client::{ApiError, CallOptions, CancellationToken, FormFile, RequestExecutor};
use core_models::{Attachment, ResultResponse, User};
use core_runtime::config::ClientConfig;
use mockall::mock;
use tokio::time::Instant;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

fn executor(mock: MockHttpClient) -> RequestExecutor {
    let config = ClientConfig::builder()
        .access_token("test-token")
        .http_client(Arc::new(mock))
        .build()
        .unwrap();
    RequestExecutor::new(&config).unwrap()
}

fn error_body(status: u16, code: i64) -> HttpResponse {
    HttpResponse::new(
        status,
        format!(r#"{{"errorCode": {}, "message": "try later"}}"#, code),
    )
}

fn user_body() -> HttpResponse {
    HttpResponse::new(200, r#"{"id": 42, "email": "pm@example.com"}"#)
}

async fn get_me(executor: &RequestExecutor) -> core_client::Result<User> {
    executor
        .execute(HttpMethod::Get, "users/me", None::<&()>, None)
        .await
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_limit_backs_off_then_succeeds() {
    let mut mock = MockHttpClient::new();
    let mut calls = 0;
    mock.expect_execute().times(3).returning(move |_| {
        calls += 1;
        if calls <= 2 {
            Ok(error_body(503, 4003))
        } else {
            Ok(user_body())
        }
    });

    let executor = executor(mock);
    let started = Instant::now();

    let user = get_me(&executor).await.unwrap();

    assert_eq!(user.id, Some(42));
    assert!(started.elapsed() >= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_gives_up_after_ten_attempts() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute()
        .times(10)
        .returning(|_| Ok(error_body(429, 4001)));

    let executor = executor(mock);

    match get_me(&executor).await {
        Err(ApiError::RetriesExceeded { url, attempts }) => {
            assert_eq!(attempts, 10);
            assert_eq!(url, "https://api.smartsheet.com/2.0/users/me");
        }
        other => panic!("expected RetriesExceeded, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_not_found_fails_on_first_attempt() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(1).returning(|_| {
        Ok(HttpResponse::new(
            404,
            r#"{"errorCode": 1006, "message": "Not Found"}"#,
        ))
    });

    let executor = executor(mock);
    let started = Instant::now();

    let err = get_me(&executor).await.unwrap_err();

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(
        err.to_string(),
        "HTTP Error 404 - Smartsheet error code 1006: Not Found url:[https://api.smartsheet.com/2.0/users/me]"
    );
}

#[tokio::test(start_paused = true)]
async fn test_unknown_retry_code_does_not_wait() {
    let mut mock = MockHttpClient::new();
    let mut calls = 0;
    mock.expect_execute().times(2).returning(move |_| {
        calls += 1;
        if calls == 1 {
            Ok(error_body(500, 4000))
        } else {
            Ok(user_body())
        }
    });

    let executor = executor(mock);
    let started = Instant::now();

    assert!(get_me(&executor).await.is_ok());
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_transient_transport_error_is_retried() {
    let mut mock = MockHttpClient::new();
    let mut calls = 0;
    mock.expect_execute().times(3).returning(move |_| {
        calls += 1;
        if calls <= 2 {
            Err(BridgeError::Connection("reset by peer".into()))
        } else {
            Ok(user_body())
        }
    });

    let executor = executor(mock);
    let started = Instant::now();

    assert!(get_me(&executor).await.is_ok());
    // 1 s, then 2 s
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(3) && waited < Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_host_backs_off_then_surfaces_transport_error() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute()
        .times(10)
        .returning(|_| Err(BridgeError::Timeout("no response in 30s".into())));

    let executor = executor(mock);
    let started = Instant::now();

    let err = get_me(&executor).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(BridgeError::Timeout(_))));
    // 1 + 2 + 4 + ... + 256 seconds between the ten attempts
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(511) && waited < Duration::from_secs(512));
}

#[tokio::test]
async fn test_permanent_transport_error_is_surfaced() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute()
        .times(1)
        .returning(|_| Err(BridgeError::OperationFailed("bad certificate".into())));

    let err = get_me(&executor(mock)).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_unparseable_success_body_is_not_retried() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute()
        .times(1)
        .returning(|_| Ok(HttpResponse::new(200, "<html>oops</html>")));

    let err = get_me(&executor(mock)).await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization { .. }));
}

#[tokio::test]
async fn test_missing_token_fails_before_sending() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(0);

    let config = ClientConfig::builder()
        .http_client(Arc::new(mock))
        .build()
        .unwrap();
    let executor = RequestExecutor::new(&config).unwrap();

    assert!(matches!(
        get_me(&executor).await,
        Err(ApiError::Validation(_))
    ));
}

#[tokio::test]
async fn test_request_carries_headers_and_body() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(1).returning(|request| {
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.header_value("Authorization"), Some("Bearer override"));
        assert_eq!(request.header_value("Smartsheet-Change-Agent"), Some("etl"));
        assert_eq!(request.header_value("Accept"), Some("application/json"));
        assert_eq!(
            request.body.as_deref(),
            Some(br#"{"firstName":"Kim"}"#.as_slice())
        );
        Ok(user_body())
    });

    let config = ClientConfig::builder()
        .access_token("stored")
        .change_agent("etl")
        .http_client(Arc::new(mock))
        .build()
        .unwrap();
    let executor = RequestExecutor::new(&config).unwrap();

    let body = serde_json::json!({ "firstName": "Kim" });
    let _: User = executor
        .execute(HttpMethod::Put, "users/42", Some(&body), Some("override"))
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_interrupts_backoff() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute()
        .times(1)
        .returning(|_| Ok(error_body(429, 4001)));

    let executor = executor(mock);
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let result: core_client::Result<User> = executor
        .execute_with(
            HttpMethod::Get,
            "users/me",
            None::<&()>,
            None,
            &CallOptions::new().with_cancel(token),
        )
        .await;

    assert!(matches!(result, Err(ApiError::Cancelled { .. })));
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_deadline_stops_the_retry_loop() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute()
        .times(2)
        .returning(|_| Ok(error_body(503, 4003)));

    let executor = executor(mock);
    let options = CallOptions::new().with_timeout(Duration::from_secs(5));

    let result: core_client::Result<User> = executor
        .execute_with(HttpMethod::Get, "users/me", None::<&()>, None, &options)
        .await;

    assert!(matches!(result, Err(ApiError::Cancelled { .. })));
}

#[tokio::test]
async fn test_form_requests_skip_bearer() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(1).returning(|request| {
        assert!(request.header_value("Authorization").is_none());
        assert_eq!(
            request.header_value("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
        Ok(HttpResponse::new(200, "{}"))
    });

    let value: serde_json::Value = executor(mock)
        .execute_form("token", "grant_type=refresh_token".into(), &CallOptions::new())
        .await
        .unwrap();
    assert!(value.is_object());
}

#[tokio::test]
async fn test_download_returns_raw_bytes() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(1).returning(|request| {
        assert_eq!(request.header_value("Accept"), Some("text/csv"));
        Ok(HttpResponse::new(200, "a,b\n1,2\n"))
    });

    let bytes = executor(mock)
        .download("sheets/7", "text/csv", None, &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"a,b\n1,2\n");
}

#[tokio::test]
async fn test_upload_sends_raw_bytes() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().times(1).returning(|request| {
        assert_eq!(
            request.header_value("Content-Disposition"),
            Some("attachment; filename=\"notes.txt\"")
        );
        assert_eq!(request.header_value("Content-Length"), Some("5"));
        assert_eq!(request.header_value("Content-Type"), Some("text/plain"));
        assert_eq!(request.body.as_deref(), Some(b"hello".as_slice()));
        Ok(HttpResponse::new(
            200,
            r#"{"message": "SUCCESS", "resultCode": 0, "result": {"id": 9, "name": "notes.txt"}}"#,
        ))
    });

    let file = FormFile::new("notes.txt", 5, &b"hello"[..]).with_content_type("text/plain");
    let response: ResultResponse<Attachment> = executor(mock)
        .upload_form_file("sheets/1/attachments", file, None, &CallOptions::new())
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.result.and_then(|a| a.id), Some(9));
}
