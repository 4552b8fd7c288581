//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → form POST requests → validated
//! pages → Singer JSON lines

use serde_json::json;
use std::io::Write;
use std::time::Duration;
use tap_matomo::engine::{Message, SyncConfig, SyncEngine};
use tap_matomo::http::{HttpClient, HttpClientConfig};
use tap_matomo::output::MessageWriter;
use tap_matomo::streams::visits_details;
use tap_matomo::types::BackoffType;
use tap_matomo::{Error, MatomoConfig};
use wiremock::matchers::{body_string_contains, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn config_for(server: &MockServer, extra: serde_json::Value) -> MatomoConfig {
    let mut value = json!({
        "api_url": format!("{}/index.php", server.uri()),
        "token_auth": "anonymous-token",
        "idSite": 3,
        "method": "Live.getLastVisitsDetails",
        "period": "day",
        "date": "2024-01-15"
    });
    if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    let config = MatomoConfig::from_value(value).unwrap();
    config.validate().unwrap();
    config
}

fn client() -> HttpClient {
    HttpClient::with_config(
        HttpClientConfig::builder()
            .max_retries(1)
            .backoff(
                BackoffType::Constant,
                Duration::from_millis(10),
                Duration::from_millis(10),
            )
            .build(),
    )
    .unwrap()
}

async fn run(engine: &SyncEngine<HttpClient>) -> (Vec<String>, tap_matomo::Result<usize>) {
    let mut writer = MessageWriter::new(Vec::new());
    let result = engine
        .sync_stream(&visits_details(), &mut |m: Message| writer.write(&m))
        .await
        .map(|stats| stats.records_synced);

    let lines = String::from_utf8(writer.into_inner())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    (lines, result)
}

fn mount_page(server: &MockServer, offset: &str, body: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(query_param("filter_offset", offset))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(1)
}

// ============================================================================
// End-to-end
// ============================================================================

#[tokio::test]
async fn test_offset_pagination_three_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(query_param("module", "API"))
        .and(query_param("method", "Live.getLastVisitsDetails"))
        .and(query_param("idSite", "3"))
        .and(query_param("period", "day"))
        .and(query_param("date", "2024-01-15"))
        .and(query_param("format", "json"))
        .and(query_param("filter_limit", "2"))
        .and(query_param("filter_offset", "0"))
        .and(body_string_contains("token_auth=anonymous-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"idSite":3,"idVisit":1},{"idSite":3,"idVisit":2}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "2", r#"[{"idSite":3,"idVisit":3}]"#)
        .mount(&server)
        .await;
    mount_page(&server, "3", "[]").mount(&server).await;

    let engine = SyncEngine::new(client(), config_for(&server, json!({"filter_limit": "2"})));
    let (lines, result) = run(&engine).await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains(r#""type":"SCHEMA""#));
    assert!(lines[1].contains(r#""record":{"idSite":3,"idVisit":1}"#));
    assert!(lines[2].contains(r#""record":{"idSite":3,"idVisit":2}"#));
    assert!(lines[3].contains(r#""record":{"idSite":3,"idVisit":3}"#));
}

#[tokio::test]
async fn test_unlimited_page_size_single_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(query_param("filter_limit", "-1"))
        .and(query_param_is_missing("filter_offset"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"idSite":3,"idVisit":1},{"idSite":3,"idVisit":2}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let engine = SyncEngine::new(client(), config_for(&server, json!({"filter_limit": -1})));
    let (_, result) = run(&engine).await;

    assert_eq!(result.unwrap(), 2);
}

#[tokio::test]
async fn test_api_error_stops_stream() {
    let server = MockServer::start().await;

    mount_page(&server, "0", r#"[{"idSite":3,"idVisit":1},{"idSite":3,"idVisit":2}]"#)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "2",
        r#"{"result":"error","message":"You can't access this resource as it requires view access"}"#,
    )
    .mount(&server)
    .await;

    let engine = SyncEngine::new(client(), config_for(&server, json!({"filter_limit": "2"})));
    let (lines, result) = run(&engine).await;

    match result {
        Err(Error::Api { message }) => assert!(message.contains("requires view access")),
        other => panic!("Expected Api error, got {other:?}"),
    }
    // Schema plus the first page's records were already written
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn test_http_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let engine = SyncEngine::new(client(), config_for(&server, json!({})));
    let (_, result) = run(&engine).await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 403, .. })));
}

#[tokio::test]
async fn test_decimal_values_survive_to_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"idSite":3,"idVisit":9,"revenue":12345678901234567.891,"latitude":"48.856613"}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let engine = SyncEngine::new(client(), config_for(&server, json!({"filter_limit": "-1"})));
    let (lines, result) = run(&engine).await;

    assert_eq!(result.unwrap(), 1);
    assert!(lines[1].contains(r#""revenue":12345678901234567.891"#));
    assert!(lines[1].contains(r#""latitude":"48.856613""#));
}

#[tokio::test]
async fn test_token_pagination_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"idSite":3,"idVisit":1,"next_page":"cursor-2"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(query_param("page", "cursor-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"idSite":3,"idVisit":2,"next_page":""}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, json!({"pagination": "token", "filter_limit": "10"}));
    let engine = SyncEngine::new(client(), config);
    let (lines, result) = run(&engine).await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn test_max_pages_limits_fetches() {
    let server = MockServer::start().await;

    mount_page(&server, "0", r#"[{"idSite":3,"idVisit":1}]"#)
        .mount(&server)
        .await;

    let engine = SyncEngine::new(client(), config_for(&server, json!({"filter_limit": "1"})))
        .with_config(SyncConfig::new().with_max_pages(Some(1)));
    let (_, result) = run(&engine).await;

    assert_eq!(result.unwrap(), 1);
}

// ============================================================================
// Configuration files
// ============================================================================

#[tokio::test]
async fn test_yaml_config_file_drives_sync() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(query_param("idSite", "1,2"))
        .and(query_param("date", "today"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"idSite":1,"idVisit":1}]"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "api_url: {}/index.php\ntoken_auth: abc\nidSite: [1, 2]\nfilter_limit: \"-1\"",
        server.uri()
    )
    .unwrap();

    let config = MatomoConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();

    let engine = SyncEngine::new(client(), config);
    let (_, result) = run(&engine).await;
    assert_eq!(result.unwrap(), 1);
}
