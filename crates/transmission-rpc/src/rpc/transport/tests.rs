//! Tests for the Transport, against a local mock daemon.

use httpmock::prelude::*;
use serde_json::{Value, json};

use super::*;
use crate::TransmissionClient;
use crate::rpc::tag::TagGenerator;

const PATH: &str = "/transmission/rpc";

fn seeded(config: &ClientConfig, first_tag: u64) -> Transport {
    let mut transport = Transport::new(config).unwrap();
    transport.state = Arc::new(ClientState {
        tags: TagGenerator::starting_at(first_tag),
        ..Default::default()
    });
    transport
}

fn transport(server: &MockServer, first_tag: u64) -> Transport {
    seeded(
        &ClientConfig::new(server.url(PATH)).with_user_agent("test-agent"),
        first_tag,
    )
}

#[test]
fn builds_from_config() {
    let transport = Transport::new(
        &ClientConfig::default()
            .with_credentials("user", "pass")
            .with_user_agent("agent"),
    )
    .unwrap();
    assert_eq!(transport.url().as_str(), "http://localhost:9091/transmission/rpc");
    assert_eq!(transport.user_agent, "agent");
    assert_eq!(
        transport.credentials,
        Some(("user".to_owned(), Some("pass".to_owned())))
    );
    assert_eq!(transport.session_token(), "");
    assert!(!format!("{transport:?}").contains("pass"));
}

#[test]
fn invalid_config_is_rejected() {
    let err = Transport::new(&ClientConfig::new("::")).unwrap_err();
    assert!(matches!(err, RpcError::Configuration(_)));
}

#[test]
fn interpret_check_order() {
    let transport = seeded(&ClientConfig::default(), 1);

    let err = transport
        .interpret::<Value>("m", 3, br#"{"result":"boom"}"#)
        .unwrap_err();
    assert!(matches!(err, RpcError::Remote(msg) if msg == "boom"));

    let err = transport
        .interpret::<Value>("m", 3, br#"{"result":"success"}"#)
        .unwrap_err();
    assert!(matches!(err, RpcError::Protocol(ProtocolViolation::MissingTag)));

    let err = transport
        .interpret::<Value>("m", 3, br#"{"result":"boom","tag":4}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        RpcError::Protocol(ProtocolViolation::TagMismatch {
            sent: 3,
            received: 4
        })
    ));

    let err = transport
        .interpret::<Value>("m", 3, br#"{"result":"boom","tag":3}"#)
        .unwrap_err();
    assert!(matches!(err, RpcError::Remote(msg) if msg == "boom"));

    let value: Value = transport
        .interpret("m", 3, br#"{"result":"success","arguments":{"a":1},"tag":3}"#)
        .unwrap();
    assert_eq!(value["a"], 1);
}

#[test_log::test(tokio::test)]
async fn cancelled_before_sending() {
    let transport = seeded(&ClientConfig::default(), 1);
    let err = transport
        .call_until::<Value, Value, _>("session-stats", None, future::ready(()))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Cancelled));
    assert_eq!(transport.session_token(), "");
}

#[tokio::test]
async fn sends_protocol_headers() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(PATH)
            .header("content-type", "application/json")
            .header("user-agent", "test-agent")
            .header("authorization", "Basic dXNlcjpwYXNz")
            .json_body(json!({"method": "session-stats", "tag": 100}));
        then.status(200)
            .json_body(json!({"result": "success", "arguments": {"torrentCount": 3}, "tag": 100}));
    });

    let config = ClientConfig::new(server.url(PATH))
        .with_user_agent("test-agent")
        .with_credentials("user", "pass");
    let transport = seeded(&config, 100);
    let answer: Value = transport.call::<Value, _>("session-stats", None).await.unwrap();

    mock.assert();
    assert_eq!(answer, json!({"torrentCount": 3}));
}

#[tokio::test]
async fn encodes_arguments() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path(PATH).json_body(json!({
            "method": "torrent-stop",
            "arguments": {"ids": [1, 2]},
            "tag": 7,
        }));
        then.status(200).json_body(json!({"result": "success", "tag": 7}));
    });

    let transport = transport(&server, 7);
    let _: Option<Value> = transport
        .call("torrent-stop", Some(&json!({"ids": [1, 2]})))
        .await
        .unwrap();

    mock.assert();
}

#[test_log::test(tokio::test)]
async fn token_retry_exactly_once() {
    let server = MockServer::start_async().await;
    let rejected = server.mock(|when, then| {
        when.method(POST).path(PATH).header(SESSION_ID_HEADER, "");
        then.status(409).header(SESSION_ID_HEADER, "abc");
    });
    let accepted = server.mock(|when, then| {
        when.method(POST)
            .path(PATH)
            .header(SESSION_ID_HEADER, "abc")
            .json_body(json!({"method": "port-test", "tag": 100}));
        then.status(200)
            .json_body(json!({"result": "success", "arguments": {"port-is-open": true}, "tag": 100}));
    });

    let transport = transport(&server, 100);
    let answer: Value = transport.call::<Value, _>("port-test", None).await.unwrap();

    rejected.assert_hits(1);
    accepted.assert_hits(1);
    assert_eq!(answer["port-is-open"], true);
    assert_eq!(transport.session_token(), "abc");
}

#[tokio::test]
async fn token_is_reused_by_later_calls() {
    let server = MockServer::start_async().await;
    let rejected = server.mock(|when, then| {
        when.method(POST).path(PATH).header(SESSION_ID_HEADER, "");
        then.status(409).header(SESSION_ID_HEADER, "abc");
    });
    let first = server.mock(|when, then| {
        when.header(SESSION_ID_HEADER, "abc")
            .json_body(json!({"method": "session-close", "tag": 10}));
        then.status(200).json_body(json!({"result": "success", "tag": 10}));
    });
    let second = server.mock(|when, then| {
        when.header(SESSION_ID_HEADER, "abc")
            .json_body(json!({"method": "session-close", "tag": 11}));
        then.status(200).json_body(json!({"result": "success", "tag": 11}));
    });

    let transport = transport(&server, 10);
    let _: Value = transport.call::<Value, _>("session-close", None).await.unwrap();
    let _: Value = transport.call::<Value, _>("session-close", None).await.unwrap();

    rejected.assert_hits(1);
    first.assert_hits(1);
    second.assert_hits(1);
}

#[test_log::test(tokio::test)]
async fn token_retry_exhausted() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(409).header(SESSION_ID_HEADER, "abc");
    });

    let transport = transport(&server, 100);
    let err = transport
        .call::<Value, Value>("session-stats", None)
        .await
        .unwrap_err();

    mock.assert_hits(2);
    assert!(matches!(err, RpcError::TokenRetryExhausted));
    assert_eq!(transport.session_token(), "abc");
}

#[tokio::test]
async fn conflict_without_token_header() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(409);
    });

    let transport = transport(&server, 100);
    let err = transport
        .call::<Value, Value>("session-stats", None)
        .await
        .unwrap_err();

    mock.assert_hits(2);
    assert!(matches!(err, RpcError::TokenRetryExhausted));
    assert_eq!(transport.session_token(), "");
}

#[tokio::test]
async fn tag_mismatch() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200)
            .json_body(json!({"result": "success", "arguments": {}, "tag": 999}));
    });

    let transport = transport(&server, 100);
    let err = transport
        .call::<Value, Value>("session-stats", None)
        .await
        .unwrap_err();

    match err {
        RpcError::Protocol(ProtocolViolation::TagMismatch { sent, received }) => {
            assert_eq!(sent, 100);
            assert_eq!(received, 999);
        }
        _ => panic!("Expected TagMismatch error"),
    }
}

#[tokio::test]
async fn missing_tag() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(json!({"result": "success", "arguments": {}}));
    });

    let transport = transport(&server, 100);
    let err = transport
        .call::<Value, Value>("session-stats", None)
        .await
        .unwrap_err();

    assert!(matches!(err, RpcError::Protocol(ProtocolViolation::MissingTag)));
}

#[tokio::test]
async fn remote_failure() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200)
            .json_body(json!({"result": "some error text", "arguments": {}, "tag": 100}));
    });

    let transport = transport(&server, 100);
    let err = transport
        .call::<Value, Value>("torrent-start", Some(&json!({"ids": [1]})))
        .await
        .unwrap_err();

    match err {
        RpcError::Remote(msg) => assert_eq!(msg, "some error text"),
        _ => panic!("Expected Remote error"),
    }
}

#[tokio::test]
async fn untagged_remote_failure() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(json!({"result": "some error text"}));
    });

    let transport = transport(&server, 100);
    let err = transport
        .call::<Value, Value>("torrent-start", Some(&json!({"ids": [1]})))
        .await
        .unwrap_err();

    mock.assert_hits(1);
    match err {
        RpcError::Remote(msg) => assert_eq!(msg, "some error text"),
        _ => panic!("Expected Remote error"),
    }
}

#[tokio::test]
async fn http_status_is_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(401).body("Unauthorized");
    });

    let transport = transport(&server, 100);
    let err = transport
        .call::<Value, Value>("session-stats", None)
        .await
        .unwrap_err();

    mock.assert_hits(1);
    assert!(matches!(err, RpcError::HttpStatus(401)));
}

#[tokio::test]
async fn malformed_answer() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).body("<html>not json</html>");
    });

    let transport = transport(&server, 100);
    let err = transport
        .call::<Value, Value>("session-stats", None)
        .await
        .unwrap_err();

    assert!(matches!(err, RpcError::Decoding(_)));
}

#[tokio::test]
async fn arguments_schema_mismatch() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200)
            .json_body(json!({"result": "success", "arguments": {"port-is-open": "yes"}, "tag": 100}));
    });

    #[derive(Debug, serde::Deserialize)]
    struct PortTest {
        #[serde(rename = "port-is-open")]
        _open: bool,
    }

    let transport = transport(&server, 100);
    let err = transport
        .call::<Value, PortTest>("port-test", None)
        .await
        .unwrap_err();

    assert!(matches!(err, RpcError::Decoding(_)));
}

#[test_log::test(tokio::test)]
async fn cancelled_during_retry_is_not_retried_again() {
    let server = MockServer::start_async().await;
    let rejected = server.mock(|when, then| {
        when.method(POST).path(PATH).header(SESSION_ID_HEADER, "");
        then.status(409).header(SESSION_ID_HEADER, "abc");
    });
    server.mock(|when, then| {
        when.method(POST).path(PATH).header(SESSION_ID_HEADER, "abc");
        then.status(200)
            .delay(Duration::from_secs(5))
            .json_body(json!({"result": "success", "tag": 100}));
    });

    let transport = transport(&server, 100);
    let err = transport
        .call_until::<Value, Value, _>(
            "session-stats",
            None,
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await
        .unwrap_err();

    rejected.assert_hits(1);
    assert!(matches!(err, RpcError::Cancelled));
    assert!(err.is_transport());
    assert_eq!(transport.session_token(), "abc");
}

#[tokio::test]
async fn timeout_is_a_transport_error() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200)
            .delay(Duration::from_secs(5))
            .json_body(json!({"result": "success", "tag": 100}));
    });

    let config = ClientConfig::new(server.url(PATH)).with_timeout(Duration::from_millis(200));
    let transport = seeded(&config, 100);
    let err = transport
        .call::<Value, Value>("session-stats", None)
        .await
        .unwrap_err();

    match err {
        RpcError::Transport(e) => assert!(e.is_timeout()),
        _ => panic!("Expected Transport error"),
    }
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let transport = seeded(&ClientConfig::new("http://127.0.0.1:1/transmission/rpc"), 100);
    let err = transport
        .call::<Value, Value>("session-stats", None)
        .await
        .unwrap_err();

    assert!(matches!(err, RpcError::Transport(_)));
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn concurrent_calls_use_distinct_tags() {
    let server = MockServer::start_async().await;
    let mocks: Vec<_> = (100..108)
        .map(|tag| {
            server.mock(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .json_body(json!({"method": "session-stats", "tag": tag}));
                then.status(200)
                    .json_body(json!({"result": "success", "arguments": {"tag": tag}, "tag": tag}));
            })
        })
        .collect();

    let transport = transport(&server, 100);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let transport = transport.clone();
            tokio::spawn(async move { transport.call::<Value, Value>("session-stats", None).await })
        })
        .collect();

    let mut tags = Vec::new();
    for handle in handles {
        let answer = handle.await.unwrap().unwrap();
        tags.push(answer["tag"].as_u64().unwrap());
    }
    tags.sort_unstable();

    assert_eq!(tags, (100..108).collect::<Vec<_>>());
    for mock in mocks {
        mock.assert_hits(1);
    }
}

#[tokio::test]
async fn typed_client_over_transport() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(PATH)
            .json_body(json!({"method": "free-space", "arguments": {"path": "/data"}, "tag": 100}));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": {"path": "/data", "size-bytes": 1024, "total_size": 4096},
            "tag": 100,
        }));
    });

    let client = TransmissionClient::from_transport(transport(&server, 100));
    let space = client.free_space("/data").await.unwrap();

    mock.assert();
    assert_eq!(space.free.bytes(), 1024);
    assert_eq!(client.transport().session_token(), "");
}
