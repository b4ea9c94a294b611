//! Tests for the D1 metadata backend against a canned HTTP responder.

use soundboard_core::{BlobKey, SoundEntry, SoundName};
use soundboard_database::{
    D1Config, D1MetadataService, MetadataErrorKind, MetadataOperation, MetadataService,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// The request the responder received.
struct CapturedRequest {
    head: String,
    body: String,
}

/// Answer exactly one HTTP request with the given status and body.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body = String::from_utf8_lossy(&buf[header_end..]).to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        let _ = tx.send(CapturedRequest {
            head,
            body: request_body,
        });
    });

    (format!("http://{addr}"), rx)
}

fn service(base_url: &str) -> D1MetadataService {
    let config = D1Config::builder()
        .account_id("acct")
        .database_id("db-1")
        .api_token("test-token")
        .base_url(base_url)
        .timeout_secs(5u64)
        .build()
        .unwrap();
    D1MetadataService::new(&config).unwrap()
}

fn entry(name: &str, key: &str) -> SoundEntry {
    SoundEntry::new(SoundName::new(name).unwrap(), BlobKey::new(key).unwrap())
}

#[tokio::test]
async fn test_list_sounds_decodes_rows() {
    let (base_url, captured) = serve_once(
        "200 OK",
        r#"{"success":true,"errors":[],"messages":[],"result":[{"success":true,"meta":{},"results":[{"name":"Red Flags","file_name":"rf.mp3"},{"name":"Horn","file_name":"horn.wav"}]}]}"#,
    )
    .await;

    let sounds = service(&base_url).list_sounds().await.unwrap();
    assert_eq!(
        sounds,
        vec![entry("Red Flags", "rf.mp3"), entry("Horn", "horn.wav")]
    );

    let request = captured.await.unwrap();
    assert!(request.head.starts_with("POST /accounts/acct/d1/database/db-1/query"));
    assert!(
        request
            .head
            .to_lowercase()
            .contains("authorization: bearer test-token")
    );
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["sql"], r#"SELECT name, file_name FROM "sounds";"#);
    assert_eq!(body["params"], serde_json::json!([]));
}

#[tokio::test]
async fn test_invalid_rows_are_skipped() {
    let (base_url, _captured) = serve_once(
        "200 OK",
        r#"{"success":true,"errors":[],"result":[{"success":true,"results":[{"name":"Red Flags","file_name":"rf.mp3"},{"name":"<script>","file_name":"x.mp3"}]}]}"#,
    )
    .await;

    let sounds = service(&base_url).list_sounds().await.unwrap();
    assert_eq!(sounds, vec![entry("Red Flags", "rf.mp3")]);
}

#[tokio::test]
async fn test_insert_sends_parameters() {
    let (base_url, captured) = serve_once(
        "200 OK",
        r#"{"success":true,"errors":[],"result":[{"success":true,"results":[]}]}"#,
    )
    .await;

    service(&base_url)
        .insert_sound(&entry("Red Flags", "rf.mp3"))
        .await
        .unwrap();

    let request = captured.await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        body["sql"],
        r#"INSERT INTO "sounds" (name, file_name) VALUES (?1, ?2);"#
    );
    assert_eq!(body["params"], serde_json::json!(["Red Flags", "rf.mp3"]));
}

#[tokio::test]
async fn test_unauthorized_is_unreachable() {
    let (base_url, _captured) = serve_once(
        "401 Unauthorized",
        r#"{"success":false,"errors":[{"code":10000,"message":"Authentication error"}],"result":null}"#,
    )
    .await;

    let err = service(&base_url).list_sounds().await.unwrap_err();
    assert!(matches!(
        err.kind,
        MetadataErrorKind::Unreachable {
            operation: MetadataOperation::List,
            ..
        }
    ));
}

#[tokio::test]
async fn test_bad_request_is_query_failure() {
    let (base_url, _captured) = serve_once(
        "400 Bad Request",
        r#"{"success":false,"errors":[{"code":7500,"message":"UNIQUE constraint failed: sounds.name"}],"result":[]}"#,
    )
    .await;

    let err = service(&base_url)
        .insert_sound(&entry("Red Flags", "rf.mp3"))
        .await
        .unwrap_err();
    match err.kind {
        MetadataErrorKind::QueryFailed { operation, reason } => {
            assert_eq!(operation, MetadataOperation::Insert);
            assert!(reason.contains("UNIQUE constraint failed"));
        }
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_query_failure() {
    let (base_url, _captured) = serve_once("200 OK", "<html>gateway</html>").await;

    let err = service(&base_url).list_sounds().await.unwrap_err();
    assert!(matches!(err.kind, MetadataErrorKind::QueryFailed { .. }));
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(&format!("http://{addr}"))
        .delete_sound(&SoundName::new("Red Flags").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind,
        MetadataErrorKind::Unreachable {
            operation: MetadataOperation::Delete,
            ..
        }
    ));
}
