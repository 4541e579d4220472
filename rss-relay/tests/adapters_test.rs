use rss_relay::{
    DirectorySource, FetchConfig, Fetcher, Notifier, OpmlResolver, RelayError, SnapshotSource,
    TelegramConfig, TelegramNotifier,
};
use std::net::SocketAddr;
use std::sync::Once;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .try_init()
            .ok();
    });
}

/// Nothing listens on port 1, so connections are refused straight away.
const REFUSED: &str = "http://127.0.0.1:1";

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>BlogX</title>
    <link>https://blogx.example</link>
    <description>Posts</description>
    <item><title>Post B</title><link>https://blogx.example/b</link></item>
    <item><title>Post A</title><link>https://blogx.example/a</link></item>
  </channel>
</rss>
"#;

const OPML: &str = r#"<?xml version="1.0"?>
<opml version="1.0"><body>
  <outline text="Blog A" xmlUrl="https://a.example/feed" />
</body></opml>
"#;

/// Serve every incoming request with the same canned response.
async fn serve(status: &'static str, content_type: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut stream).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    content_type,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    addr
}

/// Read headers and the declared body so the client never sees a reset.
async fn read_request(stream: &mut TcpStream) {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);

        let Some(header_end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&data[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if data.len() >= header_end + 4 + content_length {
            return;
        }
    }
}

fn telegram(api_base: String, send_delay: Duration) -> TelegramNotifier {
    TelegramNotifier::new(
        TelegramConfig {
            bot_token: Some("123:abc".to_string()),
            chat_id: Some("@channel".to_string()),
            api_base,
        },
        send_delay,
    )
    .unwrap()
}

#[tokio::test]
async fn test_telegram_rejected_message_is_delivery_failure() {
    init_tracing();
    let addr = serve(
        "400 Bad Request",
        "application/json",
        r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
    )
    .await;
    let send_delay = Duration::from_millis(200);
    let notifier = telegram(format!("http://{}", addr), send_delay);

    match notifier.send("hello").await {
        Err(RelayError::DeliveryFailed(reason)) => assert!(reason.contains("400"), "{}", reason),
        other => panic!("expected DeliveryFailed, got {:?}", other.map(|_| ())),
    }

    let started = Instant::now();
    notifier.notify("hello").await;
    assert!(started.elapsed() >= send_delay);
}

#[tokio::test]
async fn test_telegram_reply_without_ok_is_delivery_failure() {
    init_tracing();
    let addr = serve(
        "200 OK",
        "application/json",
        r#"{"ok":false,"description":"Forbidden: bot was kicked"}"#,
    )
    .await;
    let notifier = telegram(format!("http://{}", addr), Duration::ZERO);

    match notifier.send("hello").await {
        Err(RelayError::DeliveryFailed(reason)) => {
            assert!(reason.contains("bot was kicked"), "{}", reason)
        }
        other => panic!("expected DeliveryFailed, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_telegram_accepted_message_is_sent() {
    init_tracing();
    let addr = serve("200 OK", "application/json", r#"{"ok":true,"result":{}}"#).await;
    let notifier = telegram(format!("http://{}", addr), Duration::ZERO);

    assert!(notifier.send("hello").await.is_ok());
}

#[tokio::test]
async fn test_telegram_unreachable_api_is_swallowed_and_still_waits() {
    init_tracing();
    let send_delay = Duration::from_millis(200);
    let notifier = telegram(REFUSED.to_string(), send_delay);

    match notifier.send("hello").await {
        Err(RelayError::DeliveryFailed(reason)) => {
            assert!(!reason.contains("123:abc"), "token leaked: {}", reason)
        }
        other => panic!("expected DeliveryFailed, got {:?}", other.map(|_| ())),
    }

    let started = Instant::now();
    notifier.notify("hello").await;
    assert!(started.elapsed() >= send_delay);
}

#[tokio::test]
async fn test_fetch_of_unreachable_feed_is_empty_snapshot() {
    init_tracing();
    let fetcher = Fetcher::new(FetchConfig::default()).unwrap();
    let endpoint = format!("{}/feed", REFUSED);

    let snapshot = fetcher.fetch(&endpoint).await;

    assert_eq!(snapshot.endpoint, endpoint);
    assert!(snapshot.entries.is_empty());
    assert!(snapshot.error.is_some());
    assert!(!snapshot.is_success());
}

#[tokio::test]
async fn test_fetch_of_invalid_endpoint_is_empty_snapshot() {
    init_tracing();
    let fetcher = Fetcher::new(FetchConfig::default()).unwrap();

    let snapshot = fetcher.fetch("not a url").await;

    assert!(snapshot.entries.is_empty());
    let error = snapshot.error.expect("invalid endpoint should be reported");
    assert!(error.contains("Invalid URL"), "{}", error);
}

#[tokio::test]
async fn test_fetch_of_non_feed_body_is_empty_snapshot() {
    init_tracing();
    let addr = serve("200 OK", "text/html", "<html><body>not a feed</body></html>").await;
    let fetcher = Fetcher::new(FetchConfig::default()).unwrap();

    let snapshot = fetcher.fetch(&format!("http://{}/feed", addr)).await;

    assert!(snapshot.entries.is_empty());
    assert!(snapshot.error.is_some());
}

#[tokio::test]
async fn test_fetch_of_http_error_is_empty_snapshot() {
    init_tracing();
    let addr = serve("404 Not Found", "text/plain", "gone").await;
    let fetcher = Fetcher::new(FetchConfig::default()).unwrap();

    let snapshot = fetcher.fetch(&format!("http://{}/feed", addr)).await;

    assert!(snapshot.entries.is_empty());
    assert!(snapshot.error.is_some());
}

#[tokio::test]
async fn test_fetch_reads_feed_with_huge_size_limit() {
    init_tracing();
    let addr = serve("200 OK", "application/rss+xml", RSS).await;
    let fetcher = Fetcher::new(FetchConfig {
        max_feed_size_mb: usize::MAX,
        ..FetchConfig::default()
    })
    .unwrap();

    let snapshot = fetcher.fetch(&format!("http://{}/feed", addr)).await;

    assert!(snapshot.is_success(), "{:?}", snapshot.error);
    assert_eq!(snapshot.identity(), "BlogX");
    let titles: Vec<&str> = snapshot.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Post B", "Post A"]);
}

#[tokio::test]
async fn test_resolver_of_unreachable_document_is_empty() {
    init_tracing();
    let fetcher = Fetcher::new(FetchConfig::default()).unwrap();
    let resolver = OpmlResolver::new(fetcher, format!("{}/subs.opml", REFUSED));

    assert!(matches!(
        resolver.try_resolve().await,
        Err(RelayError::SourceUnavailable { .. })
    ));
    assert!(resolver.resolve().await.is_empty());
}

#[tokio::test]
async fn test_resolver_reads_served_document() {
    init_tracing();
    let addr = serve("200 OK", "text/x-opml", OPML).await;
    let fetcher = Fetcher::new(FetchConfig::default()).unwrap();
    let resolver = OpmlResolver::new(fetcher, format!("http://{}/subs.opml", addr));

    assert_eq!(
        resolver.resolve().await,
        vec!["https://a.example/feed".to_string()]
    );
}
