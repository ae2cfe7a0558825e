// ABOUTME: Integration tests for the health verifier.
// ABOUTME: Retry counting against a scripted local server, plus the all-fail path.

mod support;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use webroll::health::{HealthVerifier, check, fetch};

/// Serve one canned response per connection: `statuses[n]` for the n-th
/// request, the last entry once the list runs out.
async fn scripted_server(statuses: Vec<u16>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let status = statuses[n.min(statuses.len() - 1)];

            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok"
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (url, hits)
}

#[tokio::test]
async fn passes_on_second_attempt() {
    support::init_tracing();
    let (url, hits) = scripted_server(vec![503, 200]).await;

    let verifier =
        HealthVerifier::new(Duration::from_secs(2), 3).with_interval(Duration::from_millis(20));
    let verdict = verifier.verify(&url).await;

    assert!(verdict.passed);
    assert_eq!(verdict.attempts, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fails_after_all_attempts() {
    let (url, hits) = scripted_server(vec![500]).await;

    let verifier =
        HealthVerifier::new(Duration::from_secs(2), 3).with_interval(Duration::from_millis(10));
    let verdict = verifier.verify(&url).await;

    assert!(!verdict.passed);
    assert_eq!(verdict.attempts, 3);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn non_200_success_codes_do_not_count() {
    let (url, _) = scripted_server(vec![204]).await;
    let verifier =
        HealthVerifier::new(Duration::from_secs(1), 2).with_interval(Duration::from_millis(10));
    assert!(!verifier.check(&url).await);
}

#[tokio::test]
async fn check_passes_on_first_200() {
    let (url, hits) = scripted_server(vec![200]).await;
    assert!(check(&url, Duration::from_secs(2), 3).await);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn connection_refused_is_a_failed_attempt() {
    let port = support::free_port();
    let url = format!("http://127.0.0.1:{port}/");

    let verifier =
        HealthVerifier::new(Duration::from_millis(500), 2).with_interval(Duration::from_millis(10));
    let verdict = verifier.verify(&url).await;
    assert!(!verdict.passed);
    assert_eq!(verdict.attempts, 2);
}

#[tokio::test]
async fn fetch_times_out_on_silent_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    // Accept and hold connections without answering.
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let err = fetch(&url, Duration::from_millis(200)).await.unwrap_err();
    assert!(matches!(err, webroll::health::ProbeError::Timeout(_)), "{err}");
}
