use http_kit::{Http, HttpConfig, HttpError, Result, StringCallback};
use httpmock::prelude::*;
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn client() -> Http {
    Http::new(HttpConfig::default()).unwrap()
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

/// Counts every notification and forwards the outcome to the test thread.
struct CountingCallback {
    calls: Arc<AtomicUsize>,
    tx: mpsc::Sender<std::result::Result<String, String>>,
}

impl StringCallback for CountingCallback {
    fn completed(self: Box<Self>, body: String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tx.send(Ok(body)).unwrap();
    }

    fn failed(self: Box<Self>, error: HttpError) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tx.send(Err(error.to_string())).unwrap();
    }
}

#[test]
fn test_get_async_completes_with_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/items").query_param("page", "3");
        then.status(200).body("page three");
    });

    let http = client();
    let (tx, rx) = mpsc::channel();
    http.get_async(&server.url("/items"), [("page", "3")], move |result: Result<String>| {
        tx.send(result.map_err(|e| e.to_string())).unwrap();
    });

    let outcome = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(outcome, Ok("page three".to_string()));
    mock.assert();
}

#[test]
fn test_post_async_sends_form() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/submit")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("name=a+b&score=10");
        then.status(200).body("accepted");
    });

    let http = client();
    let (tx, rx) = mpsc::channel();
    http.post_async(
        &server.url("/submit"),
        [("name", "a b"), ("score", "10")],
        move |result: Result<String>| {
            tx.send(result.map_err(|e| e.to_string())).unwrap();
        },
    );

    assert_eq!(rx.recv_timeout(WAIT).unwrap(), Ok("accepted".to_string()));
    mock.assert();
}

#[test]
fn test_callback_fires_exactly_once_on_success() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/once");
        then.status(200).body("done");
    });

    let http = client();
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();
    http.get_async(
        &server.url("/once"),
        [("k", "v")],
        CountingCallback {
            calls: calls.clone(),
            tx,
        },
    );

    assert_eq!(rx.recv_timeout(WAIT).unwrap(), Ok("done".to_string()));
    thread::sleep(Duration::from_millis(200));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    // the sender was dropped along with the callback
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn test_failed_fires_once_on_connection_error() {
    let http = client();
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();
    http.post_async(
        &closed_port_url(),
        [("a", "1")],
        CountingCallback {
            calls: calls.clone(),
            tx,
        },
    );

    let outcome = rx.recv_timeout(WAIT).unwrap();
    assert!(outcome.is_err());
    thread::sleep(Duration::from_millis(200));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_error_status_completes_not_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/teapot");
        then.status(418).body("short and stout");
    });

    let http = client();
    let (tx, rx) = mpsc::channel();
    http.get_async(&server.url("/teapot"), [("x", "y")], move |result: Result<String>| {
        tx.send(result.is_ok()).unwrap();
    });

    assert!(rx.recv_timeout(WAIT).unwrap());
}

#[test]
fn test_many_requests_each_call_back_once() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/bulk");
        then.status(200).body("ok");
    });

    let http = client();
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();
    for i in 0..10 {
        let id = i.to_string();
        http.get_async(
            &server.url("/bulk"),
            [("id", id.as_str())],
            CountingCallback {
                calls: calls.clone(),
                tx: tx.clone(),
            },
        );
    }
    drop(tx);

    let outcomes: Vec<_> = (0..10).map(|_| rx.recv_timeout(WAIT).unwrap()).collect();
    assert!(outcomes.iter().all(|o| o.as_deref() == Ok("ok")));
    assert_eq!(calls.load(Ordering::SeqCst), 10);
    mock.assert_hits(10);
}

#[test]
fn test_dropping_client_mid_request_fails_callback_once() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/slow");
        then.status(200).body("late").delay(Duration::from_millis(500));
    });

    let http = client();
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();
    http.get_async(
        &server.url("/slow"),
        [("a", "1")],
        CountingCallback {
            calls: calls.clone(),
            tx,
        },
    );
    thread::sleep(Duration::from_millis(100));
    drop(http);

    let outcome = rx.recv_timeout(Duration::from_secs(3)).unwrap();
    assert_eq!(
        outcome,
        Err("Request was cancelled before it completed".to_string())
    );
    thread::sleep(Duration::from_millis(700));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_callback_client_usable_from_async_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/async-post").body("x=1");
            then.status(200).body("async ok");
        })
        .await;

    let http = client();
    let (tx, rx) = tokio::sync::oneshot::channel();
    http.post_async(&server.url("/async-post"), [("x", "1")], move |result: Result<String>| {
        let _ = tx.send(result.map_err(|e| e.to_string()));
    });

    let outcome = tokio::time::timeout(WAIT, rx).await.unwrap().unwrap();
    assert_eq!(outcome, Ok("async ok".to_string()));
    // dropped on a runtime thread
    drop(http);
}
