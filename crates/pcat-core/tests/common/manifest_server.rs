//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every request with the same status and body, optionally after a
//! delay (to trigger client timeouts). Counts the requests it has seen.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: &'static str,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl Response {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: "200 OK",
            body: body.into(),
            delay: None,
        }
    }

    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            body: Vec::new(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Running server. Lives until the process exits.
pub struct ManifestServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    response: Arc<Mutex<Response>>,
}

impl ManifestServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Change what subsequent requests receive.
    pub fn set_response(&self, response: Response) {
        *self.response.lock().unwrap() = response;
    }
}

/// Starts a server in a background thread. The URL points at `/repository_stats.json`.
pub fn start(response: Response) -> ManifestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let response = Arc::new(Mutex::new(response));
    {
        let hits = Arc::clone(&hits);
        let response = Arc::clone(&response);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                hits.fetch_add(1, Ordering::SeqCst);
                let current = response.lock().unwrap().clone();
                thread::spawn(move || handle(stream, &current));
            }
        });
    }
    ManifestServer {
        url: format!("http://127.0.0.1:{}/repository_stats.json", port),
        hits,
        response,
    }
}

/// URL on a port nobody listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/repository_stats.json", port)
}

fn handle(mut stream: std::net::TcpStream, response: &Response) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    if let Some(delay) = response.delay {
        thread::sleep(delay);
    }
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&response.body);
}
