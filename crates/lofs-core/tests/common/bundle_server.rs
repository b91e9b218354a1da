//! Minimal HTTP/1.1 server that serves one static bundle for integration tests.
//!
//! Every GET returns the same body. Options inject slow responses, leading
//! failures, a missing Content-Length and pre-encoded bodies; a shared
//! counter records how many requests actually reached the server.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct BundleServerOptions {
    /// The first `fail_first` requests get `fail_status` and no body.
    pub fail_first: usize,
    pub fail_status: u16,
    /// The first `delay_first` requests wait `delay` before responding.
    pub delay_first: usize,
    pub delay: Duration,
    /// If true, omit Content-Length and close the connection to end the body.
    pub omit_length: bool,
    /// Sent as `Content-Encoding`; the body must already be encoded.
    pub content_encoding: Option<&'static str>,
    /// Sent as `X-Decompressed-Content-Length`.
    pub decoded_length: Option<usize>,
    /// Body is written in chunks of this size with `chunk_pause` between them.
    pub chunk_size: usize,
    pub chunk_pause: Duration,
}

impl Default for BundleServerOptions {
    fn default() -> Self {
        Self {
            fail_first: 0,
            fail_status: 503,
            delay_first: 0,
            delay: Duration::ZERO,
            omit_length: false,
            content_encoding: None,
            decoded_length: None,
            chunk_size: 64 * 1024,
            chunk_pause: Duration::ZERO,
        }
    }
}

pub struct BundleServer {
    /// Origin, e.g. "http://127.0.0.1:12345/".
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl BundleServer {
    /// URL of the bundle at its static path below the origin.
    pub fn bundle_url(&self) -> String {
        format!("{}data/encrypted_notes.dat", self.base_url)
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `body`. It runs until the process exits.
pub fn start(body: Vec<u8>) -> BundleServer {
    start_with_options(body, BundleServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: BundleServerOptions) -> BundleServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, &body, &counter, opts));
        }
    });
    BundleServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(mut stream: TcpStream, body: &[u8], hits: &AtomicUsize, opts: BundleServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let method = request.split_whitespace().next().unwrap_or("");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    let seq = hits.fetch_add(1, Ordering::SeqCst);
    if seq < opts.delay_first {
        thread::sleep(opts.delay);
    }
    if seq < opts.fail_first {
        let response = format!(
            "HTTP/1.1 {} Injected\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            opts.fail_status
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let mut head = String::from("HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\n");
    if !opts.omit_length {
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    if let Some(encoding) = opts.content_encoding {
        head.push_str(&format!("Content-Encoding: {}\r\n", encoding));
    }
    if let Some(decoded) = opts.decoded_length {
        head.push_str(&format!("X-Decompressed-Content-Length: {}\r\n", decoded));
    }
    head.push_str("\r\n");
    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }
    for chunk in body.chunks(opts.chunk_size.max(1)) {
        if stream.write_all(chunk).is_err() {
            return;
        }
        let _ = stream.flush();
        if !opts.chunk_pause.is_zero() {
            thread::sleep(opts.chunk_pause);
        }
    }
}
