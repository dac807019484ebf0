#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay_ms: u64,
}

impl MockResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into(), delay_ms: 0 }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: "{\"error\":\"mock\"}".to_string(), delay_ms: 0 }
    }

    pub fn delayed(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

#[derive(Default)]
struct Stats {
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// HTTP/1.1 server answering each connection from a fixed route table.
///
/// Paths are matched without the `/v0` prefix and `.json` suffix, so a route
/// for `/item/1` answers `GET /v0/item/1.json`. Unknown paths answer `null`
/// like upstream does for missing records.
pub struct MockServer {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    stats: Arc<Stats>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockServer {
    pub fn start(routes: Vec<(&str, MockResponse)>) -> Self {
        let routes: Arc<HashMap<String, MockResponse>> =
            Arc::new(routes.into_iter().map(|(path, response)| (path.to_string(), response)).collect());
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|err| panic!("failed to bind test server: {err}"));
        let addr =
            listener.local_addr().unwrap_or_else(|err| panic!("failed to read local addr: {err}"));
        listener
            .set_nonblocking(true)
            .unwrap_or_else(|err| panic!("failed to make listener nonblocking: {err}"));

        let stop = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(Stats::default());
        let handle = {
            let stop = Arc::clone(&stop);
            let stats = Arc::clone(&stats);
            thread::spawn(move || accept_loop(&listener, &routes, &stop, &stats))
        };

        Self { addr, stop, stats, handle: Some(handle) }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/v0", self.addr)
    }

    /// Request paths in arrival order, without prefix or suffix.
    pub fn requests(&self) -> Vec<String> {
        match self.stats.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn peak_in_flight(&self) -> usize {
        self.stats.peak.load(Ordering::SeqCst)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn accept_loop(
    listener: &TcpListener,
    routes: &Arc<HashMap<String, MockResponse>>,
    stop: &AtomicBool,
    stats: &Arc<Stats>,
) {
    while !stop.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, _)) => {
                let routes = Arc::clone(routes);
                let stats = Arc::clone(stats);
                thread::spawn(move || serve(stream, &routes, &stats));
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(2));
            }
            Err(_) => return,
        }
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut buffer = [0_u8; 4096];
    loop {
        match stream.read(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(read) => {
                request.extend_from_slice(&buffer[..read]);
                if request.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&request).to_string()
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

fn serve(mut stream: TcpStream, routes: &HashMap<String, MockResponse>, stats: &Stats) {
    let _ = stream.set_nonblocking(false);
    let request = read_request(&mut stream);
    let target = request.lines().next().unwrap_or_default().split_whitespace().nth(1).unwrap_or_default();
    let path = target.strip_prefix("/v0").unwrap_or(target);
    let path = path.strip_suffix(".json").unwrap_or(path).to_string();

    if let Ok(mut requests) = stats.requests.lock() {
        requests.push(path.clone());
    }
    let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    stats.peak.fetch_max(now, Ordering::SeqCst);

    let response = routes.get(&path).cloned().unwrap_or_else(|| MockResponse::json("null"));
    if response.delay_ms > 0 {
        thread::sleep(Duration::from_millis(response.delay_ms));
    }
    stats.in_flight.fetch_sub(1, Ordering::SeqCst);

    let payload = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason_phrase(response.status),
        response.body.len(),
        response.body
    );
    let _ = stream.write_all(payload.as_bytes());
    let _ = stream.flush();
}

pub fn story_json(id: u64, score: i64) -> String {
    format!(
        r#"{{"by":"author{id}","descendants":0,"id":{id},"score":{score},"time":1175714200,"title":"Story {id} &amp; friends","type":"story","url":"https://example.com/{id}"}}"#
    )
}

pub fn comment_json(id: u64, parent: u64) -> String {
    format!(
        r#"{{"by":"commenter","id":{id},"parent":{parent},"text":"I&#x27;m a comment","time":1314211127,"type":"comment"}}"#
    )
}
