//! Minimal HTTP/1.1 server that serves image bodies by path for integration tests.
//!
//! Counts GET requests per path (query included) and answers 500 for paths
//! registered as failing, 404 for unknown paths.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Default, Clone)]
pub struct ImageServerOptions {
    /// Path (with query) → body.
    pub images: HashMap<String, Vec<u8>>,
    /// Paths that always answer 500.
    pub failing: Vec<String>,
}

impl ImageServerOptions {
    pub fn image(mut self, path: &str, body: &[u8]) -> Self {
        self.images.insert(path.to_string(), body.to_vec());
        self
    }

    pub fn failing(mut self, path: &str) -> Self {
        self.failing.push(path.to_string());
        self
    }
}

/// Handle to a running server. The server runs until the process exits.
#[derive(Clone)]
pub struct ImageServer {
    base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl ImageServer {
    /// Full URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// GET requests seen for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    /// GET requests seen for any path.
    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

/// Starts a server in a background thread.
pub fn start(opts: ImageServerOptions) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let server = ImageServer {
        base: format!("http://127.0.0.1:{}", port),
        hits: Arc::clone(&hits),
    };
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = Arc::clone(&opts);
            let hits = Arc::clone(&hits);
            thread::spawn(move || handle(stream, &opts, &hits));
        }
    });
    server
}

fn handle(
    mut stream: std::net::TcpStream,
    opts: &ImageServerOptions,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
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
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/").to_string();

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    if opts.failing.contains(&path) {
        let _ = stream.write_all(
            b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }
    match opts.images.get(&path) {
        Some(body) => {
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        }
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
}
