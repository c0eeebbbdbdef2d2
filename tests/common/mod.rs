//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use bastion::config::Config;
use bastion::http::connection::Connection;
use bastion::http::transaction::TransactionError;
use bastion::server::ServerContext;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const SIGNING_KEY: &str = "integration-test-key";
pub const LOGIN_BODY: &str = r#"{"username":"user0","password":"thepassword"}"#;

/// A server root in a temp dir with a few files in it.
pub fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    std::fs::write(dir.path().join("hello.txt"), "hello world").unwrap();
    std::fs::create_dir(dir.path().join("private")).unwrap();
    std::fs::write(dir.path().join("private").join("x"), "secret bytes").unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    dir
}

pub fn config_for(root: &Path) -> Config {
    let mut cfg = Config::default();
    cfg.server.root = root.to_path_buf();
    cfg.server.read_timeout_secs = 5;
    cfg.auth.signing_key = SIGNING_KEY.to_string();
    cfg
}

pub fn context(root: &Path) -> Arc<ServerContext> {
    Arc::new(ServerContext::from_config(&config_for(root)).unwrap())
}

/// Feeds `input` to a fresh connection, half-closes, and collects
/// everything the server wrote until it hung up.
pub async fn exchange(ctx: Arc<ServerContext>, input: &[u8]) -> (Result<usize, TransactionError>, Vec<u8>) {
    let (mut client, server) = tokio::io::duplex(1 << 20);
    let handle = tokio::spawn(Connection::new(server, ctx).run());

    let _ = client.write_all(input).await;
    let _ = client.shutdown().await;

    let mut output = Vec::new();
    client.read_to_end(&mut output).await.unwrap();
    (handle.await.unwrap(), output)
}

#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }
}

/// Splits a byte stream into responses framed by `Content-Length`.
pub fn replies(mut raw: &[u8]) -> Vec<Reply> {
    let mut out = Vec::new();
    while !raw.is_empty() {
        let head_end = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response head terminator");
        let head = std::str::from_utf8(&raw[..head_end]).unwrap();
        let mut lines = head.split("\r\n");

        let status_line = lines.next().unwrap();
        assert!(status_line.starts_with("HTTP/1.1 "), "status line: {}", status_line);
        let status = status_line[9..12].parse().unwrap();

        let headers: Vec<(String, String)> = lines
            .map(|l| {
                let (k, v) = l.split_once(": ").unwrap();
                (k.to_string(), v.to_string())
            })
            .collect();

        let len: usize = headers
            .iter()
            .find(|(k, _)| k == "Content-Length")
            .map(|(_, v)| v.parse().unwrap())
            .unwrap_or(0);

        let body_start = head_end + 4;
        out.push(Reply {
            status,
            headers,
            body: raw[body_start..body_start + len].to_vec(),
        });
        raw = &raw[body_start + len..];
    }
    out
}

pub fn get(path: &str, extra: &str) -> String {
    format!("GET {} HTTP/1.1\r\nHost: test\r\n{}\r\n", path, extra)
}

pub fn post(path: &str, body: &str, extra: &str) -> String {
    format!(
        "POST {} HTTP/1.1\r\nHost: test\r\nContent-Length: {}\r\n{}\r\n{}",
        path,
        body.len(),
        extra,
        body
    )
}
