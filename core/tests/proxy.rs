//! Proxy routing: an explicit proxy, one discovered from the environment,
//! and the direct path when the environment names none.
//!
//! # Design
//! The stand-in server answers both proxy styles: absolute-form requests
//! (`GET http://host/path`) and `CONNECT` tunnels followed by an
//! origin-form request. It reports each request head it receives so the
//! test can check where the client sent it.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use kwikdesk_core::{BlockingClient, ClientConfig, KwikDeskClient, Transport};
use serial_test::serial;

const PROXY_VARS: [&str; 6] = [
    "ALL_PROXY",
    "all_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "HTTP_PROXY",
    "http_proxy",
];

/// Start a server that answers every request with `{"timestamp": 42}`.
/// Returns its base URL and a channel of received request heads.
fn start_server() -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            let tx = tx.clone();
            thread::spawn(move || serve(stream, tx));
        }
    });

    (format!("http://{addr}"), rx)
}

fn serve(stream: TcpStream, tx: Sender<String>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = stream;

    let mut head = read_head(&mut reader);
    if head.starts_with("CONNECT ") {
        writer
            .write_all(b"HTTP/1.1 200 Connection established\r\n\r\n")
            .unwrap();
        head = format!("{head}{}", read_head(&mut reader));
    }
    if head.is_empty() {
        return;
    }
    let _ = tx.send(head);

    let body = r#"{"timestamp":42}"#;
    let response = format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = writer.write_all(response.as_bytes());
}

fn read_head(reader: &mut impl BufRead) -> String {
    let mut head = String::new();
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line == "\r\n" => break,
            Ok(_) => head.push_str(&line),
        }
    }
    head
}

fn platform_client(transport: Transport) -> BlockingClient {
    BlockingClient::with_executor(
        KwikDeskClient::with_config(
            ClientConfig::with_base_url("http://platform.invalid"),
            "tok",
        ),
        transport,
    )
}

/// Restores the proxy variables on drop.
struct ProxyEnv(Vec<(&'static str, Option<String>)>);

impl ProxyEnv {
    fn cleared() -> Self {
        let saved = PROXY_VARS
            .iter()
            .map(|&name| (name, std::env::var(name).ok()))
            .collect();
        for name in PROXY_VARS {
            std::env::remove_var(name);
        }
        ProxyEnv(saved)
    }
}

impl Drop for ProxyEnv {
    fn drop(&mut self) {
        for (name, value) in &self.0 {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

fn assert_reached_via_proxy(head: &str) {
    let lower = head.to_ascii_lowercase();
    assert!(lower.contains("platform.invalid"), "target host missing: {head}");
    assert!(head.contains("/server-time"), "path missing: {head}");
    assert!(lower.contains("x-api-token: tok"), "token header missing: {head}");
}

#[test]
fn explicit_proxy_receives_requests() {
    let (proxy_url, heads) = start_server();
    let proxy = ureq::Proxy::new(&proxy_url).unwrap();
    let client = platform_client(Transport::with_proxy(Some(proxy)));

    let time = client.server_time().unwrap();
    assert_eq!(time["timestamp"], 42);

    let head = heads.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_reached_via_proxy(&head);
}

#[test]
#[serial]
fn proxy_is_discovered_from_environment() {
    let (proxy_url, heads) = start_server();
    let _env = ProxyEnv::cleared();
    std::env::set_var("ALL_PROXY", &proxy_url);

    let client = platform_client(Transport::from_env());
    let time = client.server_time().unwrap();
    assert_eq!(time["timestamp"], 42);

    let head = heads.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_reached_via_proxy(&head);
}

#[test]
#[serial]
fn no_proxy_in_environment_goes_direct() {
    let (server_url, heads) = start_server();
    let _env = ProxyEnv::cleared();

    let client = BlockingClient::with_executor(
        KwikDeskClient::with_config(ClientConfig::with_base_url(&server_url), "tok"),
        Transport::from_env(),
    );
    let time = client.server_time().unwrap();
    assert_eq!(time["timestamp"], 42);

    let head = heads.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(head.starts_with("GET /server-time "), "expected origin-form: {head}");
}
