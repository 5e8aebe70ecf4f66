use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;

use rax_auth_server::auth::password_digest;
use rax_auth_server::{Server, ServerConfig};
use tempfile::NamedTempFile;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

// Helper to write a credential store
fn credential_store(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn default_store() -> NamedTempFile {
    credential_store(&[
        format!("alice {}", password_digest("wonderland")),
        "malformedline".to_string(),
        format!("bob {}", password_digest("builder")),
    ])
}

// Start a server on an ephemeral port
async fn start_server(store: &Path, max_clients: usize) -> SocketAddr {
    let mut config = ServerConfig::new(store.to_string_lossy());
    config.port = 0;
    config.max_clients = max_clients;
    config.max_request_length = 64;

    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.start().await });
    addr
}

struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> (Self, String) {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read_half),
            writer,
        };
        let greeting = client.read_reply().await;
        (client, greeting)
    }

    async fn read_reply(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).await.unwrap();
        line.trim_end().to_string()
    }

    async fn send(&mut self, command: &str) -> String {
        self.writer
            .write_all(format!("{}\r\n", command).as_bytes())
            .await
            .unwrap();
        self.read_reply().await
    }
}

#[tokio::test]
async fn test_greeting() {
    let store = default_store();
    let addr = start_server(store.path(), 4).await;
    let (_client, greeting) = TestClient::connect(addr).await;
    assert_eq!(greeting, "220 Credential verification service ready");
}

#[tokio::test]
async fn test_user_pass_flow() {
    let store = default_store();
    let addr = start_server(store.path(), 4).await;
    let (mut client, _) = TestClient::connect(addr).await;

    assert_eq!(client.send("USER alice").await, "331 Password required for alice");
    assert_eq!(client.send("PASS wonderland").await, "230 User alice authenticated");

    assert_eq!(client.send("USER alice").await, "331 Password required for alice");
    assert_eq!(client.send("PASS wrongpass").await, "530 Authentication failed");

    assert_eq!(client.send("PASS wonderland").await, "503 Send USER first");
}

#[tokio::test]
async fn test_auth_single_request() {
    let store = default_store();
    let addr = start_server(store.path(), 4).await;
    let (mut client, _) = TestClient::connect(addr).await;

    assert_eq!(client.send("AUTH alice wonderland").await, "230 User alice authenticated");
    assert_eq!(client.send("auth carol anything").await, "530 Authentication failed");
}

#[tokio::test]
async fn test_records_after_malformed_line_never_match() {
    let store = default_store();
    let addr = start_server(store.path(), 4).await;
    let (mut client, _) = TestClient::connect(addr).await;

    assert_eq!(client.send("AUTH bob builder").await, "530 Authentication failed");
}

#[tokio::test]
async fn test_missing_store_is_distinguished_from_denial() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(&dir.path().join("users.txt"), 4).await;
    let (mut client, _) = TestClient::connect(addr).await;

    assert_eq!(client.send("USER alice").await, "331 Password required for alice");
    assert_eq!(client.send("PASS wonderland").await, "451 Credential store unavailable");
}

#[tokio::test]
async fn test_store_updates_apply_without_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.txt");
    let addr = start_server(&path, 4).await;
    let (mut client, _) = TestClient::connect(addr).await;

    assert_eq!(client.send("AUTH alice wonderland").await, "451 Credential store unavailable");

    std::fs::write(&path, format!("alice {}\n", password_digest("wonderland"))).unwrap();
    assert_eq!(client.send("AUTH alice wonderland").await, "230 User alice authenticated");
}

#[tokio::test]
async fn test_protocol_errors() {
    let store = default_store();
    let addr = start_server(store.path(), 4).await;
    let (mut client, _) = TestClient::connect(addr).await;

    assert_eq!(client.send("NOOP").await, "200 OK");
    assert_eq!(client.send("LIST").await, "500 Unknown command");
    assert_eq!(client.send("USER").await, "501 Missing argument: user");
    assert_eq!(client.send(&format!("USER {}", "x".repeat(100))).await, "500 Request too long");
}

#[tokio::test]
async fn test_quit_closes_connection() {
    let store = default_store();
    let addr = start_server(store.path(), 4).await;
    let (mut client, _) = TestClient::connect(addr).await;

    assert_eq!(client.send("QUIT").await, "221 Goodbye");

    let mut line = String::new();
    let n = client.reader.read_line(&mut line).await.unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_connection_limit() {
    let store = default_store();
    let addr = start_server(store.path(), 1).await;
    let (mut first, _) = TestClient::connect(addr).await;

    let (_second, reply) = TestClient::connect(addr).await;
    assert_eq!(reply, "421 Too many connections, try again later");

    assert_eq!(first.send("AUTH alice wonderland").await, "230 User alice authenticated");
}

#[tokio::test]
async fn test_oversized_request_is_dropped_and_connection_survives() {
    let store = default_store();
    let addr = start_server(store.path(), 4).await;
    let (mut client, _) = TestClient::connect(addr).await;

    let flood = vec![b'x'; 4 * 1024 * 1024];
    client.writer.write_all(&flood).await.unwrap();
    assert_eq!(client.send("").await, "500 Request too long");

    assert_eq!(client.send("NOOP").await, "200 OK");
    assert_eq!(client.send("AUTH alice wonderland").await, "230 User alice authenticated");
}

#[tokio::test]
async fn test_non_utf8_request_gets_a_reply() {
    let store = default_store();
    let addr = start_server(store.path(), 4).await;
    let (mut client, _) = TestClient::connect(addr).await;

    client.writer.write_all(b"AUTH alice wonder\xffland\r\n").await.unwrap();
    assert_eq!(client.read_reply().await, "530 Authentication failed");

    client.writer.write_all(b"\xfe\xff\r\n").await.unwrap();
    assert_eq!(client.read_reply().await, "500 Unknown command");

    assert_eq!(client.send("NOOP").await, "200 OK");
}
