//! Tests for the Ollama client against a canned local HTTP server.

use fabula_core::{Completion, GenerationOptions};
use fabula_interface::InferenceDriver;
use fabula_models::{BackendConfig, GenerateRequest, OllamaClient};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves a single canned HTTP response and records the request body.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, Arc<Mutex<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("No local address");
    let captured = Arc::new(Mutex::new(String::new()));
    let captured_clone = captured.clone();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        let request = read_request(&mut socket).await;
        *captured_clone.lock().unwrap() = request;

        let response = format!(
            "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("Failed to write response");
        socket.shutdown().await.ok();
    });

    (format!("http://{}", addr), captured)
}

/// Reads headers plus a Content-Length body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.expect("Failed to read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let lower = line.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return text[header_end + 4..].to_string();
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn client_for(base_url: String) -> OllamaClient {
    let config = BackendConfig::builder()
        .base_url(base_url)
        .model("gemma:2b")
        .timeout_secs(5u64)
        .build()
        .expect("Valid config");
    OllamaClient::new(config).expect("Failed to build client")
}

#[tokio::test]
async fn test_successful_completion_returns_text() {
    let (url, captured) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"model":"gemma:2b","response":"The lighthouse keeper woke.","done":true}"#,
    )
    .await;
    let client = client_for(url);

    let options = GenerationOptions::new(Some(256), Some(0.7));
    let completion = client.complete("Write an opening line.", &options).await;

    assert_eq!(
        completion,
        Completion::Text("The lighthouse keeper woke.".to_string())
    );

    let body: serde_json::Value =
        serde_json::from_str(&captured.lock().unwrap()).expect("Request was not JSON");
    assert_eq!(body["model"], "gemma:2b");
    assert_eq!(body["prompt"], "Write an opening line.");
    assert_eq!(body["stream"], false);
    assert_eq!(body["options"]["num_predict"], 256);
}

#[tokio::test]
async fn test_server_error_returns_empty() {
    let (url, _) = serve_once(
        "HTTP/1.1 500 Internal Server Error",
        r#"{"error":"model not loaded"}"#,
    )
    .await;
    let client = client_for(url);

    let completion = client
        .complete("Write an opening line.", &GenerationOptions::default())
        .await;

    assert!(completion.is_empty());
}

#[tokio::test]
async fn test_malformed_body_returns_empty() {
    let (url, _) = serve_once("HTTP/1.1 200 OK", "not json at all").await;
    let client = client_for(url);

    let completion = client
        .complete("Write an opening line.", &GenerationOptions::default())
        .await;

    assert!(completion.is_empty());
}

#[tokio::test]
async fn test_blank_response_is_empty() {
    let (url, _) = serve_once("HTTP/1.1 200 OK", r#"{"response":"   ","done":true}"#).await;
    let client = client_for(url);

    let completion = client
        .complete("Write an opening line.", &GenerationOptions::default())
        .await;

    assert_eq!(completion, Completion::Empty);
}

#[tokio::test]
async fn test_unreachable_backend_returns_empty() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);

    let client = client_for(format!("http://{}", addr));
    let completion = client
        .complete("Write an opening line.", &GenerationOptions::default())
        .await;

    assert!(completion.is_empty());
    assert!(client.ping().await.is_err());
}

#[tokio::test]
async fn test_silent_backend_times_out_to_empty() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("No local address");

    // Accept and read the request, then never answer
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        let _request = read_request(&mut socket).await;
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        drop(socket);
    });

    let config = BackendConfig::builder()
        .base_url(format!("http://{}", addr))
        .model("gemma:2b")
        .timeout_secs(1u64)
        .build()
        .expect("Valid config");
    let client = OllamaClient::new(config).expect("Failed to build client");

    let started = std::time::Instant::now();
    let completion = client
        .complete("Write an opening line.", &GenerationOptions::default())
        .await;

    assert_eq!(completion, Completion::Empty);
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}

#[tokio::test]
async fn test_ping_succeeds_against_running_server() {
    let (url, _) = serve_once("HTTP/1.1 200 OK", "Ollama is running").await;
    let client = client_for(url);

    client.ping().await.expect("Ping failed");
}

#[test]
fn test_request_omits_unset_options() {
    let request = GenerateRequest::new("gemma:2b", "prompt", &GenerationOptions::default());
    let json = serde_json::to_value(&request).expect("Failed to serialize");

    assert_eq!(json["stream"], false);
    assert!(json["options"].as_object().expect("options object").is_empty());
}

#[test]
fn test_driver_names() {
    let client = client_for("http://localhost:11434".to_string());
    assert_eq!(client.provider_name(), "ollama");
    assert_eq!(client.model_name(), "gemma:2b");
}

#[cfg(feature = "api")]
#[tokio::test]
async fn test_live_ollama_completion() {
    let client = OllamaClient::new(BackendConfig::default()).expect("Failed to build client");
    let completion = client
        .complete("Reply with one word.", &GenerationOptions::new(Some(16), None))
        .await;
    assert!(!completion.is_empty());
}
