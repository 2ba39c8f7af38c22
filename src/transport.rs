//! HTTP delivery of chat requests.
//!
//! [`ChatTransport`] is the seam between the pipeline and the network; the
//! pipeline only sees a response body or an error, never a retry.

use crate::error::{Error, Result};
use crate::request::ChatRequest;
use reqwest::header::CONTENT_TYPE;
use std::fmt;
use tracing::{debug, trace};

/// Sends a chat request and returns the raw response body.
///
/// Implementations must report non-2xx answers and connection failures
/// as errors; they never retry.
pub trait ChatTransport {
    /// Sends `request` and returns the response body of a 2xx answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the status is not 2xx.
    fn send(&self, request: &ChatRequest) -> Result<String>;
}

impl<T: ChatTransport + ?Sized> ChatTransport for &T {
    fn send(&self, request: &ChatRequest) -> Result<String> {
        (**self).send(request)
    }
}

/// Blocking HTTP transport with bearer-token authorization.
pub struct HttpTransport {
    endpoint: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport for `endpoint` using the client's default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::transport(&endpoint, &e))?;

        Ok(Self {
            endpoint,
            api_key: api_key.into(),
            client,
        })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ChatTransport for HttpTransport {
    fn send(&self, request: &ChatRequest) -> Result<String> {
        debug!("POST {} (model {})", self.endpoint, request.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| Error::transport(&self.endpoint, &e))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::transport(&self.endpoint, &e))?;

        trace!("Endpoint answered {} with {} bytes", status, body.len());

        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Instruction;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serves exactly one HTTP exchange and returns the raw request text.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0_u8; 4096];

            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);

                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            String::from_utf8_lossy(&raw).to_string()
        });

        (endpoint, handle)
    }

    fn sample_request() -> ChatRequest {
        ChatRequest::compose(&Instruction::compose("RULES", ""), "gpt-4o", "openapi: 3.0.0")
    }

    #[test]
    fn test_send_returns_body_on_success() {
        let (endpoint, server) = serve_once("200 OK", r#"{"choices":[]}"#);
        let transport = HttpTransport::new(endpoint, "sk-test").unwrap();

        let body = transport.send(&sample_request()).unwrap();
        assert_eq!(body, r#"{"choices":[]}"#);

        let raw = server.join().unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(raw.starts_with("POST /v1/chat/completions"));
        assert!(lower.contains("authorization: bearer sk-test"));
        assert!(lower.contains("content-type: application/json"));
        assert!(raw.contains(r#""temperature":0.7"#));
        assert!(raw.contains(r#""role":"system""#));
    }

    #[test]
    fn test_send_fails_on_non_success_status() {
        let (endpoint, server) = serve_once("429 Too Many Requests", r#"{"error":"slow down"}"#);
        let transport = HttpTransport::new(endpoint, "sk-test").unwrap();

        let err = transport.send(&sample_request()).unwrap_err();
        server.join().unwrap();

        assert!(err.is_transport());
        match err {
            Error::HttpStatus { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("slow down"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_send_fails_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());
        drop(listener);

        let transport = HttpTransport::new(endpoint, "sk-test").unwrap();
        let err = transport.send(&sample_request()).unwrap_err();

        assert!(matches!(err, Error::Transport { .. }));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let transport = HttpTransport::new("http://localhost/v1", "sk-secret").unwrap();
        let debug = format!("{transport:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("http://localhost/v1"));
    }
}
