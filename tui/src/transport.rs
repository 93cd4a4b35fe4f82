//! HTTP execution for requests built by the core.
//!
//! The core describes requests as plain data; this module is the host side
//! of that split. The `Transport` trait exists so tests can substitute a
//! recording fake for the real network.

use std::fmt;

use mytodo_core::{HttpMethod, HttpRequest, HttpResponse};

/// A transport-level failure: the request never produced an HTTP response.
#[derive(Debug)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TransportError {}

pub trait Transport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// ureq-backed transport.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match req.method {
            HttpMethod::Get | HttpMethod::Delete => {
                let mut builder = match req.method {
                    HttpMethod::Get => self.agent.get(&req.url),
                    _ => self.agent.delete(&req.url),
                };
                for (name, value) in &req.headers {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = match req.method {
                    HttpMethod::Post => self.agent.post(&req.url),
                    _ => self.agent.put(&req.url),
                };
                for (name, value) in &req.headers {
                    builder = builder.header(name, value);
                }
                builder.send(req.body.as_deref().unwrap_or("").as_bytes())
            }
        };

        let mut response = result.map_err(|e| TransportError(e.to_string()))?;
        Ok(HttpResponse {
            status: response.status().as_u16(),
            body: response
                .body_mut()
                .read_to_string()
                .map_err(|e| TransportError(e.to_string()))?,
        })
    }
}
