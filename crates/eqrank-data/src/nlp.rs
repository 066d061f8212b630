//! Client for the sentence parse service.
//!
//! The service speaks JSON-RPC 2.0 over HTTP and exposes one method,
//! `parse`, taking the problem text. Its result is the parse object, or
//! that object encoded as a JSON string.

use std::sync::atomic::{AtomicU64, Ordering};

use eqrank_config::NlpConfig;
use eqrank_core::ParseResult;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{DataError, Result};

/// Produces the structured parse of a problem text.
pub trait SentenceParser {
    fn parse(&self, text: &str) -> Result<ParseResult>;
}

impl<P: SentenceParser + ?Sized> SentenceParser for &P {
    fn parse(&self, text: &str) -> Result<ParseResult> {
        (**self).parse(text)
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: [&'a str; 1],
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Blocking JSON-RPC client of the parse service.
#[derive(Debug)]
pub struct NlpClient {
    endpoint: String,
    client: Client,
    next_id: AtomicU64,
}

impl NlpClient {
    /// Creates a client for the configured endpoint.
    pub fn new(config: &NlpConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SentenceParser for NlpClient {
    fn parse(&self, text: &str) -> Result<ParseResult> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "parse",
            params: [text],
            id,
        };
        debug!(event = "nlp_request", id, chars = text.len());
        let response: RpcResponse = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;
        decode_response(response)
    }
}

fn decode_response(response: RpcResponse) -> Result<ParseResult> {
    if let Some(error) = response.error {
        return Err(DataError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    match response.result {
        Some(Value::String(encoded)) => Ok(serde_json::from_str(&encoded)?),
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Err(DataError::EmptyRpcResponse),
    }
}
