//! In-process transport that replays canned responses.
//!
//! Used by the unit and integration tests, and handy for running the server
//! against fixture data without touching the network.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::{FetchError, HttpResponse, HttpTransport};

/// Per-URL response script.
///
/// Queued responses are served first, in order; once a URL's queue is empty
/// its fixed response (if any) is served on every call. Unknown URLs get 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    queued: Mutex<HashMap<String, VecDeque<Result<HttpResponse, FetchError>>>>,
    fixed: Mutex<HashMap<String, HttpResponse>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `status`/`body` for `url` on every call.
    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.fixed.lock().insert(
            url.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Serves `value` as a 200 JSON body for `url` on every call.
    pub fn respond_json(&self, url: &str, value: Value) {
        self.respond(url, 200, &value.to_string());
    }

    /// Queues one response with `status` and an empty body.
    pub fn push_status(&self, url: &str, status: u16) {
        self.push(
            url,
            Ok(HttpResponse {
                status,
                body: String::new(),
            }),
        );
    }

    /// Queues one transport-level failure.
    pub fn push_network_error(&self, url: &str, message: &str) {
        self.push(
            url,
            Err(FetchError::Transport {
                url: url.to_string(),
                message: message.to_string(),
            }),
        );
    }

    pub fn push(&self, url: &str, response: Result<HttpResponse, FetchError>) {
        self.queued
            .lock()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Every URL requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.calls.lock().push(url.to_string());

        if let Some(next) = self
            .queued
            .lock()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
        {
            return next;
        }

        Ok(self
            .fixed
            .lock()
            .get(url)
            .cloned()
            .unwrap_or(HttpResponse {
                status: 404,
                body: String::new(),
            }))
    }
}
