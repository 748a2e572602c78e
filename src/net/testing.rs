//! In-memory transport and navigator doubles for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::api::ApiClient;
use super::config::ApiConfig;
use super::request::ApiRequest;
use super::transport::{PageNavigator, RawResponse, Transport, TransportError};

pub const TEST_BASE_URL: &str = "http://backend.test";

/// Records every request and replays queued outcomes in order.
///
/// When the queue runs dry it answers `200 {}`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    outcomes: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
}

impl RecordingTransport {
    pub fn push(&self, outcome: Result<RawResponse, TransportError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push(Ok(RawResponse::new(status, body.to_string())));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> ApiRequest {
        self.requests().pop().expect("no request recorded")
    }
}

#[async_trait(?Send)]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::new(200, "{}")))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl PageNavigator for RecordingNavigator {
    fn hard_navigate(&self, href: &str) {
        self.visits.lock().unwrap().push(href.to_owned());
    }
}

/// Client against [`TEST_BASE_URL`] plus handles to both doubles.
pub fn client() -> (ApiClient, Arc<RecordingTransport>, Arc<RecordingNavigator>) {
    let transport = Arc::new(RecordingTransport::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let client = ApiClient::new(ApiConfig::new(TEST_BASE_URL), transport.clone(), navigator.clone());
    (client, transport, navigator)
}
