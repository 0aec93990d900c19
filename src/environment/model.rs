use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
pub use reqwest::Method;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::error::{GatewayError, Result};
use super::repository::Config;
use super::types::{Envelope, Event, EventId, Trip, TripDay, TripDayId, TripFilter, TripId};

/// What goes over the wire. `path` is relative to the server url.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Value,
    pub query_params: Vec<(String, String)>,
    pub form_params: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Value::Null,
            query_params: Vec::new(),
            form_params: Vec::new(),
        }
    }

    pub fn with_body<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = serde_json::to_value(body)?;
        Ok(self)
    }
}

/// The opaque request / response boundary. Resolves to the decoded JSON body,
/// fails for anything that isn't a successful response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, request: Request) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::invalid_request(format!("{base_url}: {e}")))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        // `Url::join` would drop the `/api` prefix for absolute paths
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| GatewayError::invalid_request(format!("{joined}: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, request: Request) -> Result<Value> {
        let url = self.url_for(&request.path)?;
        let mut builder = self.client.request(request.method.clone(), url);
        if !request.query_params.is_empty() {
            builder = builder.query(&request.query_params);
        }
        if !request.form_params.is_empty() {
            builder = builder.form(&request.form_params);
        } else if !request.body.is_null() {
            builder = builder.json(&request.body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            log::debug!("{} {} answered {status}", request.method, request.path);
        }
        read_body(status, &text)
    }
}

/// Successful responses must be JSON. Rejections may be anything (a proxy's
/// HTML page, plain text) and only give up their `error` field if they have one.
fn read_body(status: StatusCode, text: &str) -> Result<Value> {
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|body| body.get("error")?.as_str().map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        return Err(GatewayError::api(status.as_u16(), message));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(GatewayError::malformed)
}

/// The remote trip gateway. No retries, no caching, one call per method.
#[derive(Clone)]
pub struct Model {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model").finish()
    }
}

impl Model {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn http(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(
            &config.server_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub async fn trip_list(&self, filter: &TripFilter) -> Result<Envelope<Vec<Trip>>> {
        self.fetch(Request::new(Method::POST, "/trip").with_body(filter)?)
            .await
    }

    pub async fn trip_detail(&self, id: TripId) -> Result<Envelope<Trip>> {
        self.fetch(Request::new(Method::GET, format!("/trip/{id}")))
            .await
    }

    pub async fn create_trip(&self, trip: &Trip) -> Result<Envelope<Trip>> {
        self.mutate(Request::new(Method::POST, "/trip/create").with_body(trip)?)
            .await
    }

    pub async fn create_trip_day(&self, day: &TripDay) -> Result<Envelope<TripDay>> {
        self.mutate(Request::new(Method::POST, "/trip/day/create").with_body(day)?)
            .await
    }

    pub async fn update_trip(&self, trip: &Trip) -> Result<Envelope<Trip>> {
        self.mutate(Request::new(Method::PUT, "/trip/update").with_body(trip)?)
            .await
    }

    pub async fn update_trip_day(&self, day: &TripDay) -> Result<Envelope<TripDay>> {
        self.mutate(Request::new(Method::PUT, "/trip/day/update").with_body(day)?)
            .await
    }

    pub async fn delete_trip_day(&self, id: TripDayId) -> Result<Envelope<Value>> {
        self.mutate(Request::new(Method::DELETE, format!("/trip/day/{id}")))
            .await
    }

    pub async fn create_trip_event(&self, trip_id: TripId, event: &Event) -> Result<Envelope<Event>> {
        let path = format!("/trip/{trip_id}/event/create");
        self.mutate(Request::new(Method::POST, path).with_body(event)?)
            .await
    }

    pub async fn delete_trip_event(
        &self,
        trip_id: TripId,
        event_id: EventId,
    ) -> Result<Envelope<Value>> {
        let path = format!("/trip/{trip_id}/event/{event_id}");
        self.mutate(Request::new(Method::DELETE, path)).await
    }

    /// The result has to have the expected shape
    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<Envelope<T>> {
        let call = format!("{} {}", request.method, request.path);
        self.perform(request)
            .await?
            .decode()
            .map_err(|e| malformed(&call, e))
    }

    async fn mutate<T: DeserializeOwned>(&self, request: Request) -> Result<Envelope<T>> {
        Ok(self.perform(request).await?.decode_lenient())
    }

    async fn perform(&self, request: Request) -> Result<Envelope<Value>> {
        log::trace!("{} {}", request.method, request.path);
        let call = format!("{} {}", request.method, request.path);
        let body = self.transport.perform(request).await.map_err(|e| {
            log::error!("API Error: {call} {e}");
            e
        })?;
        Envelope::from_body(body).map_err(|e| malformed(&call, e))
    }
}

fn malformed(call: &str, error: serde_json::Error) -> GatewayError {
    log::error!("API Error: {call} unreadable envelope: {error}");
    GatewayError::malformed(error)
}

pub(crate) trait ResultExt {
    type Output;
    fn string_error(self, call: &'static str) -> std::result::Result<Self::Output, String>;
}

impl<T, E: std::fmt::Display> ResultExt for std::result::Result<T, E> {
    type Output = T;
    fn string_error(self, call: &'static str) -> std::result::Result<T, String> {
        self.map_err(|e| {
            let string_error = format!("{call}: {e}");
            log::error!("{string_error}");
            string_error
        })
    }
}

#[cfg(test)]
pub mod mock {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::{Method, Request, Transport};
    use crate::environment::error::{GatewayError, Result};

    type Key = (Method, String);

    /// Answers with canned responses, in order, per method and path
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<HashMap<Key, VecDeque<Result<Value>>>>,
        requests: Mutex<Vec<Request>>,
    }

    impl ScriptedTransport {
        pub fn respond(&self, method: Method, path: &str, response: Result<Value>) -> &Self {
            if let Ok(mut responses) = self.responses.lock() {
                responses
                    .entry((method, path.to_string()))
                    .or_default()
                    .push_back(response);
            }
            self
        }

        pub fn requests(&self) -> Vec<Request> {
            self.requests
                .lock()
                .map(|r| r.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn perform(&self, request: Request) -> Result<Value> {
            let key = (request.method.clone(), request.path.clone());
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            let next = self
                .responses
                .lock()
                .ok()
                .and_then(|mut responses| responses.get_mut(&key)?.pop_front());
            next.unwrap_or_else(|| {
                Err(GatewayError::api(
                    404,
                    format!("No scripted response for {} {}", key.0, key.1),
                ))
            })
        }
    }
}
