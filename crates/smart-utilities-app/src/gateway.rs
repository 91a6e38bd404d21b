//! # Outbound Action Gateway
//!
//! Serializes an [`Intent`] into `(action, payload)` and posts it to the
//! authority through a [`Transport`]. Delivery is at most once: a failed or
//! timed-out send is logged and reported as absent, never retried, and the
//! caller must assume the request may or may not have arrived.
//!
//! Every send carries a fresh `requestId` in its payload and is recorded in
//! [`PendingRequests`] until an inbound message echoes that id back
//! ([`ActionGateway::settle`]) or it ages out ([`ActionGateway::expire`]).
//!
//! Sends do not borrow the dashboard: an [`OutboundRequest`] holds its own
//! handle on the gateway, so a host can spawn it and keep handling inbound
//! messages while the post is in flight.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::DashboardConfig;
use crate::core::Intent;
use crate::errors::DashboardError;

// ============================================================================
// Transport seam
// ============================================================================

/// Why a transport could not deliver a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent
    #[error("connection failed: {0}")]
    Connection(String),
    /// No response within the configured timeout
    #[error("timed out after {0}ms")]
    Timeout(u64),
    /// The response could not be read
    #[error("unreadable response: {0}")]
    InvalidResponse(String),
}

/// Posts one JSON body to one endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post `body` to `endpoint`, returning the authority's response body.
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value, TransportError>;
}

// ============================================================================
// Request correlation
// ============================================================================

/// Correlation id attached to every outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id echoed back by the authority.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An outbound request awaiting its echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Outbound action name
    pub action: &'static str,
    /// Caller clock at send time
    pub sent_at_ms: u64,
}

/// Requests sent but not yet settled or expired.
#[derive(Debug, Default)]
pub struct PendingRequests {
    inner: Mutex<HashMap<RequestId, PendingRequest>>,
}

impl PendingRequests {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sent request.
    pub fn record(&self, id: RequestId, request: PendingRequest) {
        self.inner.lock().insert(id, request);
    }

    /// Remove and return the request `raw` refers to.
    pub fn settle(&self, raw: &str) -> Option<PendingRequest> {
        let id = RequestId::parse(raw)?;
        self.inner.lock().remove(&id)
    }

    /// Remove and return every request sent at least `timeout_ms` before `now_ms`.
    pub fn expire(&self, now_ms: u64, timeout_ms: u64) -> Vec<(RequestId, PendingRequest)> {
        let mut inner = self.inner.lock();
        let stale: Vec<RequestId> = inner
            .iter()
            .filter(|(_, request)| now_ms.saturating_sub(request.sent_at_ms) >= timeout_ms)
            .map(|(id, _)| *id)
            .collect();
        stale
            .into_iter()
            .filter_map(|id| inner.remove(&id).map(|request| (id, request)))
            .collect()
    }

    /// Whether `id` is still pending.
    pub fn contains(&self, id: &RequestId) -> bool {
        self.inner.lock().contains_key(id)
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// The authority's response to one request. Its shape is opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    /// Correlation id the request was sent with
    pub request_id: RequestId,
    /// Outbound action name
    pub action: &'static str,
    /// Response body
    pub body: Value,
}

/// Sends intents to the authority.
#[derive(Debug)]
pub struct ActionGateway<T> {
    transport: T,
    resource_name: String,
    timeout_ms: u64,
    pending: PendingRequests,
}

impl<T: Transport> ActionGateway<T> {
    /// Gateway addressing `config.resource_name`.
    pub fn new(transport: T, config: &DashboardConfig) -> Self {
        Self {
            transport,
            resource_name: config.resource_name.clone(),
            timeout_ms: config.request_timeout_ms,
            pending: PendingRequests::new(),
        }
    }

    /// Endpoint an action is posted to.
    pub fn endpoint(&self, action: &str) -> String {
        format!("https://{}/{action}", self.resource_name)
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Requests awaiting an echo.
    pub fn pending(&self) -> &PendingRequests {
        &self.pending
    }

    /// Send once, reporting why delivery failed.
    pub async fn try_send(
        &self,
        intent: &Intent,
        now_ms: u64,
    ) -> Result<Acknowledgement, DashboardError> {
        let action = intent.action_name();
        let request_id = RequestId::new();
        let mut body = intent.payload();
        if let Value::Object(fields) = &mut body {
            fields.insert(
                "requestId".to_string(),
                Value::String(request_id.to_string()),
            );
        }
        self.pending.record(
            request_id,
            PendingRequest {
                action,
                sent_at_ms: now_ms,
            },
        );

        let endpoint = self.endpoint(action);
        let post = self.transport.post(&endpoint, body);
        let outcome = match tokio::time::timeout(Duration::from_millis(self.timeout_ms), post).await
        {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout_ms)),
        };

        match outcome {
            Ok(body) => {
                tracing::debug!(action, request_id = %request_id, "request acknowledged");
                Ok(Acknowledgement {
                    request_id,
                    action,
                    body,
                })
            }
            Err(err) => Err(DashboardError::transport(action, err.to_string())),
        }
    }

    /// Send once; `None` when delivery failed.
    pub async fn send(&self, intent: &Intent, now_ms: u64) -> Option<Acknowledgement> {
        match self.try_send(intent, now_ms).await {
            Ok(ack) => Some(ack),
            Err(err) => {
                tracing::warn!(action = intent.action_name(), error = %err, "outbound request failed");
                None
            }
        }
    }

    /// Detach a send of `intent` from its caller.
    pub fn request(self: &Arc<Self>, intent: Intent, now_ms: u64) -> OutboundRequest<T> {
        OutboundRequest {
            gateway: Arc::clone(self),
            intent,
            now_ms,
        }
    }

    /// Match an inbound `requestId` against a pending request.
    pub fn settle(&self, raw: &str) -> Option<PendingRequest> {
        let settled = self.pending.settle(raw);
        match &settled {
            Some(request) => {
                tracing::debug!(action = request.action, request_id = %raw, "request settled")
            }
            None => tracing::debug!(request_id = %raw, "no pending request for echoed id"),
        }
        settled
    }

    /// Drop requests older than the configured timeout.
    pub fn expire(&self, now_ms: u64) -> Vec<(RequestId, PendingRequest)> {
        let expired = self.pending.expire(now_ms, self.timeout_ms);
        for (id, request) in &expired {
            tracing::debug!(action = request.action, request_id = %id, "request expired");
        }
        expired
    }
}

/// An intent and the outcome of sending it.
pub type SendOutcome = (Intent, Result<Acknowledgement, DashboardError>);

/// A checked request, ready to send.
#[must_use = "a request does nothing until sent"]
pub struct OutboundRequest<T> {
    gateway: Arc<ActionGateway<T>>,
    intent: Intent,
    now_ms: u64,
}

impl<T: Transport> OutboundRequest<T> {
    /// The intent this request carries.
    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// Send once. The intent is handed back with the outcome.
    pub async fn send(self) -> SendOutcome {
        let result = self.gateway.try_send(&self.intent, self.now_ms).await;
        (self.intent, result)
    }
}

impl<T> fmt::Debug for OutboundRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundRequest")
            .field("intent", &self.intent)
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}

/// Send requests concurrently. Outcomes come back in request order.
pub async fn send_all<T: Transport>(requests: Vec<OutboundRequest<T>>) -> Vec<SendOutcome> {
    join_all(requests.into_iter().map(OutboundRequest::send)).await
}
