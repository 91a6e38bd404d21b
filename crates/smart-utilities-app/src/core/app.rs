//! # DashboardCore
//!
//! Owns every piece of dashboard state and is the single entry point hosts
//! drive:
//!
//! ```text
//! InboundMessage ─► handle() ─► route ─► store/session ─► commit ─► surface
//!                                  │
//!                                  └─► follow-up intents ─► follow_up_requests()
//! Click ─► request(intent) ─► admin gate ─► validate ─► OutboundRequest
//! OutboundRequest::send() ─► gateway ─► record_outcome()
//! ```
//!
//! Handling runs to completion before the next message: `handle` takes
//! `&mut self`, so no handler can observe another one half-applied. Sends
//! never hold that borrow; the host drives them and reports back.

use std::sync::Arc;

use smart_utilities_types::InboundMessage;

use super::{Intent, Session, StatusLevel};
use crate::config::DashboardConfig;
use crate::errors::DashboardError;
use crate::gateway::{Acknowledgement, ActionGateway, OutboundRequest, Transport};
use crate::router::route;
use crate::store::ReconciliationStore;
use crate::surface::{commit, RenderSurface};
use crate::views::{self, DashboardView, RenderOptions};

/// The headless dashboard.
pub struct DashboardCore<S, T> {
    store: ReconciliationStore,
    session: Session,
    config: DashboardConfig,
    surface: S,
    gateway: Arc<ActionGateway<T>>,
}

impl<S: RenderSurface, T: Transport> DashboardCore<S, T> {
    /// A hidden dashboard with an empty store.
    pub fn new(config: DashboardConfig, surface: S, transport: T) -> Self {
        let gateway = Arc::new(ActionGateway::new(transport, &config));
        Self {
            store: ReconciliationStore::new(),
            session: Session::new(),
            config,
            surface,
            gateway,
        }
    }

    /// Reconciled state.
    pub fn store(&self) -> &ReconciliationStore {
        &self.store
    }

    /// Session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The live surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The outbound gateway.
    pub fn gateway(&self) -> &ActionGateway<T> {
        &self.gateway
    }

    /// Active configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Projection options for the current session.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            admin_visible: self.session.is_admin(),
            ..self.config.render_options()
        }
    }

    /// Project the whole dashboard from current state.
    pub fn render(&self) -> DashboardView {
        views::render(&self.store, self.store.catalog(), &self.render_options())
    }

    /// Apply one inbound message and commit it to the surface.
    ///
    /// Returns the intents the message calls for; turn them into requests
    /// with [`follow_up_requests`](Self::follow_up_requests).
    pub fn handle(&mut self, message: &InboundMessage) -> Vec<Intent> {
        let dispatch = route(&mut self.store, &mut self.session, message);
        if let Some(request_id) = &dispatch.settles {
            self.gateway.settle(request_id);
        }

        let options = self.render_options();
        let report = commit(
            &dispatch,
            &self.store,
            &options,
            self.session.is_shown(),
            &mut self.surface,
        );

        let mut follow_ups = dispatch.follow_ups;
        for intent in report.follow_ups {
            if !follow_ups.contains(&intent) {
                follow_ups.push(intent);
            }
        }
        follow_ups
    }

    /// Close the dashboard from the close button.
    pub fn close(&mut self) -> Option<Intent> {
        let intent = self.session.hide()?;
        self.surface.set_visible(false);
        Some(intent)
    }

    /// Route a key press. `Escape` closes a shown dashboard.
    pub fn on_key(&mut self, key: &str) -> Option<Intent> {
        let intent = self.session.on_key(key)?;
        self.surface.set_visible(false);
        Some(intent)
    }

    /// Check an intent against the session and its own inputs, and show its
    /// progress text.
    ///
    /// Failures are put on the status line and returned.
    pub fn prepare(&mut self, intent: &Intent) -> Result<(), DashboardError> {
        let checked = if intent.is_admin() && !self.session.is_admin() {
            Err(DashboardError::AdminOnly {
                action: intent.action_name(),
            })
        } else {
            intent.validate()
        };
        if let Err(err) = checked {
            self.report(&err);
            return Err(err);
        }
        if let Some(text) = intent.progress_text() {
            self.set_status(text, StatusLevel::Info);
        }
        Ok(())
    }

    /// Prepare a user or admin intent for sending.
    ///
    /// Requests older than the configured timeout are dropped first.
    pub fn request(
        &mut self,
        intent: Intent,
        now_ms: u64,
    ) -> Result<OutboundRequest<T>, DashboardError> {
        self.expire_requests(now_ms);
        self.prepare(&intent)?;
        Ok(self.gateway.request(intent, now_ms))
    }

    /// Requests for the follow-up intents [`handle`](Self::handle) returned.
    ///
    /// Requests older than the configured timeout are dropped first.
    pub fn follow_up_requests(
        &mut self,
        intents: Vec<Intent>,
        now_ms: u64,
    ) -> Vec<OutboundRequest<T>> {
        self.expire_requests(now_ms);
        intents
            .into_iter()
            .map(|intent| self.gateway.request(intent, now_ms))
            .collect()
    }

    /// Report the outcome of a sent request. Returns whether it was
    /// acknowledged.
    ///
    /// `false` means the request may or may not have reached the authority.
    /// A failed close notice is not reported to the user.
    pub fn record_outcome(
        &mut self,
        intent: &Intent,
        result: &Result<Acknowledgement, DashboardError>,
    ) -> bool {
        match result {
            Ok(_) => true,
            Err(err) if *intent == Intent::NuiClose => {
                tracing::debug!(error = %err, "close notice not delivered");
                false
            }
            Err(err) => {
                self.report(err);
                false
            }
        }
    }

    /// Drop pending requests older than the configured timeout.
    pub fn expire_requests(&self, now_ms: u64) -> usize {
        self.gateway.expire(now_ms).len()
    }

    fn report(&mut self, err: &DashboardError) {
        tracing::warn!(code = err.code(), category = %err.category(), error = %err, "action failed");
        self.set_status(err.to_string(), err.status_level());
    }

    fn set_status(&mut self, text: String, level: StatusLevel) {
        self.surface.set_status(&text);
        self.session.set_status(text, level);
    }
}
