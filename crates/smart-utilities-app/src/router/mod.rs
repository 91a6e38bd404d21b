//! # Inbound Message Router
//!
//! Routes one [`InboundMessage`] to exactly one handler, mutating the store
//! and session and describing what must be re-rendered. The router never
//! touches a render surface: it returns a [`Dispatch`], and
//! [`crate::surface::commit`] applies it.
//!
//! | `type` | Effect |
//! |---|---|
//! | `SHOW` | session show; `NUI_READY` follow-up on `Hidden → Shown` |
//! | `HIDE` | session hide; `NUI_CLOSE` follow-up on `Shown → Hidden` |
//! | `UPDATE` | dispatch by `dataType` (see [`handlers`]) |
//! | `NOTIFY` | status text only |
//!
//! Unknown tags and unknown `dataType`s are ignored. A structurally absent
//! sub-payload skips that sub-part; the rest of the message still applies.

mod handlers;
mod payload;

use serde::{Deserialize, Serialize};
use smart_utilities_types::{DataType, InboundMessage, MessageKind};

use crate::core::{Intent, Session, StatusLevel, StatusLine};
use crate::errors::DashboardError;
use crate::store::ReconciliationStore;
use crate::views::ModuleId;

/// Status text after any applied update.
pub const STATUS_UPDATED: &str = "System data updated.";
/// Status text after a full snapshot.
pub const STATUS_ALL_UPDATED: &str = "All modules updated.";

/// A unit of re-rendering requested by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderDirective {
    /// Render and mount the whole dashboard
    MountAll,
    /// Re-render one module
    Module(ModuleId),
    /// Re-render one property card in place
    PropertyCard(String),
    /// Add, replace or remove one leak row
    Leak(String),
    /// Replace one bin row, or append it under its container
    BinRow(String),
    /// Add, replace or remove one illegal dump row
    DumpRow(String),
    /// Show or hide the admin controls
    AdminVisibility,
    /// Show or hide the dashboard
    Visibility,
}

/// Outcome of routing one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    /// Re-render work, in order
    pub directives: Vec<RenderDirective>,
    /// Intents to send to the authority
    pub follow_ups: Vec<Intent>,
    /// New status line
    pub status: Option<StatusLine>,
    /// Correlation id of an earlier outbound request this message answers
    pub settles: Option<String>,
    /// Sub-parts that were skipped
    pub errors: Vec<DashboardError>,
}

impl Dispatch {
    /// Queue a directive unless an identical one is already queued.
    pub(crate) fn push(&mut self, directive: RenderDirective) {
        if !self.directives.contains(&directive) {
            self.directives.push(directive);
        }
    }

    /// Whether routing changed nothing visible.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.follow_ups.is_empty() && self.status.is_none()
    }
}

/// Route one message.
pub fn route(
    store: &mut ReconciliationStore,
    session: &mut Session,
    message: &InboundMessage,
) -> Dispatch {
    let mut dispatch = Dispatch {
        settles: message.request_id.clone(),
        ..Dispatch::default()
    };

    match message.kind {
        MessageKind::Show => {
            if let Some(intent) = session.show() {
                dispatch.follow_ups.push(intent);
                dispatch.push(RenderDirective::Visibility);
                dispatch.status = session.status().cloned();
            }
        }
        MessageKind::Hide => {
            if let Some(intent) = session.hide() {
                dispatch.follow_ups.push(intent);
                dispatch.push(RenderDirective::Visibility);
            }
        }
        MessageKind::Notify => {
            let text = message.message.clone().or_else(|| {
                message
                    .payload
                    .as_ref()
                    .and_then(|p| p.as_str().or_else(|| p.get("message")?.as_str()))
                    .map(str::to_string)
            });
            if let Some(text) = text {
                set_status(session, &mut dispatch, text, StatusLevel::Info);
            }
        }
        MessageKind::Update => {
            let Some(data_type) = message.data_type() else {
                tracing::debug!("update without dataType ignored");
                return dispatch;
            };
            let empty = payload::empty();
            let body = message.payload.as_ref().unwrap_or(&empty);
            tracing::debug!(data_type = %data_type, "dispatching update");
            if handlers::handle(store, session, &data_type, body, &mut dispatch) {
                let text = if data_type == DataType::InitialLoad {
                    STATUS_ALL_UPDATED
                } else {
                    STATUS_UPDATED
                };
                set_status(session, &mut dispatch, text.to_string(), StatusLevel::Info);
            }
        }
        MessageKind::Unknown => {
            tracing::debug!("message with unknown type ignored");
        }
    }

    for error in &dispatch.errors {
        tracing::warn!(code = error.code(), error = %error, "skipped payload part");
    }
    dispatch
}

fn set_status(session: &mut Session, dispatch: &mut Dispatch, text: String, level: StatusLevel) {
    session.set_status(text.clone(), level);
    dispatch.status = Some(StatusLine { text, level });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_show_twice_requests_one_snapshot() {
        let mut store = ReconciliationStore::new();
        let mut session = Session::new();
        let first = route(&mut store, &mut session, &InboundMessage::show());
        assert_eq!(first.follow_ups, vec![Intent::NuiReady]);
        let second = route(&mut store, &mut session, &InboundMessage::show());
        assert!(second.is_empty());
    }

    #[test]
    fn test_unknown_data_type_is_ignored() {
        let mut store = ReconciliationStore::new();
        let mut session = Session::new();
        let dispatch = route(
            &mut store,
            &mut session,
            &InboundMessage::update("weather_status", json!({"rain": true})),
        );
        assert!(dispatch.is_empty());
        assert!(dispatch.errors.is_empty());
    }

    #[test]
    fn test_notify_sets_status_only() {
        let mut store = ReconciliationStore::new();
        let mut session = Session::new();
        let dispatch = route(
            &mut store,
            &mut session,
            &InboundMessage::notify("Technician dispatched"),
        );
        assert!(dispatch.directives.is_empty());
        assert_eq!(
            session.status().map(|s| s.text.as_str()),
            Some("Technician dispatched")
        );
    }

    #[test]
    fn test_request_id_is_surfaced() {
        let mut store = ReconciliationStore::new();
        let mut session = Session::new();
        let message = InboundMessage::update("power_status", json!({})).with_request_id("abc");
        let dispatch = route(&mut store, &mut session, &message);
        assert_eq!(dispatch.settles.as_deref(), Some("abc"));
        assert_eq!(
            dispatch.status.map(|s| s.text),
            Some(STATUS_UPDATED.to_string())
        );
    }
}
