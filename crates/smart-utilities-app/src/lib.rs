//! # Smart Utilities App
//!
//! Portable headless core for the smart utilities dashboard. It reconciles
//! the authority's pushed snapshots and deltas into one store, projects that
//! store into per-module views, and sends user and admin intents back.
//!
//! ## Architecture
//!
//! ```text
//! InboundMessage ─► router ─► ReconciliationStore ─► views ─► surface::commit ─► RenderSurface
//!                        │
//!                        └─► Intent ─► ActionGateway ─► Transport
//! ```
//!
//! - [`store`]: typed entity tables with replace, merge, upsert and delete
//! - [`router`]: one handler per `dataType`, returning a [`router::Dispatch`]
//! - [`views`]: pure projections from store state to renderable rows and cards
//! - [`surface`]: the only code that writes to a render surface
//! - [`gateway`]: at-most-once outbound requests with `requestId` correlation
//! - [`core`]: [`DashboardCore`], which wires the above together
//!
//! Rendering and networking are supplied by the host through the
//! [`RenderSurface`] and [`Transport`] traits. [`surface::MemorySurface`] is
//! the retained in-memory surface used by tests and the replay host.

pub mod config;
pub mod core;
pub mod errors;
pub mod gateway;
pub mod router;
pub mod store;
pub mod surface;
pub mod views;

pub use crate::config::DashboardConfig;
pub use crate::core::{DashboardCore, Intent, Session, StatusLevel, StatusLine, Visibility};
pub use crate::errors::{DashboardError, ErrorCategory};
pub use crate::gateway::{
    send_all, Acknowledgement, ActionGateway, OutboundRequest, RequestId, SendOutcome, Transport,
    TransportError,
};
pub use crate::router::{route, Dispatch, RenderDirective};
pub use crate::store::ReconciliationStore;
pub use crate::surface::{commit, CommitReport, MemorySurface, RenderSurface, SurfaceError};
pub use crate::views::{render, render_module, DashboardView, ModuleId, ModuleView, RenderOptions};

pub use smart_utilities_types as types;
