//! # Dashboard Core
//!
//! Session state, outbound intents, and [`DashboardCore`], which owns the
//! store, session, surface and gateway and runs one message at a time.

mod app;
mod intent;
mod session;

pub use app::DashboardCore;
pub use intent::Intent;
pub use session::{Session, StatusLevel, StatusLine, Visibility};
