//! # Visibility / Session Controller
//!
//! Two states, `Hidden` (initial) and `Shown`. Only the transitions emit
//! anything: `Hidden → Shown` asks the authority for a fresh snapshot
//! (`NUI_READY`) since state may have drifted while hidden, and
//! `Shown → Hidden` sends a best-effort `NUI_CLOSE`. Repeating either call
//! in the same state is a no-op. The session also carries the admin flag and
//! the status bar line, neither of which lives in the store.

use serde::{Deserialize, Serialize};

use super::Intent;

/// Whether the dashboard is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Not rendered (initial)
    #[default]
    Hidden,
    /// Rendered
    Shown,
}

/// Severity of a status bar line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusLevel {
    /// Informational
    #[default]
    Info,
    /// Something degraded but the dashboard keeps working
    Warning,
    /// An action failed
    Error,
}

/// The current status bar line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    /// Text
    pub text: String,
    /// Severity
    pub level: StatusLevel,
}

/// Session state independent of utility data.
#[derive(Debug, Clone, Default)]
pub struct Session {
    visibility: Visibility,
    is_admin: bool,
    status: Option<StatusLine>,
}

impl Session {
    /// A hidden, non-admin session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the dashboard is shown.
    pub fn is_shown(&self) -> bool {
        self.visibility == Visibility::Shown
    }

    /// Show the dashboard. Returns the readiness notice on `Hidden → Shown`.
    pub fn show(&mut self) -> Option<Intent> {
        if self.is_shown() {
            return None;
        }
        self.visibility = Visibility::Shown;
        self.set_status("Connected. Fetching latest data...", StatusLevel::Info);
        tracing::info!("dashboard shown");
        Some(Intent::NuiReady)
    }

    /// Hide the dashboard. Returns the close notice on `Shown → Hidden`.
    pub fn hide(&mut self) -> Option<Intent> {
        if !self.is_shown() {
            return None;
        }
        self.visibility = Visibility::Hidden;
        tracing::info!("dashboard hidden");
        Some(Intent::NuiClose)
    }

    /// Route a key press; `Escape` closes the dashboard.
    pub fn on_key(&mut self, key: &str) -> Option<Intent> {
        if key == "Escape" {
            self.hide()
        } else {
            None
        }
    }

    /// Whether admin controls are available.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Set the admin flag. Returns whether it changed.
    pub fn set_admin(&mut self, is_admin: bool) -> bool {
        let changed = self.is_admin != is_admin;
        self.is_admin = is_admin;
        changed
    }

    /// Current status line.
    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// Replace the status line.
    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusLine {
            text: text.into(),
            level,
        });
    }
}
