//! # Inbound Message Envelope
//!
//! Every push from the game-side authority arrives as
//! `{ type, dataType?, payload?, message?, requestId? }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Top-level message tag.
///
/// The short names are canonical; the `NUI_*` / `UPDATE_DATA` /
/// `SHOW_NOTIFICATION` spellings are what the client scripts emit today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Show the dashboard
    #[serde(rename = "SHOW", alias = "NUI_SHOW")]
    Show,
    /// Hide the dashboard
    #[serde(rename = "HIDE", alias = "NUI_HIDE")]
    Hide,
    /// Data update, dispatched by `dataType`
    #[serde(rename = "UPDATE", alias = "UPDATE_DATA")]
    Update,
    /// Ephemeral status text
    #[serde(rename = "NOTIFY", alias = "SHOW_NOTIFICATION")]
    Notify,
    /// Any tag this client does not know; ignored
    #[serde(other)]
    Unknown,
}

/// A message pushed by the external authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    /// Message tag
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Update discriminant (only meaningful for `UPDATE`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Update body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Notification text (only meaningful for `NOTIFY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Correlation id echoed back for an earlier outbound request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl InboundMessage {
    fn bare(kind: MessageKind) -> Self {
        Self {
            kind,
            data_type: None,
            payload: None,
            message: None,
            request_id: None,
        }
    }

    /// A `SHOW` message.
    pub fn show() -> Self {
        Self::bare(MessageKind::Show)
    }

    /// A `HIDE` message.
    pub fn hide() -> Self {
        Self::bare(MessageKind::Hide)
    }

    /// An `UPDATE` message for the given data type.
    pub fn update(data_type: impl Into<String>, payload: Value) -> Self {
        Self {
            data_type: Some(data_type.into()),
            payload: Some(payload),
            ..Self::bare(MessageKind::Update)
        }
    }

    /// A `NOTIFY` message.
    pub fn notify(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Self::bare(MessageKind::Notify)
        }
    }

    /// Attach a correlation id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Parsed `dataType`, if any.
    pub fn data_type(&self) -> Option<DataType> {
        self.data_type.as_deref().map(DataType::parse)
    }
}

/// Discriminant of an `UPDATE` message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Full snapshot of every module plus configuration
    InitialLoad,
    /// Wholesale power zone set
    PowerStatus,
    /// Wholesale water sources and leaks
    WaterStatus,
    /// Single leak upsert/removal
    WaterLeakUpdate,
    /// Hub set and/or a single subscription
    InternetStatus,
    /// Partial hub patches keyed by hub id
    InternetHubStatus,
    /// Full replacement of one property's subscription
    InternetUserService,
    /// Upsert of one property's pending install
    InternetPendingInstallUpdate,
    /// Wholesale bins, dumpsters and illegal dumps
    TrashStatus,
    /// Partial bin patches keyed by bin id
    TrashBinStatus,
    /// Single illegal dump upsert/removal
    TrashIllegalDumpUpdate,
    /// Admin session flag
    AdminStatusUpdate,
    /// Anything else; ignored for forward compatibility
    Unknown(String),
}

impl DataType {
    /// Parse a wire `dataType`. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "initial_load" => Self::InitialLoad,
            "power_status" => Self::PowerStatus,
            "water_status" => Self::WaterStatus,
            "water_leak_update" => Self::WaterLeakUpdate,
            "internet_status" => Self::InternetStatus,
            "internet_hub_status" => Self::InternetHubStatus,
            "internet_user_service" => Self::InternetUserService,
            "internet_pending_install_update" => Self::InternetPendingInstallUpdate,
            "trash_status" => Self::TrashStatus,
            "trash_bin_status" => Self::TrashBinStatus,
            "trash_illegal_dump_update" => Self::TrashIllegalDumpUpdate,
            "admin_status_update" => Self::AdminStatusUpdate,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::InitialLoad => "initial_load",
            Self::PowerStatus => "power_status",
            Self::WaterStatus => "water_status",
            Self::WaterLeakUpdate => "water_leak_update",
            Self::InternetStatus => "internet_status",
            Self::InternetHubStatus => "internet_hub_status",
            Self::InternetUserService => "internet_user_service",
            Self::InternetPendingInstallUpdate => "internet_pending_install_update",
            Self::TrashStatus => "trash_status",
            Self::TrashBinStatus => "trash_bin_status",
            Self::TrashIllegalDumpUpdate => "trash_illegal_dump_update",
            Self::AdminStatusUpdate => "admin_status_update",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
