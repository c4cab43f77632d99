//! Admin settings types

use serde::{Deserialize, Serialize};

/// Recognition settings as exposed over the admin API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    /// Stored instruction override; only honored when builtin templates are
    /// not forced.
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub system_prompt: String,
}
