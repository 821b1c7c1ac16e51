use serde::{Deserialize, Serialize};

/// A tracked game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub id: i64,
    pub name: String,
}

/// An identification record tying a tracked game to the plugin-specific key
/// that recognizes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserApp {
    pub id: i64,
    pub app_id: i64,
    /// Which identifier owns this record.
    pub identifier_plugin: String,
    /// Plugin-specific lookup key; for this plugin, `crc32=<hex>`.
    pub identifier_data: String,
    pub note: Option<String>,
}

/// An unsaved proposed record for content the identifier can see but does
/// not recognize, offered to the host's manual-add flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Content name as reported by RetroArch.
    pub name: String,
    pub identifier_data: String,
}

/// Build the `identifier_data` key for a content checksum.
pub fn crc32_key(crc32: &str) -> String {
    format!("crc32={crc32}")
}
