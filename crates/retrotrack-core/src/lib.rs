pub mod config;
pub mod error;
pub mod identifier;
pub mod models;
pub mod process;
pub mod storage;

/// Value stored in `user_app.identifier_plugin` for records owned by this
/// identifier.
pub const PLUGIN_NAME: &str = "RetroarchIdentifier";
