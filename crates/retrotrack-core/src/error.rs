use thiserror::Error;

use retrotrack_retroarch::RetroarchError;

#[derive(Debug, Error)]
pub enum RetrotrackError {
    #[error("retroarch error: {0}")]
    Retroarch(#[from] RetroarchError),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
