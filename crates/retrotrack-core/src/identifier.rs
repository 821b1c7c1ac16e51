use tracing::{debug, error, info};

use retrotrack_retroarch::{Connection, ContentState, RetroarchError, StatusSource};

use crate::config::PluginConfig;
use crate::error::RetrotrackError;
use crate::models::{crc32_key, Candidate, UserApp};
use crate::process::RetroarchProcess;
use crate::storage::Storage;
use crate::PLUGIN_NAME;

/// A successful identification: the record that matched (or was just
/// created) and a fresh liveness tracker for it.
#[derive(Debug)]
pub struct Identification {
    pub process: RetroarchProcess,
    pub user_app: UserApp,
    /// True when the record was auto-registered by this pass.
    pub newly_added: bool,
}

/// Identifies games running in RetroArch by their content checksum.
pub struct RetroarchIdentifier<S: StatusSource = Connection> {
    source: S,
}

impl RetroarchIdentifier<Connection> {
    pub fn from_config(config: &PluginConfig) -> Self {
        debug!(
            host = %config.retroarch.host,
            port = config.retroarch.port,
            "retroarch identifier initialized"
        );
        Self {
            source: Connection::new(config.retroarch.host.clone(), config.retroarch.port),
        }
    }
}

impl<S: StatusSource> RetroarchIdentifier<S> {
    /// Wrap an arbitrary status source (tests use scripted ones).
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// One-shot query for the host's manual-add flow: whatever content is
    /// currently loaded, recognized or not.
    ///
    /// An unreachable RetroArch is normal (not running, or the network
    /// command interface is disabled) and yields an empty list quietly.
    pub fn candidates(&self) -> Vec<Candidate> {
        let status = match self.source.get_status() {
            Ok(status) => status,
            Err(RetroarchError::Refused(_)) | Err(RetroarchError::Timeout(_, _)) => return vec![],
            Err(e) => {
                error!(error = %e, "status query failed in candidates");
                return vec![];
            }
        };

        let (Some(content), Some(crc32)) = (status.content, status.crc32) else {
            return vec![];
        };

        vec![Candidate {
            name: content,
            identifier_data: crc32_key(&crc32),
        }]
    }

    /// One identification pass: if RetroArch is playing known content,
    /// return its record plus a liveness tracker; if the content is unknown
    /// and auto-add is on, register it first.
    pub fn identify(
        &self,
        storage: &mut Storage,
        config: &PluginConfig,
    ) -> Result<Option<Identification>, RetrotrackError> {
        let status = match self.source.get_status() {
            Ok(status) => status,
            Err(RetroarchError::Refused(_)) | Err(RetroarchError::Timeout(_, _)) => {
                return Ok(None)
            }
            Err(e) => {
                error!(error = %e, "status query failed in identify");
                return Ok(None);
            }
        };

        if status.state == ContentState::Contentless {
            return Ok(None);
        }
        if status.state != ContentState::Playing {
            debug!(status = ?status, "found content, but it is not playing");
            return Ok(None);
        }
        let Some(crc32) = status.crc32 else {
            debug!("playing content reported no checksum, cannot identify");
            return Ok(None);
        };

        let key = crc32_key(&crc32);
        if let Some(user_app) = storage.find_user_app(PLUGIN_NAME, &key)? {
            debug!(user_app_id = user_app.id, key = %key, "identified tracked game");
            return Ok(Some(Identification {
                process: RetroarchProcess::new(crc32),
                user_app,
                newly_added: false,
            }));
        }

        if config.tracking.auto_add {
            let name = status.content.unwrap_or_else(|| key.clone());
            let user_app = storage.insert_tracked_app(&name, PLUGIN_NAME, &key)?;
            info!(name = %name, key = %key, "automatically added new game");
            return Ok(Some(Identification {
                process: RetroarchProcess::new(crc32),
                user_app,
                newly_added: true,
            }));
        }

        Ok(None)
    }
}
