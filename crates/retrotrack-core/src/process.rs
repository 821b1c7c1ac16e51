use tracing::{debug, error};

use retrotrack_retroarch::{ContentState, StatusSource};

/// Consecutive failed polls tolerated before the game is declared stopped.
/// At the default 5-second cadence this is roughly 30 seconds of silence,
/// which almost always means RetroArch was closed.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 6;

/// Consecutive paused polls tolerated before the game is declared stopped
/// (about five minutes at the default cadence).
pub const MAX_PAUSED_POLLS: u32 = 60;

/// Liveness state for one tracked game.
///
/// Created by a successful identification and polled by the host until it
/// reports the game stopped. All state is in-memory; nothing survives the
/// tracked process.
#[derive(Debug)]
pub struct RetroarchProcess {
    crc32: String,
    failures: u32,
    paused: u32,
}

impl RetroarchProcess {
    pub fn new(crc32: impl Into<String>) -> Self {
        Self {
            crc32: crc32.into(),
            failures: 0,
            paused: 0,
        }
    }

    /// Checksum of the content this process is tracking.
    pub fn crc32(&self) -> &str {
        &self.crc32
    }

    /// Poll RetroArch once and decide whether the tracked game is still
    /// running.
    ///
    /// Transient query failures are tolerated up to a budget; a checksum
    /// mismatch means different content was loaded and is an immediate stop.
    /// A paused report keeps the game alive for a while because RetroArch
    /// reports the same state for a menu opened over a running game, which
    /// players do constantly for save states and the like.
    pub fn is_running(&mut self, source: &impl StatusSource) -> bool {
        let status = match source.get_status() {
            Ok(status) => status,
            Err(e) => {
                self.failures += 1;
                debug!(failures = self.failures, error = %e, "status query failed");
                return self.failures <= MAX_CONSECUTIVE_FAILURES;
            }
        };

        self.failures = 0;

        if status.crc32.as_deref() != Some(self.crc32.as_str()) {
            debug!(
                expected = %self.crc32,
                got = status.crc32.as_deref().unwrap_or("<none>"),
                "checksum changed, content was replaced"
            );
            return false;
        }

        match status.state {
            ContentState::Paused => {
                self.paused += 1;
                self.paused <= MAX_PAUSED_POLLS
            }
            ContentState::Playing => {
                self.paused = 0;
                true
            }
            other => {
                error!(state = ?other, "unexpected playback state while tracking");
                false
            }
        }
    }
}
