use serde::{Deserialize, Serialize};

/// Playback state reported by RetroArch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentState {
    /// Content is loaded and running.
    Playing,
    /// Content is loaded but paused. RetroArch also reports this while the
    /// menu is open over a running game, so it cannot be taken at face value.
    Paused,
    /// No content is loaded.
    Contentless,
    /// A state string this client does not recognize, kept verbatim.
    Unknown(String),
}

impl ContentState {
    fn parse(word: &str) -> Self {
        match word {
            "PLAYING" => Self::Playing,
            "PAUSED" => Self::Paused,
            "CONTENTLESS" => Self::Contentless,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// A parsed `GET_STATUS` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub state: ContentState,
    /// Core system identifier (e.g., "super_nes").
    pub system_id: Option<String>,
    /// Name of the loaded content, without extension.
    pub content: Option<String>,
    /// CRC32 of the loaded content as lowercase hex, as RetroArch reports it.
    pub crc32: Option<String>,
}

impl Status {
    /// Parse the payload of a `GET_STATUS` reply (everything after the echoed
    /// command name).
    ///
    /// The wire format is `<STATE> <system_id>,<content>,crc32=<hex>`, or a
    /// bare `CONTENTLESS` when nothing is loaded. Content names may contain
    /// commas, so the system id is the first comma field, the checksum is the
    /// last, and whatever lies between is joined back into the content name.
    pub(crate) fn parse(payload: &str) -> Status {
        let payload = payload.trim();
        let (state_word, rest) = match payload.split_once(' ') {
            Some((w, r)) => (w, Some(r)),
            None => (payload, None),
        };
        let state = ContentState::parse(state_word);

        let mut status = Status {
            state,
            system_id: None,
            content: None,
            crc32: None,
        };

        let Some(rest) = rest else {
            return status;
        };

        let fields: Vec<&str> = rest.split(',').collect();
        status.system_id = fields.first().map(|s| s.to_string());

        let mut middle = &fields[1..];
        if let Some(last) = middle.last() {
            if let Some(hex) = last.strip_prefix("crc32=") {
                status.crc32 = Some(hex.to_string());
                middle = &middle[..middle.len() - 1];
            }
        }
        if !middle.is_empty() {
            let content = middle.join(",");
            if !content.is_empty() {
                status.content = Some(content);
            }
        }

        status
    }
}
