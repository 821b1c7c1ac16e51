use std::io;
use std::net::UdpSocket;
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

use crate::status::Status;

const RECV_BUF_SIZE: usize = 4096;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum RetroarchError {
    /// Nothing is listening on the target port. On a local host this shows up
    /// as an ICMP port-unreachable, surfaced as a refused/reset error on the
    /// next socket operation.
    #[error("connection refused by {0}")]
    Refused(String),

    #[error("no reply from {0} within {1:?}")]
    Timeout(String, Duration),

    #[error("malformed reply: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Anything that can answer a status query. `Connection` is the real
/// implementation; tests substitute scripted sources.
pub trait StatusSource {
    fn get_status(&self) -> Result<Status, RetroarchError>;
}

/// A client for RetroArch's UDP network command interface.
///
/// The interface is stateless request/response, so each call binds an
/// ephemeral socket, sends one command, and waits for one datagram.
#[derive(Debug, Clone)]
pub struct Connection {
    host: String,
    port: u16,
    timeout: Duration,
}

impl Connection {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Send one command and return the trimmed reply line.
    fn exchange(&self, command: &str) -> Result<String, RetroarchError> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.set_read_timeout(Some(self.timeout))?;
        socket.connect(self.target()).map_err(|e| self.map_io(e))?;

        trace!(command, target = %self.target(), "sending command");
        socket.send(command.as_bytes()).map_err(|e| self.map_io(e))?;

        let mut buf = [0u8; RECV_BUF_SIZE];
        let n = socket.recv(&mut buf).map_err(|e| self.map_io(e))?;
        let reply = String::from_utf8_lossy(&buf[..n]).trim_end().to_string();
        trace!(reply = %reply, "received reply");
        Ok(reply)
    }

    fn map_io(&self, e: io::Error) -> RetroarchError {
        match e.kind() {
            io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => {
                RetroarchError::Refused(self.target())
            }
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                RetroarchError::Timeout(self.target(), self.timeout)
            }
            _ => RetroarchError::Io(e),
        }
    }

    /// Ask RetroArch what it is running. The reply echoes the command name
    /// followed by the playback state and content description.
    pub fn get_status(&self) -> Result<Status, RetroarchError> {
        let reply = self.exchange("GET_STATUS")?;
        let payload = reply
            .strip_prefix("GET_STATUS")
            .ok_or_else(|| RetroarchError::Protocol(reply.clone()))?;
        Ok(Status::parse(payload))
    }

    /// Ask RetroArch for its version string (e.g., "1.19.1").
    pub fn get_version(&self) -> Result<String, RetroarchError> {
        self.exchange("VERSION")
    }
}

impl StatusSource for Connection {
    fn get_status(&self) -> Result<Status, RetroarchError> {
        Connection::get_status(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ContentState;
    use std::net::UdpSocket;
    use std::thread;

    /// Bind a loopback responder that answers the next datagram with `reply`,
    /// and return a Connection pointed at it.
    fn fake_retroarch(reply: &'static str) -> Connection {
        let server = UdpSocket::bind(("127.0.0.1", 0)).unwrap();
        let port = server.local_addr().unwrap().port();
        thread::spawn(move || {
            let mut buf = [0u8; 256];
            let (_, peer) = server.recv_from(&mut buf).unwrap();
            server.send_to(reply.as_bytes(), peer).unwrap();
        });
        Connection::new("127.0.0.1", port)
    }

    #[test]
    fn test_get_status_playing() {
        let conn = fake_retroarch("GET_STATUS PLAYING super_nes,Chrono Trigger,crc32=2d206bf7\n");
        let status = conn.get_status().unwrap();
        assert_eq!(status.state, ContentState::Playing);
        assert_eq!(status.content.as_deref(), Some("Chrono Trigger"));
        assert_eq!(status.crc32.as_deref(), Some("2d206bf7"));
    }

    #[test]
    fn test_get_status_contentless() {
        let conn = fake_retroarch("GET_STATUS CONTENTLESS\n");
        let status = conn.get_status().unwrap();
        assert_eq!(status.state, ContentState::Contentless);
    }

    #[test]
    fn test_get_status_bad_echo() {
        let conn = fake_retroarch("READ_CORE_RAM nope\n");
        let err = conn.get_status().unwrap_err();
        assert!(matches!(err, RetroarchError::Protocol(_)));
    }

    #[test]
    fn test_get_version() {
        let conn = fake_retroarch("1.19.1\n");
        assert_eq!(conn.get_version().unwrap(), "1.19.1");
    }

    #[test]
    fn test_timeout_when_nothing_answers() {
        // Nothing bound at the peer; loopback typically reports refused via
        // ICMP, but some stacks just drop it, so accept either outcome.
        let server = UdpSocket::bind(("127.0.0.1", 0)).unwrap();
        let port = server.local_addr().unwrap().port();
        drop(server);

        let conn =
            Connection::new("127.0.0.1", port).with_timeout(Duration::from_millis(100));
        let err = conn.get_status().unwrap_err();
        assert!(matches!(
            err,
            RetroarchError::Refused(_) | RetroarchError::Timeout(_, _)
        ));
    }
}
