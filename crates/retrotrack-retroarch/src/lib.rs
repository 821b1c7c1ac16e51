pub mod connection;
pub mod status;

pub use connection::{Connection, RetroarchError, StatusSource};
pub use status::{ContentState, Status};

/// Default port of RetroArch's network command interface.
pub const DEFAULT_PORT: u16 = 55355;
