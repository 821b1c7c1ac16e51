//! Run with: cargo run -p retrotrack-retroarch --example status
//!
//! Queries a local RetroArch instance and prints what it is running.

use retrotrack_retroarch::{Connection, ContentState, DEFAULT_PORT};

fn main() {
    let conn = Connection::new("localhost", DEFAULT_PORT);

    match conn.get_status() {
        Ok(status) => {
            match status.state {
                ContentState::Playing => println!("Playing"),
                ContentState::Paused => println!("Paused"),
                ContentState::Contentless => println!("No content loaded"),
                ContentState::Unknown(s) => println!("Unknown state: {s}"),
            }
            if let Some(content) = &status.content {
                println!("  Content: {content}");
            }
            if let Some(system) = &status.system_id {
                println!("  System:  {system}");
            }
            if let Some(crc32) = &status.crc32 {
                println!("  CRC32:   {crc32}");
            }
        }
        Err(e) => println!("RetroArch not reachable: {e}"),
    }
}
