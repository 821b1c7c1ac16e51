//! Run with: cargo run -p retrotrack-core --example watch
//!
//! Polls RetroArch at the configured cadence, identifies whatever is playing
//! against the tracking database, and follows it until it stops. This is the
//! loop a host application would drive.

use std::time::Duration;

use retrotrack_core::config::PluginConfig;
use retrotrack_core::identifier::RetroarchIdentifier;
use retrotrack_core::storage::Storage;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("retrotrack=debug")
        .init();

    let config = PluginConfig::load().expect("config loads");
    let db_path = PluginConfig::ensure_db_path().expect("data dir is writable");
    let mut storage = Storage::open(&db_path).expect("database opens");

    let identifier = RetroarchIdentifier::from_config(&config);
    let interval = Duration::from_secs(config.tracking.poll_interval);

    loop {
        let identification = match identifier.identify(&mut storage, &config) {
            Ok(Some(identification)) => identification,
            Ok(None) => {
                std::thread::sleep(interval);
                continue;
            }
            Err(e) => {
                eprintln!("identify failed: {e}");
                std::thread::sleep(interval);
                continue;
            }
        };

        let name = storage
            .get_app(identification.user_app.app_id)
            .ok()
            .flatten()
            .map(|app| app.name)
            .unwrap_or_else(|| identification.user_app.identifier_data.clone());
        println!("Now playing: {name}");

        let conn = retrotrack_retroarch::Connection::new(
            config.retroarch.host.clone(),
            config.retroarch.port,
        );
        let mut process = identification.process;
        while process.is_running(&conn) {
            std::thread::sleep(interval);
        }
        println!("Stopped: {name}");
    }
}
