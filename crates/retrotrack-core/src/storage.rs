use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::RetrotrackError;
use crate::models::{App, UserApp};

const SCHEMA: &str = include_str!("../../../migrations/001_initial.sql");

/// SQLite-backed storage for tracked-game records.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, RetrotrackError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, RetrotrackError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Look up an identification record by plugin name and lookup key.
    pub fn find_user_app(
        &self,
        plugin: &str,
        identifier_data: &str,
    ) -> Result<Option<UserApp>, RetrotrackError> {
        self.conn
            .query_row(
                "SELECT id, app_id, identifier_plugin, identifier_data, note
                 FROM user_app
                 WHERE identifier_plugin = ?1 AND identifier_data = ?2",
                params![plugin, identifier_data],
                |row| Ok(row_to_user_app(row)),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Create a tracked game and its identification record in one
    /// transaction. Returns the new `UserApp`.
    pub fn insert_tracked_app(
        &mut self,
        name: &str,
        plugin: &str,
        identifier_data: &str,
    ) -> Result<UserApp, RetrotrackError> {
        let tx = self.conn.transaction()?;
        tx.execute("INSERT INTO app (name) VALUES (?1)", params![name])?;
        let app_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO user_app (app_id, identifier_plugin, identifier_data)
             VALUES (?1, ?2, ?3)",
            params![app_id, plugin, identifier_data],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(UserApp {
            id,
            app_id,
            identifier_plugin: plugin.to_string(),
            identifier_data: identifier_data.to_string(),
            note: None,
        })
    }

    /// Get a tracked game by ID.
    pub fn get_app(&self, id: i64) -> Result<Option<App>, RetrotrackError> {
        self.conn
            .query_row(
                "SELECT id, name FROM app WHERE id = ?1",
                params![id],
                |row| {
                    Ok(App {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// All identification records owned by a plugin.
    pub fn all_user_apps(&self, plugin: &str) -> Result<Vec<UserApp>, RetrotrackError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, app_id, identifier_plugin, identifier_data, note
             FROM user_app WHERE identifier_plugin = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![plugin], |row| Ok(row_to_user_app(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }
}

fn row_to_user_app(row: &rusqlite::Row<'_>) -> UserApp {
    UserApp {
        id: row.get(0).unwrap_or(0),
        app_id: row.get(1).unwrap_or(0),
        identifier_plugin: row.get(2).unwrap_or_default(),
        identifier_data: row.get(3).unwrap_or_default(),
        note: row.get(4).unwrap_or(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLUGIN_NAME;

    #[test]
    fn test_insert_and_find() {
        let mut db = Storage::open_memory().unwrap();
        let created = db
            .insert_tracked_app("Chrono Trigger", PLUGIN_NAME, "crc32=2d206bf7")
            .unwrap();
        assert!(created.id > 0);

        let found = db
            .find_user_app(PLUGIN_NAME, "crc32=2d206bf7")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.identifier_data, "crc32=2d206bf7");

        let app = db.get_app(found.app_id).unwrap().unwrap();
        assert_eq!(app.name, "Chrono Trigger");
    }

    #[test]
    fn test_find_misses_other_plugin() {
        let mut db = Storage::open_memory().unwrap();
        db.insert_tracked_app("Chrono Trigger", PLUGIN_NAME, "crc32=2d206bf7")
            .unwrap();

        let found = db.find_user_app("SteamIdentifier", "crc32=2d206bf7").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut db = Storage::open_memory().unwrap();
        db.insert_tracked_app("A", PLUGIN_NAME, "crc32=11111111")
            .unwrap();
        let dup = db.insert_tracked_app("B", PLUGIN_NAME, "crc32=11111111");
        assert!(dup.is_err());
    }

    #[test]
    fn test_all_user_apps() {
        let mut db = Storage::open_memory().unwrap();
        db.insert_tracked_app("A", PLUGIN_NAME, "crc32=11111111")
            .unwrap();
        db.insert_tracked_app("B", PLUGIN_NAME, "crc32=22222222")
            .unwrap();

        let all = db.all_user_apps(PLUGIN_NAME).unwrap();
        assert_eq!(all.len(), 2);
    }
}
