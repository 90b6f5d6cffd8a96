//! SQLite-backed key-value store.
//!
//! Holds the persisted alarm slot, trigger bookkeeping, debt ledger and
//! partner setting as JSON values under fixed keys (see
//! [`super::StateRepository`]).

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, KvStore};
use crate::error::StorageError;

/// SQLite database holding the `kv` table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/snoozetax.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?.join("snoozetax.db"))
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KvStore for Database {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn kv_set_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)")?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn set_all_writes_every_key() {
        let db = Database::open_memory().unwrap();
        db.kv_set("saved_alarm", "old").unwrap();
        db.kv_set_all(&[
            ("saved_alarm", "new".to_string()),
            ("debt_records", "[]".to_string()),
        ])
        .unwrap();
        assert_eq!(db.kv_get("saved_alarm").unwrap().as_deref(), Some("new"));
        assert_eq!(db.kv_get("debt_records").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn set_all_rolls_back_on_failure() {
        let db = Database::open_memory().unwrap();
        db.kv_set("saved_alarm", "old").unwrap();
        db.conn
            .execute_batch(
                "CREATE TRIGGER reject_bad BEFORE INSERT ON kv WHEN NEW.key = 'bad'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let result = db.kv_set_all(&[
            ("saved_alarm", "new".to_string()),
            ("bad", "x".to_string()),
        ]);
        assert!(result.is_err());
        assert_eq!(db.kv_get("saved_alarm").unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snoozetax.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.kv_set("partner_username", "\"jordan-k\"").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(
            db.kv_get("partner_username").unwrap().as_deref(),
            Some("\"jordan-k\"")
        );
    }

    #[test]
    fn open_at_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("snoozetax.db");
        assert!(matches!(
            Database::open_at(&path),
            Err(StorageError::OpenFailed { .. })
        ));
    }
}
