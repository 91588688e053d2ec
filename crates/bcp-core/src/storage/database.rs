//! SQLite database wrapper shared across the service

use anyhow::Result;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Process-wide SQLite handle.
///
/// The connection lives behind a mutex because it is shared across HTTP
/// workers; a replace operation holds the guard for its whole
/// delete-then-insert transaction, which serializes conflicting
/// resubmissions of the same step.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at the given path and ensure the
    /// schema exists.
    pub fn new(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL keeps report reads from stalling behind step writes
        conn.pragma_update(None, "journal_mode", "WAL")?;

        // Child steps do not check plan existence (see DESIGN.md); the code
        // relies on SQLite's standard default of FK enforcement being off.
        // The bundled libsqlite3-sys overrides that default to on
        // (-DSQLITE_DEFAULT_FOREIGN_KEYS=1), so restore it explicitly.
        conn.pragma_update(None, "foreign_keys", "OFF")?;

        // Set busy timeout to avoid immediate failures on lock contention
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Lock the underlying connection.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Create the five tables. Safe to run on every startup: creating a
    /// table that already exists is a no-op.
    fn init_schema(&self) -> Result<()> {
        self.lock().execute_batch(
            r#"
            -- Parent table: one row per continuity plan
            CREATE TABLE IF NOT EXISTS bcps (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                business_unit TEXT,
                sub_business_unit TEXT,
                service_name TEXT NOT NULL,
                service_description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Business processes, replaced as a set per submission
            CREATE TABLE IF NOT EXISTS processes (
                id TEXT PRIMARY KEY,
                bcp_id TEXT NOT NULL,
                name TEXT NOT NULL,
                sites TEXT,
                primary_owner_name TEXT,
                primary_owner_email TEXT,
                backup_owner_name TEXT,
                backup_owner_email TEXT,
                FOREIGN KEY (bcp_id) REFERENCES bcps (id)
            );

            CREATE INDEX IF NOT EXISTS idx_processes_bcp
                ON processes(bcp_id);

            -- Impact analysis, one logical record per plan
            CREATE TABLE IF NOT EXISTS bia_data (
                id TEXT PRIMARY KEY,
                bcp_id TEXT NOT NULL,
                criticality_unit TEXT,
                criticality_value INTEGER,
                headcount_requirement INTEGER,
                dependencies TEXT,
                FOREIGN KEY (bcp_id) REFERENCES bcps (id)
            );

            CREATE INDEX IF NOT EXISTS idx_bia_bcp
                ON bia_data(bcp_id);

            CREATE TABLE IF NOT EXISTS communications (
                id TEXT PRIMARY KEY,
                bcp_id TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                type TEXT DEFAULT 'individual',
                FOREIGN KEY (bcp_id) REFERENCES bcps (id)
            );

            CREATE INDEX IF NOT EXISTS idx_communications_bcp
                ON communications(bcp_id);

            CREATE TABLE IF NOT EXISTS risks (
                id TEXT PRIMARY KEY,
                bcp_id TEXT NOT NULL,
                description TEXT,
                FOREIGN KEY (bcp_id) REFERENCES bcps (id)
            );

            CREATE INDEX IF NOT EXISTS idx_risks_bcp
                ON risks(bcp_id);
            "#,
        )?;

        info!("Plan database schema ready");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::Database;

    fn create_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db = Database::new(&db_path).expect("Failed to create database");
        (db, temp_dir)
    }

    #[test]
    fn test_all_tables_exist() {
        let (db, _temp) = create_test_db();

        let conn = db.lock();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .expect("Failed to prepare query");

        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .expect("Failed to query tables")
            .filter_map(Result::ok)
            .collect();

        for expected in ["bcps", "processes", "bia_data", "communications", "risks"] {
            assert!(
                tables.contains(&expected.to_string()),
                "missing table {expected}, got {tables:?}"
            );
        }
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let first = Database::new(&db_path).expect("first open");
        drop(first);

        // Reopening must not error on the existing tables
        let second = Database::new(&db_path).expect("second open");
        let count: i64 = second
            .lock()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='bcps'",
                [],
                |row| row.get(0),
            )
            .expect("query");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_communications_type_defaults_to_individual() {
        let (db, _temp) = create_test_db();

        let conn = db.lock();
        conn.execute(
            "INSERT INTO communications (id, bcp_id, name, email) VALUES ('c1', 'p1', 'Ana', 'ana@example.com')",
            [],
        )
        .expect("insert");

        let kind: String = conn
            .query_row("SELECT type FROM communications WHERE id = 'c1'", [], |row| {
                row.get(0)
            })
            .expect("query");
        assert_eq!(kind, "individual");
    }
}
