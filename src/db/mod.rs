pub mod family_repo;
pub mod member_repo;
pub mod migrations;
pub mod schema;

use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub use family_repo::FamilyRepository;
pub use member_repo::MemberRepository;

use crate::utils::AppResult;

/// Huvuddatabas-wrapper med thread-safe access
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Öppna eller skapa databas
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            ",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Öppna in-memory databas (för tester och som reserv)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Kör databasmigrationer
    pub fn migrate(&self) -> Result<()> {
        let conn = lock(&self.conn)?;
        migrations::run_migrations(&conn)
    }

    /// Hämta familje-repository
    pub fn families(&self) -> FamilyRepository {
        FamilyRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta medlems-repository
    pub fn members(&self) -> MemberRepository {
        MemberRepository::new(Arc::clone(&self.conn))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

/// Lås anslutningen, en förgiftad mutex blir `AppError::Poisoned`
pub(crate) fn lock(conn: &Arc<Mutex<Connection>>) -> AppResult<MutexGuard<'_, Connection>> {
    Ok(conn.lock()?)
}

/// Generera ett tidsstämpelbaserat id som är unikt i `table`.
///
/// `table` är alltid en konstant från repositoryn, aldrig användarinmatning.
pub(crate) fn generate_id(conn: &Connection, table: &str, prefix: &str) -> Result<String> {
    let base = format!("{}{}", prefix, Utc::now().timestamp_millis());
    let sql = format!("SELECT 1 FROM {} WHERE id = ?", table);

    let is_free = |candidate: &str| -> Result<bool> {
        let taken = conn
            .query_row(&sql, [candidate], |_| Ok(()))
            .optional()?
            .is_some();
        Ok(!taken)
    };

    if is_free(&base)? {
        return Ok(base);
    }

    for i in 2..1000 {
        let candidate = format!("{}_{}", base, i);
        if is_free(&candidate)? {
            return Ok(candidate);
        }
    }

    Err(anyhow!("Kunde inte generera unikt id för {}", table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::AppError;

    #[test]
    fn test_generate_id_is_unique_within_table() {
        let db = Database::open_in_memory().unwrap();
        let conn = lock(&db.conn).unwrap();

        let first = generate_id(&conn, "families", "fam").unwrap();
        conn.execute(
            "INSERT INTO families (id, head_id, name) VALUES (?1, 'x', 'Test')",
            [&first],
        )
        .unwrap();

        let second = generate_id(&conn, "families", "fam").unwrap();
        assert!(first.starts_with("fam"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_lock_reports_poisoned_connection() {
        let db = Database::open_in_memory().unwrap();
        let conn = Arc::clone(&db.conn);

        let _ = std::thread::spawn(move || {
            let _guard = conn.lock().unwrap();
            panic!("tråden kraschar med låset");
        })
        .join();

        assert!(matches!(lock(&db.conn), Err(AppError::Poisoned)));
        assert!(db.families().count().is_err());
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("silsilah.db");

        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();

        assert!(path.exists());
        assert!(db.families().find_all().unwrap().is_empty());
    }
}
