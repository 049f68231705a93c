use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;

use super::lead_store::{InsertOutcome, LeadStore, Result, StoreError};
use crate::models::Lead;

const SCHEMA: &str = include_str!("../../migrations/001_init.sql");
const SCHEMA_VERSION: i64 = 1;

/// Leads persisted in SQLite. The primary key on `email` enforces one row
/// per normalized address.
pub struct SqliteLeadStore {
    conn: Mutex<Connection>,
}

impl SqliteLeadStore {
    /// Open (or create) the database file and bring its schema up to date
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        apply_pragmas(&conn)?;
        let store = Self::from_connection(conn)?;
        restrict_db_permissions(path)?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_pragmas(&conn)?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        run_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        run_migrations(&mut self.conn.lock())
    }

    pub fn schema_version(&self) -> Result<i64> {
        user_version(&self.conn.lock())
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM leads;", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl LeadStore for SqliteLeadStore {
    fn find_by_email(&self, email: &str) -> Result<Option<Lead>> {
        let conn = self.conn.lock();
        let lead = conn
            .query_row(
                "SELECT email, timestamp FROM leads WHERE email = ?1;",
                [email],
                |row| {
                    Ok(Lead {
                        email: row.get(0)?,
                        timestamp: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(lead)
    }

    fn insert_lead(&self, lead: &Lead) -> Result<InsertOutcome> {
        let conn = self.conn.lock();
        let inserted = conn.execute(
            "INSERT INTO leads (email, timestamp) VALUES (?1, ?2)
             ON CONFLICT(email) DO NOTHING;",
            params![lead.email, lead.timestamp],
        );

        match inserted {
            Ok(0) => Ok(InsertOutcome::Conflict),
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Conflict),
            Err(err) => Err(err.into()),
        }
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "busy_timeout", 2000)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_db_permissions(path: &Path) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    if path.exists() {
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn restrict_db_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Applies the schema once per database, tracked through `PRAGMA user_version`.
fn run_migrations(conn: &mut Connection) -> Result<()> {
    let current = user_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(StoreError::Migration(format!(
            "db version {} newer than supported {}",
            current, SCHEMA_VERSION
        )));
    }
    if current == SCHEMA_VERSION {
        return Ok(());
    }

    tracing::debug!("Upgrading lead schema from {} to {}", current, SCHEMA_VERSION);
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

fn user_version(conn: &Connection) -> Result<i64> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_on_duplicate_email() {
        let store = SqliteLeadStore::open_in_memory().unwrap();
        let first = Lead::new("dup@example.com");
        let mut second = first.clone();
        second.timestamp = "2099-01-01T00:00:00.000Z".to_string();

        assert_eq!(store.insert_lead(&first).unwrap(), InsertOutcome::Inserted);
        assert_eq!(store.insert_lead(&second).unwrap(), InsertOutcome::Conflict);
        assert_eq!(store.find_by_email("dup@example.com").unwrap(), Some(first));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_find_missing_returns_none() {
        let store = SqliteLeadStore::open_in_memory().unwrap();
        assert!(store.find_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_unique_violation_detection() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT PRIMARY KEY); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('a');", []).unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
