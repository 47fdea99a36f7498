//! SQLite-backed roster store.
//!
//! # Schema
//! The database is expected to contain three tables:
//! - `researchers`: (orcid_id TEXT PRIMARY KEY, full_name TEXT, email TEXT)
//! - `employment`: (orcid_id TEXT, organization TEXT, department TEXT,
//!   role_title TEXT, start_year INTEGER, end_year INTEGER)
//! - `publications`: (orcid_id TEXT, publication_title TEXT,
//!   publication_year INTEGER, work_url TEXT, doi_url TEXT)
//!
//! A store owns one connection for its whole lifetime; the connection is closed
//! when the store is dropped.

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use super::{Dataset, RosterStore, StoreError, StoreResult};
use crate::models::{EmploymentRecord, PublicationRecord, Researcher};

const REQUIRED_TABLES: [&str; 3] = ["researchers", "employment", "publications"];

/// Roster store over a SQLite database
pub struct SqliteStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl SqliteStore {
    /// Open an existing database read-only.
    ///
    /// Fails with [`StoreError::Connection`] if the file is missing or does not
    /// contain the roster tables.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Connection(format!("{}: {}", path.display(), e)))?;

        let store = Self { conn };
        store.verify_schema()?;
        tracing::debug!(path = %path.display(), "Opened roster database");
        Ok(store)
    }

    /// Open or create a writable database and make sure the schema exists.
    pub fn create(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Connection(format!("{}: {}", path.display(), e)))?;

        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory database with the schema in place
    pub fn in_memory() -> StoreResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create the roster tables if they do not exist
    pub fn initialize_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS researchers (
                orcid_id TEXT PRIMARY KEY,
                full_name TEXT,
                email TEXT
            );

            CREATE TABLE IF NOT EXISTS employment (
                orcid_id TEXT NOT NULL,
                organization TEXT,
                department TEXT,
                role_title TEXT,
                start_year INTEGER,
                end_year INTEGER
            );

            CREATE TABLE IF NOT EXISTS publications (
                orcid_id TEXT NOT NULL,
                publication_title TEXT,
                publication_year INTEGER,
                work_url TEXT,
                doi_url TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_employment_orcid ON employment(orcid_id);
            CREATE INDEX IF NOT EXISTS idx_publications_orcid ON publications(orcid_id);
            "#,
        )?;
        Ok(())
    }

    fn verify_schema(&self) -> StoreResult<()> {
        for table in REQUIRED_TABLES {
            let found: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .optional()?;

            if found.is_none() {
                return Err(StoreError::Connection(format!(
                    "database has no `{}` table",
                    table
                )));
            }
        }
        Ok(())
    }

    /// Load a dataset in one transaction.
    ///
    /// Researchers are upserted by ORCID iD; employment and publication rows are
    /// appended. Publication fields the schema has no column for are not stored.
    pub fn import(&mut self, dataset: &Dataset) -> StoreResult<()> {
        if let Some(p) = dataset.publications.iter().find(|p| p.orcid_id.is_none()) {
            return Err(StoreError::InvalidData(format!(
                "publication '{}' has no orcid_id",
                p.display_title()
            )));
        }

        let tx = self.conn.transaction()?;

        for r in &dataset.researchers {
            tx.execute(
                r#"
                INSERT INTO researchers (orcid_id, full_name, email) VALUES (?1, ?2, ?3)
                ON CONFLICT(orcid_id) DO UPDATE SET full_name = excluded.full_name, email = excluded.email
                "#,
                params![r.orcid_id, r.full_name, r.email],
            )?;
        }

        for e in &dataset.employment {
            tx.execute(
                r#"
                INSERT INTO employment (orcid_id, organization, department, role_title, start_year, end_year)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    e.orcid_id,
                    e.organization,
                    e.department,
                    e.role_title,
                    e.start_year,
                    e.end_year
                ],
            )?;
        }

        let mut dropped_fields = 0;
        for p in &dataset.publications {
            dropped_fields += p.extra.len();
            tx.execute(
                r#"
                INSERT INTO publications (orcid_id, publication_title, publication_year, work_url, doi_url)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![p.orcid_id, p.title, p.year, p.url, p.doi_url],
            )?;
        }

        tx.commit()?;

        if dropped_fields > 0 {
            tracing::warn!(
                fields = dropped_fields,
                "Publication fields without a column were not imported"
            );
        }
        tracing::info!(
            researchers = dataset.researchers.len(),
            employment = dataset.employment.len(),
            publications = dataset.publications.len(),
            "Imported dataset"
        );
        Ok(())
    }

    fn row_to_researcher(row: &rusqlite::Row) -> rusqlite::Result<Researcher> {
        Ok(Researcher {
            orcid_id: row.get(0)?,
            full_name: row.get(1)?,
            email: row.get(2)?,
        })
    }

    fn row_to_employment(row: &rusqlite::Row) -> rusqlite::Result<EmploymentRecord> {
        Ok(EmploymentRecord {
            orcid_id: row.get(0)?,
            organization: row.get(1)?,
            department: row.get(2)?,
            role_title: row.get(3)?,
            start_year: row.get(4)?,
            end_year: row.get(5)?,
        })
    }

    fn row_to_publication(row: &rusqlite::Row) -> rusqlite::Result<PublicationRecord> {
        Ok(PublicationRecord {
            orcid_id: row.get(0)?,
            title: row.get(1)?,
            year: row.get(2)?,
            url: row.get(3)?,
            doi_url: row.get(4)?,
            ..Default::default()
        })
    }
}

/// Turn a search term into a `LIKE` pattern matching it anywhere
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

const MATCHING_RESEARCHERS: &str = r#"
    FROM researchers r
    WHERE r.full_name IS NOT NULL
      AND (r.full_name LIKE ?1 ESCAPE '\'
           OR EXISTS (
               SELECT 1 FROM employment e
               WHERE e.orcid_id = r.orcid_id AND e.department LIKE ?1 ESCAPE '\'
           ))
"#;

impl RosterStore for SqliteStore {
    fn search_researchers(
        &self,
        term: &str,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<Researcher>> {
        let sql = format!(
            "SELECT r.orcid_id, r.full_name, r.email {} ORDER BY r.full_name COLLATE NOCASE, r.orcid_id LIMIT ?2 OFFSET ?3",
            MATCHING_RESEARCHERS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let researchers = stmt
            .query_map(
                params![like_pattern(term), to_sql_int(limit), to_sql_int(offset)],
                Self::row_to_researcher,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(term, offset, limit, found = researchers.len(), "Searched researchers");
        Ok(researchers)
    }

    fn count_researchers(&self, term: &str) -> StoreResult<usize> {
        let sql = format!("SELECT COUNT(*) {}", MATCHING_RESEARCHERS);
        let count: i64 = self
            .conn
            .query_row(&sql, [like_pattern(term)], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn find_researcher(&self, key: &str) -> StoreResult<Option<Researcher>> {
        let researcher = self
            .conn
            .query_row(
                r#"
                SELECT orcid_id, full_name, email
                FROM researchers
                WHERE orcid_id = ?1 OR full_name = ?1
                ORDER BY orcid_id = ?1 DESC, orcid_id
                LIMIT 1
                "#,
                [key],
                Self::row_to_researcher,
            )
            .optional()?;
        Ok(researcher)
    }

    fn fetch_publications(&self, orcid_id: &str) -> StoreResult<Vec<PublicationRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT orcid_id, publication_title, publication_year, work_url, doi_url
            FROM publications
            WHERE orcid_id = ?1
            ORDER BY publication_year DESC
            "#,
        )?;

        let records = stmt
            .query_map([orcid_id], Self::row_to_publication)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(orcid_id, rows = records.len(), "Fetched publications");
        Ok(records)
    }

    fn fetch_employment(&self, orcid_id: &str) -> StoreResult<Vec<EmploymentRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT orcid_id, organization, department, role_title, start_year, end_year
            FROM employment
            WHERE orcid_id = ?1
            ORDER BY start_year IS NULL, start_year DESC
            "#,
        )?;

        let records = stmt
            .query_map([orcid_id], Self::row_to_employment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
