//! SQLite-backed genome graph topology.
//!
//! A graph data directory holds exactly one `*.sqlite3` topology database
//! with the tables `reference_sets`, `refs`, `variant_sets`, `sequences` and
//! `joins`. Unlike the interval stores, these collections paginate by raw
//! offset: every search answers `(total_count, slice)` for `[start, end)` in
//! a stable ORDER BY, and the page token is the next slice offset.
//!
//! A fresh read-only connection is opened for each request and closed with
//! it; nothing is cached across requests.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, params};

use crate::error::{Error, Result};
use crate::types::{Join, Reference, ReferenceSet, Sequence, Side, Strand, VariantSet};

pub struct GraphStore {
    db_path: PathBuf,
}

impl GraphStore {
    /// Locates the single topology database under `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "sqlite3") {
                candidates.push(path);
            }
        }
        match candidates.len() {
            0 => Err(Error::NotFound(format!(
                "no graph topology database (*.sqlite3) in {}",
                dir.display()
            ))),
            1 => Ok(Self {
                db_path: candidates.remove(0),
            }),
            n => Err(Error::InvalidInput(format!(
                "expected one graph topology database in {}, found {n}",
                dir.display()
            ))),
        }
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY,
        )?)
    }

    fn count(conn: &Connection, sql: &str) -> Result<u64> {
        let total: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(total as u64)
    }

    pub fn reference_sets(&self, start: u64, end: u64) -> Result<(u64, Vec<ReferenceSet>)> {
        let conn = self.connect()?;
        let total = Self::count(&conn, "SELECT COUNT(*) FROM reference_sets")?;
        let mut stmt = conn.prepare(
            "SELECT id, md5checksum FROM reference_sets ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit(start, end), start as i64], |row| {
            Ok(ReferenceSet {
                id: row.get(0)?,
                md5checksum: row.get(1)?,
            })
        })?;
        Ok((total, rows.collect::<rusqlite::Result<_>>()?))
    }

    pub fn references(&self, start: u64, end: u64) -> Result<(u64, Vec<Reference>)> {
        let conn = self.connect()?;
        let total = Self::count(&conn, "SELECT COUNT(*) FROM refs")?;
        let mut stmt = conn.prepare(
            "SELECT id, name, sequence_id, start, length, md5checksum
             FROM refs ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit(start, end), start as i64], |row| {
            Ok(Reference {
                id: row.get(0)?,
                name: row.get(1)?,
                sequence_id: row.get(2)?,
                start: row.get::<_, i64>(3)? as u64,
                length: row.get::<_, i64>(4)? as u64,
                md5checksum: row.get(5)?,
            })
        })?;
        Ok((total, rows.collect::<rusqlite::Result<_>>()?))
    }

    pub fn variant_sets(&self, start: u64, end: u64) -> Result<(u64, Vec<VariantSet>)> {
        let conn = self.connect()?;
        let total = Self::count(&conn, "SELECT COUNT(*) FROM variant_sets")?;
        let mut stmt = conn
            .prepare("SELECT id, dataset_id FROM variant_sets ORDER BY id LIMIT ?1 OFFSET ?2")?;
        let rows = stmt.query_map(params![limit(start, end), start as i64], |row| {
            Ok(VariantSet {
                id: row.get(0)?,
                dataset_id: row.get(1)?,
            })
        })?;
        Ok((total, rows.collect::<rusqlite::Result<_>>()?))
    }

    pub fn sequences(
        &self,
        start: u64,
        end: u64,
        list_bases: bool,
    ) -> Result<(u64, Vec<Sequence>)> {
        let conn = self.connect()?;
        let total = Self::count(&conn, "SELECT COUNT(*) FROM sequences")?;
        let mut stmt = conn.prepare(
            "SELECT id, length, bases FROM sequences ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit(start, end), start as i64], |row| {
            Ok(Sequence {
                id: row.get(0)?,
                length: row.get::<_, i64>(1)? as u64,
                bases: if list_bases { row.get(2)? } else { None },
            })
        })?;
        Ok((total, rows.collect::<rusqlite::Result<_>>()?))
    }

    pub fn joins(
        &self,
        start: u64,
        end: u64,
        sequence_id: Option<&str>,
    ) -> Result<(u64, Vec<Join>)> {
        let conn = self.connect()?;
        // The optional filter must constrain the count and the slice alike,
        // or the emitted offsets drift off the collection.
        let filter = match sequence_id {
            Some(_) => " WHERE side1_sequence_id = ?1 OR side2_sequence_id = ?1",
            None => "",
        };
        let order = " ORDER BY side1_sequence_id, side1_position, rowid";

        let (total, rows) = match sequence_id {
            Some(sequence_id) => {
                let total: i64 = conn.query_row(
                    &format!("SELECT COUNT(*) FROM joins{filter}"),
                    params![sequence_id],
                    |row| row.get(0),
                )?;
                let mut stmt = conn.prepare(&format!(
                    "SELECT side1_sequence_id, side1_position, side1_forward,
                            side2_sequence_id, side2_position, side2_forward
                     FROM joins{filter}{order} LIMIT ?2 OFFSET ?3"
                ))?;
                let joins = stmt
                    .query_map(
                        params![sequence_id, limit(start, end), start as i64],
                        join_from_row,
                    )?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                (total as u64, joins)
            }
            None => {
                let total = Self::count(&conn, "SELECT COUNT(*) FROM joins")?;
                let mut stmt = conn.prepare(&format!(
                    "SELECT side1_sequence_id, side1_position, side1_forward,
                            side2_sequence_id, side2_position, side2_forward
                     FROM joins{order} LIMIT ?1 OFFSET ?2"
                ))?;
                let joins = stmt
                    .query_map(params![limit(start, end), start as i64], join_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                (total, joins)
            }
        };
        Ok((total, rows))
    }

    /// Substring of a sequence's bases, clamped to its length.
    pub fn sequence_bases(&self, id: &str, start: u64, end: Option<u64>) -> Result<String> {
        let conn = self.connect()?;
        let bases: String = conn
            .query_row(
                "SELECT bases FROM sequences WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound(id.to_string()),
                other => Error::Database(other),
            })?;
        let len = bases.len() as u64;
        let start = start.min(len) as usize;
        let end = end.unwrap_or(len).min(len) as usize;
        if start > end {
            return Err(Error::InvalidRange(format!(
                "start {start} is greater than end {end}"
            )));
        }
        Ok(bases[start..end].to_string())
    }
}

fn limit(start: u64, end: u64) -> i64 {
    end.saturating_sub(start) as i64
}

fn join_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Join> {
    let side = |sequence_id: String, position: i64, forward: bool| Side {
        sequence_id,
        position: position as u64,
        strand: if forward {
            Strand::Positive
        } else {
            Strand::Negative
        },
    };
    Ok(Join {
        side1: side(row.get(0)?, row.get(1)?, row.get(2)?),
        side2: side(row.get(3)?, row.get(4)?, row.get(5)?),
    })
}
