use anyhow::Result;
use rusqlite::Connection;
use tracing::{info, warn};

use prconnect_types::messages::{GeneratedPressRelease, PressReleaseRequest};

use crate::Database;
use crate::queries::OptionalExt;

/// Outcome of persisting one generation run.
#[derive(Debug, Default)]
pub struct StoredBatch {
    /// Request row ids, in outlet order, for outlets that were stored.
    pub request_ids: Vec<i64>,
    /// Outlets whose rows could not be written.
    pub skipped: Vec<String>,
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

impl Database {
    /// Store one Request + Response pair per generated release.
    ///
    /// Each outlet is written inside its own savepoint: a failure there is
    /// logged and only that outlet is skipped. The batch commits once at the
    /// end, and a failed commit rolls everything back and returns the error.
    pub fn store_generation(
        &self,
        user_id: &str,
        brief: &PressReleaseRequest,
        releases: &[GeneratedPressRelease],
    ) -> Result<StoredBatch> {
        self.with_conn_mut(|conn| {
            let mut tx = conn.transaction()?;
            let mut batch = StoredBatch::default();

            for release in releases {
                let sp = tx.savepoint()?;
                let stored = insert_release(&sp, user_id, brief, release).and_then(|id| {
                    sp.commit()?;
                    Ok(id)
                });
                match stored {
                    Ok(request_id) => batch.request_ids.push(request_id),
                    Err(e) => {
                        warn!("Skipping storage for outlet '{}': {:#}", release.outlet, e);
                        batch.skipped.push(release.outlet.clone());
                    }
                }
            }

            tx.commit()?;
            info!(
                "Stored {} requests ({} skipped) for user {}",
                batch.request_ids.len(),
                batch.skipped.len(),
                user_id
            );
            Ok(batch)
        })
    }
}

fn ensure_outlet(conn: &Connection, name: &str) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM news_outlets WHERE name = ?1", [name], |row| row.get(0))
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }
    conn.execute("INSERT INTO news_outlets (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

fn insert_release(
    conn: &Connection,
    user_id: &str,
    brief: &PressReleaseRequest,
    release: &GeneratedPressRelease,
) -> Result<i64> {
    let outlet_id = ensure_outlet(conn, &release.outlet)?;

    conn.execute(
        "INSERT INTO requests
            (title, body, news_outlet_id, user_id, company_name, category, contact_info, additional_notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            or_default(&brief.title, "Untitled Press Release"),
            or_default(&brief.body, "No content provided"),
            outlet_id,
            user_id,
            or_default(&brief.company_name, "Unknown Company"),
            or_default(&brief.category, "Company Milestone"),
            brief.contact_info.as_deref().unwrap_or_default(),
            brief.additional_notes.as_deref().unwrap_or_default(),
        ],
    )?;
    let request_id = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO responses (body, request_id, tone, word_count) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![release.content, request_id, release.tone, release.word_count as i64],
    )?;

    Ok(request_id)
}
