use std::collections::HashMap;

use anyhow::Result;
use rusqlite::Connection;
use rusqlite::types::ToSql;

use prconnect_types::models::{StoredRequest, StoredResponse, Transcript};

use crate::Database;
use crate::models::{
    NewUser, OutletRow, OutletUsageRow, ProfileUpdate, RequestRow, ResponseRow, TableCounts,
    TranscriptRow, UserRow,
};

/// Characters kept in a transcript preview before the ellipsis.
const PREVIEW_CHARS: usize = 100;

const USER_COLUMNS: &str = "id, full_name, email, password, company_name, phone, location, is_active, is_admin, created_at, updated_at";

const REQUEST_SELECT: &str = "SELECT r.id, r.title, r.body, r.news_outlet_id, o.name, r.user_id, r.company_name,
            r.category, r.contact_info, r.additional_notes, r.created_at
     FROM requests r
     LEFT JOIN news_outlets o ON o.id = r.news_outlet_id";

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &NewUser<'_>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, full_name, email, password, company_name, is_admin)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    user.id,
                    user.full_name,
                    user.email,
                    user.password_hash,
                    user.company_name,
                    user.is_admin
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, email ASC"
            ))?;
            let rows = stmt
                .query_map([], map_user)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Apply a profile update and return the refreshed row, or `None` if the user is gone.
    pub fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET
                    full_name    = COALESCE(?2, full_name),
                    company_name = COALESCE(?3, company_name),
                    phone        = CASE WHEN ?4 THEN ?5 ELSE phone END,
                    location     = CASE WHEN ?6 THEN ?7 ELSE location END,
                    updated_at   = datetime('now')
                 WHERE id = ?1",
                rusqlite::params![
                    id,
                    update.full_name,
                    update.company_name,
                    update.phone.is_some(),
                    update.phone.clone().flatten(),
                    update.location.is_some(),
                    update.location.clone().flatten(),
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_user(conn, "id", id)
        })
    }

    pub fn set_admin(&self, id: &str, is_admin: bool) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET is_admin = ?2, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![id, is_admin],
            )?;
            Ok(())
        })
    }

    pub fn set_active(&self, id: &str, is_active: bool) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET is_active = ?2, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![id, is_active],
            )?;
            Ok(())
        })
    }

    // -- Outlets --

    pub fn list_outlets(&self) -> Result<Vec<OutletRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM news_outlets ORDER BY id")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(OutletRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Requests --

    /// All requests owned by `user_id`, newest first, with their responses.
    pub fn list_requests_for_user(&self, user_id: &str) -> Result<Vec<StoredRequest>> {
        self.with_conn(|conn| select_requests(conn, "WHERE r.user_id = ?1", &[&user_id], None))
    }

    /// Fetch a request only if it belongs to `user_id`.
    pub fn get_request_for_user(&self, id: i64, user_id: &str) -> Result<Option<StoredRequest>> {
        self.with_conn(|conn| {
            let mut rows = select_requests(
                conn,
                "WHERE r.id = ?1 AND r.user_id = ?2",
                &[&id, &user_id],
                Some(1),
            )?;
            Ok(rows.pop())
        })
    }

    /// Delete a request owned by `user_id`. Responses go with it via
    /// `ON DELETE CASCADE`. Returns the deleted title, or `None` if nothing matched.
    pub fn delete_request_for_user(&self, id: i64, user_id: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let title: Option<String> = conn
                .query_row(
                    "SELECT title FROM requests WHERE id = ?1 AND user_id = ?2",
                    rusqlite::params![id, user_id],
                    |row| row.get(0),
                )
                .optional()?;

            if title.is_some() {
                conn.execute("DELETE FROM requests WHERE id = ?1", [id])?;
            }
            Ok(title)
        })
    }

    /// Every request across all users, newest first.
    pub fn list_all_requests(&self) -> Result<Vec<StoredRequest>> {
        self.with_conn(|conn| select_requests(conn, "", &[], None))
    }

    pub fn recent_requests(&self, limit: u32) -> Result<Vec<StoredRequest>> {
        self.with_conn(|conn| select_requests(conn, "", &[], Some(limit)))
    }

    pub fn recent_requests_for_outlet(&self, outlet_id: i64, limit: u32) -> Result<Vec<StoredRequest>> {
        self.with_conn(|conn| {
            select_requests(conn, "WHERE r.news_outlet_id = ?1", &[&outlet_id], Some(limit))
        })
    }

    // -- Transcripts --

    pub fn insert_transcript(&self, user_id: &str, text: &str) -> Result<Transcript> {
        let word_count = prconnect_types::word_count(text) as i64;
        let preview = transcript_preview(text);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO transcripts (text, word_count, preview, user_id) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![text, word_count, preview, user_id],
            )?;
            let id = conn.last_insert_rowid();
            let row = query_transcript(conn, id, user_id)?
                .ok_or_else(|| anyhow::anyhow!("Transcript {} vanished after insert", id))?;
            Ok(row.into_transcript())
        })
    }

    pub fn list_transcripts(&self, user_id: &str) -> Result<Vec<Transcript>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, text, word_count, preview, user_id, created_at
                 FROM transcripts
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([user_id], map_transcript)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows.into_iter().map(TranscriptRow::into_transcript).collect())
        })
    }

    pub fn get_transcript(&self, id: i64, user_id: &str) -> Result<Option<Transcript>> {
        self.with_conn(|conn| Ok(query_transcript(conn, id, user_id)?.map(TranscriptRow::into_transcript)))
    }

    /// Returns true if a transcript owned by `user_id` was removed.
    pub fn delete_transcript(&self, id: i64, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM transcripts WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![id, user_id],
            )?;
            Ok(removed > 0)
        })
    }

    // -- Analytics --

    pub fn table_counts(&self) -> Result<TableCounts> {
        self.with_conn(|conn| {
            let count = |table: &str| -> Result<i64> {
                Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
            };
            Ok(TableCounts {
                users: count("users")?,
                requests: count("requests")?,
                responses: count("responses")?,
                transcripts: count("transcripts")?,
            })
        })
    }

    /// Request count per outlet, for outlets that have been used at least once.
    pub fn outlet_usage(&self) -> Result<Vec<(String, i64)>> {
        self.with_conn(|conn| {
            grouped_counts(
                conn,
                "SELECT o.name, COUNT(r.id) AS n
                 FROM news_outlets o
                 JOIN requests r ON r.news_outlet_id = o.id
                 GROUP BY o.name
                 ORDER BY n DESC, o.name ASC",
            )
        })
    }

    pub fn category_usage(&self) -> Result<Vec<(String, i64)>> {
        self.with_conn(|conn| {
            grouped_counts(
                conn,
                "SELECT category, COUNT(id) AS n
                 FROM requests
                 WHERE category IS NOT NULL
                 GROUP BY category
                 ORDER BY n DESC, category ASC",
            )
        })
    }

    /// Usage for every outlet, including unused ones, busiest first.
    pub fn outlet_analytics(&self) -> Result<Vec<OutletUsageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT o.id, o.name, COUNT(r.id) AS total, COUNT(DISTINCT r.user_id)
                 FROM news_outlets o
                 LEFT JOIN requests r ON r.news_outlet_id = o.id
                 GROUP BY o.id, o.name
                 ORDER BY total DESC, o.name ASC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(OutletUsageRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        total_usage: row.get(2)?,
                        unique_users: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Transcript count keyed by owning user id.
    pub fn transcript_counts_by_user(&self) -> Result<HashMap<String, i64>> {
        self.with_conn(|conn| {
            let rows = grouped_counts(
                conn,
                "SELECT user_id, COUNT(id) FROM transcripts WHERE user_id IS NOT NULL GROUP BY user_id",
            )?;
            Ok(rows.into_iter().collect())
        })
    }
}

/// First `PREVIEW_CHARS` characters of a transcript, with an ellipsis when cut.
pub fn transcript_preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        company_name: row.get(4)?,
        phone: row.get(5)?,
        location: row.get(6)?,
        is_active: row.get(7)?,
        is_admin: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn query_user(conn: &Connection, column: &'static str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"))?;
    let row = stmt.query_row([value], map_user).optional()?;
    Ok(row)
}

fn map_transcript(row: &rusqlite::Row<'_>) -> rusqlite::Result<TranscriptRow> {
    Ok(TranscriptRow {
        id: row.get(0)?,
        text: row.get(1)?,
        word_count: row.get(2)?,
        preview: row.get(3)?,
        user_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn query_transcript(conn: &Connection, id: i64, user_id: &str) -> Result<Option<TranscriptRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, text, word_count, preview, user_id, created_at
         FROM transcripts WHERE id = ?1 AND user_id = ?2",
    )?;
    let row = stmt
        .query_row(rusqlite::params![id, user_id], map_transcript)
        .optional()?;
    Ok(row)
}

fn grouped_counts(conn: &Connection, sql: &str) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Run a request query (newest first) and attach responses in one batch query.
fn select_requests(
    conn: &Connection,
    filter: &'static str,
    params: &[&dyn ToSql],
    limit: Option<u32>,
) -> Result<Vec<StoredRequest>> {
    let limit_clause = limit.map(|n| format!(" LIMIT {n}")).unwrap_or_default();
    let sql = format!("{REQUEST_SELECT} {filter} ORDER BY r.created_at DESC, r.id DESC{limit_clause}");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok(RequestRow {
                id: row.get(0)?,
                title: row.get(1)?,
                body: row.get(2)?,
                news_outlet_id: row.get(3)?,
                outlet_name: row.get(4)?,
                user_id: row.get(5)?,
                company_name: row.get(6)?,
                category: row.get(7)?,
                contact_info: row.get(8)?,
                additional_notes: row.get(9)?,
                created_at: row.get(10)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut responses = responses_for_requests(conn, &ids)?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let attached = responses.remove(&row.id).unwrap_or_default();
            row.into_request(attached)
        })
        .collect())
}

/// Ids bound per `IN (...)` lookup, well under SQLite's variable limit.
const RESPONSE_BATCH: usize = 500;

/// Batch-fetch responses for a set of request IDs, grouped by request.
fn responses_for_requests(conn: &Connection, request_ids: &[i64]) -> Result<HashMap<i64, Vec<StoredResponse>>> {
    let mut grouped: HashMap<i64, Vec<StoredResponse>> = HashMap::new();

    for chunk in request_ids.chunks(RESPONSE_BATCH) {
        let placeholders: Vec<String> = (1..=chunk.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "SELECT id, body, request_id, tone, word_count, created_at
             FROM responses WHERE request_id IN ({}) ORDER BY id",
            placeholders.join(", ")
        );

        let mut stmt = conn.prepare_cached(&sql)?;
        let params: Vec<&dyn ToSql> = chunk.iter().map(|id| id as &dyn ToSql).collect();

        let rows = stmt
            .query_map(params.as_slice(), |row| {
                Ok(ResponseRow {
                    id: row.get(0)?,
                    body: row.get(1)?,
                    request_id: row.get(2)?,
                    tone: row.get(3)?,
                    word_count: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for row in rows {
            grouped.entry(row.request_id).or_default().push(row.into_response());
        }
    }
    Ok(grouped)
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
