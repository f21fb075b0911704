use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id            TEXT PRIMARY KEY,
                full_name     TEXT NOT NULL,
                email         TEXT NOT NULL UNIQUE,
                password      TEXT NOT NULL,
                company_name  TEXT NOT NULL,
                phone         TEXT,
                location      TEXT,
                is_active     INTEGER NOT NULL DEFAULT 1,
                is_admin      INTEGER NOT NULL DEFAULT 0,
                created_at    TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE news_outlets (
                id    INTEGER PRIMARY KEY AUTOINCREMENT,
                name  TEXT NOT NULL UNIQUE
            );

            -- One row per (submission, outlet). user_id is nullable for legacy rows only.
            CREATE TABLE requests (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                title             TEXT NOT NULL,
                body              TEXT NOT NULL,
                news_outlet_id    INTEGER NOT NULL REFERENCES news_outlets(id),
                user_id           TEXT REFERENCES users(id),
                company_name      TEXT,
                category          TEXT,
                contact_info      TEXT,
                additional_notes  TEXT,
                created_at        TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_requests_user ON requests(user_id, created_at);
            CREATE INDEX idx_requests_outlet ON requests(news_outlet_id, created_at);

            CREATE TABLE responses (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                body        TEXT NOT NULL,
                request_id  INTEGER NOT NULL REFERENCES requests(id) ON DELETE CASCADE,
                tone        TEXT,
                word_count  INTEGER,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_responses_request ON responses(request_id);

            CREATE TABLE transcripts (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                text        TEXT NOT NULL,
                word_count  INTEGER NOT NULL DEFAULT 0,
                preview     TEXT NOT NULL DEFAULT '',
                user_id     TEXT REFERENCES users(id),
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_transcripts_user ON transcripts(user_id, created_at);

            INSERT OR IGNORE INTO news_outlets (name)
                VALUES ('TechCrunch'), ('The Verge'), ('Forbes'), ('General');

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 1);

        let outlets: i64 = conn
            .query_row("SELECT COUNT(*) FROM news_outlets", [], |r| r.get(0))
            .unwrap();
        assert_eq!(outlets, 4);
    }
}
