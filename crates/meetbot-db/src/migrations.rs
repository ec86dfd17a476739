use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL,
            email       TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS bots (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id           INTEGER NOT NULL REFERENCES users(id),
            meeting_info      TEXT,
            meeting_name      TEXT,
            start_time        TEXT NOT NULL,
            end_time          TEXT NOT NULL,
            bot_display_name  TEXT,
            bot_image         TEXT,
            audio_object_key  TEXT,
            created_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_bots_user
            ON bots(user_id);

        CREATE TABLE IF NOT EXISTS events (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            bot_id      INTEGER NOT NULL REFERENCES bots(id),
            event_type  TEXT NOT NULL,
            event_time  TEXT NOT NULL,
            details     TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_events_bot
            ON events(bot_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
