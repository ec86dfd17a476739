use crate::json_field::JsonField;
use crate::models::{BotRow, EventRow, NewBot, NewEvent, UserRow};
use crate::Database;
use anyhow::{Result, bail};
use chrono::Utc;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, email: &str) -> Result<UserRow> {
        let created_at = Utc::now().to_rfc3339();
        let id = self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![username, email, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        Ok(UserRow {
            id,
            username: username.to_string(),
            email: email.to_string(),
            created_at,
        })
    }

    pub fn get_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, username, email, created_at FROM users ORDER BY id")?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    /// Partial update: `None` fields keep their stored values. Returns the
    /// updated row, or `None` when the id does not exist. `created_at` is
    /// never touched.
    pub fn update_user(
        &self,
        id: i64,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserRow>> {
        let changed = self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE users
                 SET username = COALESCE(?1, username),
                     email = COALESCE(?2, email)
                 WHERE id = ?3",
                rusqlite::params![username, email, id],
            )?;
            Ok(changed)
        })?;

        if changed == 0 {
            return Ok(None);
        }
        self.get_user(id)
    }

    pub fn delete_user(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Bots --

    pub fn create_bot(&self, new: NewBot) -> Result<BotRow> {
        let created_at = Utc::now().to_rfc3339();
        let start_time = new.start_time.to_rfc3339();
        let end_time = new.end_time.to_rfc3339();
        let mut meeting_info = new.meeting_info.map(JsonField::new);

        let id = self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO bots (user_id, meeting_info, meeting_name, start_time, end_time,
                                   bot_display_name, bot_image, audio_object_key, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    new.user_id,
                    meeting_info,
                    new.meeting_name,
                    start_time,
                    end_time,
                    new.bot_display_name,
                    new.bot_image,
                    new.audio_object_key,
                    created_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        // The insert flushed the field; the in-memory copy now matches storage.
        if let Some(field) = meeting_info.as_mut() {
            field.mark_clean();
        }

        Ok(BotRow {
            id,
            user_id: new.user_id,
            meeting_info,
            meeting_name: new.meeting_name,
            start_time,
            end_time,
            bot_display_name: new.bot_display_name,
            bot_image: new.bot_image,
            audio_object_key: new.audio_object_key,
            created_at,
        })
    }

    pub fn get_bots(&self) -> Result<Vec<BotRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {BOT_COLUMNS} FROM bots ORDER BY id"))?;
            let rows = stmt
                .query_map([], bot_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_bot(&self, id: i64) -> Result<Option<BotRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {BOT_COLUMNS} FROM bots WHERE id = ?1"))?;
            let row = stmt.query_row([id], bot_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn bot_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT id FROM bots WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn delete_bot(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM bots WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    /// Flush an in-place mutation of the embedded meeting info. Writes the
    /// JSON column only when the field is dirty and clears the flag once
    /// the write lands; returns whether a write happened. A NULL column
    /// has nothing to flush.
    pub fn save_bot_meeting_info(&self, bot: &mut BotRow) -> Result<bool> {
        let Some(field) = bot.meeting_info.as_mut() else {
            return Ok(false);
        };
        if !field.is_dirty() {
            return Ok(false);
        }

        let updated = self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE bots SET meeting_info = ?1 WHERE id = ?2",
                rusqlite::params![&*field, bot.id],
            )?;
            Ok(updated)
        })?;

        if updated == 0 {
            bail!("Bot {} not found", bot.id);
        }

        field.mark_clean();
        Ok(true)
    }

    // -- Events --

    pub fn create_event(&self, new: NewEvent) -> Result<EventRow> {
        let created_at = Utc::now().to_rfc3339();
        let event_time = new.event_time.to_rfc3339();

        let id = self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO events (bot_id, event_type, event_time, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![new.bot_id, new.event_type, event_time, new.details, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        Ok(EventRow {
            id,
            bot_id: new.bot_id,
            event_type: new.event_type,
            event_time,
            details: new.details,
            created_at,
        })
    }

    pub fn get_events(&self) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, bot_id, event_type, event_time, details, created_at
                 FROM events ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], event_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_event(&self, id: i64) -> Result<Option<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, bot_id, event_type, event_time, details, created_at
                 FROM events WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], event_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn get_events_for_bot(&self, bot_id: i64) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, bot_id, event_type, event_time, details, created_at
                 FROM events WHERE bot_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([bot_id], event_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

const BOT_COLUMNS: &str = "id, user_id, meeting_info, meeting_name, start_time, end_time, \
                           bot_display_name, bot_image, audio_object_key, created_at";

fn user_from_row(row: &rusqlite::Row) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn bot_from_row(row: &rusqlite::Row) -> rusqlite::Result<BotRow> {
    Ok(BotRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        meeting_info: row.get(2)?,
        meeting_name: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        bot_display_name: row.get(6)?,
        bot_image: row.get(7)?,
        audio_object_key: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn event_from_row(row: &rusqlite::Row) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        bot_id: row.get(1)?,
        event_type: row.get(2)?,
        event_time: row.get(3)?,
        details: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, email, created_at FROM users WHERE id = ?1")?;
    let row = stmt.query_row([id], user_from_row).optional()?;
    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
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
