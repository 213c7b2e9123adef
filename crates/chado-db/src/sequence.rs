use rusqlite::{params, Connection};

use crate::Result;

/// Advance the named counter and return its new value, starting at 1.
pub fn next_sequence_value(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO id_sequence (name, last_value) VALUES (?1, 1)
         ON CONFLICT(name) DO UPDATE SET last_value = last_value + 1",
        params![name],
    )?;
    let value = conn.query_row(
        "SELECT last_value FROM id_sequence WHERE name = ?1",
        params![name],
        |r| r.get(0),
    )?;
    Ok(value)
}

/// Move the counter so the next value handed out is `last_value + 1`.
pub fn set_sequence_value(conn: &Connection, name: &str, last_value: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO id_sequence (name, last_value) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET last_value = excluded.last_value",
        params![name, last_value],
    )?;
    Ok(())
}
