//! Schema, seed data, and data access for the banking server.
//!
//! Every query function takes the [`Variant`]: the insecure variant
//! interpolates request values straight into the SQL text (the injection
//! half of the demo), the hardened variant binds them as parameters.
//! The delta between the two lives entirely in this module so the
//! handlers stay identical across variants.

use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};

use crate::config::Variant;
use crate::models::{FeedbackRow, LoginUser, TransactionRow, UserProfile};

/// Table definitions.
const CREATE_TABLES: [&str; 3] = [
    "CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE,
        password_hash TEXT,
        email TEXT
    )",
    "CREATE TABLE transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        amount REAL,
        description TEXT
    )",
    "CREATE TABLE feedback (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user TEXT,
        comment TEXT
    )",
];

/// SHA-256 hex digest of a password.
///
/// A fast unsalted hash is itself one of the lessons; do not imitate.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Open the in-memory database, create the schema, and seed it.
///
/// Seed data matches the classroom fixture: one user `alice` with
/// password `password123` and two transactions.
///
/// # Errors
///
/// Returns the underlying `rusqlite` error if DDL or seeding fails.
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;

    for sql in CREATE_TABLES {
        conn.execute(sql, [])?;
    }

    conn.execute(
        "INSERT INTO users (username, password_hash, email) VALUES (?1, ?2, ?3)",
        params!["alice", hash_password("password123"), "alice@example.com"],
    )?;
    conn.execute(
        "INSERT INTO transactions (user_id, amount, description) VALUES (1, 25.50, 'Coffee shop')",
        [],
    )?;
    conn.execute(
        "INSERT INTO transactions (user_id, amount, description) VALUES (1, 100, 'Groceries')",
        [],
    )?;

    Ok(conn)
}

/// Look up a user by username for login.
///
/// Insecure: the username is interpolated into the query text, so input
/// like `' OR '1'='1` matches rows it should not.
pub fn find_login_user(
    conn: &Connection,
    variant: Variant,
    username: &str,
) -> rusqlite::Result<Option<LoginUser>> {
    let map = |row: &rusqlite::Row<'_>| {
        Ok(LoginUser {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
        })
    };

    match variant {
        Variant::Insecure => {
            let sql = format!(
                "SELECT id, username, password_hash FROM users WHERE username = '{username}'"
            );
            conn.query_row(&sql, [], map).optional()
        }
        Variant::Hardened => conn
            .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1",
                params![username],
                map,
            )
            .optional(),
    }
}

/// Fetch the profile for a session user. Clean in both variants.
pub fn user_profile(conn: &Connection, user_id: i64) -> rusqlite::Result<Option<UserProfile>> {
    conn.query_row(
        "SELECT username, email FROM users WHERE id = ?1",
        params![user_id],
        |row| {
            Ok(UserProfile {
                username: row.get(0)?,
                email: row.get(1)?,
            })
        },
    )
    .optional()
}

/// Search a user's transactions by description substring, newest first.
///
/// Insecure: the search term is interpolated inside the `LIKE` pattern,
/// so a quote in the term rewrites the WHERE clause.
pub fn search_transactions(
    conn: &Connection,
    variant: Variant,
    user_id: i64,
    query: &str,
) -> rusqlite::Result<Vec<TransactionRow>> {
    let map = |row: &rusqlite::Row<'_>| {
        Ok(TransactionRow {
            id: row.get(0)?,
            amount: row.get(1)?,
            description: row.get(2)?,
        })
    };

    let rows = match variant {
        Variant::Insecure => {
            let sql = format!(
                "SELECT id, amount, description FROM transactions \
                 WHERE user_id = {user_id} AND description LIKE '%{query}%' \
                 ORDER BY id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
        Variant::Hardened => {
            let mut stmt = conn.prepare(
                "SELECT id, amount, description FROM transactions \
                 WHERE user_id = ?1 AND description LIKE ?2 \
                 ORDER BY id DESC",
            )?;
            let pattern = format!("%{query}%");
            let rows = stmt.query_map(params![user_id, pattern], map)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
    };

    Ok(rows)
}

/// Store a feedback comment under the given username.
///
/// The comment is stored verbatim in both variants; only the SQL
/// construction differs.
pub fn insert_feedback(
    conn: &Connection,
    variant: Variant,
    username: &str,
    comment: &str,
) -> rusqlite::Result<()> {
    match variant {
        Variant::Insecure => {
            let sql =
                format!("INSERT INTO feedback (user, comment) VALUES ('{username}', '{comment}')");
            conn.execute(&sql, [])?;
        }
        Variant::Hardened => {
            conn.execute(
                "INSERT INTO feedback (user, comment) VALUES (?1, ?2)",
                params![username, comment],
            )?;
        }
    }
    Ok(())
}

/// List all feedback, newest first.
pub fn list_feedback(conn: &Connection) -> rusqlite::Result<Vec<FeedbackRow>> {
    let mut stmt = conn.prepare("SELECT user, comment FROM feedback ORDER BY id DESC")?;
    let rows = stmt.query_map([], |row| {
        Ok(FeedbackRow {
            user: row.get(0)?,
            comment: row.get(1)?,
        })
    })?;
    rows.collect()
}

/// Update the email of a session user.
pub fn update_email(
    conn: &Connection,
    variant: Variant,
    user_id: i64,
    email: &str,
) -> rusqlite::Result<()> {
    match variant {
        Variant::Insecure => {
            let sql = format!("UPDATE users SET email = '{email}' WHERE id = {user_id}");
            conn.execute(&sql, [])?;
        }
        Variant::Hardened => {
            conn.execute(
                "UPDATE users SET email = ?1 WHERE id = ?2",
                params![email, user_id],
            )?;
        }
    }
    Ok(())
}
