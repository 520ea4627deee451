//! Users and their profiles.

use cardhub_model::{User, UserProfile};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use crate::{Result, StoreError};

const USER_COLUMNS: &str = "id, username, is_staff, created_at";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        is_staff: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_profile(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        user_id: row.get(0)?,
        full_name: row.get(1)?,
        phone: row.get(2)?,
        nickname: row.get(3)?,
        receive_news: row.get(4)?,
    })
}

/// Usernames are unique regardless of case.
pub fn create(conn: &Connection, username: &str, is_staff: bool) -> Result<User> {
    let username = username.trim();
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO users (username, is_staff, created_at) VALUES (?1, ?2, ?3)",
        params![username, is_staff, created_at],
    )
    .map_err(StoreError::from_insert("user", username))?;
    let id = conn.last_insert_rowid();
    info!(user_id = id, username, "created user");
    Ok(User {
        id,
        username: username.to_string(),
        is_staff,
        created_at,
    })
}

pub fn get(conn: &Connection, id: i64) -> Result<User> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        [id],
        row_to_user,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("user", id))
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            [username.trim()],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

pub fn list(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY username COLLATE NOCASE"
    ))?;
    let users = stmt
        .query_map([], row_to_user)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(users)
}

pub fn profile(conn: &Connection, user_id: i64) -> Result<Option<UserProfile>> {
    let profile = conn
        .query_row(
            "SELECT user_id, full_name, phone, nickname, receive_news
             FROM user_profiles WHERE user_id = ?1",
            [user_id],
            row_to_profile,
        )
        .optional()?;
    Ok(profile)
}

/// Insert or replace the profile row of `profile.user_id`.
pub fn save_profile(conn: &Connection, profile: &UserProfile) -> Result<()> {
    conn.execute(
        "INSERT INTO user_profiles (user_id, full_name, phone, nickname, receive_news)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (user_id) DO UPDATE SET
             full_name = excluded.full_name,
             phone = excluded.phone,
             nickname = excluded.nickname,
             receive_news = excluded.receive_news",
        params![
            profile.user_id,
            profile.full_name,
            profile.phone,
            profile.nickname,
            profile.receive_news
        ],
    )?;
    Ok(())
}
