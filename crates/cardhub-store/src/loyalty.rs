//! Loyalty ledger, rewards and redemptions.

use cardhub_model::{LoyaltyEvent, LoyaltyKind, Reward, RewardRedemption};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use crate::row::parsed;
use crate::{Result, StoreError};

const EVENT_COLUMNS: &str = "id, user_id, kind, points, description, created_at";
const REWARD_COLUMNS: &str = "id, name, description, cost_points, active";

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<LoyaltyEvent> {
    Ok(LoyaltyEvent {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: parsed(row, 2)?,
        points: row.get(3)?,
        description: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn row_to_reward(row: &Row<'_>) -> rusqlite::Result<Reward> {
    Ok(Reward {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        cost_points: row.get(3)?,
        active: row.get(4)?,
    })
}

fn row_to_redemption(row: &Row<'_>) -> rusqlite::Result<RewardRedemption> {
    Ok(RewardRedemption {
        id: row.get(0)?,
        user_id: row.get(1)?,
        reward_id: row.get(2)?,
        points_used: row.get(3)?,
        completed: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Append an entry to the user's ledger. `points` may be negative.
pub fn insert_event(
    conn: &Connection,
    user_id: i64,
    kind: LoyaltyKind,
    points: i64,
    description: &str,
) -> Result<LoyaltyEvent> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO loyalty_events (user_id, kind, points, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![user_id, kind.as_str(), points, description, created_at],
    )?;
    let id = conn.last_insert_rowid();
    info!(user_id, kind = %kind, points, "recorded loyalty event");
    Ok(LoyaltyEvent {
        id,
        user_id,
        kind,
        points,
        description: description.to_string(),
        created_at,
    })
}

/// Sum of every ledger entry of the user.
pub fn balance(conn: &Connection, user_id: i64) -> Result<i64> {
    let balance = conn.query_row(
        "SELECT COALESCE(SUM(points), 0) FROM loyalty_events WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(balance)
}

/// Newest first, optionally capped.
pub fn events(conn: &Connection, user_id: i64, limit: Option<usize>) -> Result<Vec<LoyaltyEvent>> {
    let limit = limit.map_or(-1, |limit| i64::try_from(limit).unwrap_or(i64::MAX));
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM loyalty_events WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC LIMIT ?2"
    ))?;
    let events = stmt
        .query_map(params![user_id, limit], row_to_event)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(events)
}

pub fn create_reward(
    conn: &Connection,
    name: &str,
    description: &str,
    cost_points: u32,
    active: bool,
) -> Result<Reward> {
    conn.execute(
        "INSERT INTO rewards (name, description, cost_points, active) VALUES (?1, ?2, ?3, ?4)",
        params![name, description, cost_points, active],
    )?;
    let id = conn.last_insert_rowid();
    info!(reward_id = id, name, cost_points, "created reward");
    Ok(Reward {
        id,
        name: name.to_string(),
        description: description.to_string(),
        cost_points,
        active,
    })
}

pub fn get_reward(conn: &Connection, id: i64) -> Result<Reward> {
    conn.query_row(
        &format!("SELECT {REWARD_COLUMNS} FROM rewards WHERE id = ?1"),
        [id],
        row_to_reward,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("reward", id))
}

/// Cheapest first.
pub fn list_rewards(conn: &Connection, active_only: bool, limit: Option<usize>) -> Result<Vec<Reward>> {
    let limit = limit.map_or(-1, |limit| i64::try_from(limit).unwrap_or(i64::MAX));
    let mut stmt = conn.prepare(&format!(
        "SELECT {REWARD_COLUMNS} FROM rewards WHERE active = 1 OR ?1 = 0
         ORDER BY cost_points, name, id LIMIT ?2"
    ))?;
    let rewards = stmt
        .query_map(params![active_only, limit], row_to_reward)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rewards)
}

pub fn set_reward_active(conn: &Connection, id: i64, active: bool) -> Result<()> {
    let updated = conn.execute(
        "UPDATE rewards SET active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    if updated == 0 {
        return Err(StoreError::not_found("reward", id));
    }
    Ok(())
}

pub fn insert_redemption(
    conn: &Connection,
    user_id: i64,
    reward_id: i64,
    points_used: u32,
    completed: bool,
) -> Result<RewardRedemption> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO reward_redemptions (user_id, reward_id, points_used, completed, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![user_id, reward_id, points_used, completed, created_at],
    )?;
    Ok(RewardRedemption {
        id: conn.last_insert_rowid(),
        user_id,
        reward_id,
        points_used,
        completed,
        created_at,
    })
}

/// Newest first.
pub fn redemptions(conn: &Connection, user_id: i64) -> Result<Vec<RewardRedemption>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, reward_id, points_used, completed, created_at
         FROM reward_redemptions WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC",
    )?;
    let redemptions = stmt
        .query_map([user_id], row_to_redemption)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(redemptions)
}
