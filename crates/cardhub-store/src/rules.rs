//! Copy rules, banlist entries and pair bans.

use cardhub_model::{BanlistRule, CardNumber, CopyRule, PairBanRule};
use cardhub_validate::{FormatLimits, RuleBook};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use tracing::{debug, info};

use crate::row::parsed;
use crate::{Result, StoreError};

fn row_to_copy_rule(row: &Row<'_>) -> rusqlite::Result<CopyRule> {
    Ok(CopyRule {
        cardnumber: parsed(row, 0)?,
        max_copies: row.get(1)?,
        notes: row.get(2)?,
    })
}

fn row_to_ban_rule(row: &Row<'_>) -> rusqlite::Result<BanlistRule> {
    Ok(BanlistRule {
        cardnumber: parsed(row, 0)?,
        status: parsed(row, 1)?,
        notes: row.get(2)?,
    })
}

fn row_to_pair_ban(row: &Row<'_>) -> rusqlite::Result<PairBanRule> {
    let card_a: CardNumber = parsed(row, 0)?;
    let card_b: CardNumber = parsed(row, 1)?;
    let notes: String = row.get(2)?;
    PairBanRule::new(card_a, card_b, notes)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error)))
}

pub fn upsert_copy_rule(conn: &Connection, rule: &CopyRule) -> Result<()> {
    conn.execute(
        "INSERT INTO copy_rules (cardnumber, max_copies, notes) VALUES (?1, ?2, ?3)
         ON CONFLICT (cardnumber) DO UPDATE SET
             max_copies = excluded.max_copies,
             notes = excluded.notes",
        params![rule.cardnumber.as_str(), rule.max_copies, rule.notes],
    )?;
    info!(cardnumber = %rule.cardnumber, max_copies = rule.max_copies, "saved copy rule");
    Ok(())
}

pub fn list_copy_rules(conn: &Connection) -> Result<Vec<CopyRule>> {
    let mut stmt =
        conn.prepare("SELECT cardnumber, max_copies, notes FROM copy_rules ORDER BY cardnumber")?;
    let rules = stmt
        .query_map([], row_to_copy_rule)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rules)
}

pub fn delete_copy_rule(conn: &Connection, cardnumber: &CardNumber) -> Result<()> {
    let removed = conn.execute(
        "DELETE FROM copy_rules WHERE cardnumber = ?1",
        [cardnumber.as_str()],
    )?;
    if removed == 0 {
        return Err(StoreError::not_found("copy rule", cardnumber));
    }
    Ok(())
}

pub fn upsert_ban_rule(conn: &Connection, rule: &BanlistRule) -> Result<()> {
    conn.execute(
        "INSERT INTO banlist_rules (cardnumber, status, notes) VALUES (?1, ?2, ?3)
         ON CONFLICT (cardnumber) DO UPDATE SET
             status = excluded.status,
             notes = excluded.notes",
        params![rule.cardnumber.as_str(), rule.status.as_str(), rule.notes],
    )?;
    info!(cardnumber = %rule.cardnumber, status = %rule.status, "saved banlist rule");
    Ok(())
}

pub fn list_ban_rules(conn: &Connection) -> Result<Vec<BanlistRule>> {
    let mut stmt =
        conn.prepare("SELECT cardnumber, status, notes FROM banlist_rules ORDER BY cardnumber")?;
    let rules = stmt
        .query_map([], row_to_ban_rule)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rules)
}

pub fn delete_ban_rule(conn: &Connection, cardnumber: &CardNumber) -> Result<()> {
    let removed = conn.execute(
        "DELETE FROM banlist_rules WHERE cardnumber = ?1",
        [cardnumber.as_str()],
    )?;
    if removed == 0 {
        return Err(StoreError::not_found("banlist rule", cardnumber));
    }
    Ok(())
}

/// Pairs are stored ordered, so `(A, B)` and `(B, A)` collide.
pub fn add_pair_ban(conn: &Connection, rule: &PairBanRule) -> Result<()> {
    conn.execute(
        "INSERT INTO pair_ban_rules (card_a, card_b, notes) VALUES (?1, ?2, ?3)",
        params![rule.card_a().as_str(), rule.card_b().as_str(), rule.notes],
    )
    .map_err(StoreError::from_insert("pair ban", rule))?;
    info!(card_a = %rule.card_a(), card_b = %rule.card_b(), "saved pair ban");
    Ok(())
}

pub fn list_pair_bans(conn: &Connection) -> Result<Vec<PairBanRule>> {
    let mut stmt =
        conn.prepare("SELECT card_a, card_b, notes FROM pair_ban_rules ORDER BY card_a, card_b")?;
    let rules = stmt
        .query_map([], row_to_pair_ban)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rules)
}

pub fn delete_pair_ban(conn: &Connection, rule: &PairBanRule) -> Result<()> {
    let removed = conn.execute(
        "DELETE FROM pair_ban_rules WHERE card_a = ?1 AND card_b = ?2",
        params![rule.card_a().as_str(), rule.card_b().as_str()],
    )?;
    if removed == 0 {
        return Err(StoreError::not_found("pair ban", rule));
    }
    Ok(())
}

/// Every stored rule, ready for the legality checks.
pub fn load_rulebook(conn: &Connection, limits: FormatLimits) -> Result<RuleBook> {
    let book = RuleBook::from_rules(
        limits,
        list_copy_rules(conn)?,
        list_ban_rules(conn)?,
        list_pair_bans(conn)?,
    );
    debug!(
        copy_rules = book.copy_rules().count(),
        ban_rules = book.ban_rules().count(),
        pair_bans = book.pair_bans().len(),
        "loaded rulebook"
    );
    Ok(book)
}
