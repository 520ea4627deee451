//! Decks and their card lines.

use cardhub_model::{CardNumber, Deck, DeckCard, DeckSection, NewDeck};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use crate::row::parsed;
use crate::{Result, StoreError};

const DECK_COLUMNS: &str =
    "id, owner_id, name, game, archetype, description, public, created_at, updated_at";

const LINE_COLUMNS: &str = "id, deck_id, section, quantity, cardnumber, card_name";

fn row_to_deck(row: &Row<'_>) -> rusqlite::Result<Deck> {
    Ok(Deck {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        game: parsed(row, 3)?,
        archetype: row.get(4)?,
        description: row.get(5)?,
        public: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn row_to_line(row: &Row<'_>) -> rusqlite::Result<DeckCard> {
    Ok(DeckCard {
        id: row.get(0)?,
        deck_id: row.get(1)?,
        section: parsed(row, 2)?,
        quantity: row.get(3)?,
        cardnumber: parsed(row, 4)?,
        card_name: row.get(5)?,
    })
}

pub fn create(conn: &Connection, owner_id: i64, deck: &NewDeck) -> Result<Deck> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO decks (owner_id, name, game, archetype, description, public, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            owner_id,
            deck.name,
            deck.game.as_str(),
            deck.archetype,
            deck.description,
            deck.public,
            now,
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(deck_id = id, owner_id, name = %deck.name, "created deck");
    Ok(Deck {
        id,
        owner_id,
        name: deck.name.clone(),
        game: deck.game,
        archetype: deck.archetype.clone(),
        description: deck.description.clone(),
        public: deck.public,
        created_at: now,
        updated_at: now,
    })
}

pub fn get(conn: &Connection, id: i64) -> Result<Deck> {
    conn.query_row(
        &format!("SELECT {DECK_COLUMNS} FROM decks WHERE id = ?1"),
        [id],
        row_to_deck,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("deck", id))
}

/// Like [`get`], but a deck of another owner is reported as missing.
pub fn get_owned(conn: &Connection, id: i64, owner_id: i64) -> Result<Deck> {
    conn.query_row(
        &format!("SELECT {DECK_COLUMNS} FROM decks WHERE id = ?1 AND owner_id = ?2"),
        [id, owner_id],
        row_to_deck,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("deck", id))
}

/// Newest first.
pub fn list_for_owner(conn: &Connection, owner_id: i64) -> Result<Vec<Deck>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DECK_COLUMNS} FROM decks WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let decks = stmt
        .query_map([owner_id], row_to_deck)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(decks)
}

/// Most recently changed decks of an owner.
pub fn recently_updated(conn: &Connection, owner_id: i64, limit: usize) -> Result<Vec<Deck>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DECK_COLUMNS} FROM decks WHERE owner_id = ?1
         ORDER BY updated_at DESC, id DESC LIMIT ?2"
    ))?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let decks = stmt
        .query_map(params![owner_id, limit], row_to_deck)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(decks)
}

pub fn touch(conn: &Connection, id: i64) -> Result<()> {
    conn.execute(
        "UPDATE decks SET updated_at = ?1 WHERE id = ?2",
        params![Utc::now(), id],
    )?;
    Ok(())
}

/// Removes the deck and, by cascade, its lines.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let removed = conn.execute("DELETE FROM decks WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(StoreError::not_found("deck", id));
    }
    info!(deck_id = id, "deleted deck");
    Ok(())
}

/// Main deck lines first, then Digi-Eggs, each by cardnumber.
pub fn lines(conn: &Connection, deck_id: i64) -> Result<Vec<DeckCard>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LINE_COLUMNS} FROM deck_cards WHERE deck_id = ?1
         ORDER BY CASE section WHEN 'MAIN' THEN 0 ELSE 1 END, cardnumber, id"
    ))?;
    let lines = stmt
        .query_map([deck_id], row_to_line)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(lines)
}

pub fn find_line(
    conn: &Connection,
    deck_id: i64,
    section: DeckSection,
    cardnumber: &CardNumber,
) -> Result<Option<DeckCard>> {
    let line = conn
        .query_row(
            &format!(
                "SELECT {LINE_COLUMNS} FROM deck_cards
                 WHERE deck_id = ?1 AND section = ?2 AND cardnumber = ?3
                 ORDER BY id LIMIT 1"
            ),
            params![deck_id, section.as_str(), cardnumber.as_str()],
            row_to_line,
        )
        .optional()?;
    Ok(line)
}

pub fn insert_line(
    conn: &Connection,
    deck_id: i64,
    section: DeckSection,
    cardnumber: &CardNumber,
    card_name: &str,
    quantity: u32,
) -> Result<DeckCard> {
    conn.execute(
        "INSERT INTO deck_cards (deck_id, section, quantity, cardnumber, card_name)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![deck_id, section.as_str(), quantity, cardnumber.as_str(), card_name],
    )?;
    Ok(DeckCard {
        id: conn.last_insert_rowid(),
        deck_id,
        section,
        quantity,
        cardnumber: cardnumber.clone(),
        card_name: card_name.to_string(),
    })
}

/// Write back the quantity and name of an existing line.
pub fn update_line(conn: &Connection, line: &DeckCard) -> Result<()> {
    let updated = conn.execute(
        "UPDATE deck_cards SET quantity = ?1, card_name = ?2 WHERE id = ?3",
        params![line.quantity, line.card_name, line.id],
    )?;
    if updated == 0 {
        return Err(StoreError::not_found("deck line", line.id));
    }
    Ok(())
}

/// Only removes the line when it belongs to `deck_id`.
pub fn delete_line(conn: &Connection, deck_id: i64, line_id: i64) -> Result<()> {
    let removed = conn.execute(
        "DELETE FROM deck_cards WHERE id = ?1 AND deck_id = ?2",
        [line_id, deck_id],
    )?;
    if removed == 0 {
        return Err(StoreError::not_found("deck line", line_id));
    }
    Ok(())
}
