//! Shop prices keyed by cardnumber.

use std::collections::BTreeMap;

use cardhub_model::{CardNumber, CardPrice};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use crate::row::parsed;
use crate::{Result, StoreError};

const PRICE_COLUMNS: &str = "cardnumber, name, price_cents, product_url, in_stock, updated_at";

fn row_to_price(row: &Row<'_>) -> rusqlite::Result<CardPrice> {
    Ok(CardPrice {
        cardnumber: parsed(row, 0)?,
        name: row.get(1)?,
        price_cents: row.get(2)?,
        product_url: row.get(3)?,
        in_stock: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn upsert(conn: &Connection, price: &CardPrice) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO card_prices ({PRICE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (cardnumber) DO UPDATE SET
                 name = excluded.name,
                 price_cents = excluded.price_cents,
                 product_url = excluded.product_url,
                 in_stock = excluded.in_stock,
                 updated_at = excluded.updated_at"
        ),
        params![
            price.cardnumber.as_str(),
            price.name,
            price.price_cents,
            price.product_url,
            price.in_stock,
            price.updated_at,
        ],
    )?;
    info!(cardnumber = %price.cardnumber, cents = price.price_cents, "saved price");
    Ok(())
}

pub fn get(conn: &Connection, cardnumber: &CardNumber) -> Result<Option<CardPrice>> {
    let price = conn
        .query_row(
            &format!("SELECT {PRICE_COLUMNS} FROM card_prices WHERE cardnumber = ?1"),
            [cardnumber.as_str()],
            row_to_price,
        )
        .optional()?;
    Ok(price)
}

pub fn list(conn: &Connection) -> Result<Vec<CardPrice>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRICE_COLUMNS} FROM card_prices ORDER BY cardnumber"
    ))?;
    let prices = stmt
        .query_map([], row_to_price)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(prices)
}

/// Prices for the cards of a deck, keyed by cardnumber.
pub fn for_deck(conn: &Connection, deck_id: i64) -> Result<BTreeMap<CardNumber, CardPrice>> {
    let mut stmt = conn.prepare(
        "SELECT p.cardnumber, p.name, p.price_cents, p.product_url, p.in_stock, p.updated_at
         FROM card_prices p
         WHERE p.cardnumber IN (SELECT cardnumber FROM deck_cards WHERE deck_id = ?1)",
    )?;
    let prices = stmt
        .query_map([deck_id], row_to_price)?
        .map(|price| price.map(|price| (price.cardnumber.clone(), price)))
        .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
    Ok(prices)
}

pub fn delete(conn: &Connection, cardnumber: &CardNumber) -> Result<()> {
    let removed = conn.execute(
        "DELETE FROM card_prices WHERE cardnumber = ?1",
        [cardnumber.as_str()],
    )?;
    if removed == 0 {
        return Err(StoreError::not_found("price", cardnumber));
    }
    Ok(())
}
