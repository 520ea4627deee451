//! Local card cache.

use cardhub_model::{Card, CardNumber, Evolution};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use serde::Serialize;
use tracing::debug;

use crate::Result;
use crate::row::{like_pattern, parsed};

/// Result cap used when a filter does not set one.
pub const DEFAULT_SEARCH_LIMIT: usize = 60;

const CARD_COLUMNS: &str = "cardnumber, name, card_type, color, color2, level, dp, play_cost, \
     evo_cost_1, evo_color_1, evo_level_1, evo_cost_2, evo_color_2, evo_level_2, \
     attribute, digitype, digitype2, form, rarity, pack, effect, inherit_effect, \
     security_effect, image_url, last_synced_at";

/// Columns matched by the free-text term.
const TEXT_COLUMNS: &[&str] = &[
    "name",
    "cardnumber",
    "card_type",
    "color",
    "pack",
    "rarity",
    "digitype",
    "attribute",
    "effect",
    "inherit_effect",
    "security_effect",
];

fn row_to_card(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        cardnumber: parsed(row, 0)?,
        name: row.get(1)?,
        card_type: row.get(2)?,
        color: row.get(3)?,
        color2: row.get(4)?,
        level: row.get(5)?,
        dp: row.get(6)?,
        play_cost: row.get(7)?,
        evolution: [
            Evolution {
                cost: row.get(8)?,
                color: row.get(9)?,
                level: row.get(10)?,
            },
            Evolution {
                cost: row.get(11)?,
                color: row.get(12)?,
                level: row.get(13)?,
            },
        ],
        attribute: row.get(14)?,
        digitype: row.get(15)?,
        digitype2: row.get(16)?,
        form: row.get(17)?,
        rarity: row.get(18)?,
        pack: row.get(19)?,
        effect: row.get(20)?,
        inherit_effect: row.get(21)?,
        security_effect: row.get(22)?,
        image_url: row.get(23)?,
        last_synced_at: row.get(24)?,
    })
}

/// Insert the card or overwrite every column of the cached copy.
pub fn upsert(conn: &Connection, card: &Card) -> Result<()> {
    let [evo1, evo2] = &card.evolution;
    conn.execute(
        &format!(
            "INSERT INTO cards ({CARD_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                     ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)
             ON CONFLICT (cardnumber) DO UPDATE SET
                 name = excluded.name,
                 card_type = excluded.card_type,
                 color = excluded.color,
                 color2 = excluded.color2,
                 level = excluded.level,
                 dp = excluded.dp,
                 play_cost = excluded.play_cost,
                 evo_cost_1 = excluded.evo_cost_1,
                 evo_color_1 = excluded.evo_color_1,
                 evo_level_1 = excluded.evo_level_1,
                 evo_cost_2 = excluded.evo_cost_2,
                 evo_color_2 = excluded.evo_color_2,
                 evo_level_2 = excluded.evo_level_2,
                 attribute = excluded.attribute,
                 digitype = excluded.digitype,
                 digitype2 = excluded.digitype2,
                 form = excluded.form,
                 rarity = excluded.rarity,
                 pack = excluded.pack,
                 effect = excluded.effect,
                 inherit_effect = excluded.inherit_effect,
                 security_effect = excluded.security_effect,
                 image_url = excluded.image_url,
                 last_synced_at = excluded.last_synced_at"
        ),
        params![
            card.cardnumber.as_str(),
            card.name,
            card.card_type,
            card.color,
            card.color2,
            card.level,
            card.dp,
            card.play_cost,
            evo1.cost,
            evo1.color,
            evo1.level,
            evo2.cost,
            evo2.color,
            evo2.level,
            card.attribute,
            card.digitype,
            card.digitype2,
            card.form,
            card.rarity,
            card.pack,
            card.effect,
            card.inherit_effect,
            card.security_effect,
            card.image_url,
            card.last_synced_at,
        ],
    )?;
    debug!(cardnumber = %card.cardnumber, "cached card");
    Ok(())
}

pub fn get(conn: &Connection, cardnumber: &CardNumber) -> Result<Option<Card>> {
    let card = conn
        .query_row(
            &format!("SELECT {CARD_COLUMNS} FROM cards WHERE cardnumber = ?1"),
            [cardnumber.as_str()],
            row_to_card,
        )
        .optional()?;
    Ok(card)
}

pub fn count(conn: &Connection) -> Result<u64> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
    Ok(u64::try_from(total).unwrap_or_default())
}

/// Search criteria. Text criteria match case-insensitive substrings, except
/// `card_type` which must match exactly (ignoring case). Blank strings are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    /// Matched against name, cardnumber, type, color, pack, rarity,
    /// digitype, attribute and the three effect texts.
    pub text: Option<String>,
    pub name: Option<String>,
    pub card_type: Option<String>,
    pub cardnumber: Option<String>,
    pub color: Option<String>,
    pub digitype: Option<String>,
    pub attribute: Option<String>,
    pub rarity: Option<String>,
    pub pack: Option<String>,
    pub level: Option<u32>,
    pub play_cost_min: Option<u32>,
    pub play_cost_max: Option<u32>,
    pub dp_min: Option<u32>,
    pub dp_max: Option<u32>,
    /// Bounds on the first evolution cost.
    pub evo_cost_min: Option<u32>,
    pub evo_cost_max: Option<u32>,
    pub evo_color: Option<String>,
    pub limit: Option<usize>,
}

impl CardFilter {
    pub fn text(term: impl Into<String>) -> Self {
        Self {
            text: Some(term.into()),
            ..Self::default()
        }
    }

    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(term) = non_blank(self.text.as_deref()) {
            let any = TEXT_COLUMNS
                .iter()
                .map(|column| format!("{column} LIKE ? ESCAPE '\\'"))
                .collect::<Vec<_>>()
                .join(" OR ");
            clauses.push(format!("({any})"));
            let pattern = like_pattern(term);
            values.extend(TEXT_COLUMNS.iter().map(|_| Value::Text(pattern.clone())));
        }

        let contains = [
            ("name", &self.name),
            ("cardnumber", &self.cardnumber),
            ("color", &self.color),
            ("digitype", &self.digitype),
            ("attribute", &self.attribute),
            ("rarity", &self.rarity),
            ("pack", &self.pack),
            ("evo_color_1", &self.evo_color),
        ];
        for (column, needle) in contains {
            if let Some(needle) = non_blank(needle.as_deref()) {
                clauses.push(format!("{column} LIKE ? ESCAPE '\\'"));
                values.push(Value::Text(like_pattern(needle)));
            }
        }

        if let Some(card_type) = non_blank(self.card_type.as_deref()) {
            clauses.push("card_type = ? COLLATE NOCASE".to_string());
            values.push(Value::Text(card_type.to_string()));
        }

        let numeric = [
            ("level = ?", self.level),
            ("play_cost >= ?", self.play_cost_min),
            ("play_cost <= ?", self.play_cost_max),
            ("dp >= ?", self.dp_min),
            ("dp <= ?", self.dp_max),
            ("evo_cost_1 >= ?", self.evo_cost_min),
            ("evo_cost_1 <= ?", self.evo_cost_max),
        ];
        for (clause, bound) in numeric {
            if let Some(bound) = bound {
                clauses.push(clause.to_string());
                values.push(Value::Integer(i64::from(bound)));
            }
        }

        if clauses.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), values)
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Cards matching `filter`, ordered by name then cardnumber.
pub fn search(conn: &Connection, filter: &CardFilter) -> Result<Vec<Card>> {
    let (where_sql, mut values) = filter.where_clause();
    let limit = filter.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
    let sql = format!(
        "SELECT {CARD_COLUMNS} FROM cards{where_sql} ORDER BY name, cardnumber LIMIT ?"
    );
    let mut stmt = conn.prepare(&sql)?;
    let cards = stmt
        .query_map(params_from_iter(values), row_to_card)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(found = cards.len(), limit, "card search");
    Ok(cards)
}

/// Distinct non-empty values offered as search choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardFacets {
    pub card_types: Vec<String>,
    pub colors: Vec<String>,
    pub packs: Vec<String>,
    pub rarities: Vec<String>,
    pub attributes: Vec<String>,
    pub digitypes: Vec<String>,
}

pub fn facets(conn: &Connection) -> Result<CardFacets> {
    Ok(CardFacets {
        card_types: distinct_values(conn, "card_type")?,
        colors: distinct_values(conn, "color")?,
        packs: distinct_values(conn, "pack")?,
        rarities: distinct_values(conn, "rarity")?,
        attributes: distinct_values(conn, "attribute")?,
        digitypes: distinct_values(conn, "digitype")?,
    })
}

fn distinct_values(conn: &Connection, column: &'static str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT DISTINCT {column} FROM cards WHERE {column} <> '' ORDER BY {column}"
    ))?;
    let values = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where() {
        let (sql, values) = CardFilter::default().where_clause();
        assert!(sql.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn blank_terms_are_ignored() {
        let filter = CardFilter {
            name: Some("   ".to_string()),
            level: Some(3),
            ..CardFilter::default()
        };
        let (sql, values) = filter.where_clause();
        assert_eq!(sql, " WHERE level = ?");
        assert_eq!(values, vec![Value::Integer(3)]);
    }

    #[test]
    fn free_text_binds_every_column() {
        let (sql, values) = CardFilter::text("Agumon").where_clause();
        assert_eq!(values.len(), TEXT_COLUMNS.len());
        assert!(sql.contains("security_effect LIKE ?"));
    }
}
