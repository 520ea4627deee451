//! Table definitions. Every statement is idempotent so the schema can be
//! applied on each open.

use rusqlite::Connection;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY,
    username    TEXT NOT NULL UNIQUE COLLATE NOCASE,
    is_staff    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_profiles (
    user_id       INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    full_name     TEXT NOT NULL DEFAULT '',
    phone         TEXT NOT NULL DEFAULT '',
    nickname      TEXT NOT NULL DEFAULT '',
    receive_news  INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS cards (
    cardnumber       TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    card_type        TEXT NOT NULL DEFAULT '',
    color            TEXT NOT NULL DEFAULT '',
    color2           TEXT NOT NULL DEFAULT '',
    level            INTEGER,
    dp               INTEGER,
    play_cost        INTEGER,
    evo_cost_1       INTEGER,
    evo_color_1      TEXT NOT NULL DEFAULT '',
    evo_level_1      INTEGER,
    evo_cost_2       INTEGER,
    evo_color_2      TEXT NOT NULL DEFAULT '',
    evo_level_2      INTEGER,
    attribute        TEXT NOT NULL DEFAULT '',
    digitype         TEXT NOT NULL DEFAULT '',
    digitype2        TEXT NOT NULL DEFAULT '',
    form             TEXT NOT NULL DEFAULT '',
    rarity           TEXT NOT NULL DEFAULT '',
    pack             TEXT NOT NULL DEFAULT '',
    effect           TEXT NOT NULL DEFAULT '',
    inherit_effect   TEXT NOT NULL DEFAULT '',
    security_effect  TEXT NOT NULL DEFAULT '',
    image_url        TEXT NOT NULL DEFAULT '',
    last_synced_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_cards_name ON cards(name);
CREATE INDEX IF NOT EXISTS idx_cards_type ON cards(card_type);
CREATE INDEX IF NOT EXISTS idx_cards_color ON cards(color);
CREATE INDEX IF NOT EXISTS idx_cards_level ON cards(level);
CREATE INDEX IF NOT EXISTS idx_cards_play_cost ON cards(play_cost);
CREATE INDEX IF NOT EXISTS idx_cards_dp ON cards(dp);
CREATE INDEX IF NOT EXISTS idx_cards_pack ON cards(pack);

CREATE TABLE IF NOT EXISTS card_prices (
    cardnumber   TEXT PRIMARY KEY,
    name         TEXT NOT NULL DEFAULT '',
    price_cents  INTEGER NOT NULL DEFAULT 0,
    product_url  TEXT NOT NULL DEFAULT '',
    in_stock     INTEGER NOT NULL DEFAULT 1,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS copy_rules (
    cardnumber  TEXT PRIMARY KEY,
    max_copies  INTEGER NOT NULL,
    notes       TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS banlist_rules (
    cardnumber  TEXT PRIMARY KEY,
    status      TEXT NOT NULL,
    notes       TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS pair_ban_rules (
    id      INTEGER PRIMARY KEY,
    card_a  TEXT NOT NULL,
    card_b  TEXT NOT NULL,
    notes   TEXT NOT NULL DEFAULT '',
    UNIQUE (card_a, card_b)
);

CREATE TABLE IF NOT EXISTS decks (
    id           INTEGER PRIMARY KEY,
    owner_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    game         TEXT NOT NULL,
    archetype    TEXT NOT NULL DEFAULT '',
    description  TEXT NOT NULL DEFAULT '',
    public       INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_decks_owner ON decks(owner_id, updated_at);

CREATE TABLE IF NOT EXISTS deck_cards (
    id          INTEGER PRIMARY KEY,
    deck_id     INTEGER NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
    section     TEXT NOT NULL,
    quantity    INTEGER NOT NULL CHECK (quantity > 0),
    cardnumber  TEXT NOT NULL,
    card_name   TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_deck_cards_deck ON deck_cards(deck_id, section, cardnumber);

CREATE TABLE IF NOT EXISTS loyalty_events (
    id           INTEGER PRIMARY KEY,
    user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    kind         TEXT NOT NULL,
    points       INTEGER NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_loyalty_events_user ON loyalty_events(user_id, created_at);

CREATE TABLE IF NOT EXISTS rewards (
    id           INTEGER PRIMARY KEY,
    name         TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    cost_points  INTEGER NOT NULL,
    active       INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS reward_redemptions (
    id           INTEGER PRIMARY KEY,
    user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    reward_id    INTEGER NOT NULL REFERENCES rewards(id) ON DELETE CASCADE,
    points_used  INTEGER NOT NULL,
    completed    INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS news_posts (
    id            INTEGER PRIMARY KEY,
    title         TEXT NOT NULL,
    slug          TEXT NOT NULL UNIQUE,
    summary       TEXT NOT NULL DEFAULT '',
    body          TEXT NOT NULL DEFAULT '',
    highlight     INTEGER NOT NULL DEFAULT 0,
    is_published  INTEGER NOT NULL DEFAULT 1,
    published_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS seasons (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    start_date  TEXT NOT NULL,
    end_date    TEXT NOT NULL,
    active      INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS tournaments (
    id           INTEGER PRIMARY KEY,
    name         TEXT NOT NULL,
    game         TEXT NOT NULL,
    date         TEXT NOT NULL,
    location     TEXT NOT NULL DEFAULT '',
    description  TEXT NOT NULL DEFAULT '',
    season_id    INTEGER REFERENCES seasons(id) ON DELETE SET NULL,
    status       TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tournament_players (
    id             INTEGER PRIMARY KEY,
    tournament_id  INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
    user_id        INTEGER REFERENCES users(id) ON DELETE SET NULL,
    player_name    TEXT NOT NULL,
    deck_id        INTEGER REFERENCES decks(id) ON DELETE SET NULL,
    archetype      TEXT NOT NULL DEFAULT '',
    wins           INTEGER NOT NULL DEFAULT 0,
    draws          INTEGER NOT NULL DEFAULT 0,
    losses         INTEGER NOT NULL DEFAULT 0,
    points         INTEGER NOT NULL DEFAULT 0,
    omw            REAL NOT NULL DEFAULT 0,
    oomw           REAL NOT NULL DEFAULT 0,
    UNIQUE (tournament_id, player_name)
);
";

pub(crate) fn apply(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)
}
