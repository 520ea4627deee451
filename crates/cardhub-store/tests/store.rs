use cardhub_model::{
    BanStatus, BanlistRule, Card, CardNumber, CardPrice, CopyRule, DeckSection, Game,
    LoyaltyKind, NewDeck, NewNewsPost, NewTournament, PairBanRule, PlayerResult, UserProfile,
};
use cardhub_store::{
    CardFilter, Store, StoreError, cards, decks, loyalty, news, prices, rules, tournaments, users,
};
use cardhub_validate::FormatLimits;
use chrono::{Duration, NaiveDate, Utc};

fn cn(value: &str) -> CardNumber {
    CardNumber::new(value).unwrap()
}

fn card(number: &str, name: &str, card_type: &str, level: Option<u32>) -> Card {
    let mut card = Card::new(cn(number), name).with_type(card_type);
    card.level = level;
    card.color = "Red".to_string();
    card
}

fn date(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

#[test]
fn open_file_database_twice() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.sqlite3");
    {
        let store = Store::open(&path).unwrap();
        users::create(store.conn(), "ana", true).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
    }
    let store = Store::open(&path).unwrap();
    let ana = users::find_by_username(store.conn(), "ANA").unwrap().unwrap();
    assert!(ana.is_staff);
}

#[test]
fn duplicate_username_is_a_conflict() {
    let store = Store::open_in_memory().unwrap();
    users::create(store.conn(), "ana", false).unwrap();
    let err = users::create(store.conn(), "Ana", false).unwrap_err();
    assert!(matches!(err, StoreError::Conflict { entity: "user", .. }));
}

#[test]
fn profile_upsert() {
    let store = Store::open_in_memory().unwrap();
    let user = users::create(store.conn(), "bia", false).unwrap();
    assert!(users::profile(store.conn(), user.id).unwrap().is_none());

    let mut profile = UserProfile::empty(user.id);
    profile.nickname = "B".to_string();
    users::save_profile(store.conn(), &profile).unwrap();
    profile.receive_news = false;
    users::save_profile(store.conn(), &profile).unwrap();

    let stored = users::profile(store.conn(), user.id).unwrap().unwrap();
    assert_eq!(stored, profile);
}

#[test]
fn card_upsert_overwrites() {
    let store = Store::open_in_memory().unwrap();
    let mut agumon = card("BT1-010", "Agumon", "Digimon", Some(3));
    cards::upsert(store.conn(), &agumon).unwrap();
    agumon.name = "Agumon (alt)".to_string();
    agumon.evolution[0].cost = Some(0);
    cards::upsert(store.conn(), &agumon).unwrap();

    let stored = cards::get(store.conn(), &cn("bt1-010")).unwrap().unwrap();
    assert_eq!(stored.name, "Agumon (alt)");
    assert_eq!(stored.evolution[0].cost, Some(0));
    assert_eq!(cards::count(store.conn()).unwrap(), 1);
}

#[test]
fn card_search_filters() {
    let store = Store::open_in_memory().unwrap();
    for card in [
        card("BT1-010", "Agumon", "Digimon", Some(3)),
        card("BT1-011", "Greymon", "Digimon", Some(4)),
        card("BT1-001", "Koromon", "Digi-Egg", Some(2)),
        card("BT1-085", "Tai Kamiya", "Tamer", None),
    ] {
        cards::upsert(store.conn(), &card).unwrap();
    }

    let by_text = cards::search(store.conn(), &CardFilter::text("mon")).unwrap();
    let names: Vec<&str> = by_text.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Agumon", "Greymon", "Koromon"]);

    let digimon = CardFilter {
        card_type: Some("digimon".to_string()),
        level: Some(4),
        ..CardFilter::default()
    };
    let found = cards::search(store.conn(), &digimon).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Greymon");

    let capped = CardFilter {
        limit: Some(2),
        ..CardFilter::default()
    };
    assert_eq!(cards::search(store.conn(), &capped).unwrap().len(), 2);

    let wildcard = cards::search(store.conn(), &CardFilter::text("%")).unwrap();
    assert!(wildcard.is_empty());

    let facets = cards::facets(store.conn()).unwrap();
    assert_eq!(facets.card_types, ["Digi-Egg", "Digimon", "Tamer"]);
    assert_eq!(facets.colors, ["Red"]);
    assert!(facets.packs.is_empty());
}

#[test]
fn rules_load_into_rulebook() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn();
    rules::upsert_copy_rule(
        conn,
        &CopyRule {
            cardnumber: cn("BT6-085"),
            max_copies: 50,
            notes: String::new(),
        },
    )
    .unwrap();
    rules::upsert_ban_rule(
        conn,
        &BanlistRule {
            cardnumber: cn("BT2-047"),
            status: BanStatus::Limited1,
            notes: String::new(),
        },
    )
    .unwrap();
    rules::upsert_ban_rule(
        conn,
        &BanlistRule {
            cardnumber: cn("BT2-047"),
            status: BanStatus::Banned,
            notes: "updated".to_string(),
        },
    )
    .unwrap();
    let pair = PairBanRule::new(cn("BT2-020"), cn("BT1-010"), "").unwrap();
    rules::add_pair_ban(conn, &pair).unwrap();
    let reversed = PairBanRule::new(cn("BT1-010"), cn("BT2-020"), "").unwrap();
    assert!(matches!(
        rules::add_pair_ban(conn, &reversed),
        Err(StoreError::Conflict { .. })
    ));

    let book = rules::load_rulebook(conn, FormatLimits::default()).unwrap();
    assert_eq!(book.effective_limit(&cn("BT6-085")), 50);
    assert_eq!(book.effective_limit(&cn("BT2-047")), 0);
    assert_eq!(book.pair_bans().len(), 1);

    rules::delete_pair_ban(conn, &reversed).unwrap();
    assert!(rules::list_pair_bans(conn).unwrap().is_empty());
    assert!(rules::delete_copy_rule(conn, &cn("BT1-001")).unwrap_err().is_not_found());
}

#[test]
fn deck_lines_cascade_on_delete() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn();
    let owner = users::create(conn, "caio", false).unwrap();
    let other = users::create(conn, "dana", false).unwrap();
    let deck = decks::create(
        conn,
        owner.id,
        &NewDeck {
            name: "Red Hybrid".to_string(),
            game: Game::Digimon,
            ..NewDeck::default()
        },
    )
    .unwrap();

    decks::insert_line(conn, deck.id, DeckSection::Egg, &cn("BT1-001"), "Koromon", 4).unwrap();
    let mut line =
        decks::insert_line(conn, deck.id, DeckSection::Main, &cn("BT1-010"), "Agumon", 2).unwrap();
    line.quantity = 4;
    decks::update_line(conn, &line).unwrap();

    let lines = decks::lines(conn, deck.id).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].section, DeckSection::Main);
    assert_eq!(lines[0].quantity, 4);

    let found = decks::find_line(conn, deck.id, DeckSection::Egg, &cn("bt1-001")).unwrap();
    assert!(found.is_some());

    assert!(decks::get_owned(conn, deck.id, other.id).unwrap_err().is_not_found());

    decks::delete(conn, deck.id).unwrap();
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM deck_cards", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn unreadable_column_is_reported_as_corrupt() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn();
    let owner = users::create(conn, "fabi", false).unwrap();
    let deck = decks::create(conn, owner.id, &NewDeck::default()).unwrap();
    conn.execute("UPDATE decks SET game = 'CHESS' WHERE id = ?1", [deck.id])
        .unwrap();

    let err = decks::get_owned(conn, deck.id, owner.id).unwrap_err();
    match err {
        StoreError::CorruptColumn { column, message } => {
            assert_eq!(column, 3);
            assert!(message.contains("CHESS"), "{message}");
        }
        other => panic!("expected a corrupt column, got {other:?}"),
    }
}

#[test]
fn deck_prices_only_for_deck_cards() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn();
    let owner = users::create(conn, "edu", false).unwrap();
    let deck = decks::create(conn, owner.id, &NewDeck::default()).unwrap();
    decks::insert_line(conn, deck.id, DeckSection::Main, &cn("BT1-010"), "Agumon", 4).unwrap();
    for (number, cents) in [("BT1-010", 150), ("BT1-011", 300)] {
        prices::upsert(
            conn,
            &CardPrice {
                cardnumber: cn(number),
                name: String::new(),
                price_cents: cents,
                product_url: String::new(),
                in_stock: true,
                updated_at: Utc::now(),
            },
        )
        .unwrap();
    }

    let by_card = prices::for_deck(conn, deck.id).unwrap();
    assert_eq!(by_card.len(), 1);
    assert_eq!(by_card[&cn("BT1-010")].price_cents, 150);
    assert_eq!(prices::list(conn).unwrap().len(), 2);
}

#[test]
fn loyalty_balance_is_sum_of_events() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn();
    let user = users::create(conn, "fabi", false).unwrap();
    assert_eq!(loyalty::balance(conn, user.id).unwrap(), 0);

    loyalty::insert_event(conn, user.id, LoyaltyKind::Purchase, 120, "Booster box").unwrap();
    loyalty::insert_event(conn, user.id, LoyaltyKind::Bonus, -20, "Adjustment").unwrap();
    assert_eq!(loyalty::balance(conn, user.id).unwrap(), 100);

    let latest = loyalty::events(conn, user.id, Some(1)).unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].points, -20);
    assert_eq!(loyalty::events(conn, user.id, None).unwrap().len(), 2);

    loyalty::create_reward(conn, "Sleeves", "", 300, true).unwrap();
    loyalty::create_reward(conn, "Playmat", "", 900, true).unwrap();
    let hidden = loyalty::create_reward(conn, "Old promo", "", 10, false).unwrap();
    let active = loyalty::list_rewards(conn, true, None).unwrap();
    let names: Vec<&str> = active.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Sleeves", "Playmat"]);
    assert_eq!(loyalty::list_rewards(conn, false, Some(1)).unwrap()[0].id, hidden.id);
}

#[test]
fn news_feed_queries() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn();
    let now = Utc::now();
    let post = |title: &str, highlight: bool, published: bool| NewNewsPost {
        title: title.to_string(),
        highlight,
        is_published: published,
        ..NewNewsPost::default()
    };
    let old = news::insert(conn, &post("Old", true, true), "old", now - Duration::days(2)).unwrap();
    news::insert(conn, &post("New", false, true), "new", now).unwrap();
    news::insert(conn, &post("Draft", true, false), "draft", now).unwrap();

    let featured = news::published(conn, Some(true), &[], 5).unwrap();
    assert_eq!(featured.len(), 1);
    let everything_else = news::published(conn, None, &[old.id], 20).unwrap();
    let slugs: Vec<&str> = everything_else.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["new"]);

    assert!(news::slug_exists(conn, "draft").unwrap());
    assert!(news::published_by_slug(conn, "draft").unwrap().is_none());
    assert!(matches!(
        news::insert(conn, &post("Again", false, true), "old", now),
        Err(StoreError::Conflict { .. })
    ));
}

#[test]
fn rankings_aggregate_results() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn();
    let result = |name: &str, archetype: &str, wins: u32, draws: u32, losses: u32| PlayerResult {
        player_name: name.to_string(),
        archetype: archetype.to_string(),
        wins,
        draws,
        losses,
        ..PlayerResult::default()
    };

    let mut ids = Vec::new();
    for day in ["2025-01-10", "2025-03-10"] {
        let tournament = tournaments::create_tournament(
            conn,
            &NewTournament {
                name: format!("Weekly {day}"),
                game: Game::Digimon,
                date: date(day),
                location: String::new(),
                description: String::new(),
                season_id: None,
            },
        )
        .unwrap();
        ids.push(tournament.id);
    }
    tournaments::insert_player(conn, ids[0], &result("Ana", "Red Hybrid", 3, 0, 1)).unwrap();
    tournaments::insert_player(conn, ids[0], &result("Bia", "Jesmon", 2, 1, 1)).unwrap();
    tournaments::insert_player(conn, ids[1], &result("Bia", "Jesmon", 4, 0, 0)).unwrap();
    tournaments::insert_player(conn, ids[1], &result("Caio", "", 1, 0, 3)).unwrap();
    assert!(matches!(
        tournaments::insert_player(conn, ids[1], &result("Caio", "", 0, 0, 0)),
        Err(StoreError::Conflict { .. })
    ));

    let overall = tournaments::player_ranking(conn, None).unwrap();
    let names: Vec<&str> = overall.iter().map(|r| r.player_name.as_str()).collect();
    assert_eq!(names, ["Bia", "Ana", "Caio"]);
    assert_eq!(overall[0].total_points, 19);
    assert_eq!(overall[0].tournaments_played, 2);

    let january = tournaments::player_ranking(conn, Some((date("2025-01-01"), date("2025-01-31"))))
        .unwrap();
    assert_eq!(january.len(), 2);
    assert_eq!(january[0].player_name, "Ana");

    let archetypes = tournaments::archetype_ranking(conn, None).unwrap();
    assert_eq!(archetypes.len(), 2);
    assert_eq!(archetypes[0].archetype, "Jesmon");
    assert_eq!(archetypes[0].total_uses, 2);

    let standings = tournaments::standings(conn, ids[0]).unwrap();
    let order: Vec<&str> = standings.iter().map(|p| p.player_name.as_str()).collect();
    assert_eq!(order, ["Ana", "Bia"]);
}
