use cardhub_core::{
    CacheOutcome, CardPayload, CardSource, Hub, HubError, JsonFileSource, RankingScope,
    SourceError,
};
use cardhub_model::{
    BanStatus, Card, CardNumber, DeckSection, Game, IssueCode, LoyaltyKind, NewDeck,
    NewNewsPost, NewTournament, PlayerResult, ProfileUpdate, TournamentStatus, User,
};
use cardhub_store::cards;
use chrono::{Duration, NaiveDate, Utc};

fn cn(value: &str) -> CardNumber {
    CardNumber::new(value).unwrap()
}

fn cache(hub: &Hub, number: &str, name: &str, card_type: &str) {
    let card = Card::new(cn(number), name).with_type(card_type);
    cards::upsert(hub.store().conn(), &card).unwrap();
}

fn setup() -> (Hub, User) {
    let hub = Hub::in_memory().unwrap();
    let user = hub.create_user("ana", false).unwrap();
    cache(&hub, "BT1-001", "Koromon", "Digi-Egg");
    cache(&hub, "BT1-010", "Agumon", "Digimon");
    cache(&hub, "BT1-011", "Greymon", "Digimon");
    cache(&hub, "BT6-085", "Gabumon", "Digimon");
    (hub, user)
}

fn new_deck(hub: &Hub, user: &User, name: &str) -> i64 {
    hub.create_deck(
        user,
        NewDeck {
            name: name.to_string(),
            ..NewDeck::default()
        },
    )
    .unwrap()
    .id
}

fn legality_code(error: HubError) -> IssueCode {
    match error {
        HubError::Legality(issue) => issue.code,
        other => panic!("expected legality error, got {other:?}"),
    }
}

#[test]
fn deck_name_is_required() {
    let (hub, user) = setup();
    let err = hub
        .create_deck(
            &user,
            NewDeck {
                name: "   ".to_string(),
                ..NewDeck::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, HubError::Invalid(_)));
}

#[test]
fn add_card_merges_lines_and_picks_section() {
    let (mut hub, user) = setup();
    let deck = new_deck(&hub, &user, "Red Hybrid");

    hub.add_card(&user, deck, &cn("bt1-010"), 2).unwrap();
    let merged = hub.add_card(&user, deck, &cn("BT1-010"), 2).unwrap();
    assert_eq!(merged.quantity, 4);
    assert_eq!(merged.card_name, "Agumon");

    let egg = hub.add_card(&user, deck, &cn("BT1-001"), 0).unwrap();
    assert_eq!(egg.section, DeckSection::Egg);
    assert_eq!(egg.quantity, 1);

    let view = hub.show_deck(&user, deck).unwrap();
    assert_eq!(view.lines.len(), 2);
    assert_eq!(view.main_total, 4);
    assert_eq!(view.egg_total, 1);
    assert_eq!(view.pricing.missing, 2);
}

#[test]
fn add_card_enforces_copy_rules() {
    let (mut hub, user) = setup();
    let deck = new_deck(&hub, &user, "Limits");

    let err = hub.add_card(&user, deck, &cn("BT1-011"), 5).unwrap_err();
    assert_eq!(legality_code(err), IssueCode::CopyLimitExceeded);

    hub.set_copy_rule(cn("BT6-085"), 50, "any number").unwrap();
    hub.add_card(&user, deck, &cn("BT6-085"), 20).unwrap();
    hub.add_card(&user, deck, &cn("BT6-085"), 20).unwrap();

    hub.set_ban_rule(cn("BT1-011"), BanStatus::Banned, "").unwrap();
    let err = hub.add_card(&user, deck, &cn("BT1-011"), 1).unwrap_err();
    assert_eq!(legality_code(err), IssueCode::Banned);

    hub.add_card(&user, deck, &cn("BT6-085"), 10).unwrap();
    let err = hub.add_card(&user, deck, &cn("BT1-010"), 1).unwrap_err();
    assert_eq!(legality_code(err), IssueCode::SectionFull);
}

#[test]
fn add_card_rejects_pair_ban() {
    let (mut hub, user) = setup();
    let deck = new_deck(&hub, &user, "Pairs");
    hub.add_pair_ban(cn("BT1-011"), cn("BT1-010"), "").unwrap();

    hub.add_card(&user, deck, &cn("BT1-010"), 1).unwrap();
    let err = hub.add_card(&user, deck, &cn("BT1-011"), 1).unwrap_err();
    assert_eq!(legality_code(err), IssueCode::PairBanned);

    let limit = hub.card_limit(&cn("BT1-010")).unwrap();
    assert_eq!(limit.effective, 4);
    assert_eq!(limit.pair_banned_with, vec![cn("BT1-011")]);
}

#[test]
fn rejected_addition_leaves_deck_unchanged() {
    let (mut hub, user) = setup();
    let deck = new_deck(&hub, &user, "Unchanged");
    hub.add_card(&user, deck, &cn("BT1-010"), 4).unwrap();
    assert!(hub.add_card(&user, deck, &cn("BT1-010"), 1).is_err());
    let view = hub.show_deck(&user, deck).unwrap();
    assert_eq!(view.lines[0].quantity, 4);
}

#[test]
fn uncached_cards_cannot_be_added() {
    let (mut hub, user) = setup();
    let deck = new_deck(&hub, &user, "Unknown");
    let err = hub.add_card(&user, deck, &cn("EX9-999"), 1).unwrap_err();
    assert!(matches!(err, HubError::CardUnavailable(ref number) if number.as_str() == "EX9-999"));
    assert!(hub.show_deck(&user, deck).unwrap().lines.is_empty());
}

#[test]
fn decks_of_other_users_are_hidden() {
    let (mut hub, owner) = setup();
    let intruder = hub.create_user("bia", false).unwrap();
    let deck = new_deck(&hub, &owner, "Private");

    assert!(matches!(
        hub.show_deck(&intruder, deck),
        Err(HubError::NotFound { .. })
    ));
    assert!(matches!(
        hub.add_card(&intruder, deck, &cn("BT1-010"), 1),
        Err(HubError::NotFound { .. })
    ));
    assert!(matches!(
        hub.delete_deck(&intruder, deck),
        Err(HubError::NotFound { .. })
    ));
    hub.delete_deck(&owner, deck).unwrap();
    assert!(hub.list_decks(&owner).unwrap().is_empty());
}

#[test]
fn non_digimon_decks_cannot_take_cards() {
    let (mut hub, user) = setup();
    let deck = hub
        .create_deck(
            &user,
            NewDeck {
                name: "Lorcana pile".to_string(),
                game: Game::Lorcana,
                ..NewDeck::default()
            },
        )
        .unwrap();
    assert!(matches!(
        hub.add_card(&user, deck.id, &cn("BT1-010"), 1),
        Err(HubError::UnsupportedGame(Game::Lorcana))
    ));
}

#[test]
fn validate_reports_rule_changes_and_uncached_lines() {
    let (mut hub, user) = setup();
    let deck = new_deck(&hub, &user, "Checked");
    hub.add_card(&user, deck, &cn("BT1-010"), 4).unwrap();
    hub.add_card(&user, deck, &cn("BT1-011"), 2).unwrap();
    hub.set_ban_rule(cn("BT1-010"), BanStatus::Limited1, "").unwrap();
    hub.add_pair_ban(cn("BT1-010"), cn("BT1-011"), "").unwrap();
    hub.store()
        .conn()
        .execute("DELETE FROM cards WHERE cardnumber = 'BT1-011'", [])
        .unwrap();

    let report = hub.validate_deck(&user, deck).unwrap();
    let codes: Vec<IssueCode> = report.issues.iter().map(|issue| issue.code).collect();
    assert_eq!(
        codes,
        [
            IssueCode::CopyLimitExceeded,
            IssueCode::PairBanned,
            IssueCode::UncachedCard
        ]
    );
    assert_eq!(report.error_count(), 2);
    assert_eq!(report.warning_count(), 1);
}

#[test]
fn deck_pricing_totals_known_prices() {
    let (mut hub, user) = setup();
    let deck = new_deck(&hub, &user, "Priced");
    hub.add_card(&user, deck, &cn("BT1-010"), 3).unwrap();
    hub.add_card(&user, deck, &cn("BT1-011"), 1).unwrap();
    let price = hub.set_price(&cn("BT1-010"), 250, " https://shop.example/bt1-010 ", true).unwrap();
    assert_eq!(price.name, "Agumon");
    assert_eq!(price.product_url, "https://shop.example/bt1-010");
    assert!(matches!(
        hub.set_price(&cn("BT1-011"), -1, "", true),
        Err(HubError::Invalid(_))
    ));

    let pricing = hub.show_deck(&user, deck).unwrap().pricing;
    insta::assert_json_snapshot!(pricing, @r#"
    {
      "rows": [
        {
          "quantity": 3,
          "cardnumber": "BT1-010",
          "name": "Agumon",
          "unit_cents": 250,
          "subtotal_cents": 750,
          "product_url": "https://shop.example/bt1-010",
          "in_stock": true
        },
        {
          "quantity": 1,
          "cardnumber": "BT1-011",
          "name": "Greymon",
          "unit_cents": null,
          "subtotal_cents": null,
          "product_url": "",
          "in_stock": true
        }
      ],
      "total_cents": 750,
      "missing": 1
    }
    "#);
}

struct CountingSource {
    inner: JsonFileSource,
    calls: std::cell::Cell<usize>,
}

impl CardSource for CountingSource {
    fn fetch(&self, cardnumber: &CardNumber) -> Result<Option<CardPayload>, SourceError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.fetch(cardnumber)
    }

    fn cardnumbers(&self) -> Result<Vec<CardNumber>, SourceError> {
        self.inner.cardnumbers()
    }
}

fn counting_source() -> CountingSource {
    let payloads: Vec<CardPayload> = serde_json::from_str(
        r#"[
            {"cardnumber": "BT1-010", "name": "Agumon (fresh)", "type": "Digimon", "level": "3"},
            {"cardnumber": "BT2-001", "name": "Tanemon", "type": "Digi-Egg"}
        ]"#,
    )
    .unwrap();
    CountingSource {
        inner: JsonFileSource::from_payloads(payloads),
        calls: std::cell::Cell::new(0),
    }
}

#[test]
fn get_or_fetch_uses_cache_until_stale() {
    let (hub, _) = setup();
    let source = counting_source();

    let cached = hub.get_or_fetch(&source, &cn("BT1-010"), true).unwrap();
    assert_eq!(cached.outcome, CacheOutcome::Cached);
    assert_eq!(cached.card.name, "Agumon");
    assert_eq!(source.calls.get(), 0);

    let fetched = hub.get_or_fetch(&source, &cn("bt2-001"), false).unwrap();
    assert_eq!(fetched.outcome, CacheOutcome::Fetched);
    assert!(fetched.card.is_egg());
    assert!(hub.card(&cn("BT2-001")).is_ok());

    let mut old = hub.card(&cn("BT1-010")).unwrap();
    old.last_synced_at = Utc::now() - Duration::days(45);
    cards::upsert(hub.store().conn(), &old).unwrap();

    let kept = hub.get_or_fetch(&source, &cn("BT1-010"), false).unwrap();
    assert_eq!(kept.outcome, CacheOutcome::Cached);

    let refreshed = hub.get_or_fetch(&source, &cn("BT1-010"), true).unwrap();
    assert_eq!(refreshed.outcome, CacheOutcome::Refreshed);
    assert_eq!(refreshed.card.name, "Agumon (fresh)");
    assert_eq!(refreshed.card.level, Some(3));

    assert!(matches!(
        hub.get_or_fetch(&source, &cn("EX9-999"), false),
        Err(HubError::CardUnavailable(_))
    ));
}

#[test]
fn sync_skips_cached_cards() {
    let (hub, _) = setup();
    let source = counting_source();
    let summary = hub.sync_cards(&source, true, None).unwrap();
    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(hub.cached_card_count().unwrap(), 5);
}

#[test]
fn json_file_source_reads_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.json");
    std::fs::write(&path, r#"[{"id": "BT3-001", "name": "Nyaromon", "cardtype": "Digi-Egg"}]"#)
        .unwrap();
    let source = JsonFileSource::open(&path).unwrap();
    assert_eq!(source.len(), 1);

    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(
        JsonFileSource::open(&path),
        Err(SourceError::Parse { .. })
    ));
}

#[test]
fn redeem_books_a_single_deduction() {
    let (mut hub, user) = setup();
    hub.award_points(&user, LoyaltyKind::Purchase, 500, "Booster box").unwrap();
    let sleeves = hub.create_reward("Sleeves", "", 300).unwrap();
    let playmat = hub.create_reward("Playmat", "", 900).unwrap();

    let redemption = hub.redeem(&user, sleeves.id).unwrap();
    assert!(redemption.completed);
    assert_eq!(hub.balance(&user).unwrap(), 200);

    let overview = hub.loyalty_overview(&user).unwrap();
    assert_eq!(overview.events[0].description, "Reward redeemed: Sleeves");
    assert_eq!(overview.events[0].points, -300);
    assert_eq!(overview.rewards.len(), 2);

    assert!(matches!(
        hub.redeem(&user, playmat.id),
        Err(HubError::InsufficientPoints {
            balance: 200,
            cost: 900
        })
    ));
    hub.set_reward_active(sleeves.id, false).unwrap();
    assert!(matches!(
        hub.redeem(&user, sleeves.id),
        Err(HubError::RewardInactive(_))
    ));
    assert_eq!(hub.redemptions(&user).unwrap().len(), 1);
}

#[test]
fn zero_point_awards_are_rejected() {
    let (hub, user) = setup();
    assert!(matches!(
        hub.award_points(&user, LoyaltyKind::Bonus, 0, ""),
        Err(HubError::Invalid(_))
    ));
}

#[test]
fn news_slugs_are_unique_and_feed_splits_featured() {
    let (mut hub, _) = setup();
    let post = |title: &str, highlight: bool| NewNewsPost {
        title: title.to_string(),
        highlight,
        is_published: true,
        ..NewNewsPost::default()
    };
    let first = hub.publish_news(post("Banlist update", true)).unwrap();
    let second = hub.publish_news(post("Banlist update!", false)).unwrap();
    assert_eq!(first.slug, "banlist-update");
    assert_eq!(second.slug, "banlist-update-2");
    hub.publish_news(NewNewsPost {
        title: "Draft".to_string(),
        ..NewNewsPost::default()
    })
    .unwrap();

    let feed = hub.news_feed().unwrap();
    assert_eq!(feed.featured.len(), 1);
    assert_eq!(feed.others.len(), 1);
    assert_eq!(feed.others[0].slug, "banlist-update-2");

    assert!(hub.news_post("banlist-update").is_ok());
    assert!(matches!(hub.news_post("draft"), Err(HubError::NotFound { .. })));
}

fn date(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

#[test]
fn tournament_lifecycle_and_rankings() {
    let (mut hub, player) = setup();
    let staff = hub.create_user("judge", true).unwrap();
    let season = hub
        .create_season("Season 1", date("2025-01-01"), date("2025-03-31"))
        .unwrap();
    assert_eq!(season.slug, "season-1");

    let tournament = hub
        .create_tournament(NewTournament {
            name: "Weekly".to_string(),
            game: Game::Digimon,
            date: date("2025-02-01"),
            location: "Store".to_string(),
            description: String::new(),
            season_id: Some(season.id),
        })
        .unwrap();
    assert_eq!(tournament.status, TournamentStatus::Registration);

    for (name, wins, draws, losses, omw) in [
        ("Ana", 3, 0, 1, 0.55),
        ("Bia", 3, 0, 1, 0.60),
        ("Caio", 1, 1, 2, 0.40),
    ] {
        hub.register_result(
            tournament.id,
            PlayerResult {
                player_name: name.to_string(),
                archetype: "Red Hybrid".to_string(),
                wins,
                draws,
                losses,
                omw,
                ..PlayerResult::default()
            },
        )
        .unwrap();
    }

    let (_, standings) = hub.standings(tournament.id).unwrap();
    let names: Vec<&str> = standings.iter().map(|p| p.player_name.as_str()).collect();
    assert_eq!(names, ["Bia", "Ana", "Caio"]);
    assert_eq!(standings[2].points, 4);

    assert!(matches!(
        hub.close_registration(&player, tournament.id),
        Err(HubError::Forbidden(_))
    ));
    let running = hub.close_registration(&staff, tournament.id).unwrap();
    assert_eq!(running.status, TournamentStatus::Running);
    hub.finish_tournament(&staff, tournament.id).unwrap();
    assert!(matches!(
        hub.close_registration(&staff, tournament.id),
        Err(HubError::TournamentFinished(_))
    ));

    let overall = hub.ranking(&RankingScope::Overall).unwrap();
    assert_eq!(overall.players.len(), 3);
    assert_eq!(overall.archetypes[0].total_uses, 3);

    let seasonal = hub
        .ranking(&RankingScope::Season("season-1".to_string()))
        .unwrap();
    assert_eq!(seasonal.season.map(|s| s.id), Some(season.id));
    assert_eq!(seasonal.players[0].player_name, "Ana");
    assert!(matches!(
        hub.ranking(&RankingScope::Season("missing".to_string())),
        Err(HubError::NotFound { .. })
    ));
}

#[test]
fn season_dates_must_be_ordered() {
    let (mut hub, _) = setup();
    assert!(matches!(
        hub.create_season("Backwards", date("2025-03-01"), date("2025-01-01")),
        Err(HubError::Invalid(_))
    ));
}

#[test]
fn profile_and_home() {
    let (mut hub, user) = setup();
    let profile = hub.profile(&user).unwrap();
    assert!(profile.receive_news);

    let updated = hub
        .update_profile(
            &user,
            ProfileUpdate {
                full_name: Some("  Ana Souza ".to_string()),
                receive_news: Some(false),
                ..ProfileUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.full_name, "Ana Souza");
    assert!(!hub.profile(&user).unwrap().receive_news);

    hub.award_points(&user, LoyaltyKind::Checkin, 10, "Visit").unwrap();
    new_deck(&hub, &user, "Home deck");
    hub.publish_news(NewNewsPost {
        title: "Welcome".to_string(),
        is_published: true,
        ..NewNewsPost::default()
    })
    .unwrap();

    let home = hub.home(Some(&user)).unwrap();
    assert_eq!(home.balance, 10);
    assert_eq!(home.recent_events.len(), 1);
    assert_eq!(home.recent_decks.len(), 1);
    assert_eq!(home.news.len(), 1);

    let anonymous = hub.home(None).unwrap();
    assert_eq!(anonymous.balance, 0);
    assert!(anonymous.recent_decks.is_empty());
    assert_eq!(anonymous.news.len(), 1);
}

#[test]
fn usernames_are_validated() {
    let hub = Hub::in_memory().unwrap();
    assert!(matches!(hub.create_user("two words", false), Err(HubError::Invalid(_))));
    hub.create_user("ana", false).unwrap();
    assert!(matches!(hub.create_user("ANA", false), Err(HubError::Store(_))));
    assert!(hub.user("missing").is_err());
}
