//! Deck legality checks against a small format.

use cardhub_model::{
    BanStatus, BanlistRule, CardNumber, CopyRule, DeckCard, DeckSection, IssueCode,
    PairBanRule,
};
use cardhub_validate::{
    DeckCounts, FormatLimits, RuleBook, uncached_card_issue, validate_addition, validate_deck,
};

fn cn(value: &str) -> CardNumber {
    CardNumber::new(value).unwrap()
}

fn line(id: i64, section: DeckSection, cardnumber: &str, quantity: u32) -> DeckCard {
    DeckCard {
        id,
        deck_id: 1,
        section,
        quantity,
        cardnumber: cn(cardnumber),
        card_name: String::new(),
    }
}

fn format_rules() -> RuleBook {
    RuleBook::from_rules(
        FormatLimits::default(),
        [CopyRule {
            cardnumber: cn("BT6-085"),
            max_copies: 50,
            notes: "any number of copies".to_string(),
        }],
        [
            BanlistRule {
                cardnumber: cn("BT2-047"),
                status: BanStatus::Limited1,
                notes: String::new(),
            },
            BanlistRule {
                cardnumber: cn("BT5-109"),
                status: BanStatus::Banned,
                notes: String::new(),
            },
        ],
        [PairBanRule::new(cn("BT11-033"), cn("BT12-038"), "").unwrap()],
    )
}

#[test]
fn zero_quantity_is_rejected_first() {
    let rules = format_rules();
    let issue = validate_addition(
        &rules,
        &DeckCounts::new(),
        DeckSection::Main,
        &cn("BT5-109"),
        0,
    )
    .unwrap_err();
    assert_eq!(issue.code, IssueCode::InvalidQuantity);
}

#[test]
fn banned_card_cannot_be_added() {
    let rules = format_rules();
    let issue = validate_addition(
        &rules,
        &DeckCounts::new(),
        DeckSection::Main,
        &cn("bt5-109"),
        1,
    )
    .unwrap_err();
    assert_eq!(issue.code, IssueCode::Banned);
    assert_eq!(issue.message, "BT5-109 is forbidden by the banlist.");
}

#[test]
fn limited_card_caps_copies() {
    let rules = format_rules();
    let lines = [line(1, DeckSection::Main, "BT2-047", 1)];
    let counts = DeckCounts::tally(&lines);
    let issue = validate_addition(&rules, &counts, DeckSection::Main, &cn("BT2-047"), 1)
        .unwrap_err();
    assert_eq!(issue.code, IssueCode::CopyLimitExceeded);
    assert_eq!(
        issue.message,
        "Limit exceeded: BT2-047 allows at most 1 copies."
    );
    assert_eq!(issue.count, Some(2));
}

#[test]
fn default_limit_is_four_copies() {
    let rules = format_rules();
    let lines = [line(1, DeckSection::Main, "BT1-010", 3)];
    let counts = DeckCounts::tally(&lines);
    assert!(validate_addition(&rules, &counts, DeckSection::Main, &cn("BT1-010"), 1).is_ok());
    assert!(validate_addition(&rules, &counts, DeckSection::Main, &cn("BT1-010"), 2).is_err());
}

#[test]
fn copy_rule_exception_allows_many_copies() {
    let rules = format_rules();
    let lines = [line(1, DeckSection::Main, "BT6-085", 30)];
    let counts = DeckCounts::tally(&lines);
    assert!(validate_addition(&rules, &counts, DeckSection::Main, &cn("BT6-085"), 20).is_ok());
}

#[test]
fn section_total_is_checked_before_card_limits() {
    let rules = format_rules();
    let lines = [
        line(1, DeckSection::Main, "BT6-085", 48),
        line(2, DeckSection::Egg, "BT1-001", 4),
    ];
    let counts = DeckCounts::tally(&lines);

    let issue = validate_addition(&rules, &counts, DeckSection::Main, &cn("BT5-109"), 3)
        .unwrap_err();
    assert_eq!(issue.code, IssueCode::SectionFull);
    assert_eq!(issue.message, "Main deck can only hold 50 cards in total.");

    let issue = validate_addition(&rules, &counts, DeckSection::Egg, &cn("BT1-002"), 2)
        .unwrap_err();
    assert_eq!(issue.code, IssueCode::SectionFull);
    assert_eq!(issue.section, Some(DeckSection::Egg));

    assert!(validate_addition(&rules, &counts, DeckSection::Egg, &cn("BT1-002"), 1).is_ok());
}

#[test]
fn copies_are_counted_per_section() {
    let rules = format_rules();
    let lines = [line(1, DeckSection::Egg, "BT1-001", 4)];
    let counts = DeckCounts::tally(&lines);
    assert_eq!(counts.copies(DeckSection::Egg, &cn("BT1-001")), 4);
    assert_eq!(counts.copies(DeckSection::Main, &cn("BT1-001")), 0);
    assert!(validate_addition(&rules, &counts, DeckSection::Main, &cn("BT1-001"), 4).is_ok());
}

#[test]
fn pair_ban_blocks_second_card() {
    let rules = format_rules();
    let lines = [line(1, DeckSection::Main, "BT12-038", 2)];
    let counts = DeckCounts::tally(&lines);
    let issue = validate_addition(&rules, &counts, DeckSection::Main, &cn("BT11-033"), 1)
        .unwrap_err();
    assert_eq!(issue.code, IssueCode::PairBanned);
    assert_eq!(
        issue.message,
        "Pair ban: BT11-033 cannot be used together with BT12-038."
    );
    assert!(validate_addition(&rules, &counts, DeckSection::Main, &cn("BT12-038"), 1).is_ok());
}

#[test]
fn check_pair_bans_over_a_card_set() {
    let rules = format_rules();
    let lines = [
        line(1, DeckSection::Main, "BT11-033", 1),
        line(2, DeckSection::Main, "BT1-010", 4),
    ];
    let mut present = DeckCounts::tally(&lines).cardnumbers();
    assert!(rules.check_pair_bans(&present).is_none());
    present.insert(cn("bt12-038"));
    let rule = rules.check_pair_bans(&present).expect("pair ban found");
    assert_eq!(rule.card_b().as_str(), "BT12-038");
}

#[test]
fn custom_limits_apply() {
    let limits = FormatLimits {
        main_limit: 40,
        egg_limit: 0,
        default_max_copies: 2,
    };
    let rules = RuleBook::new(limits);
    let counts = DeckCounts::new();
    assert!(validate_addition(&rules, &counts, DeckSection::Egg, &cn("BT1-001"), 1).is_err());
    assert!(validate_addition(&rules, &counts, DeckSection::Main, &cn("BT1-010"), 3).is_err());
    assert!(validate_addition(&rules, &counts, DeckSection::Main, &cn("BT1-010"), 2).is_ok());
}

#[test]
fn legal_deck_has_no_issues() {
    let rules = format_rules();
    let mut lines: Vec<DeckCard> = (0..12)
        .map(|idx| line(idx, DeckSection::Main, &format!("BT1-{:03}", idx + 10), 4))
        .collect();
    lines.push(line(20, DeckSection::Main, "BT2-047", 1));
    lines.push(line(21, DeckSection::Egg, "BT1-001", 4));
    let report = validate_deck(&rules, "Legal", &lines);
    assert_eq!(report.main_total, 49);
    assert_eq!(report.egg_total, 4);
    assert!(report.is_legal(), "{:?}", report.issues);
}

#[test]
fn deck_report_lists_every_violation() {
    let rules = format_rules();
    let lines = [
        line(1, DeckSection::Main, "BT5-109", 1),
        line(2, DeckSection::Main, "BT2-047", 3),
        line(3, DeckSection::Main, "BT11-033", 1),
        line(4, DeckSection::Main, "BT12-038", 1),
        line(5, DeckSection::Egg, "BT1-001", 6),
    ];
    let report = validate_deck(&rules, "Broken", &lines);
    let codes: Vec<IssueCode> = report.issues.iter().map(|issue| issue.code).collect();
    assert_eq!(
        codes,
        [
            IssueCode::SectionFull,
            IssueCode::CopyLimitExceeded,
            IssueCode::Banned,
            IssueCode::CopyLimitExceeded,
            IssueCode::PairBanned,
        ]
    );
    assert_eq!(report.error_count(), 5);
}

#[test]
fn uncached_card_is_a_warning() {
    let issue = uncached_card_issue(&line(1, DeckSection::Main, "BT99-001", 1));
    assert_eq!(issue.code, IssueCode::UncachedCard);
    assert_eq!(issue.severity, cardhub_model::IssueSeverity::Warning);
}

#[test]
fn report_snapshot() {
    let rules = format_rules();
    let lines = [line(1, DeckSection::Main, "BT2-047", 2)];
    let report = validate_deck(&rules, "Snapshot", &lines);
    insta::assert_json_snapshot!(report, @r#"
    {
      "deck": "Snapshot",
      "main_total": 2,
      "egg_total": 0,
      "issues": [
        {
          "code": "copy_limit_exceeded",
          "severity": "error",
          "message": "Limit exceeded: BT2-047 allows at most 1 copies.",
          "cardnumber": "BT2-047",
          "section": "MAIN",
          "count": 2
        }
      ]
    }
    "#);
}
