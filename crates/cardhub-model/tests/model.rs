use cardhub_model::{BanStatus, BanlistRule, Card, CardNumber, CopyRule};

#[test]
fn banlist_rule_from_json_normalizes_cardnumber() {
    let rule: BanlistRule =
        serde_json::from_str(r#"{"cardnumber":" bt2-047 ","status":"LIMITED_1"}"#)
            .expect("deserialize banlist rule");
    assert_eq!(rule.cardnumber.as_str(), "BT2-047");
    assert_eq!(rule.status, BanStatus::Limited1);
    assert_eq!(rule.max_allowed(), 1);
    assert!(rule.notes.is_empty());
}

#[test]
fn blank_cardnumber_is_rejected_by_serde() {
    let parsed = serde_json::from_str::<CopyRule>(r#"{"cardnumber":"  ","max_copies":50}"#);
    assert!(parsed.is_err());
}

#[test]
fn card_serializes_cardnumber_as_string() {
    let card = Card::new(CardNumber::new("st1-01").unwrap(), "Koromon").with_type("Digi-Egg");
    let value = serde_json::to_value(&card).expect("serialize card");
    assert_eq!(value["cardnumber"], "ST1-01");
    assert_eq!(value["card_type"], "Digi-Egg");
    assert!(card.is_egg());
}
