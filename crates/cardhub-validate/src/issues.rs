use cardhub_model::{
    CardNumber, DeckSection, IssueCode, IssueSeverity, LegalityIssue, PairBanRule,
};

pub(crate) fn invalid_quantity(cardnumber: &CardNumber) -> LegalityIssue {
    LegalityIssue {
        code: IssueCode::InvalidQuantity,
        severity: IssueSeverity::Error,
        message: "Invalid quantity.".to_string(),
        cardnumber: Some(cardnumber.clone()),
        section: None,
        count: Some(0),
    }
}

pub(crate) fn section_full(section: DeckSection, limit: u32, total: u32) -> LegalityIssue {
    let message = match section {
        DeckSection::Main => format!("Main deck can only hold {limit} cards in total."),
        DeckSection::Egg => format!("Digi-Egg deck can only hold {limit} cards in total."),
    };
    LegalityIssue {
        code: IssueCode::SectionFull,
        severity: IssueSeverity::Error,
        message,
        cardnumber: None,
        section: Some(section),
        count: Some(total),
    }
}

pub(crate) fn banned(cardnumber: &CardNumber, section: DeckSection) -> LegalityIssue {
    LegalityIssue {
        code: IssueCode::Banned,
        severity: IssueSeverity::Error,
        message: format!("{cardnumber} is forbidden by the banlist."),
        cardnumber: Some(cardnumber.clone()),
        section: Some(section),
        count: None,
    }
}

pub(crate) fn copy_limit_exceeded(
    cardnumber: &CardNumber,
    section: DeckSection,
    max_allowed: u32,
    copies: u32,
) -> LegalityIssue {
    LegalityIssue {
        code: IssueCode::CopyLimitExceeded,
        severity: IssueSeverity::Error,
        message: format!("Limit exceeded: {cardnumber} allows at most {max_allowed} copies."),
        cardnumber: Some(cardnumber.clone()),
        section: Some(section),
        count: Some(copies),
    }
}

pub(crate) fn pair_banned(rule: &PairBanRule) -> LegalityIssue {
    LegalityIssue {
        code: IssueCode::PairBanned,
        severity: IssueSeverity::Error,
        message: format!(
            "Pair ban: {} cannot be used together with {}.",
            rule.card_a(),
            rule.card_b()
        ),
        cardnumber: Some(rule.card_a().clone()),
        section: None,
        count: None,
    }
}

pub(crate) fn uncached_card(cardnumber: &CardNumber, section: DeckSection) -> LegalityIssue {
    LegalityIssue {
        code: IssueCode::UncachedCard,
        severity: IssueSeverity::Warning,
        message: format!("{cardnumber} is not in the card cache."),
        cardnumber: Some(cardnumber.clone()),
        section: Some(section),
        count: None,
    }
}
