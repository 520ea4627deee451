//! Deck legality checks.
//!
//! Three rule tables drive every decision: copy-limit exceptions, banlist
//! status and pair bans. [`validate_addition`] guards a single add to a deck,
//! [`validate_deck`] reports every problem of an existing deck.

mod counts;
mod issues;
mod limits;
mod rulebook;

pub use counts::DeckCounts;
pub use limits::{DEFAULT_MAX_COPIES, EGG_LIMIT, FormatLimits, MAIN_LIMIT};
pub use rulebook::RuleBook;

use cardhub_model::{CardNumber, DeckCard, DeckSection, LegalityIssue, LegalityReport};

/// Check whether `qty` copies of `cardnumber` may be added to `section`.
///
/// Checks run in a fixed order and the first failure is returned:
/// quantity, section size, banlist, per-card limit, pair bans.
pub fn validate_addition(
    rules: &RuleBook,
    counts: &DeckCounts,
    section: DeckSection,
    cardnumber: &CardNumber,
    qty: u32,
) -> Result<(), LegalityIssue> {
    if qty == 0 {
        return Err(issues::invalid_quantity(cardnumber));
    }

    let section_limit = rules.limits().section_limit(section);
    let section_total = counts.total(section).saturating_add(qty);
    if section_total > section_limit {
        return Err(issues::section_full(section, section_limit, section_total));
    }

    let max_allowed = rules.effective_limit(cardnumber);
    if max_allowed == 0 {
        return Err(issues::banned(cardnumber, section));
    }

    let copies = counts.copies(section, cardnumber).saturating_add(qty);
    if copies > max_allowed {
        return Err(issues::copy_limit_exceeded(cardnumber, section, max_allowed, copies));
    }

    let present = counts.cardnumbers();
    if let Some(rule) = rules.pair_ban_conflict(&present, cardnumber) {
        return Err(issues::pair_banned(rule));
    }

    Ok(())
}

/// Check a complete deck and list every violation.
pub fn validate_deck(rules: &RuleBook, deck: &str, lines: &[DeckCard]) -> LegalityReport {
    let counts = DeckCounts::tally(lines);
    let mut found = Vec::new();

    for section in [DeckSection::Main, DeckSection::Egg] {
        let limit = rules.limits().section_limit(section);
        let total = counts.total(section);
        if total > limit {
            found.push(issues::section_full(section, limit, total));
        }
    }

    for section in [DeckSection::Main, DeckSection::Egg] {
        for (cardnumber, &copies) in counts.section(section) {
            if copies == 0 {
                continue;
            }
            let max_allowed = rules.effective_limit(cardnumber);
            if max_allowed == 0 {
                found.push(issues::banned(cardnumber, section));
            } else if copies > max_allowed {
                found.push(issues::copy_limit_exceeded(
                    cardnumber,
                    section,
                    max_allowed,
                    copies,
                ));
            }
        }
    }

    let present = counts.cardnumbers();
    for rule in rules.pair_ban_violations(&present) {
        found.push(issues::pair_banned(rule));
    }

    LegalityReport {
        deck: deck.to_string(),
        main_total: counts.main_total,
        egg_total: counts.egg_total,
        issues: found,
    }
}

/// Warning for a deck line whose card is not in the local cache.
pub fn uncached_card_issue(line: &DeckCard) -> LegalityIssue {
    issues::uncached_card(&line.cardnumber, line.section)
}
