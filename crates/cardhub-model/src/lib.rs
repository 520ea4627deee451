pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod ids;
pub mod legality;
pub mod loyalty;
pub mod news;
pub mod rules;
pub mod tournament;
pub mod user;

pub use card::{Card, CardPrice, Evolution, format_cents, is_egg_card_type};
pub use deck::{Deck, DeckCard, DeckSection, NewDeck};
pub use error::{ModelError, Result};
pub use game::Game;
pub use ids::CardNumber;
pub use legality::{IssueCode, IssueSeverity, LegalityIssue, LegalityReport};
pub use loyalty::{LoyaltyEvent, LoyaltyKind, Reward, RewardRedemption};
pub use news::{NewNewsPost, NewsPost, slugify};
pub use rules::{BanStatus, BanlistRule, CopyRule, PairBanRule};
pub use tournament::{
    ArchetypeRanking, NewTournament, PlayerRanking, PlayerResult, Season, Tournament,
    TournamentPlayer, TournamentStatus,
};
pub use user::{ProfileUpdate, User, UserProfile};

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(code: IssueCode, severity: IssueSeverity) -> LegalityIssue {
        LegalityIssue {
            code,
            severity,
            message: code.to_string(),
            cardnumber: None,
            section: None,
            count: None,
        }
    }

    #[test]
    fn legality_report_counts() {
        let report = LegalityReport {
            deck: "Red Hybrid".to_string(),
            main_total: 50,
            egg_total: 5,
            issues: vec![
                issue(IssueCode::Banned, IssueSeverity::Error),
                issue(IssueCode::UncachedCard, IssueSeverity::Warning),
            ],
        };
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
        assert!(!report.is_legal());
    }

    #[test]
    fn report_serializes() {
        let report = LegalityReport {
            deck: "Empty".to_string(),
            ..LegalityReport::default()
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: LegalityReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round.deck, "Empty");
        assert!(round.is_legal());
    }

    #[test]
    fn enum_labels_round_trip_through_str() {
        for section in [DeckSection::Main, DeckSection::Egg] {
            assert_eq!(section.as_str().parse::<DeckSection>().unwrap(), section);
        }
        for kind in [
            LoyaltyKind::Purchase,
            LoyaltyKind::Tournament,
            LoyaltyKind::Bonus,
            LoyaltyKind::Checkin,
        ] {
            assert_eq!(kind.as_str().parse::<LoyaltyKind>().unwrap(), kind);
        }
        assert_eq!("outro".parse::<Game>().unwrap(), Game::Other);
        assert!("poker".parse::<Game>().is_err());
    }
}
