//! Hub services over the SQLite store.
//!
//! [`Hub`] owns the database handle and the format settings. Each service
//! lives in its own module as an `impl Hub` block; operations acting on
//! behalf of someone take the acting [`cardhub_model::User`].

mod cache;
mod decks;
mod error;
mod loyalty;
mod news;
mod profiles;
mod rules;
mod search;
mod source;
mod tournaments;

use std::path::Path;

use cardhub_store::Store;
use cardhub_validate::{FormatLimits, RuleBook};
use serde::{Deserialize, Serialize};

pub use cache::{CacheOutcome, CachedCard, STALE_AFTER_DAYS, SyncSummary};
pub use decks::{DeckPricing, DeckView, MAX_ADD_QUANTITY, PriceRow, clamp_quantity, price_lines};
pub use error::{HubError, Result, SourceError};
pub use loyalty::{LoyaltyOverview, REDEMPTION_PREFIX};
pub use news::{FEATURED_LIMIT, NewsFeed, OTHER_LIMIT, unique_slug};
pub use profiles::HomeDashboard;
pub use rules::CardLimit;
pub use source::{CardPayload, CardSource, JsonFileSource};
pub use tournaments::{Ranking, RankingScope};

pub use cardhub_store::{CardFacets, CardFilter, DEFAULT_SEARCH_LIMIT};

/// Tunables of a hub instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    pub limits: FormatLimits,
    /// Cached cards older than this are refreshed when a refresh is allowed.
    pub stale_days: i64,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            limits: FormatLimits::default(),
            stale_days: STALE_AFTER_DAYS,
        }
    }
}

#[derive(Debug)]
pub struct Hub {
    store: Store,
    settings: HubSettings,
}

impl Hub {
    pub fn new(store: Store, settings: HubSettings) -> Self {
        Self { store, settings }
    }

    pub fn open(path: impl AsRef<Path>, settings: HubSettings) -> Result<Self> {
        Ok(Self::new(Store::open(path)?, settings))
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Store::open_in_memory()?, HubSettings::default()))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }

    /// The format's current rules as stored.
    pub fn rulebook(&self) -> Result<RuleBook> {
        Ok(cardhub_store::rules::load_rulebook(
            self.store.conn(),
            self.settings.limits,
        )?)
    }
}
