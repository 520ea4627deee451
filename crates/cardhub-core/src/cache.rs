use cardhub_model::{Card, CardNumber};
use cardhub_store::cards;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{CardSource, Hub, HubError, Result};

/// Default age after which a cached card may be refreshed.
pub const STALE_AFTER_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheOutcome {
    /// Served from the local cache.
    Cached,
    /// Not cached before, fetched from the source.
    Fetched,
    /// Stale copy replaced with fresh data.
    Refreshed,
}

#[derive(Debug, Clone, Serialize)]
pub struct CachedCard {
    pub card: Card,
    pub outcome: CacheOutcome,
}

/// Counts of a bulk cache sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Hub {
    pub fn card(&self, cardnumber: &CardNumber) -> Result<Card> {
        cards::get(self.store.conn(), cardnumber)?
            .ok_or_else(|| HubError::not_found("card", cardnumber))
    }

    /// Cached card, fetched from `source` when missing. With `allow_refresh`
    /// a copy older than the stale threshold is fetched again.
    pub fn get_or_fetch(
        &self,
        source: &dyn CardSource,
        cardnumber: &CardNumber,
        allow_refresh: bool,
    ) -> Result<CachedCard> {
        let now = Utc::now();
        let cached = cards::get(self.store.conn(), cardnumber)?;
        let outcome = match &cached {
            Some(card) if !allow_refresh || card.age_days(now) < self.settings.stale_days => {
                debug!(%cardnumber, "card served from cache");
                return Ok(CachedCard {
                    card: card.clone(),
                    outcome: CacheOutcome::Cached,
                });
            }
            Some(_) => CacheOutcome::Refreshed,
            None => CacheOutcome::Fetched,
        };

        let Some(payload) = source.fetch(cardnumber)? else {
            warn!(%cardnumber, "card source has no such card");
            return Err(HubError::CardUnavailable(cardnumber.clone()));
        };
        let card = payload.into_card(cardnumber, now)?;
        cards::upsert(self.store.conn(), &card)?;
        info!(cardnumber = %card.cardnumber, ?outcome, "card cached");
        Ok(CachedCard { card, outcome })
    }

    /// Cache every card the source offers. `only_missing` skips cards that
    /// are already cached; `limit` caps the number of fetches.
    pub fn sync_cards(
        &self,
        source: &dyn CardSource,
        only_missing: bool,
        limit: Option<usize>,
    ) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();
        for cardnumber in source.cardnumbers()? {
            if limit.is_some_and(|limit| summary.fetched >= limit) {
                break;
            }
            if only_missing && cards::get(self.store.conn(), &cardnumber)?.is_some() {
                summary.skipped += 1;
                continue;
            }
            let Some(payload) = source.fetch(&cardnumber)? else {
                summary.failed += 1;
                continue;
            };
            match payload.into_card(&cardnumber, Utc::now()) {
                Ok(card) => {
                    cards::upsert(self.store.conn(), &card)?;
                    summary.fetched += 1;
                }
                Err(error) => {
                    warn!(%cardnumber, %error, "skipping malformed card");
                    summary.failed += 1;
                }
            }
        }
        info!(
            fetched = summary.fetched,
            skipped = summary.skipped,
            failed = summary.failed,
            "card sync finished"
        );
        Ok(summary)
    }
}
