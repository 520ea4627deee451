//! Card catalog: search over the cache and shop prices.

use cardhub_model::{Card, CardNumber, CardPrice};
use cardhub_store::{CardFacets, CardFilter, cards, prices};
use chrono::Utc;

use crate::{Hub, HubError, Result};

impl Hub {
    pub fn search_cards(&self, filter: &CardFilter) -> Result<Vec<Card>> {
        Ok(cards::search(self.store.conn(), filter)?)
    }

    pub fn card_facets(&self) -> Result<CardFacets> {
        Ok(cards::facets(self.store.conn())?)
    }

    pub fn cached_card_count(&self) -> Result<u64> {
        Ok(cards::count(self.store.conn())?)
    }

    /// Record the shop price of a card. The name defaults to the cached
    /// card's name.
    pub fn set_price(
        &self,
        cardnumber: &CardNumber,
        price_cents: i64,
        product_url: &str,
        in_stock: bool,
    ) -> Result<CardPrice> {
        if price_cents < 0 {
            return Err(HubError::invalid("price must not be negative"));
        }
        let name = cards::get(self.store.conn(), cardnumber)?
            .map(|card| card.name)
            .unwrap_or_default();
        let price = CardPrice {
            cardnumber: cardnumber.clone(),
            name,
            price_cents,
            product_url: product_url.trim().to_string(),
            in_stock,
            updated_at: Utc::now(),
        };
        prices::upsert(self.store.conn(), &price)?;
        Ok(price)
    }

    pub fn prices(&self) -> Result<Vec<CardPrice>> {
        Ok(prices::list(self.store.conn())?)
    }

    pub fn remove_price(&self, cardnumber: &CardNumber) -> Result<()> {
        Ok(prices::delete(self.store.conn(), cardnumber)?)
    }
}
