use std::collections::{BTreeMap, BTreeSet};

use cardhub_model::{CardNumber, DeckCard, DeckSection};

/// Running totals of a deck, per section and per card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckCounts {
    pub main_total: u32,
    pub egg_total: u32,
    main: BTreeMap<CardNumber, u32>,
    egg: BTreeMap<CardNumber, u32>,
}

impl DeckCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum quantities of the given deck lines.
    pub fn tally<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a DeckCard>,
    {
        let mut counts = Self::new();
        for line in lines {
            counts.add(line.section, &line.cardnumber, line.quantity);
        }
        counts
    }

    pub fn add(&mut self, section: DeckSection, cardnumber: &CardNumber, qty: u32) {
        match section {
            DeckSection::Main => {
                self.main_total = self.main_total.saturating_add(qty);
                let copies = self.main.entry(cardnumber.clone()).or_default();
                *copies = copies.saturating_add(qty);
            }
            DeckSection::Egg => {
                self.egg_total = self.egg_total.saturating_add(qty);
                let copies = self.egg.entry(cardnumber.clone()).or_default();
                *copies = copies.saturating_add(qty);
            }
        }
    }

    pub fn total(&self, section: DeckSection) -> u32 {
        match section {
            DeckSection::Main => self.main_total,
            DeckSection::Egg => self.egg_total,
        }
    }

    /// Copies of `cardnumber` already in `section`.
    pub fn copies(&self, section: DeckSection, cardnumber: &CardNumber) -> u32 {
        self.section(section).get(cardnumber).copied().unwrap_or(0)
    }

    pub fn section(&self, section: DeckSection) -> &BTreeMap<CardNumber, u32> {
        match section {
            DeckSection::Main => &self.main,
            DeckSection::Egg => &self.egg,
        }
    }

    /// Every distinct card present in either section.
    pub fn cardnumbers(&self) -> BTreeSet<CardNumber> {
        self.main
            .iter()
            .chain(self.egg.iter())
            .filter(|(_, qty)| **qty > 0)
            .map(|(cardnumber, _)| cardnumber.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.main_total == 0 && self.egg_total == 0
    }
}
