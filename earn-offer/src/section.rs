use crate::card::{CardSnapshot, CardStatus, OfferCard};
use earn_catalog::{Catalog, RewardStats};
use earn_core::{EventSink, Timings, TransientFlag, Transition};
use earn_shared::{InteractionEvent, OfferId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Container for the "You've Unlocked Rewards" section.
///
/// Mounts one card per catalog offer and handles the section-wide actions.
/// Once skipped as a whole, the section stays hidden until it is remounted.
pub struct EarnSection {
    cards: Vec<OfferCard>,
    visible: bool,
    reminder: TransientFlag,
    stats: RewardStats,
    sink: Arc<dyn EventSink>,
    timings: Timings,
}

impl EarnSection {
    pub fn new(catalog: &Catalog, stats: RewardStats, sink: Arc<dyn EventSink>, timings: Timings) -> Self {
        let cards = catalog
            .iter()
            .cloned()
            .map(|offer| OfferCard::new(offer, sink.clone(), timings))
            .collect();

        Self {
            cards,
            visible: true,
            reminder: TransientFlag::new(),
            stats,
            sink,
            timings,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_reminder_shown(&self) -> bool {
        self.reminder.is_raised()
    }

    pub fn stats(&self) -> &RewardStats {
        &self.stats
    }

    pub fn cards(&self) -> &[OfferCard] {
        &self.cards
    }

    pub fn card(&self, id: &OfferId) -> Option<&OfferCard> {
        self.cards.iter().find(|c| c.id() == id)
    }

    /// Cards still laid out (neither accepted nor skipped)
    pub fn active_cards(&self) -> impl Iterator<Item = &OfferCard> {
        self.cards.iter().filter(|c| !c.is_terminal())
    }

    pub fn rewards_available(&self) -> usize {
        self.active_cards().count()
    }

    pub fn accepted_ids(&self) -> Vec<OfferId> {
        self.cards
            .iter()
            .filter(|c| c.status() == CardStatus::Accepted)
            .map(|c| c.id().clone())
            .collect()
    }

    pub fn accept(&mut self, id: &OfferId) -> Transition {
        self.with_card(id, OfferCard::accept)
    }

    pub fn skip(&mut self, id: &OfferId) -> Transition {
        self.with_card(id, OfferCard::skip)
    }

    pub fn toggle_details(&mut self, id: &OfferId) -> Transition {
        self.with_card(id, OfferCard::toggle_details)
    }

    /// Dismiss every live card and hide the section.
    ///
    /// Emits a single `all_offers_skipped`; cards dismissed this way do not
    /// emit their own `offer_skipped`.
    pub fn skip_all(&mut self) -> Transition {
        if !self.visible {
            debug!("Ignoring skip-all on hidden section");
            return Transition::Ignored;
        }

        let dismissed = self
            .cards
            .iter_mut()
            .map(OfferCard::dismiss)
            .filter(|t| t.is_applied())
            .count();

        self.visible = false;
        self.reminder.lower();

        info!(dismissed, "All offers skipped");
        self.sink.notify(InteractionEvent::AllOffersSkipped);
        Transition::Applied
    }

    /// Ask to be reminded later.
    ///
    /// Every call emits `remind_later_requested`; the acknowledgement window
    /// restarts from the latest call. Card states are untouched.
    pub fn remind_later(&mut self) -> Transition {
        if !self.visible {
            debug!("Ignoring remind-later on hidden section");
            return Transition::Ignored;
        }

        self.reminder.raise(self.timings.reminder_ack());
        info!("Reminder requested");
        self.sink.notify(InteractionEvent::RemindLaterRequested);
        Transition::Applied
    }

    pub fn snapshot(&self) -> SectionSnapshot {
        SectionSnapshot {
            visible: self.visible,
            reminder_shown: self.is_reminder_shown(),
            rewards_available: self.rewards_available(),
            stats: self.stats,
            cards: self.cards.iter().map(OfferCard::snapshot).collect(),
        }
    }

    fn with_card(&mut self, id: &OfferId, op: impl FnOnce(&mut OfferCard) -> Transition) -> Transition {
        if !self.visible {
            debug!(offer_id = %id, "Ignoring card action on hidden section");
            return Transition::Ignored;
        }

        match self.cards.iter_mut().find(|c| c.id() == id) {
            Some(card) => op(card),
            None => {
                debug!(offer_id = %id, "Ignoring action for unknown offer");
                Transition::Ignored
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionSnapshot {
    pub visible: bool,
    pub reminder_shown: bool,
    pub rewards_available: usize,
    pub stats: RewardStats,
    pub cards: Vec<CardSnapshot>,
}
