use earn_catalog::Offer;
use earn_core::{EventSink, Mounted, ScheduledTask, Timings, TransientFlag, Transition};
use earn_shared::{InteractionEvent, OfferId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Offer card lifecycle
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Pending,
    /// Accept clicked, confirmation scheduled
    Accepting,
    Accepted,
    Skipped,
}

impl CardStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, CardStatus::Accepted | CardStatus::Skipped)
    }
}

/// Visual branch the card renders for its current state
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum CardView {
    Offer { details_expanded: bool, celebrating: bool },
    Added,
    Hidden,
}

#[derive(Debug)]
struct CardState {
    status: CardStatus,
    details_expanded: bool,
}

/// Controller for one promotional offer.
///
/// Owns its state exclusively. The delayed `accepting → accepted` step runs
/// on a task held by the card, so dropping the card cancels it and nothing
/// is emitted for a card that is no longer mounted.
pub struct OfferCard {
    offer: Offer,
    state: Mounted<CardState>,
    celebration: TransientFlag,
    confirm_task: Option<ScheduledTask>,
    sink: Arc<dyn EventSink>,
    timings: Timings,
}

impl OfferCard {
    pub fn new(offer: Offer, sink: Arc<dyn EventSink>, timings: Timings) -> Self {
        Self {
            offer,
            state: Mounted::new(CardState {
                status: CardStatus::Pending,
                details_expanded: false,
            }),
            celebration: TransientFlag::new(),
            confirm_task: None,
            sink,
            timings,
        }
    }

    pub fn id(&self) -> &OfferId {
        &self.offer.id
    }

    pub fn offer(&self) -> &Offer {
        &self.offer
    }

    pub fn status(&self) -> CardStatus {
        self.state.read(|s| s.status)
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    pub fn details_expanded(&self) -> bool {
        self.state.read(|s| s.details_expanded)
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration.is_raised()
    }

    pub fn view(&self) -> CardView {
        let (status, details_expanded) = self.state.read(|s| (s.status, s.details_expanded));
        match status {
            CardStatus::Pending | CardStatus::Accepting => CardView::Offer {
                details_expanded,
                celebrating: self.is_celebrating(),
            },
            CardStatus::Accepted => CardView::Added,
            CardStatus::Skipped => CardView::Hidden,
        }
    }

    /// Start accepting the offer.
    ///
    /// Only valid from `Pending`. The card confirms after the configured
    /// accept delay and emits `offer_accepted` exactly once. Must be called
    /// from within a Tokio runtime.
    pub fn accept(&mut self) -> Transition {
        let started = self.state.update(|s| {
            if s.status != CardStatus::Pending {
                return false;
            }
            s.status = CardStatus::Accepting;
            true
        });

        if !started {
            debug!(offer_id = %self.offer.id, status = ?self.status(), "Ignoring accept");
            return Transition::Ignored;
        }

        self.celebration.raise(self.timings.celebration());

        let handle = self.state.handle();
        let sink = self.sink.clone();
        let offer_id = self.offer.id.clone();
        self.confirm_task = Some(ScheduledTask::after(self.timings.accept_delay(), move || {
            handle.update_if_mounted(|s| {
                if s.status != CardStatus::Accepting {
                    return;
                }
                s.status = CardStatus::Accepted;
                info!(offer_id = %offer_id, "Offer accepted");
                sink.notify(InteractionEvent::OfferAccepted { offer_id });
            });
        }));

        Transition::Applied
    }

    /// Skip the offer. Only valid from `Pending`; emits `offer_skipped`.
    pub fn skip(&mut self) -> Transition {
        let skipped = self.state.update(|s| {
            if s.status != CardStatus::Pending {
                return false;
            }
            s.status = CardStatus::Skipped;
            true
        });

        if !skipped {
            debug!(offer_id = %self.offer.id, status = ?self.status(), "Ignoring skip");
            return Transition::Ignored;
        }

        info!(offer_id = %self.offer.id, "Offer skipped");
        self.sink.notify(InteractionEvent::OfferSkipped {
            offer_id: self.offer.id.clone(),
        });
        Transition::Applied
    }

    /// Flip the supplementary details panel while the card is still live.
    ///
    /// Offers without expanded content have no panel to open.
    pub fn toggle_details(&mut self) -> Transition {
        if !self.offer.has_details_toggle() {
            debug!(offer_id = %self.offer.id, "Ignoring details toggle on offer without details");
            return Transition::Ignored;
        }

        let toggled = self.state.update(|s| {
            if s.status.is_terminal() {
                return false;
            }
            s.details_expanded = !s.details_expanded;
            true
        });

        if !toggled {
            debug!(offer_id = %self.offer.id, "Ignoring details toggle on settled card");
        }
        Transition::from(toggled)
    }

    /// Force a live card to `Skipped` without a per-card notification.
    ///
    /// Used when the whole section is dismissed; cancels a pending confirmation.
    pub(crate) fn dismiss(&mut self) -> Transition {
        let dismissed = self.state.update(|s| {
            if s.status.is_terminal() {
                return false;
            }
            s.status = CardStatus::Skipped;
            true
        });

        if dismissed {
            self.confirm_task = None;
            self.celebration.lower();
        }
        Transition::from(dismissed)
    }

    pub fn snapshot(&self) -> CardSnapshot {
        let (status, details_expanded) = self.state.read(|s| (s.status, s.details_expanded));
        CardSnapshot {
            id: self.offer.id.clone(),
            status,
            details_expanded,
            celebrating: self.is_celebrating(),
            view: self.view(),
            primary_label: self.offer.primary_label(),
            offer: self.offer.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardSnapshot {
    pub id: OfferId,
    pub status: CardStatus,
    pub details_expanded: bool,
    pub celebrating: bool,
    pub view: CardView,
    pub primary_label: String,
    pub offer: Offer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use earn_catalog::ExpandedContent;
    use earn_core::RecordingSink;
    use std::time::Duration;

    fn card_with_details(id: &str) -> (OfferCard, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let offer = Offer::new(id, "Never Run Out", "Switch to auto-delivery", "Subscribe Now")
            .with_expanded_content(ExpandedContent {
                title: "How it works:".to_string(),
                points: vec!["Skip or cancel anytime".to_string()],
            });
        (OfferCard::new(offer, sink.clone(), Timings::default()), sink)
    }

    fn card(id: &str) -> (OfferCard, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let offer = Offer::new(id, "Get 10% Off", "Enable updates", "Enable Updates");
        (OfferCard::new(offer, sink.clone(), Timings::default()), sink)
    }

    fn accepted_count(sink: &RecordingSink) -> usize {
        sink.count(|e| matches!(e, InteractionEvent::OfferAccepted { .. }))
    }

    fn skipped_count(sink: &RecordingSink) -> usize {
        sink.count(|e| matches!(e, InteractionEvent::OfferSkipped { .. }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_accept_confirms_after_delay() {
        let (mut card, sink) = card("AX-1");

        assert!(card.accept().is_applied());
        assert_eq!(card.status(), CardStatus::Accepting);
        assert!(card.is_celebrating());
        assert!(sink.is_empty());

        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(card.status(), CardStatus::Accepted);
        assert_eq!(card.view(), CardView::Added);
        assert_eq!(
            sink.events(),
            vec![InteractionEvent::OfferAccepted { offer_id: OfferId::new("AX-1") }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_accept_schedules_once() {
        let (mut card, sink) = card("AX-1");

        assert!(card.accept().is_applied());
        assert!(card.accept().is_ignored());

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(card.accept().is_ignored());

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(accepted_count(&sink), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_before_delay_suppresses_emission() {
        let (mut card, sink) = card("AX-1");
        card.accept();

        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(card);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_after_accept_is_noop() {
        let (mut card, sink) = card("AX-1");
        card.accept();

        assert!(card.skip().is_ignored());
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(card.skip().is_ignored());

        assert_eq!(card.status(), CardStatus::Accepted);
        assert_eq!(skipped_count(&sink), 0);
        assert_eq!(accepted_count(&sink), 1);
    }

    #[test]
    fn test_skip_emits_once_and_blocks_accept() {
        let (mut card, sink) = card("setup-video");

        assert!(card.skip().is_applied());
        assert!(card.skip().is_ignored());
        assert!(card.accept().is_ignored());

        assert_eq!(card.status(), CardStatus::Skipped);
        assert_eq!(card.view(), CardView::Hidden);
        assert_eq!(
            sink.events(),
            vec![InteractionEvent::OfferSkipped { offer_id: OfferId::new("setup-video") }]
        );
    }

    #[test]
    fn test_toggle_details_only_while_live() {
        let (mut card, _sink) = card_with_details("subscribe-save");

        assert!(card.toggle_details().is_applied());
        assert!(card.details_expanded());
        assert!(card.toggle_details().is_applied());
        assert!(!card.details_expanded());

        card.toggle_details();
        card.skip();
        assert!(card.toggle_details().is_ignored());
    }

    #[test]
    fn test_toggle_details_needs_expanded_content() {
        let (mut card, _sink) = card("delivery-updates");

        assert!(card.toggle_details().is_ignored());
        assert!(!card.details_expanded());
        assert_eq!(card.status(), CardStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_details_toggle_does_not_block_accept() {
        let (mut card, sink) = card_with_details("subscribe-save");

        card.toggle_details();
        assert!(card.accept().is_applied());
        assert!(card.toggle_details().is_applied());

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(accepted_count(&sink), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_cancels_pending_confirmation() {
        let (mut card, sink) = card("AX-1");
        card.accept();

        assert!(card.dismiss().is_applied());
        assert!(!card.is_celebrating());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(card.status(), CardStatus::Skipped);
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_celebration_clears() {
        let (mut card, _sink) = card("AX-1");
        card.accept();

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert!(!card.is_celebrating());
    }
}
