use crate::checkin::{CheckInSnapshot, FeedbackSession};
use crate::confirmation::{ConfirmationSnapshot, OrderConfirmation};
use crate::consent::{ConsentFooter, ConsentSnapshot};
use earn_catalog::{Catalog, OrderSummary, RewardStats};
use earn_core::{EventSink, Timings, Transition};
use earn_offer::{EarnSection, SectionSnapshot};
use earn_shared::{NextStep, OfferId, Sentiment, View};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Inbound configuration shared by every experience a host creates
#[derive(Debug, Clone, Default)]
pub struct ExperienceConfig {
    pub order: OrderSummary,
    pub catalog: Catalog,
    pub rewards: RewardStats,
    pub timings: Timings,
}

enum MountedView {
    Confirmation {
        order: OrderConfirmation,
        earn: EarnSection,
    },
    Delivery {
        check_in: FeedbackSession,
    },
}

impl MountedView {
    fn mount(view: View, config: &ExperienceConfig, sink: &Arc<dyn EventSink>) -> Self {
        match view {
            View::Confirmation => MountedView::Confirmation {
                order: OrderConfirmation::new(config.order.clone(), sink.clone(), config.timings),
                earn: EarnSection::new(&config.catalog, config.rewards, sink.clone(), config.timings),
            },
            View::Delivery => MountedView::Delivery {
                check_in: FeedbackSession::new(sink.clone(), config.timings),
            },
        }
    }

    fn kind(&self) -> View {
        match self {
            MountedView::Confirmation { .. } => View::Confirmation,
            MountedView::Delivery { .. } => View::Delivery,
        }
    }
}

/// The whole post-purchase page: one mounted view plus the consent footer.
///
/// Switching views tears the old one down, which cancels its pending
/// confirmations and effects. Coming back mounts a fresh instance.
pub struct Experience {
    config: Arc<ExperienceConfig>,
    view: MountedView,
    consent: ConsentFooter,
    sink: Arc<dyn EventSink>,
}

impl Experience {
    pub fn new(config: Arc<ExperienceConfig>, sink: Arc<dyn EventSink>) -> Self {
        Self::with_view(config, sink, View::default())
    }

    pub fn with_view(config: Arc<ExperienceConfig>, sink: Arc<dyn EventSink>, view: View) -> Self {
        let mounted = MountedView::mount(view, &config, &sink);
        Self {
            consent: ConsentFooter::new(sink.clone()),
            view: mounted,
            config,
            sink,
        }
    }

    pub fn current_view(&self) -> View {
        self.view.kind()
    }

    pub fn select_view(&mut self, view: View) -> Transition {
        if self.view.kind() == view {
            debug!(?view, "View already mounted");
            return Transition::Ignored;
        }

        info!(from = ?self.view.kind(), to = ?view, "Switching view");
        self.view = MountedView::mount(view, &self.config, &self.sink);
        Transition::Applied
    }

    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        match &self.view {
            MountedView::Confirmation { order, .. } => Some(order),
            MountedView::Delivery { .. } => None,
        }
    }

    pub fn earn_section(&self) -> Option<&EarnSection> {
        match &self.view {
            MountedView::Confirmation { earn, .. } => Some(earn),
            MountedView::Delivery { .. } => None,
        }
    }

    pub fn check_in(&self) -> Option<&FeedbackSession> {
        match &self.view {
            MountedView::Delivery { check_in } => Some(check_in),
            MountedView::Confirmation { .. } => None,
        }
    }

    pub fn consent(&self) -> &ConsentFooter {
        &self.consent
    }

    fn with_earn(&mut self, f: impl FnOnce(&mut EarnSection) -> Transition) -> Transition {
        match &mut self.view {
            MountedView::Confirmation { earn, .. } => f(earn),
            MountedView::Delivery { .. } => {
                debug!("Offer action outside confirmation view");
                Transition::Ignored
            }
        }
    }

    fn with_order(&mut self, f: impl FnOnce(&mut OrderConfirmation) -> Transition) -> Transition {
        match &mut self.view {
            MountedView::Confirmation { order, .. } => f(order),
            MountedView::Delivery { .. } => {
                debug!("Order action outside confirmation view");
                Transition::Ignored
            }
        }
    }

    fn with_check_in(&mut self, f: impl FnOnce(&mut FeedbackSession) -> Transition) -> Transition {
        match &mut self.view {
            MountedView::Delivery { check_in } => f(check_in),
            MountedView::Confirmation { .. } => {
                debug!("Feedback action outside delivery view");
                Transition::Ignored
            }
        }
    }

    // Offers

    pub fn accept_offer(&mut self, id: &OfferId) -> Transition {
        self.with_earn(|earn| earn.accept(id))
    }

    pub fn skip_offer(&mut self, id: &OfferId) -> Transition {
        self.with_earn(|earn| earn.skip(id))
    }

    pub fn toggle_offer_details(&mut self, id: &OfferId) -> Transition {
        self.with_earn(|earn| earn.toggle_details(id))
    }

    pub fn skip_all(&mut self) -> Transition {
        self.with_earn(EarnSection::skip_all)
    }

    pub fn remind_later(&mut self) -> Transition {
        self.with_earn(EarnSection::remind_later)
    }

    // Order

    pub fn track_package(&mut self) -> Transition {
        self.with_order(OrderConfirmation::track_package)
    }

    pub fn view_receipt(&mut self) -> Transition {
        self.with_order(OrderConfirmation::view_receipt)
    }

    /// Order number for the clipboard, or `None` outside the confirmation view
    pub fn copy_order_number(&mut self) -> Option<String> {
        match &mut self.view {
            MountedView::Confirmation { order, .. } => Some(order.copy_order_number()),
            MountedView::Delivery { .. } => None,
        }
    }

    // Feedback

    pub fn select_sentiment(&mut self, sentiment: Sentiment) -> Transition {
        self.with_check_in(|c| c.select_sentiment(sentiment))
    }

    pub fn start_survey(&mut self) -> Transition {
        self.with_check_in(FeedbackSession::start_survey)
    }

    pub fn decline_survey(&mut self) -> Transition {
        self.with_check_in(FeedbackSession::decline_survey)
    }

    pub fn select_improvement_topics(&mut self, tags: Vec<String>) -> Transition {
        self.with_check_in(|c| c.select_improvement_topics(tags))
    }

    pub fn toggle_topic(&mut self, tag: &str) -> Transition {
        self.with_check_in(|c| c.toggle_topic(tag))
    }

    pub fn submit_survey(&mut self) -> Transition {
        self.with_check_in(FeedbackSession::submit_survey)
    }

    pub fn choose_next_step(&mut self, step: NextStep) -> Transition {
        self.with_check_in(|c| c.choose_next_step(step))
    }

    pub fn request_support(&mut self) -> Transition {
        self.with_check_in(FeedbackSession::request_support)
    }

    // Consent footer, reachable from every view

    pub fn toggle_consent(&mut self) -> Transition {
        self.consent.toggle()
    }

    pub fn turn_off_offers(&mut self) -> Transition {
        self.consent.turn_off_offers()
    }

    pub fn manage_settings(&mut self) -> Transition {
        self.consent.manage_settings()
    }

    pub fn chat(&mut self) -> Transition {
        self.consent.chat()
    }

    pub fn snapshot(&self) -> ExperienceSnapshot {
        let (confirmation, earn, check_in) = match &self.view {
            MountedView::Confirmation { order, earn } => (Some(order.snapshot()), Some(earn.snapshot()), None),
            MountedView::Delivery { check_in } => (None, None, Some(check_in.snapshot())),
        };

        ExperienceSnapshot {
            view: self.view.kind(),
            confirmation,
            earn,
            check_in,
            consent: self.consent.snapshot(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceSnapshot {
    pub view: View,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmationSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earn: Option<SectionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<CheckInSnapshot>,
    pub consent: ConsentSnapshot,
}
